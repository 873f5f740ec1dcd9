//! Terminal output helpers: icons, styled summaries, and the submission
//! progress bar.

use console::{Emoji, style};
use indicatif::{ProgressBar, ProgressStyle};

use crate::errors::RemoteError;
use crate::submit::{SubmitOutcome, SubmitProgress, SubmitReport};

pub static CHECK: Emoji<'_, '_> = Emoji("✅ ", "[OK]");
pub static CROSS: Emoji<'_, '_> = Emoji("❌ ", "[ERR]");
pub static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "[!]");
pub static PENCIL: Emoji<'_, '_> = Emoji("📝 ", "*");
pub static TRASH: Emoji<'_, '_> = Emoji("🗑️  ", "-");

/// Progress bar advanced once per submitted draft.
pub struct SubmitProgressBar {
    bar: ProgressBar,
}

impl SubmitProgressBar {
    pub fn new(total: usize) -> Self {
        let bar = ProgressBar::new(total as u64);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.cyan} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=> "),
        );
        Self { bar }
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl SubmitProgress for SubmitProgressBar {
    fn on_result(&self, _index: usize, title: &str, result: &Result<(), RemoteError>) {
        let line = match result {
            Ok(()) => format!("  {}{}", CHECK, title),
            Err(e) => format!("  {}{} {}", CROSS, title, style(format!("({})", e)).dim()),
        };
        // A hidden bar (no terminal) swallows println.
        if self.bar.is_hidden() {
            println!("{}", line);
        } else {
            self.bar.println(line);
        }
        self.bar.inc(1);
    }
}

/// Print the batch summary, styled by outcome.
pub fn print_submit_report(report: &SubmitReport) {
    let summary = report.summary();
    println!();
    match report.outcome() {
        SubmitOutcome::AllSucceeded { .. } => {
            println!("{}{}", CHECK, style(summary).green().bold())
        }
        SubmitOutcome::AllFailed { .. } => println!("{}{}", CROSS, style(summary).red().bold()),
        SubmitOutcome::Mixed { .. } => println!("{}{}", WARN, style(summary).yellow().bold()),
    }
    if !report.failed.is_empty() {
        println!();
        println!("Kept for retry:");
        for title in &report.failed {
            println!("  - {}", title);
        }
    }
}
