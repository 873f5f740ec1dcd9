//! Draft add, list, and delete commands.

use anyhow::Result;
use issuedraft::config::AppConfig;
use issuedraft::drafts::{DeleteOutcome, DraftStore};
use issuedraft::errors::DraftError;
use issuedraft::ui;

use super::open_store;

pub fn cmd_add(config: &AppConfig, title: &str) -> Result<()> {
    let mut store = open_store(config)?;
    let mut drafts = DraftStore::load(&mut store)?;

    match drafts.save(title) {
        Ok(()) => {
            println!("{}Saved draft: {}", ui::PENCIL, title);
            println!("{} draft(s) pending", drafts.len());
            Ok(())
        }
        Err(DraftError::Validation) => {
            anyhow::bail!("Draft title must not be empty");
        }
        Err(e) => Err(e.into()),
    }
}

pub fn cmd_list(config: &AppConfig) -> Result<()> {
    let mut store = open_store(config)?;
    let drafts = DraftStore::load(&mut store)?;

    if drafts.is_empty() {
        println!("No drafts.");
        println!();
        println!("Add one with:");
        println!("  issuedraft add <title>");
        return Ok(());
    }

    for (index, title) in drafts.drafts().iter().enumerate() {
        println!("{:>3}  {}", index, title);
    }
    println!();
    println!("{} draft(s) pending", drafts.len());
    Ok(())
}

pub fn cmd_delete(config: &AppConfig, index: usize, yes: bool) -> Result<()> {
    use dialoguer::Confirm;

    let mut store = open_store(config)?;
    let mut drafts = DraftStore::load(&mut store)?;

    let outcome = drafts.delete(index, |title| {
        if yes {
            return true;
        }
        Confirm::new()
            .with_prompt(format!("Delete draft \"{}\"?", title))
            .default(false)
            .interact()
            .unwrap_or(false)
    })?;

    match outcome {
        DeleteOutcome::Deleted(title) => {
            println!("{}Deleted draft: {}", ui::TRASH, title);
        }
        DeleteOutcome::Cancelled => println!("Delete cancelled"),
    }
    Ok(())
}
