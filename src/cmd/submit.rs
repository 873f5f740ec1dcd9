//! Batch submission — `issuedraft submit`.
//!
//! Drafts that fail stay in the store; the command exits cleanly even when
//! every draft failed.

use anyhow::Result;
use issuedraft::config::AppConfig;
use issuedraft::drafts::DraftStore;
use issuedraft::github::GitHubClient;
use issuedraft::session::Session;
use issuedraft::submit::submit_and_persist;
use issuedraft::target::SubmissionTarget;
use issuedraft::ui::{self, SubmitProgressBar};

use super::open_store;

pub async fn cmd_submit(config: &AppConfig) -> Result<()> {
    let mut store = open_store(config)?;
    let session = Session::load(&store)?;
    let target = SubmissionTarget::load(&store)?;
    let pending = DraftStore::load(&mut store)?.len();

    // The pipeline refuses to run without a token, so an empty one is fine here.
    let client = GitHubClient::new(session.token().unwrap_or(""), &config.client_options())?;

    if session.is_signed_in() && target.is_complete() && pending > 0 {
        println!("Submitting {} draft(s) to {}", pending, target);
    }
    let progress = SubmitProgressBar::new(pending);
    let result = submit_and_persist(
        &mut store,
        &client,
        &target,
        session.token(),
        config.issue_body(),
        &progress,
    )
    .await;
    progress.finish();

    let report = result?;
    ui::print_submit_report(&report);
    Ok(())
}
