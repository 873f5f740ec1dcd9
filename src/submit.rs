//! Batch submission of drafts with partial-failure recovery.
//!
//! Drafts are sent one at a time, in list order, and each request is awaited
//! before the next one starts. That keeps at most one request in flight and
//! makes every failure attributable to exactly one draft. Failed drafts are
//! never dropped: [`submit_and_persist`] writes them back as the new draft
//! list so the next `submit` retries them.

use async_trait::async_trait;

use crate::drafts::DraftStore;
use crate::errors::{RemoteError, SubmitError};
use crate::store::KeyValueStore;
use crate::target::SubmissionTarget;

/// Something that can create an issue on the remote side.
#[async_trait]
pub trait IssueCreator: Send + Sync {
    async fn create(
        &self,
        target: &SubmissionTarget,
        title: &str,
        body: &str,
    ) -> Result<(), RemoteError>;
}

/// Observer notified as each draft finishes. Used for progress output.
pub trait SubmitProgress {
    fn on_result(&self, index: usize, title: &str, result: &Result<(), RemoteError>);
}

impl SubmitProgress for () {
    fn on_result(&self, _index: usize, _title: &str, _result: &Result<(), RemoteError>) {}
}

/// A draft that could not be created, with the reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftFailure {
    pub title: String,
    pub error: RemoteError,
}

/// Per-batch bookkeeping returned by [`submit`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmitReport {
    /// Drafts that became issues, in list order.
    pub created: Vec<String>,
    /// Failed drafts in their original relative order (the residual list).
    pub failed: Vec<String>,
    pub failures: Vec<DraftFailure>,
}

/// The three disjoint shapes a finished batch can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    AllSucceeded { count: usize },
    AllFailed { count: usize },
    Mixed { succeeded: usize, failed: usize },
}

impl SubmitReport {
    pub fn succeeded(&self) -> usize {
        self.created.len()
    }

    pub fn total(&self) -> usize {
        self.succeeded() + self.failed.len()
    }

    pub fn outcome(&self) -> SubmitOutcome {
        match (self.succeeded(), self.failed.len()) {
            (count, 0) => SubmitOutcome::AllSucceeded { count },
            (0, count) => SubmitOutcome::AllFailed { count },
            (succeeded, failed) => SubmitOutcome::Mixed { succeeded, failed },
        }
    }

    /// User-facing summary with exact counts.
    pub fn summary(&self) -> String {
        self.outcome().to_string()
    }
}

impl std::fmt::Display for SubmitOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubmitOutcome::AllSucceeded { count } => {
                write!(f, "All {} draft(s) were created as issues.", count)
            }
            SubmitOutcome::AllFailed { count } => write!(
                f,
                "All {} draft(s) failed to submit. They were kept for the next attempt.",
                count
            ),
            SubmitOutcome::Mixed { succeeded, failed } => write!(
                f,
                "{} draft(s) were created as issues; {} failed and were kept for the next attempt.",
                succeeded, failed
            ),
        }
    }
}

/// Submit `drafts` to `target`, one request at a time, in order.
///
/// Precondition failures return before any request is made. Per-draft
/// failures are collected in the report rather than returned as errors.
pub async fn submit<C, P>(
    client: &C,
    drafts: &[String],
    target: &SubmissionTarget,
    token: Option<&str>,
    body: &str,
    progress: &P,
) -> Result<SubmitReport, SubmitError>
where
    C: IssueCreator + ?Sized,
    P: SubmitProgress + ?Sized,
{
    match token {
        Some(token) if !token.trim().is_empty() => {}
        _ => return Err(SubmitError::NotAuthenticated),
    }
    if !target.is_complete() {
        return Err(SubmitError::NoTarget);
    }
    if drafts.is_empty() {
        return Err(SubmitError::NothingToSubmit);
    }

    tracing::info!(target_repo = %target, count = drafts.len(), "submitting drafts");

    let mut report = SubmitReport::default();
    for (index, title) in drafts.iter().enumerate() {
        let result = client.create(target, title, body).await;
        progress.on_result(index, title, &result);
        match result {
            Ok(()) => {
                tracing::info!(index, title = %title, "draft submitted");
                report.created.push(title.clone());
            }
            Err(error) => {
                tracing::warn!(index, title = %title, error = %error, "draft failed");
                report.failed.push(title.clone());
                report.failures.push(DraftFailure {
                    title: title.clone(),
                    error,
                });
            }
        }
    }

    tracing::info!(
        succeeded = report.succeeded(),
        failed = report.failed.len(),
        "submission finished"
    );
    Ok(report)
}

/// Load the persisted drafts, submit them, and replace the persisted list
/// with the residual (failed) drafts.
///
/// Nothing is written when a precondition fails. If the residual list cannot
/// be written, the error carries the titles that were already created.
pub async fn submit_and_persist<S, C, P>(
    store: &mut S,
    client: &C,
    target: &SubmissionTarget,
    token: Option<&str>,
    body: &str,
    progress: &P,
) -> Result<SubmitReport, SubmitError>
where
    S: KeyValueStore + ?Sized,
    C: IssueCreator + ?Sized,
    P: SubmitProgress + ?Sized,
{
    let mut drafts = DraftStore::load(store)?;
    let pending = drafts.drafts().to_vec();
    let report = submit(client, &pending, target, token, body, progress).await?;
    if let Err(source) = drafts.replace(report.failed.clone()) {
        tracing::error!(
            created = ?report.created,
            error = %source,
            "created issues but could not save the remaining drafts"
        );
        return Err(SubmitError::ResidualNotSaved {
            created: report.created,
            source,
        });
    }
    Ok(report)
}
