//! Typed error hierarchy for issuedraft.
//!
//! One enum per subsystem:
//! - `StoreError`: key-value store I/O and decoding failures
//! - `DraftError`: draft list validation and positional access
//! - `SessionError`: sign-in failures
//! - `RemoteError`: a single failed GitHub request
//! - `SubmitError`: batch submission preconditions and draft persistence

use thiserror::Error;

/// Errors from the on-disk key-value store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to access store file at {path}: {source}")]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to lock store file at {path}: {source}")]
    Lock {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Store entry '{key}' is corrupt: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors from draft list operations.
#[derive(Debug, Error)]
pub enum DraftError {
    #[error("Draft title must not be empty")]
    Validation,

    #[error("No draft at index {index} (have {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Errors from the authentication session.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Token must not be empty")]
    EmptyToken,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Outcome of a single failed request against the GitHub API.
///
/// Both variants are treated the same way by the submission pipeline: the
/// draft stays in the residual list.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RemoteError {
    #[error("GitHub rejected the request with status {status}: {message}")]
    Rejected { status: u16, message: String },

    #[error("Request to GitHub failed: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for RemoteError {
    fn from(err: reqwest::Error) -> Self {
        RemoteError::Transport(err.to_string())
    }
}

/// Errors that stop a submission batch before any request is made.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("Not signed in. Run 'issuedraft login' first.")]
    NotAuthenticated,

    #[error("No target repository selected. Run 'issuedraft target <owner/name>' first.")]
    NoTarget,

    #[error("There are no drafts to submit")]
    NothingToSubmit,

    #[error(transparent)]
    Drafts(#[from] DraftError),

    #[error(
        "{} issue(s) were created but the remaining drafts could not be saved. \
         Delete these drafts before submitting again: {}",
        created.len(),
        created.join(", ")
    )]
    ResidualNotSaved {
        created: Vec<String>,
        #[source]
        source: DraftError,
    },
}
