//! Authentication session.
//!
//! ```text
//! SignedOut --sign_in(token)--> SignedIn --sign_out()--> SignedOut
//! ```
//!
//! The session only holds the bearer token; how it was obtained (device
//! flow or a pasted token) is up to the caller. Tokens are never refreshed.
//! An expired token shows up as ordinary request failures.

use crate::errors::{SessionError, StoreError};
use crate::store::{KeyValueStore, LAST_OWNER_KEY, LAST_REPO_KEY, TOKEN_KEY};

/// Known GitHub token prefixes.
/// See: https://github.blog/2021-04-05-behind-githubs-new-authentication-token-formats/
const GITHUB_TOKEN_PREFIXES: &[&str] = &[
    "ghp_",        // Personal access tokens (classic)
    "github_pat_", // Fine-grained personal access tokens
    "gho_",        // OAuth access tokens
    "ghu_",        // GitHub App user-to-server tokens
    "ghs_",        // GitHub App server-to-server tokens
    "ghr_",        // GitHub App refresh tokens
];

/// Check whether a string looks like a GitHub token based on its prefix.
///
/// Format check only; it says nothing about whether the token is active.
pub fn is_valid_github_token(token: &str) -> bool {
    !token.is_empty()
        && GITHUB_TOKEN_PREFIXES
            .iter()
            .any(|prefix| token.starts_with(prefix))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Session {
    SignedOut,
    SignedIn { token: String },
}

impl Session {
    pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> Result<Self, StoreError> {
        Ok(match store.get(TOKEN_KEY)? {
            Some(token) if !token.trim().is_empty() => Session::SignedIn { token },
            _ => Session::SignedOut,
        })
    }

    pub fn token(&self) -> Option<&str> {
        match self {
            Session::SignedIn { token } => Some(token),
            Session::SignedOut => None,
        }
    }

    pub fn is_signed_in(&self) -> bool {
        matches!(self, Session::SignedIn { .. })
    }

    /// Store `token` and move to `SignedIn`.
    pub fn sign_in<S: KeyValueStore + ?Sized>(
        store: &mut S,
        token: &str,
    ) -> Result<Self, SessionError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(SessionError::EmptyToken);
        }
        if !is_valid_github_token(token) {
            tracing::warn!("token does not start with a known GitHub prefix; using it anyway");
        }
        store.set(TOKEN_KEY, token)?;
        tracing::info!("signed in");
        Ok(Session::SignedIn {
            token: token.to_string(),
        })
    }

    /// Forget the token and the selected target. Owner and repository are
    /// always cleared together.
    pub fn sign_out<S: KeyValueStore + ?Sized>(store: &mut S) -> Result<Self, SessionError> {
        store.remove(TOKEN_KEY)?;
        store.remove(LAST_OWNER_KEY)?;
        store.remove(LAST_REPO_KEY)?;
        tracing::info!("signed out");
        Ok(Session::SignedOut)
    }
}
