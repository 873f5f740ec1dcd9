//! CLI command implementations.
//!
//! Each submodule owns one or more related `Commands` variants:
//!
//! | Module    | Commands handled                  |
//! |-----------|-----------------------------------|
//! | `drafts`  | `Add`, `List`, `Delete`           |
//! | `repos`   | `Repos`, `Target`                 |
//! | `submit`  | `Submit`                          |
//! | `auth`    | `Login`, `Logout`, `Status`       |
//! | `config`  | `Config`                          |

pub mod auth;
pub mod config;
pub mod drafts;
pub mod repos;
pub mod submit;

pub use auth::{cmd_login, cmd_logout, cmd_status};
pub use config::cmd_config;
pub use drafts::{cmd_add, cmd_delete, cmd_list};
pub use repos::{cmd_repos, cmd_target};
pub use submit::cmd_submit;

use anyhow::{Context, Result};
use issuedraft::config::AppConfig;
use issuedraft::store::FileStore;

fn open_store(config: &AppConfig) -> Result<FileStore> {
    FileStore::open(&config.data_dir)
        .with_context(|| format!("Failed to open store in {}", config.data_dir.display()))
}
