//! Configuration for issuedraft.
//!
//! Settings are read from `config.toml` in the data directory and layered
//! as file → environment → CLI.
//!
//! # Configuration File Format
//!
//! ```toml
//! [github]
//! api_url = "https://api.github.com"
//! oauth_url = "https://github.com"
//! client_id = "Iv1.0123456789abcdef"
//! user_agent = "issuedraft"
//! timeout_secs = 30
//!
//! [submit]
//! issue_body = ""
//! ```
//!
//! Environment overrides: `GITHUB_API_URL`, `GITHUB_CLIENT_ID`,
//! `ISSUEDRAFT_DIR`. A `.env` file in the working directory is loaded
//! first, if present.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::github::{ClientOptions, DEFAULT_API_URL, DEFAULT_OAUTH_URL, DEFAULT_USER_AGENT};

/// Name of the data directory under the home directory.
pub const DATA_DIR_NAME: &str = ".issuedraft";
/// Name of the configuration file inside the data directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// GitHub connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GithubSection {
    /// REST API base URL
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Host serving the OAuth device flow endpoints
    #[serde(default = "default_oauth_url")]
    pub oauth_url: String,
    /// OAuth App client ID used for `issuedraft login`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    /// User-Agent header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_oauth_url() -> String {
    DEFAULT_OAUTH_URL.to_string()
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for GithubSection {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            oauth_url: default_oauth_url(),
            client_id: None,
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Submission settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubmitSection {
    /// Body sent with every created issue
    #[serde(default)]
    pub issue_body: String,
}

/// Contents of `config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IssuedraftToml {
    #[serde(default)]
    pub github: GithubSection,
    #[serde(default)]
    pub submit: SubmitSection,
}

impl IssuedraftToml {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse config.toml")
    }

    /// Load `config.toml` from `data_dir`, or defaults if it does not exist.
    pub fn load_or_default(data_dir: &Path) -> Result<Self> {
        let config_path = data_dir.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            Self::load(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config.toml")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))
    }

    /// API URL, with `GITHUB_API_URL` taking precedence over the file.
    pub fn api_url(&self) -> String {
        std::env::var("GITHUB_API_URL")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| self.github.api_url.clone())
    }

    /// Client ID, with `GITHUB_CLIENT_ID` taking precedence over the file.
    pub fn client_id(&self) -> Option<String> {
        std::env::var("GITHUB_CLIENT_ID")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .or_else(|| self.github.client_id.clone())
    }

    /// Validate configuration and return warnings.
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        for (name, url) in [
            ("github.api_url", &self.github.api_url),
            ("github.oauth_url", &self.github.oauth_url),
        ] {
            if !(url.starts_with("https://") || url.starts_with("http://")) {
                warnings.push(format!("{} should be an http(s) URL, got '{}'", name, url));
            }
        }
        if self.github.timeout_secs == 0 {
            warnings.push("github.timeout_secs is 0; requests would time out immediately".into());
        }
        if self.github.user_agent.trim().is_empty() {
            warnings.push("github.user_agent is empty; GitHub rejects requests without one".into());
        }
        if self.client_id().is_none() {
            warnings.push(
                "No GitHub client_id configured; 'issuedraft login' will need --token".into(),
            );
        }
        warnings
    }
}

/// Resolved runtime configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub toml: IssuedraftToml,
}

impl AppConfig {
    /// Resolve the data directory (CLI → `ISSUEDRAFT_DIR` → `~/.issuedraft`)
    /// and load its `config.toml`.
    pub fn load(cli_data_dir: Option<&Path>) -> Result<Self> {
        let data_dir = resolve_data_dir(cli_data_dir)?;
        let toml = IssuedraftToml::load_or_default(&data_dir)?;
        Ok(Self { data_dir, toml })
    }

    pub fn config_path(&self) -> PathBuf {
        self.data_dir.join(CONFIG_FILE_NAME)
    }

    pub fn log_dir(&self) -> PathBuf {
        self.data_dir.join("logs")
    }

    pub fn issue_body(&self) -> &str {
        &self.toml.submit.issue_body
    }

    pub fn client_options(&self) -> ClientOptions {
        ClientOptions {
            api_url: self.toml.api_url(),
            oauth_url: self.toml.github.oauth_url.clone(),
            user_agent: self.toml.github.user_agent.clone(),
            timeout: Duration::from_secs(self.toml.github.timeout_secs),
        }
    }
}

fn resolve_data_dir(cli_data_dir: Option<&Path>) -> Result<PathBuf> {
    if let Some(dir) = cli_data_dir {
        return Ok(dir.to_path_buf());
    }
    if let Ok(dir) = std::env::var("ISSUEDRAFT_DIR") {
        if !dir.trim().is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }
    let home =
        dirs::home_dir().ok_or_else(|| anyhow::anyhow!("Could not determine home directory"))?;
    Ok(home.join(DATA_DIR_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let toml = IssuedraftToml::default();
        assert_eq!(toml.github.api_url, "https://api.github.com");
        assert_eq!(toml.github.oauth_url, "https://github.com");
        assert_eq!(toml.github.timeout_secs, 30);
        assert_eq!(toml.submit.issue_body, "");
        assert!(toml.github.client_id.is_none());
    }

    #[test]
    fn test_parse_partial_file_fills_defaults() {
        let toml = IssuedraftToml::parse(
            r#"
[github]
client_id = "Iv1.abc"

[submit]
issue_body = "Filed from issuedraft"
"#,
        )
        .unwrap();
        assert_eq!(toml.github.client_id.as_deref(), Some("Iv1.abc"));
        assert_eq!(toml.github.api_url, "https://api.github.com");
        assert_eq!(toml.submit.issue_body, "Filed from issuedraft");
    }

    #[test]
    fn test_parse_empty_file() {
        let toml = IssuedraftToml::parse("").unwrap();
        assert_eq!(toml.github.timeout_secs, 30);
    }

    #[test]
    fn test_parse_invalid_toml() {
        assert!(IssuedraftToml::parse("[github\napi_url = ").is_err());
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let mut toml = IssuedraftToml::default();
        toml.github.timeout_secs = 5;
        toml.submit.issue_body = "body".into();
        toml.save(&dir.path().join(CONFIG_FILE_NAME)).unwrap();

        let loaded = IssuedraftToml::load_or_default(dir.path()).unwrap();
        assert_eq!(loaded.github.timeout_secs, 5);
        assert_eq!(loaded.submit.issue_body, "body");
    }

    #[test]
    fn test_load_or_default_without_file() {
        let dir = TempDir::new().unwrap();
        let toml = IssuedraftToml::load_or_default(dir.path()).unwrap();
        assert_eq!(toml.github.api_url, DEFAULT_API_URL);
    }

    #[test]
    fn test_validate_flags_bad_values() {
        let mut toml = IssuedraftToml::default();
        toml.github.api_url = "api.github.com".into();
        toml.github.timeout_secs = 0;
        let warnings = toml.validate();
        assert!(warnings.iter().any(|w| w.contains("github.api_url")));
        assert!(warnings.iter().any(|w| w.contains("timeout_secs")));
    }

    #[test]
    fn test_cli_data_dir_wins() {
        let dir = TempDir::new().unwrap();
        let config = AppConfig::load(Some(dir.path())).unwrap();
        assert_eq!(config.data_dir, dir.path());
        assert_eq!(config.config_path(), dir.path().join(CONFIG_FILE_NAME));
        assert_eq!(config.log_dir(), dir.path().join("logs"));
    }

    #[test]
    fn test_client_options_from_file() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "[github]\noauth_url = \"http://localhost:9\"\ntimeout_secs = 7\n",
        )
        .unwrap();
        let config = AppConfig::load(Some(dir.path())).unwrap();
        let options = config.client_options();
        assert_eq!(options.oauth_url, "http://localhost:9");
        assert_eq!(options.timeout, Duration::from_secs(7));
    }
}
