use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::RemoteError;
use crate::submit::IssueCreator;
use crate::target::SubmissionTarget;

pub const DEFAULT_API_URL: &str = "https://api.github.com";
pub const DEFAULT_OAUTH_URL: &str = "https://github.com";
pub const DEFAULT_USER_AGENT: &str = concat!("issuedraft/", env!("CARGO_PKG_VERSION"));

const REPOS_PER_PAGE: usize = 100;

/// Added to the polling interval each time GitHub answers `slow_down`.
pub const SLOW_DOWN_INCREMENT: Duration = Duration::from_secs(5);

/// Response from GitHub's device code endpoint.
#[derive(Debug, Deserialize, Serialize)]
pub struct DeviceCodeResponse {
    pub device_code: String,
    pub user_code: String,
    pub verification_uri: String,
    pub expires_in: u64,
    pub interval: u64,
}

/// Response from GitHub's token polling endpoint.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: Option<String>,
    pub token_type: Option<String>,
    pub scope: Option<String>,
    pub error: Option<String>,
    /// Sent with `slow_down`: the interval, in seconds, to use from now on.
    pub interval: Option<u64>,
}

/// One answer from the token endpoint while the user authorizes the device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenPoll {
    Pending,
    SlowDown { interval: Option<u64> },
    Authorized(String),
}

/// Tracks how long to wait between token polls.
#[derive(Debug, Clone, Copy)]
pub struct PollInterval {
    current: Duration,
}

impl PollInterval {
    pub fn new(interval_secs: u64) -> Self {
        Self {
            current: Duration::from_secs(interval_secs.max(1)),
        }
    }

    pub fn current(&self) -> Duration {
        self.current
    }

    /// Back off after `slow_down`: grow by five seconds, or jump to the
    /// server's interval when that is longer.
    pub fn observe(&mut self, poll: &TokenPoll) {
        if let TokenPoll::SlowDown { interval } = poll {
            let bumped = self.current + SLOW_DOWN_INCREMENT;
            let requested = interval.map(Duration::from_secs).unwrap_or_default();
            self.current = bumped.max(requested);
        }
    }
}

/// The authenticated user (subset of fields).
#[derive(Debug, Deserialize)]
pub struct GitHubUser {
    pub login: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct RepoOwner {
    pub login: String,
}

/// A GitHub repository (subset of fields we care about).
#[derive(Debug, Deserialize, Serialize)]
pub struct GitHubRepo {
    pub name: String,
    pub owner: RepoOwner,
    #[serde(default)]
    pub private: bool,
    #[serde(default)]
    pub description: Option<String>,
}

impl GitHubRepo {
    pub fn owner_and_name(&self) -> (String, String) {
        (self.owner.login.clone(), self.name.clone())
    }
}

/// A created issue (subset of fields).
#[derive(Debug, Deserialize, Serialize)]
pub struct GitHubIssue {
    pub number: i64,
    pub title: String,
    pub html_url: String,
}

#[derive(Debug, Serialize)]
struct NewIssue<'a> {
    title: &'a str,
    body: &'a str,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: Option<String>,
}

/// Settings for building a [`GitHubClient`].
#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub api_url: String,
    pub oauth_url: String,
    pub user_agent: String,
    pub timeout: Duration,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            oauth_url: DEFAULT_OAUTH_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// REST client for the few GitHub endpoints issuedraft uses.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    http: reqwest::Client,
    api_url: String,
    token: String,
}

impl GitHubClient {
    pub fn new(token: &str, options: &ClientOptions) -> anyhow::Result<Self> {
        Ok(Self {
            http: build_http(options)?,
            api_url: options.api_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        })
    }

    fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.http
            .get(format!("{}{}", self.api_url, path))
            .bearer_auth(&self.token)
            .header("Accept", "application/vnd.github+json")
    }

    /// Login of the authenticated user; used as the default target owner.
    pub async fn current_user(&self) -> anyhow::Result<GitHubUser> {
        self.get("/user")
            .send()
            .await
            .context("Failed to send user request to GitHub")?
            .error_for_status()
            .context("GitHub user API returned error status")?
            .json::<GitHubUser>()
            .await
            .context("Failed to parse user response from GitHub")
    }

    /// List repos accessible to the authenticated user, most recently updated first.
    /// Paginates through all pages automatically.
    pub async fn list_repos(&self) -> anyhow::Result<Vec<GitHubRepo>> {
        let mut all_repos = Vec::new();
        let mut page = 1u32;

        loop {
            let resp: Vec<GitHubRepo> = self
                .get("/user/repos")
                .query(&[
                    ("sort", "updated"),
                    ("per_page", &REPOS_PER_PAGE.to_string()),
                    ("page", &page.to_string()),
                ])
                .send()
                .await
                .context("Failed to send repos request to GitHub")?
                .error_for_status()
                .context("GitHub repos API returned error status")?
                .json()
                .await
                .context("Failed to parse repos response from GitHub")?;

            let count = resp.len();
            all_repos.extend(resp);

            if count < REPOS_PER_PAGE {
                break; // Last page
            }
            page += 1;
        }

        tracing::debug!(count = all_repos.len(), "fetched repositories");
        Ok(all_repos)
    }

    /// Create one issue. Any 2xx status counts as success, even when the
    /// response body cannot be decoded (then `Ok(None)`).
    pub async fn create_issue(
        &self,
        target: &SubmissionTarget,
        title: &str,
        body: &str,
    ) -> Result<Option<GitHubIssue>, RemoteError> {
        let url = format!(
            "{}/repos/{}/{}/issues",
            self.api_url, target.owner, target.name
        );
        let resp = self
            .http
            .post(&url)
            .bearer_auth(&self.token)
            .header("Accept", "application/vnd.github+json")
            .json(&NewIssue { title, body })
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorBody>(&text)
                .ok()
                .and_then(|b| b.message)
                .unwrap_or(text);
            return Err(RemoteError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        match resp.json::<GitHubIssue>().await {
            Ok(issue) => Ok(Some(issue)),
            Err(e) => {
                tracing::warn!(status = status.as_u16(), error = %e, "issue created but response was unreadable");
                Ok(None)
            }
        }
    }
}

#[async_trait]
impl IssueCreator for GitHubClient {
    async fn create(
        &self,
        target: &SubmissionTarget,
        title: &str,
        body: &str,
    ) -> Result<(), RemoteError> {
        if let Some(issue) = self.create_issue(target, title, body).await? {
            tracing::debug!(number = issue.number, url = %issue.html_url, "created issue");
        }
        Ok(())
    }
}

fn build_http(options: &ClientOptions) -> anyhow::Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(options.user_agent.clone())
        .timeout(options.timeout)
        .build()
        .context("Failed to build HTTP client")
}

/// Start the device flow. Returns the device code and the user code to enter.
pub async fn request_device_code(
    options: &ClientOptions,
    client_id: &str,
) -> anyhow::Result<DeviceCodeResponse> {
    let url = format!("{}/login/device/code", options.oauth_url.trim_end_matches('/'));
    let resp = build_http(options)?
        .post(&url)
        .header("Accept", "application/json")
        .form(&[("client_id", client_id), ("scope", "repo")])
        .send()
        .await
        .context("Failed to send device code request to GitHub")?;

    if resp.status() == reqwest::StatusCode::NOT_FOUND {
        anyhow::bail!(
            "GitHub rejected the OAuth client ID. Ensure GITHUB_CLIENT_ID is set to a valid \
             GitHub OAuth App with Device Flow enabled. \
             Create one at https://github.com/settings/developers"
        );
    }

    let resp = resp
        .error_for_status()
        .context("GitHub device code endpoint returned error status")?;
    resp.json::<DeviceCodeResponse>()
        .await
        .context("Failed to parse device code response from GitHub")
}

/// Poll GitHub once for the access token. Errors other than
/// `authorization_pending` and `slow_down` end the flow.
pub async fn poll_for_token(
    options: &ClientOptions,
    client_id: &str,
    device_code: &str,
) -> anyhow::Result<TokenPoll> {
    let url = format!(
        "{}/login/oauth/access_token",
        options.oauth_url.trim_end_matches('/')
    );
    let resp = build_http(options)?
        .post(&url)
        .header("Accept", "application/json")
        .form(&[
            ("client_id", client_id),
            ("device_code", device_code),
            ("grant_type", "urn:ietf:params:oauth:grant-type:device_code"),
        ])
        .send()
        .await
        .context("Failed to send token poll request to GitHub")?
        .json::<TokenResponse>()
        .await
        .context("Failed to parse token poll response from GitHub")?;

    interpret_token_response(resp)
}

fn interpret_token_response(resp: TokenResponse) -> anyhow::Result<TokenPoll> {
    if let Some(token) = resp.access_token {
        return Ok(TokenPoll::Authorized(token));
    }

    match resp.error.as_deref() {
        Some("authorization_pending") => Ok(TokenPoll::Pending),
        Some("slow_down") => Ok(TokenPoll::SlowDown {
            interval: resp.interval,
        }),
        Some(err) => anyhow::bail!("GitHub auth error: {}", err),
        None => anyhow::bail!("Unexpected response from GitHub"),
    }
}
