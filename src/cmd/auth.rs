//! Sign-in, sign-out, and status reporting.

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use console::style;
use issuedraft::config::AppConfig;
use issuedraft::drafts::DraftStore;
use issuedraft::github::{self, GitHubClient, PollInterval, TokenPoll};
use issuedraft::session::Session;
use issuedraft::target::SubmissionTarget;
use issuedraft::ui;

use super::open_store;

pub async fn cmd_login(config: &AppConfig, token: Option<&str>, open_browser: bool) -> Result<()> {
    let mut store = open_store(config)?;

    let token = match token {
        Some(token) => token.to_string(),
        None => device_flow(config, open_browser).await?,
    };
    let session = Session::sign_in(&mut store, &token)?;

    // The signed-in login becomes the default target owner.
    let client = GitHubClient::new(session.token().unwrap_or_default(), &config.client_options())?;
    match client.current_user().await {
        Ok(user) => {
            if SubmissionTarget::load(&store)?.owner.is_empty() {
                SubmissionTarget::default_for(&user.login).remember(&mut store)?;
            }
            println!("{}Signed in as {}", ui::CHECK, style(&user.login).bold());
        }
        Err(e) => {
            tracing::warn!(error = %e, "could not fetch signed-in user");
            println!(
                "{}Token saved, but GitHub did not accept it yet: {}",
                ui::WARN,
                e
            );
        }
    }
    Ok(())
}

async fn device_flow(config: &AppConfig, open_browser: bool) -> Result<String> {
    let client_id = config.toml.client_id().ok_or_else(|| {
        anyhow::anyhow!(
            "No GitHub client ID configured. Set GITHUB_CLIENT_ID, add client_id to \
             the [github] section of config.toml, or pass --token."
        )
    })?;
    let options = config.client_options();

    let code = github::request_device_code(&options, &client_id).await?;
    println!();
    println!(
        "Open {} and enter the code {}",
        style(&code.verification_uri).underlined(),
        style(&code.user_code).bold().cyan()
    );
    println!();
    if open_browser {
        if let Err(e) = open::that(&code.verification_uri) {
            eprintln!("Failed to open browser: {}", e);
        }
    }

    let deadline = Instant::now() + Duration::from_secs(code.expires_in);
    let mut interval = PollInterval::new(code.interval);
    loop {
        tokio::time::sleep(interval.current()).await;
        let poll = github::poll_for_token(&options, &client_id, &code.device_code)
            .await
            .context("Device authorization failed")?;
        if let TokenPoll::Authorized(token) = poll {
            return Ok(token);
        }
        interval.observe(&poll);
        if matches!(poll, TokenPoll::SlowDown { .. }) {
            tracing::debug!(interval_secs = interval.current().as_secs(), "slowing down token polling");
        }
        if Instant::now() >= deadline {
            anyhow::bail!("Device code expired before authorization completed");
        }
    }
}

pub fn cmd_logout(config: &AppConfig) -> Result<()> {
    let mut store = open_store(config)?;
    if !Session::load(&store)?.is_signed_in() {
        println!("Not signed in.");
        return Ok(());
    }
    Session::sign_out(&mut store)?;
    println!("Signed out. Drafts were kept.");
    Ok(())
}

pub fn cmd_status(config: &AppConfig) -> Result<()> {
    let mut store = open_store(config)?;
    let session = Session::load(&store)?;
    let target = SubmissionTarget::load(&store)?;
    let pending = DraftStore::load(&mut store)?.len();

    println!();
    println!("{}", style("issuedraft status").bold().cyan());
    println!();
    println!(
        "Session: {}",
        if session.is_signed_in() {
            style("signed in").green().to_string()
        } else {
            style("signed out").red().to_string()
        }
    );
    if target.is_complete() {
        println!("Target:  {}", target);
    } else {
        println!("Target:  not selected");
    }
    println!("Drafts:  {} pending", pending);
    println!("Data:    {}", config.data_dir.display());
    println!();
    Ok(())
}
