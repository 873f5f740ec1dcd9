//! Repository listing and target selection — `issuedraft repos` and `issuedraft target`.

use anyhow::{Context, Result};
use console::style;
use issuedraft::config::AppConfig;
use issuedraft::errors::SubmitError;
use issuedraft::github::GitHubClient;
use issuedraft::repos::{RepositoryDirectory, UsageMap};
use issuedraft::session::Session;
use issuedraft::target::SubmissionTarget;

use super::open_store;

pub async fn cmd_repos(config: &AppConfig, query: Option<&str>) -> Result<()> {
    let store = open_store(config)?;
    let session = Session::load(&store)?;
    let token = session.token().ok_or(SubmitError::NotAuthenticated)?;

    let client = GitHubClient::new(token, &config.client_options())?;
    let fetched = client.list_repos().await?;
    // Parse the usage map once for the whole fetch.
    let usage = UsageMap::load(&store)?;
    let directory =
        RepositoryDirectory::new(fetched.iter().map(|repo| repo.owner_and_name()), &usage);

    let query = query.unwrap_or("");
    let top = directory.filter(query);
    if top.is_empty() {
        println!("No repositories match '{}'.", query);
        return Ok(());
    }

    let current = SubmissionTarget::load(&store)?;
    for repo in top {
        let marker = if repo.owner == current.owner && repo.name == current.name {
            style("*").green().bold().to_string()
        } else {
            " ".to_string()
        };
        println!(
            "{} {:<40} {}",
            marker,
            repo.full_name(),
            style(format!("used {}x", repo.usage)).dim()
        );
    }
    println!();
    println!("Select one with: issuedraft target <owner/name>");
    Ok(())
}

pub async fn cmd_target(config: &AppConfig, repo: Option<&str>, from_git: bool) -> Result<()> {
    let mut store = open_store(config)?;

    let selected = if from_git {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;
        Some(
            SubmissionTarget::detect_from_git(&cwd)
                .await
                .ok_or_else(|| anyhow::anyhow!("No GitHub 'origin' remote found in {}", cwd.display()))?,
        )
    } else {
        match repo {
            Some(slug) => Some(resolve_slug(config, &store, slug).await?),
            None => None,
        }
    };

    match selected {
        Some(target) => {
            let usage = target.select(&mut store)?;
            println!("Target set to {} (used {}x)", style(&target).bold(), usage);
        }
        None => {
            let current = SubmissionTarget::load(&store)?;
            if current.is_complete() {
                println!("Target: {}", style(&current).bold());
            } else if !current.owner.is_empty() {
                println!("Target: {}/<no repository selected>", current.owner);
            } else {
                println!("No target selected.");
            }
        }
    }
    Ok(())
}

/// Accept `owner/name`, or a bare `name` owned by the signed-in user.
async fn resolve_slug(
    config: &AppConfig,
    store: &issuedraft::store::FileStore,
    slug: &str,
) -> Result<SubmissionTarget> {
    if let Some(target) = SubmissionTarget::parse(slug) {
        return Ok(target);
    }
    let name = slug.trim();
    if name.is_empty() || name.contains('/') {
        anyhow::bail!("Expected owner/name, got '{}'", slug);
    }

    let current = SubmissionTarget::load(store)?;
    let owner = if !current.owner.is_empty() {
        current.owner
    } else {
        let session = Session::load(store)?;
        let token = session.token().ok_or(SubmitError::NotAuthenticated)?;
        GitHubClient::new(token, &config.client_options())?
            .current_user()
            .await?
            .login
    };
    let mut target = SubmissionTarget::default_for(&owner);
    target.name = name.to_string();
    Ok(target)
}
