use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod cmd;

#[derive(Parser)]
#[command(name = "issuedraft")]
#[command(version, about = "Draft GitHub issues offline and submit them in one batch")]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Skip confirmation prompts
    #[arg(long, global = true)]
    pub yes: bool,

    /// Directory holding the store, config.toml and logs (default: ~/.issuedraft)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Save a new draft title
    Add {
        /// Issue title (multiple words are joined with spaces)
        #[arg(required = true)]
        title: Vec<String>,
    },
    /// List drafts, newest first
    List,
    /// Delete the draft at INDEX (as shown by `list`)
    Delete { index: usize },
    /// Show your most used repositories, optionally filtered by name
    Repos {
        /// Case-insensitive substring of the repository name
        query: Option<String>,
    },
    /// Show or select the submission target
    Target {
        /// Repository as owner/name
        repo: Option<String>,
        /// Use the `origin` remote of the current git checkout
        #[arg(long, conflicts_with = "repo")]
        from_git: bool,
    },
    /// Submit all drafts to the current target
    Submit,
    /// Sign in to GitHub
    Login {
        /// Use this token instead of the device flow
        #[arg(long)]
        token: Option<String>,
        /// Don't open the verification page in a browser
        #[arg(long)]
        no_browser: bool,
    },
    /// Sign out and forget the stored token
    Logout,
    /// Show session, target and draft count
    Status,
    /// View or validate configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand, Clone)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Validate configuration and show any warnings
    Validate,
    /// Write a default config.toml
    Init,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = issuedraft::config::AppConfig::load(cli.data_dir.as_deref())?;
    let log_dir = config.log_dir();
    let _log_guard = issuedraft::logging::init(cli.verbose, Some(log_dir.as_path()));

    match &cli.command {
        Commands::Add { title } => cmd::cmd_add(&config, &title.join(" "))?,
        Commands::List => cmd::cmd_list(&config)?,
        Commands::Delete { index } => cmd::cmd_delete(&config, *index, cli.yes)?,
        Commands::Repos { query } => cmd::cmd_repos(&config, query.as_deref()).await?,
        Commands::Target { repo, from_git } => {
            cmd::cmd_target(&config, repo.as_deref(), *from_git).await?
        }
        Commands::Submit => cmd::cmd_submit(&config).await?,
        Commands::Login { token, no_browser } => {
            cmd::cmd_login(&config, token.as_deref(), !*no_browser).await?
        }
        Commands::Logout => cmd::cmd_logout(&config)?,
        Commands::Status => cmd::cmd_status(&config)?,
        Commands::Config { command } => cmd::cmd_config(&config, command.clone())?,
    }

    Ok(())
}
