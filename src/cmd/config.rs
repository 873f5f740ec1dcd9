//! Configuration view and validation commands — `issuedraft config`.

use anyhow::Result;
use issuedraft::config::{AppConfig, IssuedraftToml};

use super::super::ConfigCommands;

pub fn cmd_config(config: &AppConfig, command: Option<ConfigCommands>) -> Result<()> {
    let config_path = config.config_path();

    match command {
        None | Some(ConfigCommands::Show) => {
            println!();
            println!("issuedraft Configuration");
            println!("========================");
            println!();

            if config_path.exists() {
                println!("Config file: {}", config_path.display());
            } else {
                println!("No config.toml found at {}", config_path.display());
                println!("Using default configuration.");
            }
            println!();

            let toml = &config.toml;
            println!("[github]");
            println!("  api_url = \"{}\"", toml.github.api_url);
            println!("  oauth_url = \"{}\"", toml.github.oauth_url);
            if let Some(client_id) = &toml.github.client_id {
                println!("  client_id = \"{}\"", client_id);
            }
            println!("  user_agent = \"{}\"", toml.github.user_agent);
            println!("  timeout_secs = {}", toml.github.timeout_secs);
            println!();
            println!("[submit]");
            println!("  issue_body = {:?}", toml.submit.issue_body);
            println!();

            println!("Effective values (with env/CLI overrides):");
            println!("  data_dir = \"{}\"", config.data_dir.display());
            println!("  api_url = \"{}\"", toml.api_url());
            println!(
                "  client_id = {}",
                toml.client_id()
                    .map(|id| format!("\"{}\"", id))
                    .unwrap_or_else(|| "(not set)".to_string())
            );
            println!();
        }
        Some(ConfigCommands::Validate) => {
            println!();
            println!("Validating configuration...");
            println!();

            if !config_path.exists() {
                println!("No config.toml found. Using defaults.");
            }

            let warnings = config.toml.validate();
            if warnings.is_empty() {
                println!("Configuration is valid.");
            } else {
                println!("Configuration warnings:");
                for warning in warnings {
                    println!("  - {}", warning);
                }
            }
            println!();
        }
        Some(ConfigCommands::Init) => {
            if config_path.exists() {
                println!("config.toml already exists at {}", config_path.display());
                return Ok(());
            }
            std::fs::create_dir_all(&config.data_dir)?;
            IssuedraftToml::default().save(&config_path)?;
            println!("Created {}", config_path.display());
        }
    }

    Ok(())
}
