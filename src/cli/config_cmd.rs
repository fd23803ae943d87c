//! Config command

use anyhow::Result;
use clap::{Args, Subcommand};
use serde_json::Value;

use crate::api::AttioClient;
use crate::config::{mask, Config, ConfigFile};
use crate::output;

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show current configuration
    Show,

    /// Save an API key to the config file
    SetKey {
        /// API key
        key: String,
    },

    /// Test API connection
    Test,

    /// Show config file path
    Path,
}

pub async fn execute(config: &Config, args: ConfigArgs) -> Result<()> {
    match args.command {
        ConfigCommand::Show => {
            output::info("Current configuration:");

            match (&config.api_key, config.api_key_source) {
                (Some(key), source) => {
                    println!("  API key: {} ({})", mask(key), source.unwrap_or("unknown"));
                }
                (None, _) => output::warning("  API key: Not configured!"),
            }

            if let Some(ref base_url) = config.base_url {
                println!("  Base URL: {}", base_url);
            }

            println!("  Output Format: {:?}", config.output_format);
        }

        ConfigCommand::SetKey { key } => {
            let path = Config::config_file()?;
            let mut file = ConfigFile::read_or_default(&path);
            file.api_key = Some(key);
            file.write(&path)?;
            output::success(&format!("API key saved to {}", path.display()));
        }

        ConfigCommand::Test => {
            output::info("Testing API connection...");

            let client = AttioClient::new(config)?;
            let identity = client.get_raw("/v2/self", &[]).await?;

            if identity.get("active").and_then(Value::as_bool) == Some(false) {
                output::warning("API key is not active");
            } else {
                let workspace = identity
                    .get("workspace_name")
                    .and_then(Value::as_str)
                    .unwrap_or("unknown workspace");
                output::success(&format!("API key is valid ({})", workspace));
            }
        }

        ConfigCommand::Path => {
            println!("{}", Config::config_file()?.display());
        }
    }

    Ok(())
}
