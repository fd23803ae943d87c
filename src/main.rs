//! attio - scriptable CLI for the Attio CRM
//!
//! Query records and list entries with compact filter and sort expressions,
//! write attribute values from flags, files or stdin, and pipe the results as
//! JSON, CSV or bare IDs.

mod api;
mod cli;
mod config;
mod exit;
mod output;
mod query;
mod values;

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cli::{Cli, Commands};
use crate::config::{Config, Overrides};

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file
    dotenvy::dotenv().ok();

    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging; stdout is reserved for data
    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(&format!("{:#}", e));
            ExitCode::from(exit::exit_code(&e))
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    // Load configuration
    let config = Config::load(Overrides {
        api_key: cli.api_key.clone(),
        output_format: cli.output_format(),
    })?;

    // Execute command
    match cli.command {
        Commands::Whoami => cli::self_cmd::execute(&config).await,
        Commands::Objects(args) => cli::objects::execute(&config, args).await,
        Commands::Attributes(args) => cli::attributes::execute(&config, args).await,
        Commands::Records(args) => cli::records::execute(&config, args).await,
        Commands::Lists(args) => cli::lists::execute(&config, args).await,
        Commands::Entries(args) => cli::entries::execute(&config, args).await,
        Commands::Notes(args) => cli::notes::execute(&config, args).await,
        Commands::Tasks(args) => cli::tasks::execute(&config, args).await,
        Commands::Comments(args) => cli::comments::execute(&config, args).await,
        Commands::Threads(args) => cli::threads::execute(&config, args).await,
        Commands::Webhooks(args) => cli::webhooks::execute(&config, args).await,
        Commands::Members(args) => cli::members::execute(&config, args).await,
        Commands::Meetings(args) => cli::meetings::execute(&config, args).await,
        Commands::Api(args) => cli::api::execute(&config, args).await,
        Commands::Config(args) => cli::config_cmd::execute(&config, args).await,
    }
}
