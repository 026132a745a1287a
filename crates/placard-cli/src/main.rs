//! Placard CLI
//!
//! Command-line interface for Placard ACL administration.

#![warn(clippy::all)]
#![forbid(unsafe_code)]

use anyhow::Result;
use clap::Parser;
use placard_cli::acl_handlers::handle_acl_command;
use placard_cli::config_handlers::handle_config_command;
use placard_cli::{Cli, Command};
use placard_core::{ConfigManager, PlacardConfig};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config_path = cli.config.as_deref();

    match cli.command {
        // Config commands must work even when the file does not parse.
        Command::Config { action } => {
            init_logging(&PlacardConfig::default().logging.level);
            handle_config_command(config_path, action)?;
        }
        Command::Acl { action } => {
            let config = PlacardConfig::load(config_path)?;
            init_logging(&config.logging.level);
            tracing::debug!(
                state_file = %config.store.state_file.display(),
                administrative_mode = config.acl.administrative_mode,
                "Running ACL command"
            );
            handle_acl_command(&config, action).await?;
        }
    }
    Ok(())
}

/// Log to stderr; `RUST_LOG` wins over the configured level. `log` records
/// from the library crates are forwarded into the subscriber.
fn init_logging(level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| level.into()),
        )
        .with_writer(std::io::stderr)
        .init();
}
