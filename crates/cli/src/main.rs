mod cli;
mod commands;
mod config;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};
use crate::commands::{handle_config_command, handle_list_command};
use crate::config::Config;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "info" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config_path = cli.config.clone().unwrap_or_else(Config::get_config_path);

    match cli.command {
        Commands::List { selected, unsorted } => {
            let config = Config::load_from(&config_path).await?;
            tracing::info!("Loaded configuration from {}", config_path.display());
            let launcher = config.launcher_config(cli.instances_dir, cli.packages_url)?;
            handle_list_command(&launcher, selected, unsorted).await?;
        }
        Commands::Config { command } => {
            handle_config_command(command, &config_path).await?;
        }
    }

    Ok(())
}
