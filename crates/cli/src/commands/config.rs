use eyre::Result;
use std::io::{self, Write};
use std::path::Path;

use crate::cli::ConfigCommands;
use crate::config::Config;

pub async fn handle_config_command(cmd: ConfigCommands, config_path: &Path) -> Result<()> {
    match cmd {
        ConfigCommands::Set { key, value } => handle_set_config(key, value, config_path).await,
        ConfigCommands::Get { key } => handle_get_config(key, config_path).await,
        ConfigCommands::Show => handle_show_config(config_path).await,
        ConfigCommands::Reset { force } => handle_reset_config(force, config_path).await,
    }
}

async fn handle_set_config(key: String, value: String, config_path: &Path) -> Result<()> {
    let mut config = Config::load_from(config_path).await?;

    match config.set_value(&key, &value) {
        Ok(_) => {
            config.save_to(config_path).await?;
            println!("✅ Configuration updated: {} = {}", key, value);
        }
        Err(e) => {
            println!("❌ Failed to set configuration: {}", e);
            return Err(e);
        }
    }

    Ok(())
}

async fn handle_get_config(key: String, config_path: &Path) -> Result<()> {
    let config = Config::load_from(config_path).await?;

    match config.get_value(&key) {
        Ok(value) => {
            println!("{}: {}", key, value);
        }
        Err(e) => {
            println!("❌ Failed to get configuration: {}", e);
            return Err(e);
        }
    }

    Ok(())
}

async fn handle_show_config(config_path: &Path) -> Result<()> {
    let config = Config::load_from(config_path).await?;
    println!("{}", config.show_all());
    println!("\nLoaded from {}", config_path.display());
    Ok(())
}

async fn handle_reset_config(force: bool, config_path: &Path) -> Result<()> {
    if !force {
        print!("Are you sure you want to reset all configuration? (y/N): ");
        io::stdout().flush()?;
        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        if !input.trim().to_lowercase().starts_with('y') {
            println!("❌ Cancelled");
            return Ok(());
        }
    }

    Config::reset(config_path).await?;
    println!("✅ Configuration reset to defaults");
    Ok(())
}
