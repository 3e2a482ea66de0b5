use std::path::PathBuf;

use url::Url;

#[derive(clap::Parser, Debug)]
#[command(name = "packdeck", version, about = "List installed and available modpacks")]
pub struct Cli {
    /// Path to the configuration file
    #[clap(long, global = true)]
    pub config: Option<PathBuf>,
    /// Directory holding installed instances (overrides configuration)
    #[clap(long, global = true)]
    pub instances_dir: Option<PathBuf>,
    /// URL of the package list (overrides configuration)
    #[clap(long, global = true)]
    pub packages_url: Option<Url>,
    /// Log progress to stderr
    #[clap(short, long, global = true)]
    pub verbose: bool,
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Enumerate installed instances and the modpacks available for install
    List {
        /// Only show selected instances
        #[clap(long)]
        selected: bool,
        /// Keep enumeration order instead of sorting by priority and title
        #[clap(long)]
        unsorted: bool,
    },
    /// Manage configuration
    Config {
        #[clap(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::Subcommand, Debug)]
pub enum ConfigCommands {
    /// Set a configuration value
    Set { key: String, value: String },
    /// Get a configuration value
    Get { key: String },
    /// Show all configuration
    Show,
    /// Reset configuration to defaults
    Reset {
        /// Skip the confirmation prompt
        #[clap(long)]
        force: bool,
    },
}
