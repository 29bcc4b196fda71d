//! CLI argument definitions using clap derive

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// offline-bundle - versioned offline caches for a web deployment
///
/// Builds complete, versioned snapshots of a deployment's resources and
/// serves each session from the snapshot it started with.
#[derive(Parser, Debug)]
#[command(name = "offline-bundle")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "OFFLINE_BUNDLE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Deployment scope URL (overrides deployment.scope)
    #[arg(long, global = true, env = "OFFLINE_BUNDLE_SCOPE")]
    pub scope: Option<String>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build the first cache from the current manifest
    Install(InstallArgs),

    /// Check the manifest once and build a new version if needed
    Update(UpdateArgs),

    /// Check for updates periodically until interrupted
    Watch(WatchArgs),

    /// List cached versions for the scope
    List(ListArgs),

    /// Delete every cached version except the newest
    Prune,

    /// Route one request through the offline cache
    Fetch(FetchArgs),

    /// Show or initialize configuration
    Config(ConfigArgs),
}

/// Arguments for the install command
#[derive(Parser, Debug)]
pub struct InstallArgs {
    /// Main page to cache alongside the manifest files
    #[arg(long)]
    pub main_page: Option<String>,
}

/// Arguments for the update command
#[derive(Parser, Debug)]
pub struct UpdateArgs {
    /// Main page to cache alongside the manifest files (defaults to the scope)
    #[arg(long)]
    pub main_page: Option<String>,
}

/// Arguments for the watch command
#[derive(Parser, Debug)]
pub struct WatchArgs {
    /// Seconds between checks (default: from config)
    #[arg(short, long)]
    pub interval: Option<u64>,

    /// Main page to cache alongside the manifest files (defaults to the scope)
    #[arg(long)]
    pub main_page: Option<String>,
}

/// Arguments for the list command
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Output format
    #[arg(short, long, default_value = "table")]
    pub format: OutputFormat,
}

/// Arguments for the fetch command
#[derive(Parser, Debug)]
pub struct FetchArgs {
    /// URL to request
    pub url: String,

    /// Session issuing the request (omit for a navigation)
    #[arg(short, long)]
    pub session: Option<String>,

    /// Write the body to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Subcommand for config
    #[command(subcommand)]
    pub action: Option<ConfigAction>,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Initialize default configuration
    Init {
        /// Overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },
}

/// Output format for list command
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    Table,
    /// JSON output
    Json,
    /// Simple text (one per line)
    Plain,
}
