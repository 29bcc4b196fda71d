//! offline-bundle - versioned offline caches for a web deployment
//!
//! CLI entry point that dispatches to subcommands.

use clap::Parser;
use console::style;
use offline_bundle::cli::{commands, Cli, Commands};
use offline_bundle::config::{Config, ConfigManager};
use offline_bundle::error::OfflineResult;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            if e.is_retryable() {
                eprintln!(
                    "{} The failure looks transient; running the command again may succeed",
                    style("Retry:").yellow()
                );
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> OfflineResult<()> {
    let cli = Cli::parse();

    // Load configuration
    let config_manager = if let Some(ref path) = cli.config {
        ConfigManager::with_path(path.clone())
    } else {
        ConfigManager::new()
    };
    let config = config_manager.load().await?;

    init_logging(cli.verbose, &config);

    let scope = cli.scope.as_deref();

    // Dispatch to command
    match cli.command {
        Commands::Install(args) => commands::install(args, &config, scope).await,
        Commands::Update(args) => commands::update(args, &config, scope).await,
        Commands::Watch(args) => commands::watch(args, &config, scope).await,
        Commands::List(args) => commands::list(args, &config, scope).await,
        Commands::Prune => commands::prune(&config, scope).await,
        Commands::Fetch(args) => commands::fetch(args, &config, scope).await,
        Commands::Config(args) => commands::config(args, &config, &config_manager).await,
    }
}

/// Initialize logging: 0 = warn, 1 = info, 2+ = debug
fn init_logging(verbose: u8, config: &Config) {
    let filter = match verbose {
        0 => EnvFilter::new("offline_bundle=warn"),
        1 => EnvFilter::new("offline_bundle=info"),
        _ => EnvFilter::new("offline_bundle=debug"),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    if config.general.log_format == "json" {
        builder.json().init();
    } else {
        builder.without_time().init();
    }
}
