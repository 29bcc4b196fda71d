//! Update and watch commands - check the manifest for new versions

use crate::cli::args::{UpdateArgs, WatchArgs};
use crate::config::Config;
use crate::error::{OfflineError, OfflineResult};
use crate::factory::create_bundle;
use crate::ui::Ui;
use crate::update::UpdateStatus;
use std::time::Duration;
use tracing::info;

/// Execute the update command
pub async fn execute(args: UpdateArgs, config: &Config, scope: Option<&str>) -> OfflineResult<()> {
    let ui = Ui::detect();
    let bundle = create_bundle(config, scope)?;
    let main_page = args
        .main_page
        .unwrap_or_else(|| bundle.scope.as_str().to_string());

    match bundle.updater.try_check_for_update(&main_page).await? {
        UpdateStatus::UpToDate(version) => {
            ui.info(&format!("Up to date at version {}", version));
        }
        UpdateStatus::Updated(version) => {
            ui.success(&format!("Cached new version {}", version), None);
        }
        UpdateStatus::Failed => {
            return Err(OfflineError::Internal("update check failed".to_string()));
        }
    }

    Ok(())
}

/// Execute the watch command, running until Ctrl-C
pub async fn watch(args: WatchArgs, config: &Config, scope: Option<&str>) -> OfflineResult<()> {
    let ui = Ui::detect();
    let bundle = create_bundle(config, scope)?;
    let main_page = args
        .main_page
        .unwrap_or_else(|| bundle.scope.as_str().to_string());
    let every = Duration::from_secs(args.interval.unwrap_or(config.update.interval_secs));

    ui.heading("Watching for updates");
    ui.field("scope", bundle.scope.as_str());
    ui.field("interval", &format!("{}s", every.as_secs()));

    tokio::select! {
        _ = bundle.updater.watch(&main_page, every) => {}
        result = tokio::signal::ctrl_c() => {
            result.map_err(|e| OfflineError::io("waiting for Ctrl-C", e))?;
            info!("Received Ctrl-C, stopping update watch");
        }
    }

    ui.finish("Stopped watching");
    Ok(())
}
