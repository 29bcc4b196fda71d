//! Prune command - keep only the newest version

use crate::config::Config;
use crate::error::OfflineResult;
use crate::factory::create_bundle;
use crate::ui::Ui;

/// Execute the prune command
pub async fn execute(config: &Config, scope: Option<&str>) -> OfflineResult<()> {
    let ui = Ui::detect();
    let bundle = create_bundle(config, scope)?;

    let before = bundle.locator.versions().await?.len();
    match bundle.gc.prune_to_newest().await? {
        Some(newest) => {
            ui.success(
                &format!("Kept version {}", newest.version()),
                Some(&format!("removed {}", before.saturating_sub(1))),
            );
        }
        None => ui.info("No cached versions"),
    }

    Ok(())
}
