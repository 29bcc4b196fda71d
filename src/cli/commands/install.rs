//! Install command - build the first cache

use crate::cli::args::InstallArgs;
use crate::config::Config;
use crate::error::OfflineResult;
use crate::factory::create_bundle;
use crate::session::KnownClients;
use crate::ui::Ui;

/// Execute the install command
pub async fn execute(args: InstallArgs, config: &Config, scope: Option<&str>) -> OfflineResult<()> {
    let ui = Ui::detect();
    let bundle = create_bundle(config, scope)?;

    ui.heading("Installing offline bundle");
    ui.field("scope", bundle.scope.as_str());

    let clients = KnownClients::new(args.main_page.into_iter().collect());
    let cache = bundle.updater.try_activate(&clients).await?;
    let entries = cache.handle().entries().await?;

    ui.success(
        &format!("Cached version {}", cache.version()),
        Some(&format!("{} files", entries.len())),
    );
    ui.finish("Offline bundle installed");

    Ok(())
}
