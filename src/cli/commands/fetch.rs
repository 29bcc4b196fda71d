//! Fetch command - route one request through the offline cache

use crate::cli::args::FetchArgs;
use crate::config::Config;
use crate::error::{OfflineError, OfflineResult};
use crate::factory::create_bundle;
use crate::router::{Request, Source};
use crate::ui::Ui;
use std::io::Write;
use tokio::fs;
use tracing::{info, warn};

/// Execute the fetch command
pub async fn execute(args: FetchArgs, config: &Config, scope: Option<&str>) -> OfflineResult<()> {
    let bundle = create_bundle(config, scope)?;

    let request = match args.session {
        Some(session) => Request::sub_resource(&args.url, session),
        None => Request::navigate(&args.url),
    };
    let served = bundle.router.handle(&request).await?;

    let source = match &served.source {
        Source::Cache(key) => format!("cache {}", key),
        Source::Network => "network".to_string(),
    };
    info!("Served {} from {}", args.url, source);

    match args.output {
        Some(path) => {
            let ui = Ui::detect();
            fs::write(&path, &served.response.body)
                .await
                .map_err(|e| OfflineError::io(format!("writing {}", path.display()), e))?;
            let detail = format!("{} bytes from {}", served.response.body.len(), source);
            if served.response.is_ok() {
                ui.success(&format!("Saved {}", path.display()), Some(&detail));
            } else {
                ui.warn(
                    &format!("Saved HTTP {} response", served.response.status),
                    Some(&detail),
                );
            }
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(&served.response.body)
                .and_then(|()| stdout.flush())
                .map_err(|e| OfflineError::io("writing response to stdout", e))?;
        }
    }

    // Let a navigation's update check finish before the runtime shuts down
    if let Some(check) = served.update_check {
        match check.await {
            Ok(status) => info!("Update check finished: {:?}", status),
            Err(e) => warn!("Update check task failed: {}", e),
        }
    }

    Ok(())
}
