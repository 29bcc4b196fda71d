//! List command - show cached versions for the scope

use crate::cache::VersionedCache;
use crate::cli::args::{ListArgs, OutputFormat};
use crate::config::Config;
use crate::error::OfflineResult;
use crate::factory::create_bundle;
use crate::ui::Ui;
use console::style;
use serde::Serialize;

/// One row of the version listing
#[derive(Debug, Serialize)]
struct VersionRow {
    version: u64,
    name: String,
    files: usize,
}

/// Execute the list command
pub async fn execute(args: ListArgs, config: &Config, scope: Option<&str>) -> OfflineResult<()> {
    let ui = Ui::for_format(args.format);
    let bundle = create_bundle(config, scope)?;

    let mut rows = Vec::new();
    for key in bundle.locator.versions().await? {
        let cache = bundle.locator.open(key).await?;
        rows.push(row(&cache).await?);
    }

    if rows.is_empty() {
        if matches!(args.format, OutputFormat::Json) {
            println!("[]");
        }
        ui.info("No cached versions");
        return Ok(());
    }

    match args.format {
        OutputFormat::Table => print_table(&ui, &rows),
        OutputFormat::Json => print_json(&rows)?,
        OutputFormat::Plain => print_plain(&rows),
    }

    Ok(())
}

async fn row(cache: &VersionedCache) -> OfflineResult<VersionRow> {
    Ok(VersionRow {
        version: cache.version(),
        name: cache.key().name(),
        files: cache.handle().entries().await?.len(),
    })
}

fn print_table(ui: &Ui, rows: &[VersionRow]) {
    ui.heading("Versions");

    println!(
        "{:<10} {:<8} {}",
        style("VERSION").bold(),
        style("FILES").bold(),
        style("CACHE").bold()
    );
    println!("{}", "-".repeat(60));

    let newest = rows.last().map(|r| r.version);
    for row in rows {
        let version = if Some(row.version) == newest {
            style(row.version.to_string()).green()
        } else {
            style(row.version.to_string()).dim()
        };
        println!("{:<10} {:<8} {}", version, row.files, row.name);
    }

    println!();
    println!("{} version(s)", rows.len());
}

fn print_json(rows: &[VersionRow]) -> OfflineResult<()> {
    let json = serde_json::to_string_pretty(rows)?;
    println!("{}", json);
    Ok(())
}

fn print_plain(rows: &[VersionRow]) {
    for row in rows {
        println!("{}", row.version);
    }
}
