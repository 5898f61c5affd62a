//! `scan` and `folders` commands.

use std::fs;

use anyhow::{Context, Result};
use owo_colors::OwoColorize;

use super::args::{OutputFormat, ScanArgs};
use super::report::InventoryReport;
use crate::config::{InventoryConfig, load_media_folders};
use crate::fs::WalkLister;
use crate::inventory::build_inventory;
use crate::log;

/// Build the inventory and print it.
pub fn run_scan(args: &ScanArgs, config: &InventoryConfig) -> Result<()> {
    if !config.root.is_dir() {
        anyhow::bail!("public root `{}` is not a directory", config.root.display());
    }

    let inventory = build_inventory(config)?;

    match args.format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&inventory.registry)
                .context("Failed to serialize registry")?;
            match &args.output {
                Some(path) => {
                    fs::write(path, json)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    log!("scan"; "registry written to {}", path.display());
                }
                None => println!("{json}"),
            }
        }
        OutputFormat::Summary => InventoryReport::new(&inventory.registry).print(),
    }

    Ok(())
}

/// Print the folder list the physical scan walks.
pub fn list_folders(format: OutputFormat, config: &InventoryConfig) -> Result<()> {
    let folders = load_media_folders(&config.root, &config.folders, &WalkLister);

    match format {
        OutputFormat::Json => {
            let json =
                serde_json::to_string_pretty(&folders).context("Failed to serialize folders")?;
            println!("{json}");
        }
        OutputFormat::Summary => {
            for folder in folders.values() {
                let settings = &folder.settings;
                let mut flags = Vec::new();
                if settings.system {
                    flags.push("system".to_string());
                }
                if settings.yml {
                    flags.push("configured".to_string());
                }
                if settings.no_png {
                    flags.push("no png".to_string());
                }
                if let (Some(width), Some(height)) = (settings.width, settings.height) {
                    flags.push(format!("{width}x{height}"));
                }
                println!(
                    "{} {}",
                    folder.path.cyan(),
                    format!("({})", flags.join(", ")).dimmed()
                );
            }
        }
    }

    Ok(())
}
