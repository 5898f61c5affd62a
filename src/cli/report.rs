//! Inventory summary formatting.

use std::collections::BTreeMap;
use std::fmt;

use owo_colors::OwoColorize;

use crate::media::AssetRegistry;
use crate::utils::plural::plural_s;

/// Asset names grouped by folder path.
type Grouped = BTreeMap<String, Vec<String>>;

/// Summary of a finished inventory.
#[derive(Debug, Default)]
pub struct InventoryReport {
    pub total: usize,
    pub physical: usize,
    /// Referenced but not on disk.
    pub missing: Grouped,
    /// On disk but never referenced.
    pub unused: Grouped,
}

impl InventoryReport {
    pub fn new(registry: &AssetRegistry) -> Self {
        let mut report = Self {
            total: registry.len(),
            ..Self::default()
        };

        for asset in registry.iter() {
            if asset.physical {
                report.physical += 1;
            }
            let group = if asset.is_missing() {
                &mut report.missing
            } else if asset.is_unused() {
                &mut report.unused
            } else {
                continue;
            };
            group
                .entry(asset.folder_path())
                .or_default()
                .push(asset.name.clone());
        }

        report
    }

    pub fn missing_count(&self) -> usize {
        self.missing.values().map(Vec::len).sum()
    }

    pub fn unused_count(&self) -> usize {
        self.unused.values().map(Vec::len).sum()
    }

    /// Print both sections, then the totals line.
    pub fn print(&self) {
        print_section("missing", &self.missing);
        print_section("unused", &self.unused);
        println!();
        println!("{self}");
    }
}

fn print_section(name: &str, groups: &Grouped) {
    if groups.is_empty() {
        return;
    }
    println!();

    let folder_count = groups.len();
    let asset_count: usize = groups.values().map(Vec::len).sum();

    println!(
        "{} {}",
        name.red().bold(),
        format!(
            "({asset_count} asset{}, {folder_count} folder{})",
            plural_s(asset_count),
            plural_s(folder_count)
        )
        .dimmed()
    );

    for (folder, names) in groups {
        println!("{}{}{}", "[".dimmed(), folder.cyan(), "]".dimmed());
        for name in names {
            println!("{} {}", "→".red(), name);
        }
    }
}

impl fmt::Display for InventoryReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {}",
            self.total.to_string().bold(),
            format!("asset{},", plural_s(self.total)).dimmed(),
            self.physical.to_string().green().bold(),
            "on disk,".dimmed(),
            format!(
                "{} missing, {} unused",
                self.missing_count(),
                self.unused_count()
            )
            .yellow()
        )
    }
}
