//! End-to-end inventory pass.
//!
//! ```text
//! folders → physical files → database records → templates → stylesheets → scripts → ignores
//! ```
//!
//! Every phase feeds the same [`AssetRegistry`]; the first fatal scan error
//! aborts the pass.

mod records;

pub use records::{DatabaseRecord, load_records};

use std::path::PathBuf;

use anyhow::{Context, Result};
use indexmap::IndexMap;

use crate::config::{InventoryConfig, MediaFolder, SourceKind, load_media_folders};
use crate::fs::{FileLister, WalkLister};
use crate::media::{AssetDescriptor, AssetRegistry};
use crate::scan::{DescriptorHook, ScanSummary, Scanner, physical::load_media_files};
use crate::utils::html::{DomParser, TlParser};
use crate::utils::plural::plural_count;
use crate::{debug, log};

/// Result of a full pass.
#[derive(Debug)]
pub struct Inventory {
    pub root: PathBuf,
    pub folders: IndexMap<String, MediaFolder>,
    pub registry: AssetRegistry,
    pub stats: InventoryStats,
}

/// Per-phase counters.
#[derive(Debug, Clone, Default)]
pub struct InventoryStats {
    /// Physical files newly registered.
    pub physical: usize,
    pub records: ScanSummary,
    pub templates: ScanSummary,
    pub stylesheets: ScanSummary,
    pub scripts: ScanSummary,
    /// Assets flagged by `ignore` prefixes.
    pub ignored: usize,
}

impl InventoryStats {
    fn source_mut(&mut self, kind: SourceKind) -> &mut ScanSummary {
        match kind {
            SourceKind::Templates => &mut self.templates,
            SourceKind::Stylesheets => &mut self.stylesheets,
            SourceKind::Scripts => &mut self.scripts,
        }
    }
}

/// Configurable inventory run.
pub struct InventoryRun<'a> {
    config: &'a InventoryConfig,
    lister: &'a dyn FileLister,
    dom: &'a dyn DomParser,
    hook: Option<Box<DescriptorHook<'a>>>,
}

impl<'a> InventoryRun<'a> {
    pub fn new(config: &'a InventoryConfig) -> Self {
        Self {
            config,
            lister: &WalkLister,
            dom: &TlParser,
            hook: None,
        }
    }

    pub fn with_lister(mut self, lister: &'a dyn FileLister) -> Self {
        self.lister = lister;
        self
    }

    pub fn with_dom(mut self, dom: &'a dyn DomParser) -> Self {
        self.dom = dom;
        self
    }

    /// Transform descriptors found in template, stylesheet and script files.
    pub fn with_hook(
        mut self,
        hook: impl Fn(AssetDescriptor, &str) -> AssetDescriptor + 'a,
    ) -> Self {
        self.hook = Some(Box::new(hook));
        self
    }

    pub fn run(self) -> Result<Inventory> {
        let config = self.config;
        let root = config.root.clone();
        let mut stats = InventoryStats::default();

        let folders = load_media_folders(&root, &config.folders, self.lister);
        log!("folders"; "{}", plural_count(folders.len(), "media folder"));

        let mut registry = AssetRegistry::new();
        let files = load_media_files(&root, &folders, self.lister);
        stats.physical = registry.load_from_physical_listing(files);
        log!("scan"; "{} on disk", plural_count(stats.physical, "file"));

        let records = match &config.records {
            Some(path) => load_records(path)?,
            None => Vec::new(),
        };

        {
            let mut scanner = Scanner::new(&mut registry)
                .with_lister(self.lister)
                .with_dom(self.dom);
            if let Some(hook) = self.hook {
                scanner = scanner.with_hook(hook);
            }

            for record in &records {
                let field = record.field();
                if record.html {
                    let summary = scanner
                        .scan_database_content(&field)
                        .with_context(|| format!("Failed to scan {}", field.location()))?;
                    stats.records.merge(summary);
                } else {
                    stats.records.sources += 1;
                    stats.records.references += 1;
                    if scanner
                        .scan_database_field(&field)
                        .with_context(|| format!("Failed to scan {}", field.location()))?
                    {
                        stats.records.recorded += 1;
                    }
                }
            }
            if !records.is_empty() {
                log!(
                    "scan";
                    "{}: {}",
                    plural_count(records.len(), "database record"),
                    plural_count(stats.records.recorded, "reference")
                );
            }

            for kind in SourceKind::ALL {
                let dir = config.source_dir(kind);
                let extensions = config.source_extensions(kind);
                debug!("scan"; "{} in {} ({})", kind.as_str(), dir.display(), extensions.join(", "));

                let summary = match kind {
                    SourceKind::Templates => scanner.scan_templates(&dir, &extensions),
                    SourceKind::Stylesheets => scanner.scan_stylesheets(&dir, &extensions),
                    SourceKind::Scripts => scanner.scan_scripts(&dir, &extensions),
                }
                .with_context(|| format!("Failed to scan {} in {}", kind.as_str(), dir.display()))?;

                log!(
                    "scan";
                    "{} {}: {}",
                    plural_count(summary.sources - summary.skipped, "file"),
                    kind.as_str(),
                    plural_count(summary.recorded, "reference")
                );
                *stats.source_mut(kind) = summary;
            }
        }

        for prefix in &config.ignore {
            stats.ignored += registry.ignore_prefix(prefix);
        }
        if stats.ignored > 0 {
            log!("scan"; "{} ignored", plural_count(stats.ignored, "asset"));
        }

        Ok(Inventory {
            root,
            folders,
            registry,
            stats,
        })
    }
}

/// Run a full pass with the default filesystem lister and HTML parser.
pub fn build_inventory(config: &InventoryConfig) -> Result<Inventory> {
    InventoryRun::new(config).run()
}
