//! Source scanners.
//!
//! Each scanner pulls raw reference candidates out of one kind of text,
//! classifies them, registers unseen assets and records an occurrence:
//!
//! | Source             | Method                     | Kinds                              |
//! |--------------------|----------------------------|------------------------------------|
//! | database field     | [`Scanner::scan_database_field`]   | `.mediafile`               |
//! | database HTML      | [`Scanner::scan_database_content`] | `.content-image` / `.content-link` |
//! | template files     | [`Scanner::scan_templates`]        | `.template-asset` / `.template-link` |
//! | stylesheet files   | [`Scanner::scan_stylesheets`]      | `.css-image` / `.css-font` |
//! | script files       | [`Scanner::scan_scripts`]          | `.js-image`                |
//!
//! File scanners read and extract in parallel, then apply registry changes
//! sequentially in file order. A fatal error stops the scan at the failing
//! file; files before it stay recorded, nothing from the failing file is.

mod database;
pub mod physical;
mod script;
mod stylesheet;
mod template;

pub use database::FieldValue;

use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::debug;
use crate::fs::{FileLister, ListOptions, WalkLister};
use crate::media::{
    Asset, AssetDescriptor, AssetRegistry, Occurrence, OccurrenceKind, ScanError, classify_with,
};
use crate::utils::html::{DomParser, TlParser};

/// Caller hook applied to descriptors found in template, stylesheet and
/// script files before they are registered. Receives the base-relative
/// source file path.
pub type DescriptorHook<'a> = dyn Fn(AssetDescriptor, &str) -> AssetDescriptor + 'a;

/// A raw reference extracted from a source, before classification.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Reference {
    kind: OccurrenceKind,
    raw: String,
}

impl Reference {
    fn new(kind: OccurrenceKind, raw: impl Into<String>) -> Self {
        Self {
            kind,
            raw: raw.into(),
        }
    }
}

/// References extracted from one file.
struct FileReferences {
    location: String,
    references: Vec<Reference>,
}

/// Counters for one scan call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanSummary {
    /// Source files (or values) looked at.
    pub sources: usize,
    /// Files skipped as missing, unreadable, empty or without markers.
    pub skipped: usize,
    /// Raw candidates extracted.
    pub references: usize,
    /// Occurrences recorded.
    pub recorded: usize,
}

impl ScanSummary {
    /// Candidates dropped by classification.
    pub fn rejected(&self) -> usize {
        self.references - self.recorded
    }

    pub fn merge(&mut self, other: ScanSummary) {
        self.sources += other.sources;
        self.skipped += other.skipped;
        self.references += other.references;
        self.recorded += other.recorded;
    }
}

/// Runs source scanners against a registry.
pub struct Scanner<'a> {
    registry: &'a mut AssetRegistry,
    lister: &'a dyn FileLister,
    dom: &'a dyn DomParser,
    hook: Option<Box<DescriptorHook<'a>>>,
}

impl<'a> Scanner<'a> {
    /// Scanner using the default filesystem lister and HTML parser.
    pub fn new(registry: &'a mut AssetRegistry) -> Self {
        Self {
            registry,
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

    pub fn with_hook(
        mut self,
        hook: impl Fn(AssetDescriptor, &str) -> AssetDescriptor + 'a,
    ) -> Self {
        self.hook = Some(Box::new(hook));
        self
    }

    pub fn registry(&self) -> &AssetRegistry {
        &*self.registry
    }

    /// Classify one raw reference and record it.
    ///
    /// Returns `Ok(false)` when the reference is not an asset.
    fn apply(
        &mut self,
        raw: &str,
        kind: OccurrenceKind,
        location: &str,
        options: ApplyOptions,
    ) -> Result<bool, ScanError> {
        let Some(mut descriptor) = classify_with(raw, options.images_only).asset() else {
            return Ok(false);
        };

        if options.hooked
            && let Some(hook) = &self.hook
        {
            descriptor = hook(descriptor, location);
        }

        let path = descriptor.path();
        if !self.registry.has(&path) {
            self.registry.add(Asset::from_descriptor(&descriptor), false);
        }

        let is_asset = options.track_asset_syntax && descriptor.is_special_asset_syntax;
        self.registry.record(
            &path,
            kind.context(),
            Occurrence::new(location, kind.tag(descriptor.category), is_asset),
        )?;
        Ok(true)
    }

    /// Shared pipeline for file-based scanners.
    fn scan_files<F>(
        &mut self,
        dir: &Path,
        extensions: &[String],
        label: &str,
        extract: F,
    ) -> Result<ScanSummary, ScanError>
    where
        F: Fn(&str, &Path) -> Result<Option<Vec<Reference>>, ScanError> + Sync,
    {
        let options = ListOptions::recursive().with_extensions(extensions);
        let files = self.lister.list_files(dir, &options);

        let extracted: Vec<Result<Option<FileReferences>, ScanError>> = files
            .par_iter()
            .map(|file| {
                let location = relative_location(file, dir);
                let Some(content) = read_source(file) else {
                    debug!("scan"; "skipping unreadable or empty {} {}", label, location);
                    return Ok(None);
                };
                Ok(extract(&content, Path::new(&location))?.map(|references| FileReferences {
                    location,
                    references,
                }))
            })
            .collect();

        let mut summary = ScanSummary {
            sources: files.len(),
            ..ScanSummary::default()
        };

        for result in extracted {
            let Some(file) = result? else {
                summary.skipped += 1;
                continue;
            };

            summary.references += file.references.len();
            for reference in &file.references {
                if self.apply(&reference.raw, reference.kind, &file.location, ApplyOptions::FILE)? {
                    summary.recorded += 1;
                }
            }
            debug!(
                "scan";
                "{} {}: {} references",
                label,
                file.location,
                file.references.len()
            );
        }

        Ok(summary)
    }
}

#[derive(Debug, Clone, Copy)]
struct ApplyOptions {
    images_only: bool,
    /// Run the caller hook.
    hooked: bool,
    /// Carry the asset-call flag into the occurrence.
    track_asset_syntax: bool,
}

impl ApplyOptions {
    const FILE: Self = Self {
        images_only: false,
        hooked: true,
        track_asset_syntax: true,
    };
}

/// Read a source file; `None` when missing, unreadable or empty.
fn read_source(path: &Path) -> Option<String> {
    std::fs::read_to_string(path)
        .ok()
        .filter(|content| !content.is_empty())
}

/// Base-relative path with forward slashes.
fn relative_location(file: &Path, base: &Path) -> String {
    let rel: PathBuf = file.strip_prefix(base).unwrap_or(file).to_path_buf();
    rel.to_string_lossy().replace('\\', "/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::{Category, Context};

    #[test]
    fn test_relative_location() {
        assert_eq!(
            relative_location(Path::new("/site/tmpl/a/b.tmpl"), Path::new("/site/tmpl")),
            "a/b.tmpl"
        );
        assert_eq!(
            relative_location(Path::new("/other/x.css"), Path::new("/site")),
            "/other/x.css"
        );
    }

    #[test]
    fn test_apply_registers_then_records() {
        let mut registry = AssetRegistry::new();
        let mut scanner = Scanner::new(&mut registry);

        assert!(
            scanner
                .apply(
                    "/media/a.png",
                    OccurrenceKind::TemplateAsset,
                    "page.tmpl",
                    ApplyOptions::FILE
                )
                .unwrap()
        );
        assert!(
            !scanner
                .apply(
                    "https://x.org/media/a.png",
                    OccurrenceKind::TemplateAsset,
                    "page.tmpl",
                    ApplyOptions::FILE
                )
                .unwrap()
        );

        let asset = scanner.registry().get("media/a.png").unwrap();
        assert!(!asset.physical);
        assert_eq!(asset.occurrence_count(), 1);
        assert_eq!(
            asset.occurrences(Context::Template)[0],
            Occurrence::new("page.tmpl", "media.template-asset", false)
        );
    }

    #[test]
    fn test_hook_supersedes_descriptor() {
        let mut registry = AssetRegistry::new();
        let mut scanner = Scanner::new(&mut registry).with_hook(|mut d, source| {
            if source.starts_with("shop/") {
                d.category = Category::Users;
                d.folder = "shop/".into();
            }
            d
        });

        scanner
            .apply(
                "assets/images/a.png",
                OccurrenceKind::JsImage,
                "shop/app.js",
                ApplyOptions::FILE,
            )
            .unwrap();

        let registry = scanner.registry();
        assert!(!registry.has("assets/images/a.png"));
        let asset = registry.get("users/shop/a.png").unwrap();
        assert_eq!(
            asset.occurrences(Context::Script)[0].kind,
            "users.js-image"
        );
    }

    #[test]
    fn test_summary_merge() {
        let mut a = ScanSummary {
            sources: 1,
            skipped: 0,
            references: 3,
            recorded: 2,
        };
        a.merge(ScanSummary {
            sources: 2,
            skipped: 1,
            references: 1,
            recorded: 1,
        });
        assert_eq!(a.sources, 3);
        assert_eq!(a.rejected(), 1);
    }
}
