//! Deduplicated asset registry and occurrence recording.
//!
//! Assets are keyed by their public-root-relative path with every `.`
//! folded to `_` (`media/a.b/c.png` -> `media/a_b/c_png`). The folding
//! only applies to registry keys; asset fields keep the real names.
//!
//! # Invariants
//!
//! - First insertion for a key wins; later `add` calls reuse the entry.
//! - `add(.., physical = true)` always marks the resulting entry physical.
//! - `occurrence_count()` equals the total length of the four occurrence lists.
//! - Entries are never removed, only ignored.

use indexmap::IndexMap;
use rustc_hash::FxHashSet;
use serde::Serialize;

use super::classify::AssetDescriptor;
use super::error::MissingAssetError;
use super::kind::Category;

/// Registry key for a public-root-relative asset path.
#[inline]
pub fn canonical_key(path: &str) -> String {
    path.replace('.', "_")
}

// ============================================================================
// Occurrences
// ============================================================================

/// Source context an occurrence was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Context {
    Database,
    Template,
    Stylesheet,
    Script,
}

/// Role of a reference within its source, used to build kind tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OccurrenceKind {
    /// Whole database field holding a file path.
    MediaFile,
    /// `<img src>` inside stored HTML.
    ContentImage,
    /// `<a href>` inside stored HTML.
    ContentLink,
    /// `<img src>` inside a template.
    TemplateAsset,
    /// `<a href>` inside a template.
    TemplateLink,
    /// `url(../images/..)` in a stylesheet.
    CssImage,
    /// `url(../../fonts/..)` in a stylesheet.
    CssFont,
    /// `assets/images/..` literal in a script.
    JsImage,
}

impl OccurrenceKind {
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::MediaFile => "mediafile",
            Self::ContentImage => "content-image",
            Self::ContentLink => "content-link",
            Self::TemplateAsset => "template-asset",
            Self::TemplateLink => "template-link",
            Self::CssImage => "css-image",
            Self::CssFont => "css-font",
            Self::JsImage => "js-image",
        }
    }

    pub const fn context(self) -> Context {
        match self {
            Self::MediaFile | Self::ContentImage | Self::ContentLink => Context::Database,
            Self::TemplateAsset | Self::TemplateLink => Context::Template,
            Self::CssImage | Self::CssFont => Context::Stylesheet,
            Self::JsImage => Context::Script,
        }
    }

    /// Kind tag such as `media.content-image`.
    pub fn tag(self, category: Category) -> String {
        format!("{}.{}", category, self.suffix())
    }
}

/// One recorded usage of an asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Occurrence {
    /// `table.column` for database sources, base-relative file path otherwise.
    pub location: String,
    /// Semantic tag, e.g. `media.content-image`.
    pub kind: String,
    /// Reference used the templating asset-call form.
    pub is_asset: bool,
}

impl Occurrence {
    pub fn new(location: impl Into<String>, kind: impl Into<String>, is_asset: bool) -> Self {
        Self {
            location: location.into(),
            kind: kind.into(),
            is_asset,
        }
    }
}

// ============================================================================
// Asset
// ============================================================================

/// A discovered asset with its usage records.
#[derive(Debug, Clone, Serialize)]
pub struct Asset {
    /// Subpath inside the category, with trailing slash, or empty.
    pub folder: String,
    /// Bare filename.
    pub name: String,
    pub category: Category,
    /// Observed on disk.
    pub physical: bool,
    /// Excluded from reporting by the caller.
    pub ignore: bool,
    occurrence_count: usize,
    database_occurrences: Vec<Occurrence>,
    template_occurrences: Vec<Occurrence>,
    stylesheet_occurrences: Vec<Occurrence>,
    script_occurrences: Vec<Occurrence>,
}

impl Asset {
    pub fn new(category: Category, folder: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            folder: folder.into(),
            name: name.into(),
            category,
            physical: false,
            ignore: false,
            occurrence_count: 0,
            database_occurrences: Vec::new(),
            template_occurrences: Vec::new(),
            stylesheet_occurrences: Vec::new(),
            script_occurrences: Vec::new(),
        }
    }

    pub fn from_descriptor(descriptor: &AssetDescriptor) -> Self {
        Self::new(
            descriptor.category,
            descriptor.folder.clone(),
            descriptor.file.clone(),
        )
    }

    /// Folder path relative to the public root (`media/gallery/`).
    pub fn folder_path(&self) -> String {
        format!("{}{}", self.category.prefix(), self.folder)
    }

    /// Path relative to the public root (`media/gallery/a.jpg`).
    pub fn path(&self) -> String {
        format!("{}{}{}", self.category.prefix(), self.folder, self.name)
    }

    #[inline]
    pub fn key(&self) -> String {
        canonical_key(&self.path())
    }

    #[inline]
    pub fn occurrence_count(&self) -> usize {
        self.occurrence_count
    }

    pub fn occurrences(&self, context: Context) -> &[Occurrence] {
        match context {
            Context::Database => &self.database_occurrences,
            Context::Template => &self.template_occurrences,
            Context::Stylesheet => &self.stylesheet_occurrences,
            Context::Script => &self.script_occurrences,
        }
    }

    /// All occurrences, grouped by context (database, template, stylesheet, script).
    pub fn all_occurrences(&self) -> impl Iterator<Item = &Occurrence> {
        self.database_occurrences
            .iter()
            .chain(&self.template_occurrences)
            .chain(&self.stylesheet_occurrences)
            .chain(&self.script_occurrences)
    }

    /// Unique `location (kind)` labels, first occurrence order.
    pub fn occurrence_labels(&self) -> Vec<String> {
        let mut seen = FxHashSet::default();
        self.all_occurrences()
            .map(|o| format!("{} ({})", o.location, o.kind))
            .filter(|label| seen.insert(label.clone()))
            .collect()
    }

    /// Physically present but never referenced.
    pub fn is_unused(&self) -> bool {
        self.physical && self.occurrence_count == 0 && !self.ignore
    }

    /// Referenced but never observed on disk.
    pub fn is_missing(&self) -> bool {
        !self.physical && !self.ignore
    }

    fn push(&mut self, context: Context, occurrence: Occurrence) {
        let list = match context {
            Context::Database => &mut self.database_occurrences,
            Context::Template => &mut self.template_occurrences,
            Context::Stylesheet => &mut self.stylesheet_occurrences,
            Context::Script => &mut self.script_occurrences,
        };
        list.push(occurrence);
        self.occurrence_count += 1;
    }
}

// ============================================================================
// Registry
// ============================================================================

/// Insertion-ordered store of discovered assets.
#[derive(Debug, Default, Clone, Serialize)]
#[serde(transparent)]
pub struct AssetRegistry {
    assets: IndexMap<String, Asset>,
}

impl AssetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    /// Insert an asset unless its key is already present.
    ///
    /// With `physical`, the resulting entry (new or existing) is marked
    /// as present on disk.
    pub fn add(&mut self, asset: Asset, physical: bool) -> &mut Asset {
        let entry = self.assets.entry(asset.key()).or_insert(asset);
        if physical {
            entry.physical = true;
        }
        entry
    }

    /// Register assets found directly on disk.
    ///
    /// Returns how many of them were not known before.
    pub fn load_from_physical_listing(&mut self, items: impl IntoIterator<Item = Asset>) -> usize {
        let before = self.assets.len();
        for asset in items {
            self.add(asset, true);
        }
        self.assets.len() - before
    }

    pub fn has(&self, path: &str) -> bool {
        self.assets.contains_key(&canonical_key(path))
    }

    pub fn get(&self, path: &str) -> Option<&Asset> {
        self.assets.get(&canonical_key(path))
    }

    /// All assets by key, in insertion order.
    pub fn all(&self) -> &IndexMap<String, Asset> {
        &self.assets
    }

    pub fn iter(&self) -> impl Iterator<Item = &Asset> {
        self.assets.values()
    }

    /// Append an occurrence to a registered asset.
    pub fn record(
        &mut self,
        path: &str,
        context: Context,
        occurrence: Occurrence,
    ) -> Result<&Asset, MissingAssetError> {
        let asset = self.get_mut(path)?;
        asset.push(context, occurrence);
        Ok(asset)
    }

    /// Set the caller-controlled exclusion flag.
    pub fn set_ignored(&mut self, path: &str, ignore: bool) -> Result<(), MissingAssetError> {
        self.get_mut(path)?.ignore = ignore;
        Ok(())
    }

    /// Ignore every asset whose path starts with `prefix`. Returns the match count.
    pub fn ignore_prefix(&mut self, prefix: &str) -> usize {
        let prefix = prefix.trim_start_matches('/');
        let mut count = 0;
        for asset in self.assets.values_mut() {
            if asset.path().starts_with(prefix) {
                asset.ignore = true;
                count += 1;
            }
        }
        count
    }

    fn get_mut(&mut self, path: &str) -> Result<&mut Asset, MissingAssetError> {
        self.assets
            .get_mut(&canonical_key(path))
            .ok_or_else(|| MissingAssetError {
                path: path.to_string(),
            })
    }
}
