//! Raw reference classification.
//!
//! Turns a path-like string found in arbitrary text into a typed
//! [`AssetDescriptor`], or rejects it.
//!
//! ```text
//! {{ jizyAsset('assets/images/a.png') }}  -> assets / "images/" / a.png  (special syntax)
//! ../images/bg.png                        -> relative-up, then matched as `images/...` (rejected)
//! /media/banner.jpg                       -> media / "" / banner.jpg     (category root)
//! https://cdn.example.com/a.png           -> rejected (external)
//! vendor/lib/img.png                      -> rejected (vendor)
//! ```
//!
//! Classification is pure: the same input always yields the same result.

use std::sync::LazyLock;

use regex::Regex;

use super::kind::{self, Category};

/// Template call wrapping an asset path, e.g. `{{ jizyAsset('assets/x.png') }}`.
static ASSET_CALL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*[A-Za-z0-9_]*Asset\('([^']+)'\)\s*\}\}").expect("asset call pattern")
});

/// Structured form of a classified asset reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetDescriptor {
    /// Top-level namespace.
    pub category: Category,
    /// Subpath inside the category, with trailing slash, or empty.
    pub folder: String,
    /// Bare filename.
    pub file: String,
    /// Reference used the templating asset-call form.
    pub is_special_asset_syntax: bool,
    /// Reference was expressed relative to a parent directory (`../`).
    pub is_relative_up: bool,
    /// Reference is a direct child of the category root.
    pub is_category_root: bool,
}

impl AssetDescriptor {
    /// Folder path relative to the public root (`media/gallery/`).
    pub fn folder_path(&self) -> String {
        format!("{}{}", self.category.prefix(), self.folder)
    }

    /// Full path relative to the public root (`media/gallery/a.jpg`).
    pub fn path(&self) -> String {
        format!("{}{}{}", self.category.prefix(), self.folder, self.file)
    }
}

/// Why a raw reference is not an asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Absolute `http(s)://` URL.
    External,
    /// Third-party code under `vendor/`.
    Vendor,
    /// Extension outside the allow-lists (or not an image when images were requested).
    Extension,
    /// No known category prefix.
    UnknownPrefix,
}

/// Outcome of classifying a raw reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classified {
    Asset(AssetDescriptor),
    Rejected(Rejection),
}

impl Classified {
    /// The descriptor, if the reference was accepted.
    #[inline]
    pub fn asset(self) -> Option<AssetDescriptor> {
        match self {
            Self::Asset(descriptor) => Some(descriptor),
            Self::Rejected(_) => None,
        }
    }

    #[inline]
    pub fn is_asset(&self) -> bool {
        matches!(self, Self::Asset(_))
    }
}

/// Classify a raw reference, accepting every tracked extension.
#[inline]
pub fn classify(raw: &str) -> Classified {
    classify_with(raw, false)
}

/// Classify a raw reference.
///
/// With `images_only`, references to documents and fonts are rejected too.
pub fn classify_with(raw: &str, images_only: bool) -> Classified {
    let mut is_special_asset_syntax = false;
    let mut path = raw;

    if let Some(inner) = ASSET_CALL.captures(raw).and_then(|c| c.get(1)) {
        is_special_asset_syntax = true;
        path = inner.as_str();
    }

    if path.starts_with("http://") || path.starts_with("https://") {
        return Classified::Rejected(Rejection::External);
    }

    let mut is_relative_up = false;
    while let Some(rest) = path.strip_prefix("../") {
        is_relative_up = true;
        path = rest;
    }

    let path = path.strip_prefix('/').unwrap_or(path);

    if path
        .strip_prefix("vendor/")
        .is_some_and(|rest| !rest.is_empty())
    {
        return Classified::Rejected(Rejection::Vendor);
    }

    if images_only && !kind::is_image(path) {
        return Classified::Rejected(Rejection::Extension);
    }

    if !kind::is_tracked(path) {
        return Classified::Rejected(Rejection::Extension);
    }

    match split_category(path) {
        Some(parts) => Classified::Asset(AssetDescriptor {
            category: parts.category,
            folder: parts.folder,
            file: parts.file,
            is_special_asset_syntax,
            is_relative_up,
            is_category_root: parts.is_category_root,
        }),
        None => Classified::Rejected(Rejection::UnknownPrefix),
    }
}

// ============================================================================
// Category matching
// ============================================================================

struct CategoryParts {
    category: Category,
    folder: String,
    file: String,
    is_category_root: bool,
}

/// How a category splits the remainder after its prefix.
#[derive(Clone, Copy)]
enum Layout {
    /// Everything after the prefix is the filename.
    Flat,
    /// `<folder>/<file>` when a subfolder exists, flat otherwise.
    Nested,
    /// Like `Nested`, but a flat file is flagged as a category-root child.
    NestedWithRoot,
}

/// Matchers tried in order; first hit wins.
const MATCHERS: [(Category, Layout); 4] = [
    (Category::Fonts, Layout::Flat),
    (Category::Assets, Layout::Nested),
    (Category::Users, Layout::Nested),
    (Category::Media, Layout::NestedWithRoot),
];

fn split_category(path: &str) -> Option<CategoryParts> {
    MATCHERS.iter().find_map(|&(category, layout)| {
        let rest = path.strip_prefix(category.prefix())?;
        if rest.is_empty() {
            return None;
        }
        Some(split_rest(category, layout, rest))
    })
}

fn split_rest(category: Category, layout: Layout, rest: &str) -> CategoryParts {
    let nested = match layout {
        Layout::Flat => None,
        Layout::Nested | Layout::NestedWithRoot => rest
            .rsplit_once('/')
            .filter(|(folder, file)| !folder.is_empty() && !file.is_empty()),
    };

    match nested {
        Some((folder, file)) => CategoryParts {
            category,
            folder: format!("{folder}/"),
            file: file.to_string(),
            is_category_root: false,
        },
        None => CategoryParts {
            category,
            folder: String::new(),
            file: rest.to_string(),
            is_category_root: matches!(layout, Layout::NestedWithRoot),
        },
    }
}
