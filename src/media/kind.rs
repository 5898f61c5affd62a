//! Asset categories and extension allow-lists.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Top-level namespace an asset lives in, relative to the public root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Editorial media under `media/`.
    Media,
    /// Web fonts under `fonts/`.
    Fonts,
    /// Theme assets under `assets/`.
    Assets,
    /// User uploads under `users/`.
    Users,
}

impl Category {
    /// All categories, in classification precedence order.
    pub const ALL: [Category; 4] = [
        Category::Fonts,
        Category::Assets,
        Category::Users,
        Category::Media,
    ];

    #[inline]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Media => "media",
            Self::Fonts => "fonts",
            Self::Assets => "assets",
            Self::Users => "users",
        }
    }

    /// Path prefix of the category root, with trailing slash.
    #[inline]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Media => "media/",
            Self::Fonts => "fonts/",
            Self::Assets => "assets/",
            Self::Users => "users/",
        }
    }

    /// Category owning a public-root-relative path (`media/x/`, `users/y/a.png`).
    pub fn from_path(path: &str) -> Option<Self> {
        let path = path.trim_start_matches('/');
        Self::ALL
            .into_iter()
            .find(|category| path.starts_with(category.prefix()))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Extension allow-lists
// ============================================================================

/// Raster and vector image extensions.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "gif", "png", "bmp", "svg", "webp"];

/// Office document extensions.
pub const DOCUMENT_EXTENSIONS: &[&str] = &[
    "pdf", "doc", "docx", "xls", "xlsx", "ppt", "pptx", "odt", "ods", "odp",
];

/// Web font extensions.
pub const FONT_EXTENSIONS: &[&str] = &["eot", "svg", "ttf", "woff", "woff2"];

/// Extension of a path-like string, lowercased.
///
/// Requires a non-empty stem: `.png` alone has no extension here.
pub fn extension_of(path: &str) -> Option<String> {
    let (stem, ext) = path.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() || ext.contains('/') {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// Check if a path ends with an image extension.
pub fn is_image(path: &str) -> bool {
    extension_of(path).is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
}

/// Check if a path ends with any tracked extension (image, document or font).
pub fn is_tracked(path: &str) -> bool {
    extension_of(path).is_some_and(|ext| {
        let ext = ext.as_str();
        IMAGE_EXTENSIONS.contains(&ext)
            || DOCUMENT_EXTENSIONS.contains(&ext)
            || FONT_EXTENSIONS.contains(&ext)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of("media/a.JPG").as_deref(), Some("jpg"));
        assert_eq!(extension_of("fonts/x.woff2").as_deref(), Some("woff2"));
        assert_eq!(extension_of("media/folder.d/file"), None);
        assert_eq!(extension_of(".png"), None);
        assert_eq!(extension_of("noext"), None);
    }

    #[test]
    fn test_tracked_extensions() {
        assert!(is_tracked("media/report.pdf"));
        assert!(is_tracked("fonts/icons.eot"));
        assert!(is_tracked("assets/images/bg.webp"));
        assert!(!is_tracked("assets/js/app.js"));
        assert!(!is_tracked("media/archive.zip"));
    }

    #[test]
    fn test_is_image() {
        assert!(is_image("a.svg"));
        assert!(is_image("a.jpeg"));
        assert!(!is_image("a.pdf"));
        assert!(!is_image("a.woff"));
    }

    #[test]
    fn test_category_from_path() {
        assert_eq!(Category::from_path("media/x/"), Some(Category::Media));
        assert_eq!(Category::from_path("/users/u1/a.png"), Some(Category::Users));
        assert_eq!(Category::from_path("assets/images/"), Some(Category::Assets));
        assert_eq!(Category::from_path("fonts/"), Some(Category::Fonts));
        assert_eq!(Category::from_path("vendor/x"), None);
        assert_eq!(Category::from_path("mediax/"), None);
    }
}
