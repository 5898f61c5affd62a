//! `[[folders]]` configuration and media folder enumeration.
//!
//! # Example
//!
//! ```toml
//! [[folders]]
//! name = "products"
//! width = 800
//! height = 800
//! no_png = true
//!
//! [folders.extra]
//! label = "Product pictures"
//! ```
//!
//! [`load_media_folders`] merges the configured entries with the folders
//! that exist on disk:
//!
//! ```text
//! media/                  system, 1200x1200
//! media/<configured>/     settings from config, yml = true
//! media/<discovered>/...  system, 1200x1200
//! fonts/                  system, no_png
//! assets/images/...       system, 1200x1200
//! users/<discovered>/...  1200x1200
//! ```

use std::path::Path;

use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::ConfigError;
use crate::fs::FileLister;
use crate::media::Category;

/// Maximum number of `extra` entries per folder.
pub const MAX_EXTRA_FIELDS: usize = 32;

/// Default image box for system folders.
const DEFAULT_DIMENSION: u32 = 1200;

/// Per-folder upload constraints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FolderSettings {
    /// PNG uploads are refused.
    pub no_png: bool,
    /// Folder is part of the site skeleton, not user-defined.
    pub system: bool,
    /// Folder was declared in configuration.
    pub yml: bool,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl FolderSettings {
    fn system() -> Self {
        Self {
            system: true,
            width: Some(DEFAULT_DIMENSION),
            height: Some(DEFAULT_DIMENSION),
            ..Self::default()
        }
    }

    fn fonts() -> Self {
        Self {
            no_png: true,
            system: true,
            ..Self::default()
        }
    }

    fn users() -> Self {
        Self {
            width: Some(DEFAULT_DIMENSION),
            height: Some(DEFAULT_DIMENSION),
            ..Self::default()
        }
    }
}

/// One `[[folders]]` entry.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FolderConfig {
    /// Folder name below `media/` (`products`, `products/shoes`).
    pub name: String,
    pub no_png: bool,
    pub system: bool,
    pub width: Option<u32>,
    pub height: Option<u32>,
    /// Free-form metadata carried through to reports.
    pub extra: FxHashMap<String, toml::Value>,
}

impl FolderConfig {
    /// Public-root-relative folder path (`media/products/`).
    pub fn path(&self) -> String {
        format!("{}{}/", Category::Media.prefix(), self.name.trim_matches('/'))
    }

    pub fn validate(&self, index: usize) -> Result<(), ConfigError> {
        if self.name.trim_matches('/').is_empty() {
            return Err(ConfigError::Validation(format!(
                "folders[{index}].name must not be empty"
            )));
        }
        if self.name.contains("..") {
            return Err(ConfigError::Validation(format!(
                "folders[{index}].name `{}` must stay inside media/",
                self.name
            )));
        }
        if self.width == Some(0) || self.height == Some(0) {
            return Err(ConfigError::Validation(format!(
                "folders[{index}] width and height must be positive"
            )));
        }
        if self.extra.len() > MAX_EXTRA_FIELDS {
            return Err(ConfigError::Validation(format!(
                "folders[{index}].extra has {} entries, at most {MAX_EXTRA_FIELDS} allowed",
                self.extra.len()
            )));
        }
        Ok(())
    }

    fn settings(&self) -> FolderSettings {
        FolderSettings {
            no_png: self.no_png,
            system: self.system,
            yml: true,
            width: self.width,
            height: self.height,
        }
    }
}

/// A folder holding physical assets.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MediaFolder {
    /// Public-root-relative path with trailing slash (`assets/images/icons/`).
    pub path: String,
    pub category: Category,
    #[serde(flatten)]
    pub settings: FolderSettings,
    #[serde(skip_serializing_if = "FxHashMap::is_empty")]
    pub extra: FxHashMap<String, toml::Value>,
}

impl MediaFolder {
    /// `None` when `path` is outside every category.
    pub fn new(path: impl Into<String>, settings: FolderSettings) -> Option<Self> {
        let path = path.into();
        let category = Category::from_path(&path)?;
        Some(Self {
            path,
            category,
            settings,
            extra: FxHashMap::default(),
        })
    }

    /// Path below the category root (`images/icons/` for `assets/images/icons/`).
    pub fn subfolder(&self) -> &str {
        self.path
            .strip_prefix(self.category.prefix())
            .unwrap_or_default()
    }
}

/// Enumerate every folder that may hold physical assets, in report order.
pub fn load_media_folders(
    root: &Path,
    configured: &[FolderConfig],
    lister: &dyn FileLister,
) -> IndexMap<String, MediaFolder> {
    let mut folders = IndexMap::new();

    insert(&mut folders, MediaFolder::new("media/", FolderSettings::system()));

    for entry in configured {
        // configured settings win over any earlier entry with the same path
        if let Some(mut folder) = MediaFolder::new(entry.path(), entry.settings()) {
            folder.extra = entry.extra.clone();
            folders.insert(folder.path.clone(), folder);
        }
    }

    for path in lister.media_folders(root, "media/") {
        insert(&mut folders, MediaFolder::new(path, FolderSettings::system()));
    }

    insert(&mut folders, MediaFolder::new("fonts/", FolderSettings::fonts()));

    insert(
        &mut folders,
        MediaFolder::new("assets/images/", FolderSettings::system()),
    );
    for path in lister.media_folders(root, "assets/images/") {
        insert(&mut folders, MediaFolder::new(path, FolderSettings::system()));
    }

    for path in lister.media_folders(root, "users/") {
        insert(&mut folders, MediaFolder::new(path, FolderSettings::users()));
    }

    folders
}

/// Insert unless the path is already known.
fn insert(folders: &mut IndexMap<String, MediaFolder>, folder: Option<MediaFolder>) {
    if let Some(folder) = folder
        && !folders.contains_key(&folder.path)
    {
        folders.insert(folder.path.clone(), folder);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::WalkLister;
    use std::fs;
    use tempfile::TempDir;

    fn mkdir(root: &Path, rel: &str) {
        fs::create_dir_all(root.join(rel)).unwrap();
    }

    #[test]
    fn test_folder_order_and_settings() {
        let dir = TempDir::new().unwrap();
        mkdir(dir.path(), "media/products");
        mkdir(dir.path(), "media/gallery/2024");
        mkdir(dir.path(), "assets/images/icons");
        mkdir(dir.path(), "users/shop");
        mkdir(dir.path(), "fonts");

        let configured = vec![FolderConfig {
            name: "products".into(),
            width: Some(800),
            height: Some(600),
            no_png: true,
            ..FolderConfig::default()
        }];

        let folders = load_media_folders(dir.path(), &configured, &WalkLister);
        let paths: Vec<&str> = folders.keys().map(String::as_str).collect();
        assert_eq!(
            paths,
            [
                "media/",
                "media/products/",
                "media/gallery/",
                "media/gallery/2024/",
                "fonts/",
                "assets/images/",
                "assets/images/icons/",
                "users/shop/",
            ]
        );

        let products = &folders["media/products/"];
        assert!(products.settings.yml);
        assert!(products.settings.no_png);
        assert!(!products.settings.system);
        assert_eq!(products.settings.width, Some(800));

        let gallery = &folders["media/gallery/"];
        assert!(gallery.settings.system);
        assert!(!gallery.settings.yml);

        assert!(folders["fonts/"].settings.no_png);
        assert_eq!(folders["fonts/"].settings.width, None);

        let icons = &folders["assets/images/icons/"];
        assert_eq!(icons.category, Category::Assets);
        assert_eq!(icons.subfolder(), "images/icons/");

        let shop = &folders["users/shop/"];
        assert_eq!(shop.category, Category::Users);
        assert!(!shop.settings.system);
    }

    #[test]
    fn test_fixed_folders_without_disk() {
        let dir = TempDir::new().unwrap();
        let folders = load_media_folders(dir.path(), &[], &WalkLister);
        let paths: Vec<&str> = folders.keys().map(String::as_str).collect();
        assert_eq!(paths, ["media/", "fonts/", "assets/images/"]);
    }

    #[test]
    fn test_folder_config_validate() {
        let ok = FolderConfig {
            name: "/products/".into(),
            ..FolderConfig::default()
        };
        assert!(ok.validate(0).is_ok());
        assert_eq!(ok.path(), "media/products/");

        let empty = FolderConfig::default();
        assert!(empty.validate(0).is_err());

        let escape = FolderConfig {
            name: "../etc".into(),
            ..FolderConfig::default()
        };
        assert!(escape.validate(1).is_err());

        let mut crowded = FolderConfig {
            name: "x".into(),
            ..FolderConfig::default()
        };
        for i in 0..=MAX_EXTRA_FIELDS {
            crowded
                .extra
                .insert(format!("k{i}"), toml::Value::Integer(i as i64));
        }
        let err = crowded.validate(2).unwrap_err();
        assert!(err.to_string().contains("at most 32"));
    }
}
