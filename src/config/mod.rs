//! Inventory configuration for `medialist.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── error      # ConfigError
//! ├── folder     # [[folders]], MediaFolder, folder enumeration
//! └── mod.rs     # InventoryConfig (this file)
//! ```
//!
//! # Sections
//!
//! | Section                 | Purpose                                        |
//! |-------------------------|------------------------------------------------|
//! | `root`                  | Public directory (`media/`, `fonts/`, ...)     |
//! | `records`               | JSON file of stored database values            |
//! | `ignore`                | Asset path prefixes excluded from reports      |
//! | `[[folders]]`           | Configured media folders and their limits      |
//! | `[sources.templates]`   | Template directory and extensions              |
//! | `[sources.stylesheets]` | Stylesheet directory and extensions            |
//! | `[sources.scripts]`     | Script directory and extensions                |

mod error;
mod folder;

pub use error::ConfigError;
pub use folder::{FolderConfig, FolderSettings, MAX_EXTRA_FIELDS, MediaFolder, load_media_folders};

use crate::log;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILE: &str = "medialist.toml";

// ============================================================================
// sources
// ============================================================================

/// File-based reference source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Templates,
    Stylesheets,
    Scripts,
}

impl SourceKind {
    pub const ALL: [SourceKind; 3] = [Self::Templates, Self::Stylesheets, Self::Scripts];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Templates => "templates",
            Self::Stylesheets => "stylesheets",
            Self::Scripts => "scripts",
        }
    }

    /// Directory relative to the public root.
    const fn default_dir(self) -> &'static str {
        match self {
            Self::Templates => "templates",
            Self::Stylesheets => "assets/css",
            Self::Scripts => "assets/js",
        }
    }

    const fn default_extension(self) -> &'static str {
        match self {
            Self::Templates => "tmpl",
            Self::Stylesheets => "css",
            Self::Scripts => "js",
        }
    }
}

/// `[sources.<kind>]`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Directory relative to `root`.
    pub dir: Option<PathBuf>,
    /// Extensions without dot; empty means the kind's default.
    pub extensions: Vec<String>,
}

/// `[sources]`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    pub templates: SourceConfig,
    pub stylesheets: SourceConfig,
    pub scripts: SourceConfig,
}

impl SourcesConfig {
    pub fn get(&self, kind: SourceKind) -> &SourceConfig {
        match kind {
            SourceKind::Templates => &self.templates,
            SourceKind::Stylesheets => &self.stylesheets,
            SourceKind::Scripts => &self.scripts,
        }
    }
}

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing medialist.toml
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InventoryConfig {
    /// Absolute path to the config file, empty when running on defaults
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Public root directory
    pub root: PathBuf,

    /// Database records JSON file
    pub records: Option<PathBuf>,

    /// Asset path prefixes flagged as ignored
    pub ignore: Vec<String>,

    /// Configured media folders
    pub folders: Vec<FolderConfig>,

    /// File-based reference sources
    pub sources: SourcesConfig,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            config_path: PathBuf::new(),
            root: PathBuf::from("."),
            records: None,
            ignore: Vec::new(),
            folders: Vec::new(),
            sources: SourcesConfig::default(),
        }
    }
}

impl InventoryConfig {
    /// Load configuration.
    ///
    /// An explicit `path` must exist. Without one, `medialist.toml` in the
    /// working directory is used when present, defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;

        let config_path = match path {
            Some(path) => Some(cwd.join(path)),
            None => Some(cwd.join(CONFIG_FILE)).filter(|p| p.is_file()),
        };

        let mut config = match &config_path {
            Some(path) => Self::from_path(path)?,
            None => Self::default(),
        };

        let base = config_path
            .as_deref()
            .and_then(Path::parent)
            .map(Path::to_path_buf)
            .unwrap_or(cwd);
        config.config_path = config_path.unwrap_or_default();
        config.normalize_paths(&base);
        config.validate()?;

        Ok(config)
    }

    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(ConfigError::Toml)?;
        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {}", field);
        }
    }

    // ========================================================================
    // cli overrides
    // ========================================================================

    /// Override the public root (resolved against the working directory).
    pub fn set_root(&mut self, root: &Path) -> Result<()> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;
        self.root = resolve_path(root, &cwd);
        Ok(())
    }

    /// Override the records file (resolved against the working directory).
    pub fn set_records(&mut self, records: &Path) -> Result<()> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;
        self.records = Some(resolve_path(records, &cwd));
        Ok(())
    }

    // ========================================================================
    // accessors
    // ========================================================================

    /// Directory scanned for a source kind.
    pub fn source_dir(&self, kind: SourceKind) -> PathBuf {
        let source = self.sources.get(kind);
        let dir = source
            .dir
            .as_deref()
            .unwrap_or_else(|| Path::new(kind.default_dir()));
        resolve_path(dir, &self.root)
    }

    /// Extensions scanned for a source kind.
    pub fn source_extensions(&self, kind: SourceKind) -> Vec<String> {
        let source = self.sources.get(kind);
        if source.extensions.is_empty() {
            vec![kind.default_extension().to_string()]
        } else {
            source
                .extensions
                .iter()
                .map(|e| e.trim_start_matches('.').to_string())
                .collect()
        }
    }

    // ========================================================================
    // path normalization
    // ========================================================================

    /// Resolve `root` and `records` against the config file's directory.
    fn normalize_paths(&mut self, base: &Path) {
        self.root = resolve_path(&self.root, base);
        if let Some(records) = self.records.take() {
            self.records = Some(resolve_path(&records, base));
        }
    }

    // ========================================================================
    // validation
    // ========================================================================

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (index, folder) in self.folders.iter().enumerate() {
            folder.validate(index)?;
        }

        for kind in SourceKind::ALL {
            let source = self.sources.get(kind);
            if source.extensions.iter().any(|e| e.trim_start_matches('.').is_empty()) {
                return Err(ConfigError::Validation(format!(
                    "sources.{}.extensions contains an empty entry",
                    kind.as_str()
                )));
            }
        }

        if self.ignore.iter().any(|prefix| prefix.trim_matches('/').is_empty()) {
            return Err(ConfigError::Validation(
                "ignore contains an empty prefix".to_string(),
            ));
        }

        Ok(())
    }
}

/// Expand `~` and make `path` absolute relative to `base`.
fn resolve_path(path: &Path, base: &Path) -> PathBuf {
    let expanded = PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).into_owned());
    if expanded.is_relative() {
        base.join(expanded)
    } else {
        expanded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = InventoryConfig::from_str("").unwrap();
        assert_eq!(config.root, PathBuf::from("."));
        assert!(config.folders.is_empty());
        assert_eq!(config.source_extensions(SourceKind::Templates), ["tmpl"]);
        assert_eq!(config.source_extensions(SourceKind::Stylesheets), ["css"]);
        assert_eq!(config.source_extensions(SourceKind::Scripts), ["js"]);
        assert_eq!(
            config.source_dir(SourceKind::Stylesheets),
            PathBuf::from("./assets/css")
        );
    }

    #[test]
    fn test_full_config() {
        let config = InventoryConfig::from_str(
            r#"
            root = "public"
            ignore = ["media/tmp/"]

            [[folders]]
            name = "products"
            width = 800
            no_png = true

            [folders.extra]
            label = "Products"

            [sources.templates]
            dir = "../views"
            extensions = ["tmpl", ".html"]
            "#,
        )
        .unwrap();

        assert_eq!(config.folders.len(), 1);
        assert_eq!(config.folders[0].width, Some(800));
        assert_eq!(
            config.folders[0].extra.get("label").and_then(|v| v.as_str()),
            Some("Products")
        );
        assert_eq!(
            config.source_extensions(SourceKind::Templates),
            ["tmpl", "html"]
        );
        assert_eq!(
            config.source_dir(SourceKind::Templates),
            PathBuf::from("public/../views")
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_unknown_fields_collected() {
        let (config, ignored) = InventoryConfig::parse_with_ignored(
            r#"
            root = "public"
            colour = "blue"

            [sources.scripts]
            dirs = "js"
            "#,
        )
        .unwrap();
        assert_eq!(config.root, PathBuf::from("public"));
        assert_eq!(ignored, ["colour", "sources.scripts.dirs"]);
    }

    #[test]
    fn test_validate_rejects_empty_values() {
        let config = InventoryConfig::from_str(
            r#"
            [sources.stylesheets]
            extensions = [""]
            "#,
        )
        .unwrap();
        assert!(config.validate().is_err());

        let config = InventoryConfig::from_str(r#"ignore = ["/"]"#).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_path_resolves_against_config_dir() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "root = \"public\"\nrecords = \"data/records.json\"\n").unwrap();

        let config = InventoryConfig::load(Some(path.as_path())).unwrap();
        assert_eq!(config.root, dir.path().join("public"));
        assert_eq!(
            config.records,
            Some(dir.path().join("data/records.json"))
        );
        assert_eq!(config.config_path, path);
    }

    #[test]
    fn test_missing_explicit_config_fails() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(InventoryConfig::load(Some(missing.as_path())).is_err());
    }

    #[test]
    fn test_resolve_path() {
        let base = Path::new("/site");
        assert_eq!(resolve_path(Path::new("public"), base), PathBuf::from("/site/public"));
        assert_eq!(resolve_path(Path::new("/abs"), base), PathBuf::from("/abs"));
    }
}
