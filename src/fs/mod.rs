//! Directory listing used to discover physical assets and source files.
//!
//! The [`FileLister`] trait is the seam between the inventory and the
//! filesystem; [`WalkLister`] is the default `jwalk`-backed implementation.
//!
//! Every listing skips:
//! - entries whose name starts with `_` (and everything below such a directory)
//! - OS noise files (`.DS_Store`, `Thumbs.db`) and `__MACOSX` folders
//! - hidden entries

use std::path::{Component, Path, PathBuf};

use jwalk::WalkDir;

const IGNORED_FILES: &[&str] = &[".DS_Store", "Thumbs.db"];
const IGNORED_DIRS: &[&str] = &["__MACOSX"];

/// How deep a listing descends below the listed directory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Depth {
    /// Direct children only.
    #[default]
    Direct,
    /// Children up to `n` directory levels below.
    Max(usize),
    /// Whole subtree.
    Unlimited,
}

/// Options for [`FileLister::list_files`].
#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    /// Keep only these extensions (without dot). Empty keeps everything.
    pub extensions: Vec<String>,
    pub depth: Depth,
    /// Return full paths instead of bare filenames.
    pub absolute: bool,
}

impl ListOptions {
    /// Direct children, bare filenames.
    pub fn direct() -> Self {
        Self::default()
    }

    /// Whole subtree, full paths.
    pub fn recursive() -> Self {
        Self {
            extensions: Vec::new(),
            depth: Depth::Unlimited,
            absolute: true,
        }
    }

    pub fn with_extensions<S: AsRef<str>>(mut self, extensions: &[S]) -> Self {
        self.extensions = extensions.iter().map(|e| e.as_ref().to_string()).collect();
        self
    }

    fn accepts(&self, path: &Path) -> bool {
        if self.extensions.is_empty() {
            return true;
        }
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|e| e == ext))
    }

    fn max_depth(&self) -> usize {
        match self.depth {
            Depth::Direct => 1,
            Depth::Max(n) => n.saturating_add(1),
            Depth::Unlimited => usize::MAX,
        }
    }
}

/// Filesystem listing capability.
pub trait FileLister: Send + Sync {
    /// Files under `dir`. A missing directory yields nothing.
    fn list_files(&self, dir: &Path, options: &ListOptions) -> Vec<PathBuf>;

    /// Names of the direct subdirectories of `dir`.
    fn list_subdirectories(&self, dir: &Path) -> Vec<String>;

    /// Every folder below `base/path`, as `path<sub>/` strings, depth-first.
    ///
    /// `path` is relative to `base` and ends with `/` (`media/`).
    fn media_folders(&self, base: &Path, path: &str) -> Vec<String> {
        let mut folders = Vec::new();
        collect_folders(self, base, path, &mut folders);
        folders
    }
}

fn collect_folders<L: FileLister + ?Sized>(
    lister: &L,
    base: &Path,
    path: &str,
    folders: &mut Vec<String>,
) {
    for name in lister.list_subdirectories(&base.join(path)) {
        let folder = format!("{path}{name}/");
        folders.push(folder.clone());
        collect_folders(lister, base, &folder, folders);
    }
}

/// Check a path (relative to the listed directory) against the skip rules.
fn is_excluded(rel: &Path) -> bool {
    rel.components().any(|component| match component {
        Component::Normal(name) => {
            let name = name.to_str().unwrap_or_default();
            name.starts_with('_')
                || name.starts_with('.')
                || IGNORED_FILES.contains(&name)
                || IGNORED_DIRS.contains(&name)
        }
        _ => false,
    })
}

/// `jwalk`-backed lister with sorted, deterministic output.
#[derive(Debug, Clone, Copy, Default)]
pub struct WalkLister;

impl FileLister for WalkLister {
    fn list_files(&self, dir: &Path, options: &ListOptions) -> Vec<PathBuf> {
        if !dir.is_dir() {
            return Vec::new();
        }

        WalkDir::new(dir)
            .min_depth(1)
            .max_depth(options.max_depth())
            .skip_hidden(false)
            .sort(true)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|e| e.file_type().is_file())
            .map(|e| e.path())
            .filter(|path| !is_excluded(path.strip_prefix(dir).unwrap_or(path)))
            .filter(|path| options.accepts(path))
            .filter_map(|path| {
                if options.absolute {
                    Some(path)
                } else {
                    path.file_name().map(PathBuf::from)
                }
            })
            .collect()
    }

    fn list_subdirectories(&self, dir: &Path) -> Vec<String> {
        if !dir.is_dir() {
            return Vec::new();
        }

        WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .skip_hidden(false)
            .sort(true)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|e| e.file_type().is_dir())
            .filter_map(|e| e.file_name().to_str().map(str::to_string))
            .filter(|name| !is_excluded(Path::new(name)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "x").unwrap();
    }

    #[test]
    fn test_list_files_direct() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "a.png");
        touch(dir.path(), "b.jpg");
        touch(dir.path(), "_draft.png");
        touch(dir.path(), "Thumbs.db");
        touch(dir.path(), ".DS_Store");
        touch(dir.path(), "sub/c.png");

        let files = WalkLister.list_files(dir.path(), &ListOptions::direct());
        assert_eq!(files, vec![PathBuf::from("a.png"), PathBuf::from("b.jpg")]);
    }

    #[test]
    fn test_list_files_recursive_with_extensions() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "site.css");
        touch(dir.path(), "theme/dark.css");
        touch(dir.path(), "theme/dark.js");
        touch(dir.path(), "_partials/skip.css");
        touch(dir.path(), "__MACOSX/theme/dark.css");

        let options = ListOptions::recursive().with_extensions(&["css"]);
        let files = WalkLister.list_files(dir.path(), &options);

        assert_eq!(
            files,
            vec![dir.path().join("site.css"), dir.path().join("theme/dark.css")]
        );
    }

    #[test]
    fn test_list_files_max_depth() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "a/one.png");
        touch(dir.path(), "a/b/two.png");

        let options = ListOptions {
            depth: Depth::Max(1),
            ..ListOptions::direct()
        };
        let files = WalkLister.list_files(dir.path(), &options);
        assert_eq!(files, vec![PathBuf::from("one.png")]);
    }

    #[test]
    fn test_list_missing_dir() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope");
        assert!(WalkLister.list_files(&missing, &ListOptions::recursive()).is_empty());
        assert!(WalkLister.list_subdirectories(&missing).is_empty());
    }

    #[test]
    fn test_media_folders_depth_first() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "media/b/x.png");
        touch(dir.path(), "media/a/deep/x.png");
        touch(dir.path(), "media/_hidden/x.png");
        touch(dir.path(), "media/root.png");

        let folders = WalkLister.media_folders(dir.path(), "media/");
        assert_eq!(folders, vec!["media/a/", "media/a/deep/", "media/b/"]);
    }
}
