//! Assets present on disk.

use std::path::Path;

use indexmap::IndexMap;

use crate::config::MediaFolder;
use crate::fs::{FileLister, ListOptions};
use crate::media::Asset;

/// Direct files of every folder, as unregistered assets.
///
/// Subfolders are not descended into here; each one is listed by its own
/// [`MediaFolder`] entry.
pub fn load_media_files(
    root: &Path,
    folders: &IndexMap<String, MediaFolder>,
    lister: &dyn FileLister,
) -> Vec<Asset> {
    let options = ListOptions::direct();

    folders
        .values()
        .flat_map(|folder| {
            lister
                .list_files(&root.join(&folder.path), &options)
                .into_iter()
                .filter_map(|file| file.to_str().map(str::to_string))
                .map(move |name| Asset::new(folder.category, folder.subfolder(), name))
        })
        .collect()
}
