//! Inventory error types.

use std::path::PathBuf;

use thiserror::Error;

/// An occurrence was recorded for a path the registry has never seen.
///
/// Scanners always register before recording, so this signals a logic
/// defect in the caller rather than bad input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("asset `{path}` is not registered")]
pub struct MissingAssetError {
    pub path: String,
}

/// Errors that abort a scan call.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error(transparent)]
    MissingAsset(#[from] MissingAssetError),

    /// A stylesheet `url(../<category>/...)` points outside `images` and `fonts`.
    #[error("unknown asset category `{category}` for `{reference}` in {}", .file.display())]
    UnknownAssetCategory {
        category: String,
        reference: String,
        file: PathBuf,
    },
}
