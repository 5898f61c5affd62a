//! Asset identity: classification, registry and occurrence tracking.

pub mod classify;
mod error;
pub mod kind;
mod registry;

pub use classify::{AssetDescriptor, Classified, Rejection, classify, classify_with};
pub use error::{MissingAssetError, ScanError};
pub use kind::Category;
pub use registry::{Asset, AssetRegistry, Context, Occurrence, OccurrenceKind, canonical_key};
