//! Medialist - inventory of media assets referenced across a website.
//!
//! Raw references found in stored database values, templates, stylesheets
//! and scripts are classified into typed asset identities and collected in
//! a deduplicated [`media::AssetRegistry`] together with every place they
//! occur. Files found on disk are merged in, so the registry tells which
//! assets are missing and which are unused.
//!
//! ```ignore
//! let config = InventoryConfig::load(None)?;
//! let inventory = build_inventory(&config)?;
//! for asset in inventory.registry.iter().filter(|a| a.is_unused()) {
//!     println!("{}", asset.path());
//! }
//! ```

pub mod logger;

pub mod cli;
pub mod config;
pub mod fs;
pub mod inventory;
pub mod media;
pub mod scan;
pub mod utils;

pub use config::InventoryConfig;
pub use inventory::{Inventory, build_inventory};
