//! Command-line interface module.

mod args;
pub mod report;
pub mod scan;

pub use args::{Cli, Commands, OutputFormat, ScanArgs};
