//! Medialist - inventory of media assets referenced across a website.

use anyhow::Result;
use clap::{ColorChoice, Parser};
use medialist::{
    InventoryConfig,
    cli::{Cli, Commands, scan},
    logger,
};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }

    logger::set_verbose(cli.verbose);

    let mut config = InventoryConfig::load(cli.config.as_deref())?;
    if let Some(root) = &cli.root {
        config.set_root(root)?;
    }
    if let Some(records) = &cli.records {
        config.set_records(records)?;
    }

    match &cli.command {
        Commands::Scan { args } => scan::run_scan(args, &config),
        Commands::Folders { format } => scan::list_folders(*format, &config),
    }
}
