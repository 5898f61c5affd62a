//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Inventory of media assets referenced across a website
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: medialist.toml when present)
    #[arg(short = 'C', long, global = true, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Public root directory, overrides `root` from the config file
    #[arg(short, long, global = true, value_hint = clap::ValueHint::DirPath)]
    pub root: Option<PathBuf>,

    /// Database records JSON file, overrides `records` from the config file
    #[arg(long, global = true, value_hint = clap::ValueHint::FilePath)]
    pub records: Option<PathBuf>,

    /// Print skipped files and per-file reference counts
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Build the asset inventory and report it
    #[command(visible_alias = "s")]
    Scan {
        #[command(flatten)]
        args: ScanArgs,
    },

    /// List the media folders that are scanned for physical files
    #[command(visible_alias = "f")]
    Folders {
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Summary)]
        format: OutputFormat,
    },
}

/// Scan command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct ScanArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Summary)]
    pub format: OutputFormat,

    /// Write the JSON registry to a file instead of stdout
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: Option<PathBuf>,
}

/// How results are printed.
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Colored human-readable summary
    #[default]
    Summary,
    /// Pretty-printed JSON
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_scan() {
        let cli = Cli::try_parse_from([
            "medialist",
            "scan",
            "--format",
            "json",
            "--root",
            "public",
            "-v",
        ])
        .unwrap();

        assert!(cli.verbose);
        assert_eq!(cli.root, Some(PathBuf::from("public")));
        match cli.command {
            Commands::Scan { args } => {
                assert_eq!(args.format, OutputFormat::Json);
                assert!(args.output.is_none());
            }
            _ => panic!("expected scan"),
        }
    }

    #[test]
    fn test_parse_folders_default_format() {
        let cli = Cli::try_parse_from(["medialist", "folders", "--records", "db.json"]).unwrap();
        assert_eq!(cli.records, Some(PathBuf::from("db.json")));
        assert!(matches!(
            cli.command,
            Commands::Folders {
                format: OutputFormat::Summary
            }
        ));
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
