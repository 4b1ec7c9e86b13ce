//! CLI argument parsing for cfgoverlay.
//!
//! Uses clap derive macros for declarative argument definitions.
//! This module defines the command structure; actual implementations
//! are in the `commands` module.

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// cfgoverlay: layered filters over directory-backed configuration stores.
///
/// Each store is a directory with one YAML file per configuration name.
/// An overlay config declares which filters wrap a store, e.g. ignore
/// patterns that keep selected names authoritative in the active store.
#[derive(Parser, Debug)]
#[command(name = "cfgoverlay")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Overlay config (YAML) declaring the filter chain. No filters when omitted.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace). RUST_LOG takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands for cfgoverlay.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// List configuration names visible through the overlay.
    List(ListArgs),

    /// Print configuration documents as seen through the overlay.
    Read(ReadArgs),

    /// Import a sync directory into the active directory.
    ///
    /// The sync store is wrapped in the overlay, so ignored names keep their
    /// active values and are never deleted.
    Import(TransferArgs),

    /// Export the active directory into a sync directory through the overlay.
    Export(TransferArgs),
}

/// Storage selection shared by read-only commands.
#[derive(Parser, Debug)]
pub struct StorageArgs {
    /// Directory of the store to wrap.
    #[arg(long)]
    pub storage: PathBuf,

    /// Directory of the active store consulted by filters (defaults to --storage).
    #[arg(long)]
    pub active: Option<PathBuf>,

    /// Collection to operate on (default collection when omitted).
    #[arg(long, default_value = "")]
    pub collection: String,
}

/// Arguments for the `list` command.
#[derive(Parser, Debug)]
pub struct ListArgs {
    #[command(flatten)]
    pub storage: StorageArgs,

    /// Only list names starting with this prefix.
    #[arg(default_value = "")]
    pub prefix: String,
}

/// Output format for `read`.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Yaml,
    Json,
}

/// Arguments for the `read` command.
#[derive(Parser, Debug)]
pub struct ReadArgs {
    #[command(flatten)]
    pub storage: StorageArgs,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Yaml)]
    pub format: OutputFormat,

    /// Configuration names to read.
    #[arg(required = true)]
    pub names: Vec<String>,
}

/// Arguments for `import` and `export`.
#[derive(Parser, Debug)]
pub struct TransferArgs {
    /// Sync directory (wrapped in the overlay).
    #[arg(long)]
    pub sync: PathBuf,

    /// Active directory.
    #[arg(long)]
    pub active: PathBuf,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
