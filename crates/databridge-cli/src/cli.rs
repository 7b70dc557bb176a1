use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "databridge",
    about = "DataBridge: import XML object definitions into a document store",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Configuration file (TOML). Missing keys take their defaults.
    #[arg(short, long, global = true, default_value = "databridge.toml")]
    pub config: PathBuf,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Import every object under the data root
    Import(ImportArgs),
    /// Print a stored document
    Show(ShowArgs),
    /// Print the effective configuration
    Config(ConfigArgs),
}

/// Directory overrides shared by every command.
#[derive(Args, Clone, Debug, Default)]
pub struct RootArgs {
    /// Directory of object kind subdirectories
    #[arg(long)]
    pub data: Option<PathBuf>,
    /// Document store directory
    #[arg(long)]
    pub store: Option<PathBuf>,
    /// Directory of .xmd form definitions
    #[arg(long)]
    pub forms: Option<PathBuf>,
}

#[derive(Args)]
pub struct ImportArgs {
    #[command(flatten)]
    pub roots: RootArgs,
    /// Merge and report, but write nothing
    #[arg(long)]
    pub dry_run: bool,
    /// Additional recognized object file extension (repeatable)
    #[arg(long = "ext")]
    pub extensions: Vec<String>,
}

#[derive(Args)]
pub struct ShowArgs {
    /// Document identifier
    pub id: String,
    #[command(flatten)]
    pub roots: RootArgs,
}

#[derive(Args)]
pub struct ConfigArgs {
    #[command(flatten)]
    pub roots: RootArgs,
}
