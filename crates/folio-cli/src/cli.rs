use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "folio",
    about = "Folio -- inspect a document database directory",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Database root (defaults to the current directory)
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

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
    /// Show bound collections and directories that failed to bind
    Collections(CollectionsArgs),
    /// List document ids of a collection
    List(ListArgs),
    /// Print a stored document
    Show(ShowArgs),
    /// Decode every document and report the unreadable ones
    Audit(AuditArgs),
}

#[derive(Args)]
pub struct CollectionsArgs {}

#[derive(Args)]
pub struct ListArgs {
    pub collection: String,
}

#[derive(Args)]
pub struct ShowArgs {
    pub collection: String,
    pub id: String,
}

#[derive(Args)]
pub struct AuditArgs {}
