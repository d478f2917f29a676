use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Papyrus - local full-text document indexer and search CLI
#[derive(Parser)]
#[command(name = "papyrus", version, about)]
pub struct Cli {
    /// Path to the index directory.
    #[arg(long, env = "PAPYRUS_INDEX_DIR", default_value = "./papyrus_index")]
    pub index_dir: PathBuf,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Rebuild the index from the files in a directory.
    Index {
        /// Directory to index.
        directory: PathBuf,
    },
    /// Search the index.
    Search {
        /// Query string; prompted for interactively when omitted.
        query: Option<String>,
    },
    /// Start an interactive session.
    Repl,
}
