mod cli;
mod commands;
mod output;

use anyhow::Result;
use clap::Parser;

use crate::cli::{Cli, Command};
use crate::commands::{index, repl, search};

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let index_dir = cli.index_dir;

    match cli.command {
        Some(Command::Index { directory }) => index::run(&index_dir, &directory),
        Some(Command::Search { query }) => search::run(&index_dir, query.as_deref()),
        Some(Command::Repl) | None => repl::run(&index_dir),
    }
}
