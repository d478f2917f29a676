use std::path::Path;

use anyhow::Result;
use papyrus::VERSION;
use rustyline::DefaultEditor;

use crate::commands::{index, search};

/// Run the interactive command loop.
pub fn run(index_dir: &Path) -> Result<()> {
    let mut rl = DefaultEditor::new()?;

    println!("Papyrus {VERSION} - text indexer and search");
    println!("Type 'help' for commands.");

    loop {
        let line = match rl.readline("papyrus> ") {
            Ok(line) => line,
            Err(
                rustyline::error::ReadlineError::Interrupted | rustyline::error::ReadlineError::Eof,
            ) => {
                break;
            }
            Err(err) => {
                eprintln!("Error: {err}");
                break;
            }
        };

        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let _ = rl.add_history_entry(line);

        let (command, rest) = match line.split_once(' ') {
            Some((command, rest)) => (command, rest.trim()),
            None => (line, ""),
        };

        let result = match command {
            "help" => {
                print_help();
                Ok(())
            }
            "exit" | "quit" => break,
            "index" => {
                if rest.is_empty() {
                    eprintln!("Usage: index <directory>");
                    continue;
                }
                index::run(index_dir, Path::new(rest))
            }
            "search" => {
                let query = if rest.is_empty() { None } else { Some(rest) };
                search::run(index_dir, query)
            }
            _ => {
                eprintln!("Unknown command: '{command}'. Type 'help' for available commands.");
                Ok(())
            }
        };

        if let Err(err) = result {
            eprintln!("Error: {err:#}");
        }
    }

    println!("Goodbye.");
    Ok(())
}

fn print_help() {
    println!(
        "\
Available commands:
  index <directory>   Rebuild the index from files in the directory
  search [query]      Search the index (prompts when the query is omitted)
  help                Show this help
  exit                Exit"
    );
}
