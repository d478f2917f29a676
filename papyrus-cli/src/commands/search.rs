use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use papyrus::storage::Storage;
use papyrus::storage::file::FileStorage;
use papyrus::{IndexReader, IndexSearcher, PapyrusError, StandardAnalyzer};

use crate::output;

/// Run a search against the index, prompting for the query when omitted.
pub fn run(index_dir: &Path, query: Option<&str>) -> Result<()> {
    let query = match query {
        Some(query) => query.to_string(),
        None => prompt_query()?,
    };
    if query.is_empty() {
        return Ok(());
    }

    let searcher = open_searcher(index_dir)?;
    let hits = searcher.search(&query)?;

    println!("Found {} results for \"{query}\":", hits.len());
    output::print_hits(&hits);
    Ok(())
}

fn open_searcher(index_dir: &Path) -> Result<IndexSearcher> {
    let storage: Arc<dyn Storage> = match FileStorage::open(index_dir) {
        Ok(storage) => Arc::new(storage),
        Err(_) => bail!("Index not found. Run 'index' first."),
    };

    let reader = match IndexReader::open(storage) {
        Ok(reader) => reader,
        Err(PapyrusError::IndexNotFound) => {
            bail!("Index is empty or not created. Run 'index' command first.")
        }
        Err(err) => return Err(err.into()),
    };

    Ok(IndexSearcher::new(reader, Arc::new(StandardAnalyzer::new()?)))
}

fn prompt_query() -> Result<String> {
    print!("Enter search query: ");
    io::stdout().flush()?;
    let mut query = String::new();
    io::stdin()
        .read_line(&mut query)
        .context("Failed to read query")?;
    Ok(query.trim().to_string())
}
