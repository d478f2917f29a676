use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use papyrus::DirectoryIngestor;
use papyrus::storage::Storage;
use papyrus::storage::file::FileStorage;

/// Rebuild the index from the files under `directory`.
pub fn run(index_dir: &Path, directory: &Path) -> Result<()> {
    if !directory.is_dir() {
        bail!("'{}' is not a directory", directory.display());
    }

    let storage: Arc<dyn Storage> = Arc::new(FileStorage::create(index_dir).with_context(|| {
        format!("Failed to open index directory {}", index_dir.display())
    })?);

    let stats = DirectoryIngestor::new()
        .ingest(directory, storage)
        .context("Indexing failed")?;

    println!(
        "Indexing completed: {} pages from {} files ({} failed).",
        stats.pages_indexed, stats.files_indexed, stats.files_failed
    );
    Ok(())
}
