//! Directory ingestion: traversal, extraction and index building.

use std::path::Path;
use std::sync::Arc;

use log::{info, warn};
use walkdir::WalkDir;

use crate::document::{Document, TextOption};
use crate::error::Result;
use crate::extract::{Extractor, PlainTextExtractor};
use crate::index::writer::{IndexWriter, IndexWriterConfig};
use crate::storage::Storage;

/// Stored field holding the source file path (exact-match term).
pub const PATH_FIELD: &str = "path";

/// Stored field holding the zero-based page number as a string.
pub const PAGE_FIELD: &str = "page";

/// Indexed field holding the analyzed page text.
pub const CONTENT_FIELD: &str = "content";

/// Counters for one ingestion run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestStats {
    /// Regular files seen during traversal.
    pub files_scanned: u64,
    /// Files that produced at least one indexed page.
    pub files_indexed: u64,
    /// Pages turned into documents.
    pub pages_indexed: u64,
    /// Files skipped because extraction failed.
    pub files_failed: u64,
}

/// Walks a directory tree and rebuilds the index from every supported
/// file.
///
/// Each non-empty extracted page becomes one document: `path` and `page`
/// are stored as exact-match terms, `content` is analyzed but not stored.
/// Extraction failures are logged and isolated to the file; storage
/// failures abort the build, leaving previously committed segments
/// intact.
#[derive(Debug)]
pub struct DirectoryIngestor {
    extractors: Vec<Box<dyn Extractor>>,
    writer_config: IndexWriterConfig,
}

impl DirectoryIngestor {
    /// Ingestor with the plain-text extractor and default writer settings.
    pub fn new() -> Self {
        DirectoryIngestor {
            extractors: vec![Box::new(PlainTextExtractor::new())],
            writer_config: IndexWriterConfig::default(),
        }
    }

    /// Register an extractor for another file format.
    pub fn with_extractor(mut self, extractor: Box<dyn Extractor>) -> Self {
        self.extractors.push(extractor);
        self
    }

    /// Replace the writer configuration.
    pub fn with_writer_config(mut self, config: IndexWriterConfig) -> Self {
        self.writer_config = config;
        self
    }

    /// Rebuild the index in `storage` from the files under `root`.
    pub fn ingest(&self, root: &Path, storage: Arc<dyn Storage>) -> Result<IngestStats> {
        let mut writer = IndexWriter::open(storage, self.writer_config.clone(), true)?;
        let mut stats = IngestStats::default();

        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    warn!("Skipping unreadable directory entry: {err}");
                    stats.files_failed += 1;
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            stats.files_scanned += 1;

            let Some(extractor) = self.extractors.iter().find(|e| e.supports(path)) else {
                continue;
            };

            let pages = match extractor.extract(path) {
                Ok(pages) => pages,
                Err(err) => {
                    warn!("Extraction failed for {}: {err}", path.display());
                    stats.files_failed += 1;
                    continue;
                }
            };

            let mut indexed_any = false;
            for page in pages {
                if page.text.is_empty() {
                    continue;
                }
                let doc = Document::builder()
                    .add_text(
                        PATH_FIELD,
                        path.display().to_string(),
                        TextOption::STORED_UNTOKENIZED,
                    )
                    .add_text(
                        PAGE_FIELD,
                        page.number.to_string(),
                        TextOption::STORED_UNTOKENIZED,
                    )
                    .add_text(CONTENT_FIELD, page.text, TextOption::INDEXED_ONLY)
                    .build();
                writer.add_document(doc)?;
                stats.pages_indexed += 1;
                indexed_any = true;
            }
            if indexed_any {
                stats.files_indexed += 1;
            }
        }

        writer.optimize()?;
        writer.close()?;

        info!(
            "Indexed {} pages from {} files under {}",
            stats.pages_indexed,
            stats.files_indexed,
            root.display()
        );
        Ok(stats)
    }
}

impl Default for DirectoryIngestor {
    fn default() -> Self {
        DirectoryIngestor::new()
    }
}
