//! # Papyrus
//!
//! A local full-text document indexer and search library.
//!
//! Papyrus walks a directory tree, extracts text from supported files
//! (per page for page-oriented formats), builds a segment-backed inverted
//! index and answers keyword queries with ranked hits.
//!
//! ## Features
//!
//! - Pure Rust implementation
//! - Shared analysis pipeline for indexing and querying
//! - Immutable segments with atomic commit points
//! - Pluggable storage backends
//! - Pluggable text extraction for page-oriented formats

pub mod analysis;
pub mod document;
pub mod error;
pub mod extract;
pub mod index;
pub mod ingest;
pub mod search;
pub mod storage;

// Re-exports for the public API
pub use analysis::analyzer::{Analyzer, TokenStream};
pub use analysis::standard::StandardAnalyzer;
pub use analysis::token::Token;
pub use document::{Document, DocumentBuilder, Field, StoredDocument, TextOption};
pub use error::{PapyrusError, Result};
pub use extract::{Extractor, Page, PlainTextExtractor};
pub use index::reader::IndexReader;
pub use index::writer::{IndexWriter, IndexWriterConfig, WriterStats};
pub use ingest::{DirectoryIngestor, IngestStats};
pub use search::query::QueryParser;
pub use search::searcher::{Hit, IndexSearcher};
pub use storage::Storage;
pub use storage::file::FileStorage;
pub use storage::memory::MemoryStorage;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
