//! Error types for papyrus operations.

use thiserror::Error;

/// Main error type for papyrus operations.
#[derive(Error, Debug)]
pub enum PapyrusError {
    /// Text analysis failed.
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// A document is structurally invalid.
    #[error("Document error: {0}")]
    Document(String),

    /// Index data is missing or corrupted.
    #[error("Index error: {0}")]
    Index(String),

    /// The storage backend rejected an operation.
    #[error("Storage error: {0}")]
    Storage(String),

    /// A source file could not be extracted.
    #[error("Extraction error: {0}")]
    Extraction(String),

    /// The writer was closed and cannot accept further operations.
    #[error("Writer is closed")]
    WriterClosed,

    /// No committed index exists at the target location.
    #[error("Index not found or empty. Run indexing first.")]
    IndexNotFound,

    /// The query string is structurally invalid.
    #[error("Malformed query: {0}")]
    MalformedQuery(String),

    /// IO error from the underlying storage.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Metadata serialization error.
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Result type alias for papyrus operations.
pub type Result<T> = std::result::Result<T, PapyrusError>;

impl PapyrusError {
    /// Create an analysis error.
    pub fn analysis(msg: impl Into<String>) -> Self {
        PapyrusError::Analysis(msg.into())
    }

    /// Create a document error.
    pub fn document(msg: impl Into<String>) -> Self {
        PapyrusError::Document(msg.into())
    }

    /// Create an index error.
    pub fn index(msg: impl Into<String>) -> Self {
        PapyrusError::Index(msg.into())
    }

    /// Create a storage error.
    pub fn storage(msg: impl Into<String>) -> Self {
        PapyrusError::Storage(msg.into())
    }

    /// Create an extraction error.
    pub fn extraction(msg: impl Into<String>) -> Self {
        PapyrusError::Extraction(msg.into())
    }

    /// Create a malformed query error.
    pub fn malformed_query(msg: impl Into<String>) -> Self {
        PapyrusError::MalformedQuery(msg.into())
    }
}
