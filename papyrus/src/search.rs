//! Query parsing and search execution.

pub mod query;
pub mod searcher;

// Re-exports
pub use query::{Query, QueryParser, Term};
pub use searcher::{DEFAULT_FIELD, Hit, IndexSearcher};
