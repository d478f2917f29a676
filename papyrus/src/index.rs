//! Segment-backed inverted index.
//!
//! The index maps terms (`field:token` pairs) to posting lists sorted by
//! document id. Writers buffer documents in memory, flush them as
//! immutable segments and publish the live segment set through an atomic
//! commit record; readers open the committed snapshot.

pub mod posting;
pub mod reader;
pub mod segment;
pub mod writer;

// Re-exports
pub use posting::{Posting, PostingList, TermPostingIndex};
pub use reader::IndexReader;
pub use segment::{CommitPoint, SegmentInfo};
pub use writer::{IndexWriter, IndexWriterConfig, WriterStats};

/// File name of the commit record identifying the live segment set.
pub const COMMIT_FILE: &str = "segments.json";

/// Posting key for a field/token pair.
pub(crate) fn term_key(field: &str, token: &str) -> String {
    format!("{field}:{token}")
}
