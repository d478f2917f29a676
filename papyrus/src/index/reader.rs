//! Index reader: opens a committed snapshot of the segment set.

use std::sync::Arc;

use ahash::AHashMap;
use log::debug;

use crate::document::StoredDocument;
use crate::error::{PapyrusError, Result};
use crate::index::posting::PostingList;
use crate::index::segment::{self, CommitPoint, SegmentInfo};
use crate::index::term_key;
use crate::storage::Storage;

/// One loaded, immutable segment.
#[derive(Debug)]
pub struct SegmentReader {
    info: SegmentInfo,
    postings: AHashMap<String, PostingList>,
    stored: AHashMap<u64, StoredDocument>,
}

impl SegmentReader {
    fn open(storage: &dyn Storage, info: SegmentInfo) -> Result<Self> {
        let postings = segment::read_postings(storage, &info)?;
        let stored = segment::read_stored(storage, &info)?.into_iter().collect();
        Ok(SegmentReader {
            info,
            postings,
            stored,
        })
    }

    pub fn posting_list(&self, term: &str) -> Option<&PostingList> {
        self.postings.get(term)
    }

    pub fn document(&self, doc_id: u64) -> Option<&StoredDocument> {
        self.stored.get(&doc_id)
    }

    pub fn doc_count(&self) -> u64 {
        self.info.doc_count
    }
}

/// Read handle over the committed segment set.
///
/// Readers open a consistent snapshot: segments are immutable and the
/// commit record is replaced atomically, so any number of readers may be
/// open while a writer builds the next generation.
#[derive(Debug)]
pub struct IndexReader {
    segments: Vec<SegmentReader>,
}

impl IndexReader {
    /// Open the index stored in the given storage.
    ///
    /// Fails with [`PapyrusError::IndexNotFound`] when the storage holds
    /// no commit record. An index committed with zero documents opens
    /// successfully and matches nothing.
    pub fn open(storage: Arc<dyn Storage>) -> Result<Self> {
        let Some(commit) = CommitPoint::read(storage.as_ref())? else {
            return Err(PapyrusError::IndexNotFound);
        };

        let mut segments = Vec::with_capacity(commit.segments.len());
        for info in commit.segments {
            debug!("Opening segment {}", info.segment_id);
            segments.push(SegmentReader::open(storage.as_ref(), info)?);
        }

        Ok(IndexReader { segments })
    }

    /// Total number of documents across all segments.
    pub fn doc_count(&self) -> u64 {
        self.segments.iter().map(|s| s.doc_count()).sum()
    }

    /// Number of live segments.
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Posting lists for a field/token pair, in segment (doc id) order.
    pub fn postings(&self, field: &str, token: &str) -> Vec<&PostingList> {
        let key = term_key(field, token);
        self.segments
            .iter()
            .filter_map(|s| s.posting_list(&key))
            .collect()
    }

    /// Stored fields for a document. Direct keyed access, no posting scan.
    pub fn document(&self, doc_id: u64) -> Option<&StoredDocument> {
        self.segments.iter().find_map(|s| s.document(doc_id))
    }
}
