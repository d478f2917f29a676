//! Index writer: document ingestion, segment flushing and merging.

use std::sync::Arc;

use log::{debug, info, warn};

use crate::analysis::analyzer::Analyzer;
use crate::analysis::standard::StandardAnalyzer;
use crate::document::{Document, StoredDocument};
use crate::error::{PapyrusError, Result};
use crate::index::posting::{PostingList, TermPostingIndex};
use crate::index::segment::{self, CommitPoint, SegmentInfo};
use crate::index::term_key;
use crate::storage::Storage;

/// Index writer configuration.
#[derive(Clone)]
pub struct IndexWriterConfig {
    /// Documents buffered in memory before a segment is flushed.
    pub max_buffered_docs: usize,

    /// Segment file name prefix.
    pub segment_prefix: String,

    /// Analyzer for tokenized fields.
    pub analyzer: Arc<dyn Analyzer>,
}

impl std::fmt::Debug for IndexWriterConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexWriterConfig")
            .field("max_buffered_docs", &self.max_buffered_docs)
            .field("segment_prefix", &self.segment_prefix)
            .field("analyzer", &self.analyzer.name())
            .finish()
    }
}

impl Default for IndexWriterConfig {
    fn default() -> Self {
        IndexWriterConfig {
            max_buffered_docs: 10_000,
            segment_prefix: "segment".to_string(),
            analyzer: Arc::new(StandardAnalyzer::new().unwrap()),
        }
    }
}

/// Statistics about the writing process.
#[derive(Debug, Clone, Default)]
pub struct WriterStats {
    /// Number of documents added.
    pub docs_added: u64,
    /// Number of unique terms in the current buffer.
    pub unique_terms: u64,
    /// Total postings created.
    pub total_postings: u64,
    /// Number of segments created.
    pub segments_created: u32,
}

/// Writer building a segment-backed inverted index.
///
/// One logical writer owns the target storage at a time. Documents are
/// buffered in memory, flushed as immutable segments and published
/// atomically by [`IndexWriter::commit`]. All operations only mutate the
/// target storage.
pub struct IndexWriter {
    storage: Arc<dyn Storage>,
    config: IndexWriterConfig,

    /// In-memory inverted index for the segment being built.
    inverted: TermPostingIndex,

    /// Stored fields buffered for the segment being built.
    stored: Vec<(u64, StoredDocument)>,

    /// Segments flushed by this writer, pending or published.
    segments: Vec<SegmentInfo>,

    next_doc_id: u64,
    segment_start_doc: u64,
    current_segment: u32,
    generation: u64,
    closed: bool,
    stats: WriterStats,
}

impl std::fmt::Debug for IndexWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexWriter")
            .field("config", &self.config)
            .field("next_doc_id", &self.next_doc_id)
            .field("current_segment", &self.current_segment)
            .field("closed", &self.closed)
            .field("stats", &self.stats)
            .finish()
    }
}

impl IndexWriter {
    /// Open a writer over the given storage.
    ///
    /// With `truncate` every existing file is removed and the index is
    /// rebuilt from scratch. Otherwise document id and segment numbering
    /// resume after the existing segments, which stay live.
    pub fn open(
        storage: Arc<dyn Storage>,
        config: IndexWriterConfig,
        truncate: bool,
    ) -> Result<Self> {
        let mut next_doc_id = 0u64;
        let mut next_segment = 0u32;
        let mut segments = Vec::new();
        let mut generation = 0u64;

        if truncate {
            for file in storage.list_files()? {
                storage.delete_file(&file)?;
            }
        } else {
            if let Some(commit) = CommitPoint::read(storage.as_ref())? {
                generation = commit.generation;
                segments = commit.segments;
            }
            // Segments flushed but never committed still reserve their
            // document ids and generation numbers.
            for file in storage.list_files()? {
                if !file.ends_with(".meta") {
                    continue;
                }
                let Ok(input) = storage.open_input(&file) else {
                    continue;
                };
                match serde_json::from_reader::<_, SegmentInfo>(input) {
                    Ok(meta) => {
                        next_doc_id = next_doc_id.max(meta.max_doc_id + 1);
                        next_segment = next_segment.max(meta.generation as u32 + 1);
                    }
                    Err(err) => debug!("Ignoring unreadable segment metadata {file}: {err}"),
                }
            }
        }

        Ok(IndexWriter {
            storage,
            config,
            inverted: TermPostingIndex::new(),
            stored: Vec::new(),
            segments,
            next_doc_id,
            segment_start_doc: next_doc_id,
            current_segment: next_segment,
            generation,
            closed: false,
            stats: WriterStats::default(),
        })
    }

    /// Add a document to the index, returning its assigned id.
    ///
    /// Ids are assigned monotonically. A failed document leaves the
    /// buffers untouched and the writer usable.
    pub fn add_document(&mut self, doc: Document) -> Result<u64> {
        self.check_closed()?;

        // Stage the analyzed form first so a rejected document leaves no
        // trace in the buffers.
        let mut terms: Vec<(String, u32)> = Vec::new();
        let mut stored = StoredDocument::new();

        for field in doc.fields() {
            if !field.option.is_valid() {
                return Err(PapyrusError::document(format!(
                    "Field '{}' is neither stored nor indexed",
                    field.name
                )));
            }

            if field.option.indexed {
                if field.option.tokenized {
                    for token in self.config.analyzer.analyze(&field.value)? {
                        terms.push((term_key(&field.name, &token.text), token.position));
                    }
                } else {
                    terms.push((term_key(&field.name, &field.value), 0));
                }
            }

            if field.option.stored {
                stored.push(field.name.clone(), field.value.clone());
            }
        }

        let doc_id = self.next_doc_id;
        self.next_doc_id += 1;

        for (term, position) in terms {
            self.inverted.add_occurrence(term, doc_id, position);
            self.stats.total_postings += 1;
        }
        self.stats.unique_terms = self.inverted.term_count();
        if !stored.is_empty() {
            self.stored.push((doc_id, stored));
        }
        self.stats.docs_added += 1;

        if self.next_doc_id - self.segment_start_doc >= self.config.max_buffered_docs as u64 {
            self.flush_segment()?;
        }

        Ok(doc_id)
    }

    /// Flush the buffered documents as a new segment.
    fn flush_segment(&mut self) -> Result<()> {
        let doc_count = self.next_doc_id - self.segment_start_doc;
        if doc_count == 0 {
            return Ok(());
        }

        let info = SegmentInfo {
            segment_id: format!("{}_{:06}", self.config.segment_prefix, self.current_segment),
            doc_count,
            min_doc_id: self.segment_start_doc,
            max_doc_id: self.next_doc_id - 1,
            generation: self.current_segment as u64,
        };

        // Sort terms for deterministic output. The buffers are cleared
        // only after every file is written, so a failed flush can be
        // retried.
        let mut terms: Vec<(&str, &PostingList)> = self
            .inverted
            .iter()
            .map(|(term, list)| (term.as_str(), list))
            .collect();
        terms.sort_by(|a, b| a.0.cmp(b.0));

        segment::write_postings(self.storage.as_ref(), &info, &terms)?;
        segment::write_stored(self.storage.as_ref(), &info, &self.stored)?;
        segment::write_meta(self.storage.as_ref(), &info)?;

        debug!(
            "Flushed segment {} ({} docs, {} terms)",
            info.segment_id,
            doc_count,
            terms.len()
        );

        self.inverted = TermPostingIndex::new();
        self.stored.clear();
        self.segment_start_doc = self.next_doc_id;
        self.current_segment += 1;
        self.segments.push(info);
        self.stats.segments_created += 1;

        Ok(())
    }

    /// Atomically publish the current segment set.
    fn publish(&mut self) -> Result<()> {
        self.generation += 1;
        let commit = CommitPoint {
            generation: self.generation,
            segments: self.segments.clone(),
        };
        commit.write(self.storage.as_ref())
    }

    /// Flush buffered documents and publish the commit record.
    pub fn commit(&mut self) -> Result<()> {
        self.check_closed()?;
        self.flush_segment()?;
        self.publish()?;
        info!(
            "Committed {} segments (generation {})",
            self.segments.len(),
            self.generation
        );
        Ok(())
    }

    /// Merge all segments into a single compact segment.
    ///
    /// A no-op (that still publishes) when the index already has at most
    /// one segment, so optimizing twice is equivalent to optimizing once.
    pub fn optimize(&mut self) -> Result<()> {
        self.check_closed()?;
        self.flush_segment()?;

        if self.segments.len() <= 1 {
            return self.publish();
        }

        let merged = self.merge_segments()?;
        let old = std::mem::replace(&mut self.segments, vec![merged]);
        self.publish()?;

        // The merged segment is live; the inputs can go.
        for info in &old {
            for file in info.files() {
                if let Err(err) = self.storage.delete_file(&file) {
                    warn!("Failed to delete merged segment file {file}: {err}");
                }
            }
        }

        Ok(())
    }

    /// Read all live segments and write them back as one.
    ///
    /// Segments are created in document id order, so concatenating each
    /// term's postings segment by segment keeps the lists sorted.
    fn merge_segments(&mut self) -> Result<SegmentInfo> {
        let mut merged_terms: ahash::AHashMap<String, PostingList> = ahash::AHashMap::new();
        let mut merged_stored: Vec<(u64, StoredDocument)> = Vec::new();
        let mut doc_count = 0u64;
        let mut min_doc_id = u64::MAX;
        let mut max_doc_id = 0u64;

        for info in &self.segments {
            let terms = segment::read_postings(self.storage.as_ref(), info)?;
            for (term, list) in terms {
                if list.is_empty() {
                    continue;
                }
                let target = merged_terms.entry(term).or_default();
                for posting in list.postings {
                    target.push_posting(posting);
                }
            }
            merged_stored.extend(segment::read_stored(self.storage.as_ref(), info)?);

            doc_count += info.doc_count;
            min_doc_id = min_doc_id.min(info.min_doc_id);
            max_doc_id = max_doc_id.max(info.max_doc_id);
        }

        let info = SegmentInfo {
            segment_id: format!("{}_{:06}", self.config.segment_prefix, self.current_segment),
            doc_count,
            min_doc_id,
            max_doc_id,
            generation: self.current_segment as u64,
        };
        self.current_segment += 1;

        let mut terms: Vec<(&str, &PostingList)> = merged_terms
            .iter()
            .map(|(term, list)| (term.as_str(), list))
            .collect();
        terms.sort_by(|a, b| a.0.cmp(b.0));

        segment::write_postings(self.storage.as_ref(), &info, &terms)?;
        segment::write_stored(self.storage.as_ref(), &info, &merged_stored)?;
        segment::write_meta(self.storage.as_ref(), &info)?;

        self.stats.segments_created += 1;
        info!(
            "Merged {} segments into {}",
            self.segments.len(),
            info.segment_id
        );

        Ok(info)
    }

    /// Commit pending changes and release the writer.
    ///
    /// Further mutations fail with [`PapyrusError::WriterClosed`].
    pub fn close(&mut self) -> Result<()> {
        if !self.closed {
            self.commit()?;
            self.closed = true;
        }
        Ok(())
    }

    /// Get writer statistics.
    pub fn stats(&self) -> &WriterStats {
        &self.stats
    }

    /// Number of documents buffered for the next segment.
    pub fn pending_docs(&self) -> u64 {
        self.next_doc_id - self.segment_start_doc
    }

    /// Whether the writer has been closed.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    fn check_closed(&self) -> Result<()> {
        if self.closed {
            Err(PapyrusError::WriterClosed)
        } else {
            Ok(())
        }
    }
}

impl Drop for IndexWriter {
    fn drop(&mut self) {
        if let Err(err) = self.close() {
            warn!("Failed to close index writer: {err}");
        }
    }
}
