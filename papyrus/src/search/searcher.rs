//! Searcher executing term queries against an index reader.

use std::sync::Arc;

use ahash::AHashMap;

use crate::analysis::analyzer::Analyzer;
use crate::document::StoredDocument;
use crate::error::Result;
use crate::index::reader::IndexReader;
use crate::search::query::{Query, QueryParser};

/// Default field queries match against.
pub const DEFAULT_FIELD: &str = "content";

/// A single search hit.
#[derive(Debug, Clone)]
pub struct Hit {
    /// The matching document id.
    pub doc_id: u64,

    /// Number of query terms present in the document.
    pub score: f32,

    /// Stored fields of the document.
    pub document: StoredDocument,
}

/// Executes queries against an [`IndexReader`].
#[derive(Debug)]
pub struct IndexSearcher {
    reader: IndexReader,
    parser: QueryParser,
}

impl IndexSearcher {
    /// Create a searcher over the reader, matching the default `content`
    /// field with the given analyzer.
    pub fn new(reader: IndexReader, analyzer: Arc<dyn Analyzer>) -> Self {
        IndexSearcher {
            reader,
            parser: QueryParser::new(DEFAULT_FIELD, analyzer),
        }
    }

    /// The underlying reader.
    pub fn reader(&self) -> &IndexReader {
        &self.reader
    }

    /// Parse and execute a query string.
    ///
    /// A query that analyzes to zero terms yields an empty hit list.
    pub fn search(&self, query: &str) -> Result<Vec<Hit>> {
        let query = self.parser.parse(query)?;
        self.search_query(&query)
    }

    /// Execute a parsed query.
    ///
    /// Terms combine with implicit OR; every matching query term adds one
    /// point to a document's score. Hits are ordered by descending score,
    /// ties broken by ascending document id.
    pub fn search_query(&self, query: &Query) -> Result<Vec<Hit>> {
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let mut scores: AHashMap<u64, f32> = AHashMap::new();
        for term in &query.terms {
            for list in self.reader.postings(&term.field, &term.token) {
                for posting in &list.postings {
                    *scores.entry(posting.doc_id).or_insert(0.0) += 1.0;
                }
            }
        }

        let mut hits: Vec<Hit> = scores
            .into_iter()
            .map(|(doc_id, score)| Hit {
                doc_id,
                score,
                document: self
                    .reader
                    .document(doc_id)
                    .cloned()
                    .unwrap_or_default(),
            })
            .collect();

        hits.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| a.doc_id.cmp(&b.doc_id))
        });

        Ok(hits)
    }
}
