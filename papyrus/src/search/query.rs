//! Query parsing: analyzer-backed flat term queries.

use std::sync::Arc;

use crate::analysis::analyzer::Analyzer;
use crate::error::{PapyrusError, Result};

/// A single term match against one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Term {
    pub field: String,
    pub token: String,
}

/// A parsed query: term matches combined with implicit OR.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    pub terms: Vec<Term>,
}

impl Query {
    /// Whether the query matches nothing by construction.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

/// Parses query strings with the same analyzer used at index time, so
/// query terms and index terms always agree.
pub struct QueryParser {
    default_field: String,
    analyzer: Arc<dyn Analyzer>,
}

impl std::fmt::Debug for QueryParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryParser")
            .field("default_field", &self.default_field)
            .field("analyzer", &self.analyzer.name())
            .finish()
    }
}

impl QueryParser {
    /// Create a parser matching against the given default field.
    pub fn new(default_field: impl Into<String>, analyzer: Arc<dyn Analyzer>) -> Self {
        QueryParser {
            default_field: default_field.into(),
            analyzer,
        }
    }

    /// Parse a query string into a flat term query.
    ///
    /// Double quotes are grouping punctuation and must be balanced; the
    /// term language itself is flat, so a query that analyzes to zero
    /// tokens (for example, only stop words) parses to an empty query
    /// rather than an error.
    pub fn parse(&self, query: &str) -> Result<Query> {
        let quotes = query.chars().filter(|&c| c == '"').count();
        if quotes % 2 != 0 {
            return Err(PapyrusError::malformed_query("Unbalanced '\"' in query"));
        }

        let mut terms = Vec::new();
        for token in self.analyzer.analyze(query)? {
            terms.push(Term {
                field: self.default_field.clone(),
                token: token.text,
            });
        }
        Ok(Query { terms })
    }
}
