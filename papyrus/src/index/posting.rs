//! Posting lists and the in-memory term index built during writing.

use ahash::AHashMap;

/// A single posting: one document containing a term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Posting {
    /// The document id.
    pub doc_id: u64,

    /// Occurrences of the term in the document.
    pub frequency: u32,

    /// Token positions of the occurrences.
    pub positions: Vec<u32>,
}

impl Posting {
    pub fn new(doc_id: u64) -> Self {
        Posting {
            doc_id,
            frequency: 0,
            positions: Vec::new(),
        }
    }

    /// Record one more occurrence at the given position.
    pub fn record(&mut self, position: u32) {
        self.frequency += 1;
        self.positions.push(position);
    }
}

/// Postings for one term, sorted by document id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostingList {
    pub postings: Vec<Posting>,

    /// Number of documents containing the term.
    pub doc_frequency: u64,

    /// Total occurrences across all documents.
    pub total_frequency: u64,
}

impl PostingList {
    pub fn new() -> Self {
        PostingList::default()
    }

    /// Record an occurrence of the term in `doc_id` at `position`.
    ///
    /// Doc ids must arrive in non-decreasing order; occurrences of the
    /// same document fold into one posting.
    pub fn add_occurrence(&mut self, doc_id: u64, position: u32) {
        let start_new = self.postings.last().is_none_or(|last| last.doc_id != doc_id);
        if start_new {
            debug_assert!(
                self.postings.last().is_none_or(|last| last.doc_id < doc_id),
                "postings must be added in doc id order"
            );
            self.postings.push(Posting::new(doc_id));
            self.doc_frequency += 1;
        }
        if let Some(last) = self.postings.last_mut() {
            last.record(position);
            self.total_frequency += 1;
        }
    }

    /// Append a fully built posting, keeping the sort invariant.
    pub fn push_posting(&mut self, posting: Posting) {
        debug_assert!(
            self.postings.last().is_none_or(|last| last.doc_id < posting.doc_id),
            "postings must be appended in doc id order"
        );
        self.doc_frequency += 1;
        self.total_frequency += posting.frequency as u64;
        self.postings.push(posting);
    }

    pub fn is_empty(&self) -> bool {
        self.postings.is_empty()
    }
}

/// In-memory inverted index accumulated for the current segment.
#[derive(Debug, Default)]
pub struct TermPostingIndex {
    terms: AHashMap<String, PostingList>,
}

impl TermPostingIndex {
    pub fn new() -> Self {
        TermPostingIndex::default()
    }

    /// Record an occurrence of `term` in `doc_id` at `position`.
    pub fn add_occurrence(&mut self, term: String, doc_id: u64, position: u32) {
        self.terms
            .entry(term)
            .or_default()
            .add_occurrence(doc_id, position);
    }

    pub fn get_posting_list(&self, term: &str) -> Option<&PostingList> {
        self.terms.get(term)
    }

    /// Iterate over all terms and their posting lists.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &PostingList)> {
        self.terms.iter()
    }

    /// Number of distinct terms.
    pub fn term_count(&self) -> u64 {
        self.terms.len() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_occurrences_fold_into_one_posting() {
        let mut list = PostingList::new();
        list.add_occurrence(3, 0);
        list.add_occurrence(3, 5);
        list.add_occurrence(7, 1);

        assert_eq!(list.doc_frequency, 2);
        assert_eq!(list.total_frequency, 3);
        assert_eq!(list.postings[0].doc_id, 3);
        assert_eq!(list.postings[0].frequency, 2);
        assert_eq!(list.postings[0].positions, vec![0, 5]);
        assert_eq!(list.postings[1].doc_id, 7);
    }

    #[test]
    fn test_term_index_accumulates() {
        let mut index = TermPostingIndex::new();
        index.add_occurrence("content:hello".to_string(), 0, 0);
        index.add_occurrence("content:hello".to_string(), 1, 0);
        index.add_occurrence("content:world".to_string(), 0, 1);

        assert_eq!(index.term_count(), 2);
        let hello = index.get_posting_list("content:hello").unwrap();
        assert_eq!(hello.doc_frequency, 2);
    }
}
