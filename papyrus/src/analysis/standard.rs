//! Standard analyzer: Unicode word split, lowercasing, stop-word removal.

use std::collections::HashSet;

use unicode_segmentation::UnicodeSegmentation;

use crate::analysis::analyzer::{Analyzer, TokenStream};
use crate::analysis::token::Token;
use crate::error::Result;

/// English stop words removed by [`StandardAnalyzer`].
pub const STOP_WORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "but", "by", "for", "if", "in", "into", "is", "it",
    "no", "not", "of", "on", "or", "such", "that", "the", "their", "then", "there", "these",
    "they", "this", "to", "was", "will", "with",
];

/// The default analyzer.
///
/// Splits on Unicode word boundaries, lowercases each token and removes
/// English stop words.
///
/// # Examples
///
/// ```
/// use papyrus::analysis::{Analyzer, StandardAnalyzer};
///
/// let analyzer = StandardAnalyzer::new().unwrap();
/// let tokens: Vec<_> = analyzer
///     .analyze("Hello World!")
///     .unwrap()
///     .map(|t| t.text)
///     .collect();
/// assert_eq!(tokens, vec!["hello", "world"]);
/// ```
#[derive(Debug, Clone)]
pub struct StandardAnalyzer {
    stop_words: HashSet<&'static str>,
}

impl StandardAnalyzer {
    /// Create a new standard analyzer with the default stop-word set.
    pub fn new() -> Result<Self> {
        Ok(StandardAnalyzer {
            stop_words: STOP_WORDS.iter().copied().collect(),
        })
    }
}

impl Analyzer for StandardAnalyzer {
    fn analyze<'a>(&'a self, text: &'a str) -> Result<TokenStream<'a>> {
        let stop_words = &self.stop_words;
        let iter = text
            .unicode_word_indices()
            .enumerate()
            .filter_map(move |(position, (offset, word))| {
                let token = word.to_lowercase();
                if stop_words.contains(token.as_str()) {
                    return None;
                }
                Some(Token::new(token, position as u32, offset, offset + word.len()))
            });
        Ok(Box::new(iter))
    }

    fn name(&self) -> &'static str {
        "standard"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(analyzer: &StandardAnalyzer, input: &str) -> Vec<String> {
        analyzer
            .analyze(input)
            .unwrap()
            .map(|t| t.text)
            .collect()
    }

    #[test]
    fn test_split_and_lowercase() {
        let analyzer = StandardAnalyzer::new().unwrap();
        let tokens = texts(&analyzer, "Hello, World! rust-lang 2024");
        assert_eq!(tokens, vec!["hello", "world", "rust", "lang", "2024"]);
    }

    #[test]
    fn test_stop_word_removal() {
        let analyzer = StandardAnalyzer::new().unwrap();
        let tokens = texts(&analyzer, "The report and the annex");
        assert_eq!(tokens, vec!["report", "annex"]);
    }

    #[test]
    fn test_positions_count_filtered_slots() {
        let analyzer = StandardAnalyzer::new().unwrap();
        let tokens: Vec<_> = analyzer.analyze("rust the programming").unwrap().collect();
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].position, 0);
        assert_eq!(tokens[1].position, 2);
    }

    #[test]
    fn test_offsets() {
        let analyzer = StandardAnalyzer::new().unwrap();
        let tokens: Vec<_> = analyzer.analyze("Hello world").unwrap().collect();
        assert_eq!(tokens[0].start_offset, 0);
        assert_eq!(tokens[0].end_offset, 5);
        assert_eq!(tokens[1].start_offset, 6);
        assert_eq!(tokens[1].end_offset, 11);
    }

    #[test]
    fn test_restartable() {
        let analyzer = StandardAnalyzer::new().unwrap();
        let first: Vec<_> = analyzer.analyze("Some Text here").unwrap().collect();
        let second: Vec<_> = analyzer.analyze("Some Text here").unwrap().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_all_stop_words_yield_nothing() {
        let analyzer = StandardAnalyzer::new().unwrap();
        assert!(texts(&analyzer, "the and or").is_empty());
    }
}
