//! The analyzer trait shared by indexing and query parsing.

use crate::analysis::token::Token;
use crate::error::Result;

/// A stream of tokens produced by one analysis pass.
pub type TokenStream<'a> = Box<dyn Iterator<Item = Token> + 'a>;

/// Text-to-tokens normalization pipeline.
///
/// Implementations carry no per-call state: analyzing the same text twice
/// yields the same token sequence.
pub trait Analyzer: Send + Sync + std::fmt::Debug {
    /// Analyze the given text into a token stream.
    fn analyze<'a>(&'a self, text: &'a str) -> Result<TokenStream<'a>>;

    /// Name of this analyzer.
    fn name(&self) -> &'static str;
}
