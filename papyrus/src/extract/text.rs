//! Plain-text extraction.

use std::fs;
use std::path::Path;

use log::debug;

use crate::error::{PapyrusError, Result};
use crate::extract::decode::decode_text;
use crate::extract::{Extractor, Page};

/// Extracts a whole plain-text file as a single page 0.
///
/// Empty files (and files decoding to nothing) yield no pages.
#[derive(Debug, Clone, Default)]
pub struct PlainTextExtractor;

impl PlainTextExtractor {
    pub fn new() -> Self {
        PlainTextExtractor
    }
}

impl Extractor for PlainTextExtractor {
    fn supports(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("txt"))
    }

    fn extract(&self, path: &Path) -> Result<Vec<Page>> {
        let bytes = fs::read(path).map_err(|err| {
            PapyrusError::extraction(format!("Failed to read {}: {err}", path.display()))
        })?;

        match decode_text(&bytes) {
            Some(text) => Ok(vec![Page::new(0, text)]),
            None => {
                debug!("No usable text in {}", path.display());
                Ok(Vec::new())
            }
        }
    }
}
