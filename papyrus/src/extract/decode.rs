//! Candidate-decoding selection for extracted byte content.

use std::borrow::Cow;

/// Decode raw bytes to text, preferring a lossless Unicode reading.
///
/// The UTF-8 candidate is taken only when the whole input is valid UTF-8;
/// anything else falls back to a Latin-1 reading. Returns `None` when no
/// usable (non-empty) text results, in which case the page is skipped.
pub fn decode_text(bytes: &[u8]) -> Option<String> {
    if bytes.is_empty() {
        return None;
    }

    if let Some(text) = encoding_rs::UTF_8.decode_without_bom_handling_and_without_replacement(bytes)
    {
        return non_empty(text);
    }

    non_empty(encoding_rs::mem::decode_latin1(bytes))
}

fn non_empty(text: Cow<'_, str>) -> Option<String> {
    if text.is_empty() {
        None
    } else {
        Some(text.into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_utf8_preferred() {
        assert_eq!(decode_text("héllo".as_bytes()).as_deref(), Some("héllo"));
    }

    #[test]
    fn test_invalid_utf8_falls_back_to_latin1() {
        // "café" encoded as Latin-1: 0xE9 is not valid UTF-8.
        let bytes = [b'c', b'a', b'f', 0xE9];
        assert_eq!(decode_text(&bytes).as_deref(), Some("café"));
    }

    #[test]
    fn test_empty_input_is_skipped() {
        assert_eq!(decode_text(&[]), None);
    }
}
