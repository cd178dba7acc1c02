//! Accumulated output of a page walk.

use serde::{Deserialize, Serialize};

/// Page-boundary marker preceding the text of page `page_num`.
pub fn page_marker(page_num: u32) -> String {
    format!("\n\n=== PAGE {} ===\n", page_num)
}

/// Result threaded through the page walker and returned at the end.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Total number of pages processed
    pub page_count: u32,

    /// All page text, each page prefixed by its marker
    pub text: String,

    /// Number of image files written
    pub images_written: usize,

    /// Number of image references that could not be resolved
    pub images_skipped: usize,
}

impl ExtractionResult {
    /// Create an empty result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the text of a page after its marker.
    pub fn push_page(&mut self, page_num: u32, page_text: &str) {
        self.text.push_str(&page_marker(page_num));
        self.text.push_str(page_text);
        self.page_count += 1;
    }

    /// Length of the accumulated text in Unicode scalar values.
    ///
    /// Characters outside the Basic Multilingual Plane count once, not as
    /// two UTF-16 code units.
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_page() {
        let mut result = ExtractionResult::new();
        result.push_page(1, "First page");
        result.push_page(2, "Zweite Seite");

        assert_eq!(
            result.text,
            "\n\n=== PAGE 1 ===\nFirst page\n\n=== PAGE 2 ===\nZweite Seite"
        );
        assert_eq!(result.page_count, 2);
    }

    #[test]
    fn test_char_count_counts_chars_not_bytes() {
        let mut result = ExtractionResult::new();
        result.push_page(1, "café");
        assert_eq!(result.char_count(), "\n\n=== PAGE 1 ===\n".len() + 4);
        assert!(result.text.len() > result.char_count());
    }

    #[test]
    fn test_char_count_astral_counts_once() {
        let mut result = ExtractionResult::new();
        result.push_page(1, "\u{1D11E}");
        assert_eq!(result.char_count(), "\n\n=== PAGE 1 ===\n".len() + 1);
        assert_eq!(result.text.encode_utf16().count(), result.char_count() + 1);
    }
}
