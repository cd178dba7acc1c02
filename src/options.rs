//! Extraction options and configuration.

use std::path::PathBuf;

/// Input used when none is given.
pub const DEFAULT_INPUT: &str = "public/professional_journey.pdf";

/// Output directory used when none is given.
pub const DEFAULT_OUTPUT_DIR: &str = "extracted";

/// Name of the text dump inside the output directory.
pub const DEFAULT_TEXT_FILE: &str = "extracted-text.txt";

/// Name of the image directory inside the output directory.
pub const DEFAULT_IMAGES_DIR: &str = "images";

/// Options for an extraction run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractOptions {
    /// PDF file to read
    pub input: PathBuf,

    /// Directory receiving the output files
    pub output_dir: PathBuf,

    /// Text dump file name
    pub text_file_name: String,

    /// Image directory name
    pub images_dir_name: String,

    /// What to extract
    pub mode: ExtractMode,
}

impl ExtractOptions {
    /// Create new options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the input file.
    pub fn with_input(mut self, input: impl Into<PathBuf>) -> Self {
        self.input = input.into();
        self
    }

    /// Set the output directory.
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Set the text dump file name.
    pub fn with_text_file_name(mut self, name: impl Into<String>) -> Self {
        self.text_file_name = name.into();
        self
    }

    /// Set the image directory name.
    pub fn with_images_dir_name(mut self, name: impl Into<String>) -> Self {
        self.images_dir_name = name.into();
        self
    }

    /// Set extract mode.
    pub fn with_mode(mut self, mode: ExtractMode) -> Self {
        self.mode = mode;
        self
    }

    /// Extract text only.
    pub fn text_only(mut self) -> Self {
        self.mode = ExtractMode::TextOnly;
        self
    }

    /// Check if images will be extracted.
    pub fn extracts_images(&self) -> bool {
        self.mode == ExtractMode::Complete
    }
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            text_file_name: DEFAULT_TEXT_FILE.to_string(),
            images_dir_name: DEFAULT_IMAGES_DIR.to_string(),
            mode: ExtractMode::Complete,
        }
    }
}

/// What content to extract from the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExtractMode {
    /// Text and embedded images
    #[default]
    Complete,
    /// Text only
    TextOnly,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = ExtractOptions::default();
        assert_eq!(options.input, PathBuf::from("public/professional_journey.pdf"));
        assert_eq!(options.output_dir, PathBuf::from("extracted"));
        assert_eq!(options.text_file_name, "extracted-text.txt");
        assert_eq!(options.images_dir_name, "images");
        assert!(options.extracts_images());
    }

    #[test]
    fn test_options_builder() {
        let options = ExtractOptions::new()
            .with_input("in.pdf")
            .with_output_dir("out")
            .with_text_file_name("dump.txt")
            .with_images_dir_name("img")
            .text_only();

        assert_eq!(options.input, PathBuf::from("in.pdf"));
        assert_eq!(options.output_dir, PathBuf::from("out"));
        assert_eq!(options.text_file_name, "dump.txt");
        assert_eq!(options.images_dir_name, "img");
        assert_eq!(options.mode, ExtractMode::TextOnly);
        assert!(!options.extracts_images());
    }
}
