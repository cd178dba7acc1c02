//! # pdfdump
//!
//! Page-by-page PDF content extraction to flat output files.
//!
//! A run is strictly linear: load the input file, parse it, walk the pages
//! in order collecting their text (and, in complete mode, the images their
//! drawing operations paint), then write everything out.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pdfdump::{ExtractOptions, Extractor};
//!
//! fn main() -> pdfdump::Result<()> {
//!     let options = ExtractOptions::new()
//!         .with_input("public/professional_journey.pdf")
//!         .with_output_dir("extracted");
//!
//!     let extraction = Extractor::new(options).run()?;
//!     println!("{} pages", extraction.summary.pages);
//!     Ok(())
//! }
//! ```
//!
//! ## Output
//!
//! - `<output>/extracted-text.txt`: all page text, each page introduced by
//!   `\n\n=== PAGE n ===\n`
//! - `<output>/images/page-<n>-img-<op>.png`: raw image payloads

pub mod error;
pub mod loader;
pub mod model;
pub mod options;
pub mod parser;
pub mod walker;
pub mod writer;

// Re-export commonly used types
pub use error::{Error, ErrorKind, Result};
pub use model::{
    page_marker, ExtractionResult, Image, Metadata, OpCode, Operator, OperatorList, TextContent,
    TextItem,
};
pub use options::{ExtractMode, ExtractOptions};
pub use parser::{LopdfBackend, PageRef, PdfBackend};
pub use walker::{ImageSink, PageWalker, Progress};
pub use writer::{OutputLayout, Summary};

/// Everything a finished run produced.
#[derive(Debug, Clone)]
pub struct Extraction {
    /// Document metadata
    pub metadata: Metadata,

    /// Accumulated text and image counts
    pub result: ExtractionResult,

    /// Console-facing summary
    pub summary: Summary,
}

/// Drives a run: load, parse, walk, write.
///
/// # Example
///
/// ```no_run
/// use pdfdump::{ExtractOptions, Extractor, Progress};
///
/// let extraction = Extractor::new(ExtractOptions::new().text_only())
///     .run_with_progress(|event| {
///         if let Progress::PageStarted { page, total } = event {
///             println!("Processing page {}/{}...", page, total);
///         }
///     })?;
/// # Ok::<(), pdfdump::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct Extractor {
    options: ExtractOptions,
}

impl Extractor {
    /// Create an extractor.
    pub fn new(options: ExtractOptions) -> Self {
        Self { options }
    }

    /// Options this extractor runs with.
    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// Run without progress reporting.
    pub fn run(&self) -> Result<Extraction> {
        self.run_with_progress(|_| {})
    }

    /// Run, reporting progress to `on_progress`.
    ///
    /// Nothing is created on disk unless the input exists and parses.
    pub fn run_with_progress<F>(&self, mut on_progress: F) -> Result<Extraction>
    where
        F: FnMut(Progress<'_>),
    {
        let with_images = self.options.extracts_images();
        if with_images && !cfg!(feature = "images") {
            return Err(Error::DependencyMissing {
                capability: "image extraction",
                feature: "images",
            });
        }

        let data = loader::load(&self.options.input)?;
        let backend = LopdfBackend::load_bytes(&data)?;

        let metadata = backend.metadata();
        log::info!(
            "Parsed {} (PDF {}, {} pages)",
            self.options.input.display(),
            metadata.pdf_version,
            metadata.page_count
        );
        on_progress(Progress::Parsed {
            metadata: &metadata,
        });

        let mut layout = OutputLayout::from_options(&self.options);
        layout.prepare(with_images)?;

        let walker = PageWalker::new(&backend);
        let result = if with_images {
            walker.walk(Some(&mut layout), &mut on_progress)?
        } else {
            walker.walk(None, &mut on_progress)?
        };

        layout.write_text(&result.text)?;
        let summary = Summary::collect(&result, &layout, with_images)?;

        Ok(Extraction {
            metadata,
            result,
            summary,
        })
    }
}

/// Run an extraction with the given options.
pub fn extract(options: ExtractOptions) -> Result<Extraction> {
    Extractor::new(options).run()
}

/// Extract the text of an in-memory PDF without writing anything.
///
/// # Example
///
/// ```no_run
/// let data = std::fs::read("document.pdf").unwrap();
/// let result = pdfdump::extract_text_bytes(&data).unwrap();
/// println!("{}", result.text);
/// ```
pub fn extract_text_bytes(data: &[u8]) -> Result<ExtractionResult> {
    let backend = LopdfBackend::load_bytes(data)?;
    PageWalker::new(&backend).walk_text()
}

/// Run an extraction on tokio's blocking pool.
///
/// The run itself stays sequential; this only keeps it off the async
/// executor threads.
#[cfg(feature = "async")]
pub async fn extract_async(options: ExtractOptions) -> Result<Extraction> {
    tokio::task::spawn_blocking(move || Extractor::new(options).run())
        .await
        .map_err(|e| Error::Io(std::io::Error::other(e)))?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extractor_keeps_options() {
        let options = ExtractOptions::new().with_input("a.pdf").text_only();
        let extractor = Extractor::new(options.clone());
        assert_eq!(extractor.options(), &options);
    }

    #[test]
    fn test_missing_input_creates_nothing() {
        let dir = tempfile::TempDir::new().unwrap();
        let output = dir.path().join("extracted");
        let options = ExtractOptions::new()
            .with_input(dir.path().join("missing.pdf"))
            .with_output_dir(&output);

        let err = extract(options).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(!output.exists());
    }

    #[test]
    fn test_unparseable_input_creates_nothing() {
        let dir = tempfile::TempDir::new().unwrap();
        let input = dir.path().join("broken.pdf");
        std::fs::write(&input, b"this is not a pdf at all").unwrap();
        let output = dir.path().join("extracted");

        let err = extract(
            ExtractOptions::new()
                .with_input(&input)
                .with_output_dir(&output),
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Extraction);
        assert!(!output.exists());
    }

    #[test]
    fn test_extract_text_bytes_rejects_empty() {
        assert!(extract_text_bytes(&[]).is_err());
    }
}
