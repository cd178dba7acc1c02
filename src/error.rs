//! Error types for pdfdump.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for pdfdump operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while extracting a PDF.
#[derive(Error, Debug)]
pub enum Error {
    /// The input file does not exist.
    #[error("PDF not found at: {}", .0.display())]
    NotFound(PathBuf),

    /// A capability was requested that this build does not include.
    #[error("{capability} is not available in this build (enable the `{feature}` feature)")]
    DependencyMissing {
        /// What was requested (e.g. "image extraction").
        capability: &'static str,
        /// Cargo feature that provides it.
        feature: &'static str,
    },

    /// I/O error when reading the input or writing output files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The PDF structure could not be parsed.
    #[error("PDF parsing error: {0}")]
    Parse(String),

    /// The PDF document is encrypted and could not be opened.
    #[error("Document is encrypted")]
    Encrypted,

    /// Page number is outside the document.
    #[error("Page {page} is out of range (document has {page_count} pages)")]
    PageFetch {
        /// Requested page (1-indexed)
        page: u32,
        /// Pages in the document
        page_count: u32,
    },

    /// The text content of a page could not be read.
    #[error("Text extraction error on page {page}: {message}")]
    TextContent { page: u32, message: String },

    /// The content stream of a page could not be decoded into operators.
    #[error("Operator list error on page {page}: {message}")]
    OperatorList { page: u32, message: String },

    /// Summary serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Coarse error taxonomy used to pick remediation text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Input file is missing
    NotFound,
    /// Requested capability was compiled out
    DependencyMissing,
    /// Any other failure during load, parse, walk or write
    Extraction,
}

impl Error {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::NotFound(_) => ErrorKind::NotFound,
            Error::DependencyMissing { .. } => ErrorKind::DependencyMissing,
            _ => ErrorKind::Extraction,
        }
    }
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::Parse(err.to_string()),
        }
    }
}
