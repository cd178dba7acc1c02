//! PDF parsing module.

mod backend;
mod info;
mod inline;

pub use backend::{decode_text_simple, LopdfBackend, PageId, PageRef, PdfBackend};
pub use info::parse_pdf_date;
