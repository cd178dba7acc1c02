//! Data model shared by the parser backend, the page walker and the writer.
//!
//! Everything here is transient: built during a single run and dropped at
//! the end. The only persisted artifacts are the files the writer produces.

mod content;
mod image;
mod metadata;
mod result;

pub use content::{ObjectRef, ObjectStore, OpCode, Operand, Operator, OperatorList, TextContent, TextItem};
pub use image::Image;
pub use metadata::Metadata;
pub use result::{page_marker, ExtractionResult};
