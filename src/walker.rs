//! Page-by-page extraction.
//!
//! Pages are visited strictly in order `1..=page_count`. Each page's text
//! is appended to the [`ExtractionResult`] behind its page marker; when an
//! [`ImageSink`] is supplied, images painted by the page are resolved and
//! handed to it before the next page is touched.

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::model::{ExtractionResult, Image, Metadata};
use crate::parser::{PageRef, PdfBackend};

/// Destination for resolved images.
pub trait ImageSink {
    /// Store an image painted by operator `op_index` of page `page_num`.
    fn write_image(&mut self, page_num: u32, op_index: usize, image: &Image) -> Result<PathBuf>;
}

/// Progress notifications emitted during a run.
#[derive(Debug, Clone, Copy)]
pub enum Progress<'a> {
    /// The document was parsed.
    Parsed { metadata: &'a Metadata },
    /// Work on a page is starting.
    PageStarted { page: u32, total: u32 },
    /// An image file was written.
    ImageWritten {
        page: u32,
        op_index: usize,
        path: &'a Path,
    },
    /// An image reference could not be resolved and was skipped.
    ImageSkipped {
        page: u32,
        op_index: usize,
        name: &'a str,
    },
}

/// Walks the pages of a document.
pub struct PageWalker<'a, B: PdfBackend + ?Sized> {
    backend: &'a B,
}

impl<'a, B: PdfBackend + ?Sized> PageWalker<'a, B> {
    /// Create a walker over `backend`.
    pub fn new(backend: &'a B) -> Self {
        Self { backend }
    }

    /// Extract text only.
    pub fn walk_text(&self) -> Result<ExtractionResult> {
        self.walk(None, &mut |_| {})
    }

    /// Visit every page in order.
    ///
    /// Any failure fetching a page, its text or its operator list aborts
    /// the walk. Unresolvable images are skipped.
    pub fn walk(
        &self,
        mut images: Option<&mut dyn ImageSink>,
        progress: &mut dyn FnMut(Progress<'_>),
    ) -> Result<ExtractionResult> {
        let total = self.backend.page_count();
        let mut result = ExtractionResult::new();

        for page_num in 1..=total {
            progress(Progress::PageStarted {
                page: page_num,
                total,
            });

            let page = self.backend.page(page_num)?;
            let text = self.backend.text_content(&page)?;
            result.push_page(page_num, &text.page_text());

            if let Some(sink) = images.as_deref_mut() {
                self.extract_images(&page, sink, &mut result, progress)?;
            }
        }

        Ok(result)
    }

    #[cfg(feature = "images")]
    fn extract_images(
        &self,
        page: &PageRef,
        sink: &mut dyn ImageSink,
        result: &mut ExtractionResult,
        progress: &mut dyn FnMut(Progress<'_>),
    ) -> Result<()> {
        let list = self.backend.operator_list(page)?;

        for (op_index, key) in list.image_ops() {
            let image = list
                .objs
                .get(key)
                .and_then(|object| self.backend.load_image(object));

            match image {
                Some(image) => {
                    let path = sink.write_image(page.number, op_index, &image)?;
                    result.images_written += 1;
                    progress(Progress::ImageWritten {
                        page: page.number,
                        op_index,
                        path: &path,
                    });
                }
                None => {
                    log::debug!(
                        "Skipping unresolved image {} (page {}, op {})",
                        key,
                        page.number,
                        op_index
                    );
                    result.images_skipped += 1;
                    progress(Progress::ImageSkipped {
                        page: page.number,
                        op_index,
                        name: key,
                    });
                }
            }
        }

        Ok(())
    }

    #[cfg(not(feature = "images"))]
    fn extract_images(
        &self,
        _page: &PageRef,
        _sink: &mut dyn ImageSink,
        _result: &mut ExtractionResult,
        _progress: &mut dyn FnMut(Progress<'_>),
    ) -> Result<()> {
        Err(crate::error::Error::DependencyMissing {
            capability: "image extraction",
            feature: "images",
        })
    }
}
