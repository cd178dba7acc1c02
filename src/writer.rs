//! Output files: the text dump, image files and the run summary.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::{ExtractionResult, Image};
use crate::options::ExtractOptions;
use crate::walker::ImageSink;

/// Where a run writes its files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    /// Output directory
    pub root: PathBuf,
    /// Text dump path
    pub text_path: PathBuf,
    /// Image directory
    pub images_dir: PathBuf,
}

impl OutputLayout {
    /// Derive the layout from extraction options.
    pub fn from_options(options: &ExtractOptions) -> Self {
        let root = options.output_dir.clone();
        Self {
            text_path: root.join(&options.text_file_name),
            images_dir: root.join(&options.images_dir_name),
            root,
        }
    }

    /// Create the output directory, and the image directory if requested.
    pub fn prepare(&self, with_images: bool) -> Result<()> {
        fs::create_dir_all(&self.root)?;
        if with_images {
            fs::create_dir_all(&self.images_dir)?;
        }
        Ok(())
    }

    /// Write the text dump as UTF-8, replacing any previous file.
    pub fn write_text(&self, text: &str) -> Result<&Path> {
        fs::write(&self.text_path, text)?;
        Ok(&self.text_path)
    }

    /// File name for the image painted by `op_index` on `page_num`.
    pub fn image_file_name(page_num: u32, op_index: usize) -> String {
        format!("page-{}-img-{}.png", page_num, op_index)
    }

    /// Full path for the image painted by `op_index` on `page_num`.
    pub fn image_path(&self, page_num: u32, op_index: usize) -> PathBuf {
        self.images_dir
            .join(Self::image_file_name(page_num, op_index))
    }

    /// Number of entries currently in the image directory.
    pub fn count_image_files(&self) -> Result<usize> {
        Ok(fs::read_dir(&self.images_dir)?.count())
    }
}

impl ImageSink for OutputLayout {
    fn write_image(&mut self, page_num: u32, op_index: usize, image: &Image) -> Result<PathBuf> {
        let path = self.image_path(page_num, op_index);
        fs::write(&path, &image.data)?;
        log::debug!(
            "Wrote {} ({} bytes, {})",
            path.display(),
            image.size(),
            image.mime_type
        );
        Ok(path)
    }
}

/// Human-facing summary of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    /// Pages processed
    pub pages: u32,

    /// Length of the text dump in characters
    pub characters: usize,

    /// Files in the image directory after the run (complete variant only)
    pub image_files: Option<usize>,

    /// Text dump path
    pub text_path: PathBuf,

    /// Image directory (complete variant only)
    pub images_dir: Option<PathBuf>,
}

impl Summary {
    /// Summarize a finished run; lists the image directory when images were extracted.
    pub fn collect(result: &ExtractionResult, layout: &OutputLayout, with_images: bool) -> Result<Self> {
        let image_files = if with_images {
            Some(layout.count_image_files()?)
        } else {
            None
        };

        Ok(Self {
            pages: result.page_count,
            characters: result.char_count(),
            image_files,
            text_path: layout.text_path.clone(),
            images_dir: with_images.then(|| layout.images_dir.clone()),
        })
    }

    /// Serialize as pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn layout_in(dir: &TempDir) -> OutputLayout {
        let options = ExtractOptions::new().with_output_dir(dir.path().join("extracted"));
        OutputLayout::from_options(&options)
    }

    #[test]
    fn test_layout_paths() {
        let options = ExtractOptions::new().with_output_dir("out");
        let layout = OutputLayout::from_options(&options);
        assert_eq!(layout.text_path, Path::new("out/extracted-text.txt"));
        assert_eq!(layout.images_dir, Path::new("out/images"));
        assert_eq!(
            layout.image_path(3, 17),
            Path::new("out/images/page-3-img-17.png")
        );
    }

    #[test]
    fn test_prepare_creates_directories() {
        let dir = TempDir::new().unwrap();
        let layout = layout_in(&dir);

        layout.prepare(false).unwrap();
        assert!(layout.root.is_dir());
        assert!(!layout.images_dir.exists());

        layout.prepare(true).unwrap();
        assert!(layout.images_dir.is_dir());
    }

    #[test]
    fn test_write_text_overwrites() {
        let dir = TempDir::new().unwrap();
        let layout = layout_in(&dir);
        layout.prepare(false).unwrap();

        layout.write_text("first run, longer content").unwrap();
        layout.write_text("second").unwrap();
        assert_eq!(fs::read_to_string(&layout.text_path).unwrap(), "second");
    }

    #[test]
    fn test_image_sink_and_summary() {
        let dir = TempDir::new().unwrap();
        let mut layout = layout_in(&dir);
        layout.prepare(true).unwrap();

        let image = Image::new(vec![9, 9, 9, 9], "application/octet-stream");
        let path = layout.write_image(1, 4, &image).unwrap();
        assert_eq!(fs::read(&path).unwrap(), vec![9, 9, 9, 9]);

        let mut result = ExtractionResult::new();
        result.push_page(1, "text");
        result.images_written = 1;

        let summary = Summary::collect(&result, &layout, true).unwrap();
        assert_eq!(summary.pages, 1);
        assert_eq!(summary.image_files, Some(1));
        assert_eq!(summary.characters, result.char_count());

        let json = summary.to_json().unwrap();
        assert!(json.contains("\"image_files\": 1"));
    }

    #[test]
    fn test_summary_without_images() {
        let dir = TempDir::new().unwrap();
        let layout = layout_in(&dir);
        layout.prepare(false).unwrap();

        let summary = Summary::collect(&ExtractionResult::new(), &layout, false).unwrap();
        assert_eq!(summary.image_files, None);
        assert_eq!(summary.images_dir, None);
    }
}
