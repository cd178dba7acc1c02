//! Embedded image resolved from a page's object store.

use serde::{Deserialize, Serialize};

/// An image XObject payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Image {
    /// Raw payload bytes (encoded stream for image codecs, decoded samples otherwise)
    #[serde(skip_serializing)]
    pub data: Vec<u8>,

    /// MIME type inferred from the stream filter
    pub mime_type: String,

    /// Width in pixels
    pub width: Option<u32>,

    /// Height in pixels
    pub height: Option<u32>,

    /// Color space (e.g., "DeviceRGB", "ICCBased")
    pub color_space: Option<String>,

    /// Bits per component (e.g., 8)
    pub bits_per_component: Option<u8>,
}

impl Image {
    /// Create a new image.
    pub fn new(data: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            data,
            mime_type: mime_type.into(),
            width: None,
            height: None,
            color_space: None,
            bits_per_component: None,
        }
    }

    /// Set image dimensions.
    pub fn with_dimensions(mut self, width: u32, height: u32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    /// Set color space.
    pub fn with_color_space(mut self, color_space: impl Into<String>) -> Self {
        self.color_space = Some(color_space.into());
        self
    }

    /// Set bits per component.
    pub fn with_bits_per_component(mut self, bits: u8) -> Self {
        self.bits_per_component = Some(bits);
        self
    }

    /// Payload size in bytes.
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// MIME type for a stream filter name.
    pub fn mime_for_filter(filter: Option<&str>) -> &'static str {
        match filter {
            Some("DCTDecode") => "image/jpeg",
            Some("JPXDecode") => "image/jp2",
            Some("JBIG2Decode") => "image/jbig2",
            Some("CCITTFaxDecode") => "image/ccitt",
            _ => "application/octet-stream",
        }
    }
}
