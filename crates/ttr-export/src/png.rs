//! PNG export format
//!
//! Writes coverage as 8-bit grayscale using the `image` crate.

use image::ImageEncoder;
use ttr_core::{
    error::{ExportError, Result},
    traits::Exporter,
    types::BitmapData,
};

use crate::check_buffer;

/// Encode an 8-bit coverage bitmap as a grayscale PNG
pub fn encode_bitmap_to_png(bitmap: &BitmapData) -> Result<Vec<u8>> {
    check_buffer(bitmap)?;

    let mut png_data = Vec::new();
    let encoder = image::codecs::png::PngEncoder::new_with_quality(
        &mut png_data,
        image::codecs::png::CompressionType::Default,
        image::codecs::png::FilterType::Sub,
    );

    encoder
        .write_image(
            &bitmap.data,
            bitmap.width,
            bitmap.height,
            image::ExtendedColorType::L8,
        )
        .map_err(|e| ExportError::EncodingFailed(format!("PNG encoding failed: {}", e)))?;

    Ok(png_data)
}

/// PNG exporter for rendered bitmaps
///
/// # Examples
///
/// ```
/// use ttr_export::PngExporter;
/// let exporter = PngExporter::new();
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct PngExporter;

impl PngExporter {
    pub fn new() -> Self {
        Self
    }
}

impl Exporter for PngExporter {
    fn name(&self) -> &'static str {
        "png"
    }

    fn export(&self, bitmap: &BitmapData) -> Result<Vec<u8>> {
        encode_bitmap_to_png(bitmap)
    }

    fn extension(&self) -> &'static str {
        "png"
    }

    fn mime_type(&self) -> &'static str {
        "image/png"
    }
}
