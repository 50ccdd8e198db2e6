//! Export module for ttr
//!
//! Encoders for the 8-bit coverage bitmaps the renderer produces.

use std::io::Write;
use std::path::Path;
use std::str::FromStr;

use ttr_core::{
    error::{ExportError, Result},
    traits::Exporter,
    types::BitmapData,
};

pub mod bmp;
pub mod png;

pub use bmp::BmpExporter;
pub use png::PngExporter;

/// Reject bitmaps whose buffer does not hold exactly `width × height` bytes
pub(crate) fn check_buffer(bitmap: &BitmapData) -> Result<()> {
    let expected = (bitmap.width as usize).checked_mul(bitmap.height as usize);
    if expected != Some(bitmap.data.len()) {
        return Err(ExportError::EncodingFailed(format!(
            "Buffer size mismatch: {}x{} bitmap holds {} bytes",
            bitmap.width,
            bitmap.height,
            bitmap.data.len()
        ))
        .into());
    }
    Ok(())
}

/// Binary PGM (P5) exporter
#[derive(Debug, Default, Clone, Copy)]
pub struct PnmExporter;

impl PnmExporter {
    pub fn new() -> Self {
        Self
    }
}

impl Exporter for PnmExporter {
    fn name(&self) -> &'static str {
        "pgm"
    }

    fn export(&self, bitmap: &BitmapData) -> Result<Vec<u8>> {
        check_buffer(bitmap)?;

        let mut output = Vec::with_capacity(bitmap.data.len() + 20);
        write!(&mut output, "P5\n{} {}\n255\n", bitmap.width, bitmap.height)?;
        output.extend_from_slice(&bitmap.data);
        Ok(output)
    }

    fn extension(&self) -> &'static str {
        "pgm"
    }

    fn mime_type(&self) -> &'static str {
        "image/x-portable-graymap"
    }
}

/// The formats ttr can write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Pgm,
    Bmp,
    Png,
}

impl ExportFormat {
    /// Guess the format from a file extension, case-insensitively
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| ext.parse().ok())
    }

    pub fn exporter(self) -> Box<dyn Exporter> {
        match self {
            ExportFormat::Pgm => Box::new(PnmExporter::new()),
            ExportFormat::Bmp => Box::new(BmpExporter::new()),
            ExportFormat::Png => Box::new(PngExporter::new()),
        }
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pgm" | "pnm" => Ok(ExportFormat::Pgm),
            "bmp" => Ok(ExportFormat::Bmp),
            "png" => Ok(ExportFormat::Png),
            other => Err(ExportError::FormatNotSupported(other.to_string())),
        }
    }
}
