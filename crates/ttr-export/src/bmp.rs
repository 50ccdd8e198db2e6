//! BMP export format
//!
//! 24-bit uncompressed, stored top-down (negative height). Coverage is
//! inverted so ink comes out black on a white page.

use ttr_core::{
    error::{ExportError, Result},
    traits::Exporter,
    types::BitmapData,
};

use crate::check_buffer;

/// File header (14 bytes) plus BITMAPINFOHEADER (40 bytes)
const HEADER_SIZE: u32 = 54;
const INFO_HEADER_SIZE: u32 = 40;

/// Bytes per row after padding `width` BGR triples to a 4-byte boundary
fn row_stride(width: u32) -> Option<u32> {
    width.checked_mul(3)?.checked_add(3).map(|n| n & !3)
}

#[derive(Debug, Default, Clone, Copy)]
pub struct BmpExporter;

impl BmpExporter {
    pub fn new() -> Self {
        Self
    }
}

impl Exporter for BmpExporter {
    fn name(&self) -> &'static str {
        "bmp"
    }

    fn export(&self, bitmap: &BitmapData) -> Result<Vec<u8>> {
        check_buffer(bitmap)?;

        let too_large = || {
            ExportError::EncodingFailed(format!(
                "{}x{} is too large for BMP",
                bitmap.width, bitmap.height
            ))
        };
        let stride = row_stride(bitmap.width).ok_or_else(too_large)?;
        let pixel_bytes = stride.checked_mul(bitmap.height).ok_or_else(too_large)?;
        let file_size = pixel_bytes.checked_add(HEADER_SIZE).ok_or_else(too_large)?;
        let width = i32::try_from(bitmap.width).map_err(|_| too_large())?;
        let height = i32::try_from(bitmap.height).map_err(|_| too_large())?;

        let mut out = Vec::with_capacity(file_size as usize);
        out.extend_from_slice(b"BM");
        out.extend_from_slice(&file_size.to_le_bytes());
        out.extend_from_slice(&0u32.to_le_bytes());
        out.extend_from_slice(&HEADER_SIZE.to_le_bytes());

        out.extend_from_slice(&INFO_HEADER_SIZE.to_le_bytes());
        out.extend_from_slice(&width.to_le_bytes());
        out.extend_from_slice(&(-height).to_le_bytes());
        out.extend_from_slice(&1u16.to_le_bytes()); // planes
        out.extend_from_slice(&24u16.to_le_bytes()); // bits per pixel
        out.extend_from_slice(&0u32.to_le_bytes()); // BI_RGB
        out.extend_from_slice(&pixel_bytes.to_le_bytes());
        out.extend_from_slice(&0i32.to_le_bytes());
        out.extend_from_slice(&0i32.to_le_bytes());
        out.extend_from_slice(&0u32.to_le_bytes());
        out.extend_from_slice(&0u32.to_le_bytes());

        let padding = (stride - bitmap.width * 3) as usize;
        if bitmap.width > 0 {
            for row in bitmap.data.chunks_exact(bitmap.width as usize) {
                for &coverage in row {
                    let v = !coverage;
                    out.extend_from_slice(&[v, v, v]);
                }
                out.extend(std::iter::repeat(0u8).take(padding));
            }
        }

        log::debug!(
            "Encoded {}x{} BMP ({} bytes)",
            bitmap.width,
            bitmap.height,
            out.len()
        );
        Ok(out)
    }

    fn extension(&self) -> &'static str {
        "bmp"
    }

    fn mime_type(&self) -> &'static str {
        "image/bmp"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn u32_at(bytes: &[u8], at: usize) -> u32 {
        u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
    }

    fn i32_at(bytes: &[u8], at: usize) -> i32 {
        u32_at(bytes, at) as i32
    }

    #[test]
    fn test_row_stride() {
        assert_eq!(row_stride(1), Some(4));
        assert_eq!(row_stride(4), Some(12));
        assert_eq!(row_stride(5), Some(16));
        assert_eq!(row_stride(u32::MAX), None);
    }

    #[test]
    fn test_header_fields() {
        let bitmap = BitmapData {
            width: 3,
            height: 2,
            data: vec![0; 6],
        };
        let out = BmpExporter::new().export(&bitmap).unwrap();

        assert_eq!(&out[0..2], b"BM");
        // 3 pixels × 3 bytes = 9, padded to 12, two rows
        assert_eq!(out.len(), 54 + 24);
        assert_eq!(u32_at(&out, 2), out.len() as u32);
        assert_eq!(u32_at(&out, 10), 54);
        assert_eq!(u32_at(&out, 14), 40);
        assert_eq!(i32_at(&out, 18), 3);
        assert_eq!(i32_at(&out, 22), -2);
        assert_eq!(u16::from_le_bytes([out[26], out[27]]), 1);
        assert_eq!(u16::from_le_bytes([out[28], out[29]]), 24);
        assert_eq!(u32_at(&out, 34), 24);
    }

    #[test]
    fn test_pixels_are_inverted_and_rows_padded() {
        let bitmap = BitmapData {
            width: 1,
            height: 2,
            data: vec![255, 0],
        };
        let out = BmpExporter::new().export(&bitmap).unwrap();
        let pixels = &out[54..];
        assert_eq!(pixels, &[0, 0, 0, 0, 255, 255, 255, 0]);
    }

    #[test]
    fn test_aligned_rows_have_no_padding() {
        let bitmap = BitmapData {
            width: 4,
            height: 1,
            data: vec![10, 20, 30, 40],
        };
        let out = BmpExporter::new().export(&bitmap).unwrap();
        assert_eq!(out.len(), 54 + 12);
        assert_eq!(&out[54..57], &[245, 245, 245]);
        assert_eq!(&out[63..66], &[215, 215, 215]);
    }
}
