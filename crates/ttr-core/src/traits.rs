//! The contracts between the renderer and its collaborators
//!
//! - [`FontRef`] - font data, glyph metrics and outline decomposition
//! - [`OutlineSink`] - receives decomposed outline commands
//! - [`PixelSink`] - receives rasterized coverage, one pixel at a time
//! - [`Shaper`] - where characters become positioned glyphs
//! - [`Renderer`] - where positioned glyphs become pixels
//! - [`Exporter`] - where pixels become files

use crate::{
    error::Result,
    types::{BitmapData, GlyphExtents, GlyphId, ShapingResult},
    RenderParams, ShapingParams,
};
use std::sync::Arc;

/// Receiver of outline decomposition commands
///
/// Coordinates are in 26.6 units (64 per pixel) as floats, y pointing up.
/// Any method may fail when the receiver runs out of room; the caller should
/// stop feeding the current glyph and report the error.
pub trait OutlineSink {
    fn move_to(&mut self, x: f32, y: f32) -> Result<()>;

    fn line_to(&mut self, x: f32, y: f32) -> Result<()>;

    fn quad_to(&mut self, cx: f32, cy: f32, x: f32, y: f32) -> Result<()>;

    /// Cubic segments are optional; receivers that cannot represent them drop them
    fn cubic_to(&mut self, cx0: f32, cy0: f32, cx1: f32, cy1: f32, x: f32, y: f32)
        -> Result<()>;

    fn close(&mut self) -> Result<()>;
}

/// Destination of rasterized coverage
///
/// `x` and `y` are relative to whatever surface the caller set up. Any
/// `FnMut(u32, u32, u8)` closure is a sink.
pub trait PixelSink {
    fn draw_pixel(&mut self, x: u32, y: u32, coverage: u8);
}

impl<F> PixelSink for F
where
    F: FnMut(u32, u32, u8),
{
    #[inline]
    fn draw_pixel(&mut self, x: u32, y: u32, coverage: u8) {
        self(x, y, coverage)
    }
}

/// Your key to font data and glyph geometry
///
/// `size` is always pixels per em. Extents and outline coordinates come back
/// in 26.6 units at that size.
pub trait FontRef: Send + Sync {
    /// Raw font bytes as they live in the file
    fn data(&self) -> &[u8];

    /// Which face inside a collection the data refers to
    fn face_index(&self) -> u32 {
        0
    }

    /// The font's internal coordinate system scale
    fn units_per_em(&self) -> u16;

    /// Find the glyph that represents this character
    fn glyph_id(&self, ch: char) -> Option<GlyphId>;

    /// Bounding box of a glyph, or `None` when the font has no such glyph
    fn glyph_extents(&self, glyph_id: GlyphId, size: f32) -> Option<GlyphExtents>;

    /// Feed the glyph's contours to `sink`
    fn draw_outline(&self, glyph_id: GlyphId, size: f32, sink: &mut dyn OutlineSink)
        -> Result<()>;
}

/// Where characters learn their positions
pub trait Shaper: Send + Sync {
    /// Identify yourself in logs and error messages
    fn name(&self) -> &'static str;

    /// Transform characters into positioned glyphs
    fn shape(
        &self,
        text: &str,
        font: Arc<dyn FontRef>,
        params: &ShapingParams,
    ) -> Result<ShapingResult>;
}

/// Where glyphs become visible
pub trait Renderer: Send + Sync {
    /// Your renderer's signature
    fn name(&self) -> &'static str;

    /// Convert positioned glyphs into a coverage bitmap
    fn render(
        &self,
        shaped: &ShapingResult,
        font: Arc<dyn FontRef>,
        params: &RenderParams,
    ) -> Result<BitmapData>;
}

/// The final step: pixels become files
pub trait Exporter: Send + Sync {
    /// Who are you?
    fn name(&self) -> &'static str;

    /// Encode the rendered bitmap as bytes
    fn export(&self, bitmap: &BitmapData) -> Result<Vec<u8>>;

    /// What file extension should be used?
    fn extension(&self) -> &'static str;

    /// What MIME type identifies your format?
    fn mime_type(&self) -> &'static str;
}
