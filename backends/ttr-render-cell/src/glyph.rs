//! One glyph, start to finish: outline, cells, coverage

use ttr_core::{
    error::Result,
    fixed::{scale_down, F26Dot6},
    traits::{FontRef, PixelSink},
    types::{GlyphExtents, GlyphId},
};

use crate::coverage::integrate;
use crate::outline::Outline;
use crate::raster::{rasterize_outline, Raster, Transform};

/// What happened while rendering a glyph
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlyphStats {
    /// Mask size in pixels
    pub width: u32,
    pub height: u32,
    /// Deepest curve subdivision stack
    pub tessellation_depth: usize,
    pub dropped_cubics: usize,
}

/// Render one glyph's coverage mask into `sink`
///
/// `frac_x` and `frac_y` are the sub-pixel part of the glyph's placement in
/// 1/64 pixel units. The mask covers the glyph's bounding box shifted by that
/// fraction, `ceil(frac_x + width) × ceil(frac_y - height)` pixels, with its
/// origin at the box's top-left pixel; coordinates handed to `sink` are
/// relative to that corner.
///
/// Degenerate glyphs (zero width or height) return `Ok(None)` without
/// touching the font or the sink.
pub fn render_glyph<S: PixelSink + ?Sized>(
    font: &dyn FontRef,
    glyph_id: GlyphId,
    size: f32,
    extents: &GlyphExtents,
    frac_x: i32,
    frac_y: i32,
    sink: &mut S,
) -> Result<Option<GlyphStats>> {
    if extents.is_degenerate() {
        log::trace!("Glyph {} has empty extents, nothing to draw", glyph_id);
        return Ok(None);
    }

    // The sub-pixel shift pushes the far edges right and down
    let width = (F26Dot6::from_raw(frac_x) + extents.width).ceil_div();
    let height = (F26Dot6::from_raw(frac_y) - extents.height).ceil_div();
    if width <= 0 || height <= 0 {
        log::debug!(
            "Glyph {} has inverted extents {}x{}, skipping",
            glyph_id,
            width,
            height
        );
        return Ok(None);
    }
    let (width, height) = (width as u32, height as u32);

    let mut outline = Outline::new()?;
    font.draw_outline(glyph_id, size, &mut outline)?;

    let transform = Transform([
        1.0,
        0.0,
        0.0,
        -1.0,
        scale_down((frac_x - extents.x_bearing.raw()) as f32),
        scale_down((frac_y + extents.y_bearing.raw()) as f32),
    ]);

    let mut raster = Raster::new(width, height)?;
    let tessellation_depth = rasterize_outline(&mut outline, &transform, &mut raster)?;
    integrate(&raster, sink);

    log::trace!(
        "Glyph {}: {}x{} mask, {} points, {} lines, depth {}",
        glyph_id,
        width,
        height,
        outline.points().len(),
        outline.lines().len(),
        tessellation_depth
    );

    Ok(Some(GlyphStats {
        width,
        height,
        tessellation_depth,
        dropped_cubics: outline.dropped_cubics(),
    }))
}
