//! Cell: a signed-area rasterizer for glyph outlines
//!
//! Outlines go in as move/line/quad/close commands, grayscale coverage comes
//! out. The stages, in order:
//!
//! - [`outline`] collects points, lines and quadratic curves into a `u16` arena
//! - [`curves`] flattens the curves into lines on a bounded stack
//! - [`raster`] walks each line through a cell grid, accumulating area and cover
//! - [`coverage`] integrates the grid into 0–255 coverage, one pixel at a time
//! - [`glyph`] runs the four stages above for a single glyph
//! - [`compositor`] places each glyph on a canvas with clipping and blending
//! - [`layout`] measures a run so the canvas can be sized to fit
//!
//! [`CellRenderer`] ties them together behind the [`Renderer`] trait.

pub mod compositor;
pub mod coverage;
pub mod curves;
pub mod glyph;
pub mod layout;
pub mod outline;
pub mod raster;

use std::sync::Arc;

use ttr_core::{
    error::{RenderError, Result},
    traits::{FontRef, Renderer},
    types::{BitmapData, ShapingResult},
    RenderParams,
};

pub use compositor::{CompositeReport, Compositor, GrayCanvas, MAX_CANVAS_SIDE};
pub use layout::{measure, TextMetrics};

/// Renders shaped runs onto a canvas sized to fit them
#[derive(Debug, Default, Clone, Copy)]
pub struct CellRenderer;

impl CellRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for CellRenderer {
    fn name(&self) -> &'static str {
        "cell"
    }

    fn render(
        &self,
        shaped: &ShapingResult,
        font: Arc<dyn FontRef>,
        params: &RenderParams,
    ) -> Result<BitmapData> {
        if shaped.glyphs.is_empty() {
            log::debug!("Empty run, returning a blank 1x1 bitmap");
            return Ok(BitmapData {
                width: 1,
                height: 1,
                data: vec![0],
            });
        }

        let metrics = measure(shaped, font.as_ref());
        let bounds = layout::ink_bounds(shaped, font.as_ref());
        let margins = params.padding.saturating_mul(2);
        let width = metrics.width.max(1).saturating_add(margins);
        let height = metrics.height.max(1).saturating_add(margins);
        if width > MAX_CANVAS_SIDE || height > MAX_CANVAS_SIDE {
            return Err(RenderError::InvalidDimensions { width, height }.into());
        }

        let mut canvas = GrayCanvas::new(width, height, params.blend)?;
        // Start the pen past any ink that overhangs it so the measured box
        // lands at (padding, padding)
        let pad = params.padding as i32;
        let overhang = bounds.leading_overhang(shaped.direction);
        let origin = if shaped.direction.is_vertical() {
            (pad, pad.saturating_add(overhang))
        } else {
            (pad.saturating_add(overhang), pad)
        };
        let report = Compositor::new(font.as_ref())
            .with_policy(params.allocation_policy)
            .draw_on_canvas(shaped, origin, &mut canvas)?;

        if report.skipped > 0 {
            log::warn!(
                "{} of {} glyphs were left out of the render",
                report.skipped,
                shaped.glyphs.len()
            );
        }
        Ok(canvas.into_bitmap())
    }
}
