//! How much room a shaped run needs

use ttr_core::{
    fixed::F26Dot6,
    traits::FontRef,
    types::{Direction, GlyphExtents, ShapingResult},
};

/// Pixel size of a run and where its baseline sits
///
/// For horizontal runs `baseline` is the distance from the top edge down to
/// the baseline; for vertical runs it is the distance from the left edge to
/// the vertical origin line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextMetrics {
    pub width: u32,
    pub height: u32,
    pub baseline: u32,
}

/// Union of all glyph boxes, in 26.6 units with y pointing up
///
/// The box always contains the run's origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InkBounds {
    pub x_min: F26Dot6,
    pub x_max: F26Dot6,
    pub y_min: F26Dot6,
    pub y_max: F26Dot6,
}

impl InkBounds {
    fn include(&mut self, origin_x: F26Dot6, origin_y: F26Dot6, extents: &GlyphExtents) {
        let left = origin_x + extents.x_bearing;
        let top = origin_y + extents.y_bearing;
        self.x_min = self.x_min.min(left);
        self.x_max = self.x_max.max(left + extents.width);
        self.y_min = self.y_min.min(top + extents.height);
        self.y_max = self.y_max.max(top);
    }

    /// Whole pixels of ink ahead of the pen's start on the main axis
    ///
    /// Left of the origin for horizontal runs, above it for vertical ones.
    /// Starting the pen this far in keeps that ink on a canvas sized by
    /// [`measure`].
    pub fn leading_overhang(&self, direction: Direction) -> i32 {
        if direction.is_vertical() {
            self.y_max.round_div()
        } else {
            (-self.x_min).round_div()
        }
    }
}

/// Walk the run and collect the box covered by every glyph with extents
pub fn ink_bounds(shaped: &ShapingResult, font: &dyn FontRef) -> InkBounds {
    let mut bounds = InkBounds::default();
    let mut cursor_x = F26Dot6::ZERO;
    let mut cursor_y = F26Dot6::ZERO;

    for glyph in &shaped.glyphs {
        if let Some(extents) = font.glyph_extents(glyph.id, shaped.size) {
            bounds.include(
                cursor_x + glyph.x_offset,
                cursor_y + glyph.y_offset,
                &extents,
            );
        }
        cursor_x += glyph.x_advance;
        cursor_y += glyph.y_advance;
    }

    bounds
}

/// Measure a shaped run: pixel width, height and baseline position
pub fn measure(shaped: &ShapingResult, font: &dyn FontRef) -> TextMetrics {
    let bounds = ink_bounds(shaped, font);
    let width = (bounds.x_max - bounds.x_min).ceil_div();
    let height = (bounds.y_max - bounds.y_min).ceil_div();
    let baseline = if shaped.direction.is_vertical() {
        (-bounds.x_min).round_div()
    } else {
        bounds.y_max.round_div()
    };

    let metrics = TextMetrics {
        width: width.max(0) as u32,
        height: height.max(0) as u32,
        baseline: baseline.max(0) as u32,
    };
    log::debug!(
        "Measured {} glyphs: {}x{}, baseline {}",
        shaped.glyphs.len(),
        metrics.width,
        metrics.height,
        metrics.baseline
    );
    metrics
}
