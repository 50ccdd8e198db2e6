//! Placing glyph masks on a shared canvas
//!
//! The compositor keeps a 26.6 cursor, splits every glyph's placement into a
//! whole-pixel offset and a sub-pixel fraction, renders the glyph with the
//! fraction baked into its outline transform, and routes the resulting
//! coverage through a clipping sink that adds the whole-pixel offset.

use ttr_core::{
    config::{self, AllocationPolicy},
    error::{RenderError, Result},
    fixed::F26Dot6,
    traits::{FontRef, PixelSink},
    types::{BitmapData, ShapingResult},
    BlendMode,
};

use crate::glyph::render_glyph;
use crate::layout::measure;

/// Largest canvas side accepted
pub const MAX_CANVAS_SIDE: u32 = u16::MAX as u32;

/// An owned 8-bit canvas that blends incoming coverage
#[derive(Debug, Clone)]
pub struct GrayCanvas {
    width: u32,
    height: u32,
    data: Vec<u8>,
    blend: BlendMode,
}

impl GrayCanvas {
    /// Blank canvas; each side must be in `1..=MAX_CANVAS_SIDE`
    pub fn new(width: u32, height: u32, blend: BlendMode) -> Result<Self> {
        if width == 0 || height == 0 || width > MAX_CANVAS_SIDE || height > MAX_CANVAS_SIDE {
            return Err(RenderError::InvalidDimensions { width, height }.into());
        }
        let len = width as usize * height as usize;
        let mut data = Vec::new();
        data.try_reserve_exact(len)
            .map_err(|_| RenderError::AllocationFailure {
                what: "canvas",
                requested: len,
            })?;
        data.resize(len, 0);
        Ok(Self {
            width,
            height,
            data,
            blend,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<u8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.data
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    pub fn into_bitmap(self) -> BitmapData {
        BitmapData {
            width: self.width,
            height: self.height,
            data: self.data,
        }
    }
}

impl PixelSink for GrayCanvas {
    fn draw_pixel(&mut self, x: u32, y: u32, coverage: u8) {
        if x >= self.width || y >= self.height {
            return;
        }
        let index = y as usize * self.width as usize + x as usize;
        if let Some(px) = self.data.get_mut(index) {
            *px = self.blend.blend(*px, coverage);
        }
    }
}

/// Shifts glyph-local coordinates onto the canvas and drops what falls outside
struct ClipSink<'s, S: ?Sized> {
    inner: &'s mut S,
    offset_x: i64,
    offset_y: i64,
    width: u32,
    height: u32,
}

impl<S: PixelSink + ?Sized> PixelSink for ClipSink<'_, S> {
    #[inline]
    fn draw_pixel(&mut self, x: u32, y: u32, coverage: u8) {
        let cx = x as i64 + self.offset_x;
        let cy = y as i64 + self.offset_y;
        if cx < 0 || cy < 0 || cx >= self.width as i64 || cy >= self.height as i64 {
            return;
        }
        self.inner.draw_pixel(cx as u32, cy as u32, coverage);
    }
}

/// Counts from one compositing pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CompositeReport {
    /// Glyphs whose masks reached the sink
    pub drawn: usize,
    /// Glyphs with zero width or height
    pub empty: usize,
    /// Glyphs the font has no extents for
    pub missing: usize,
    /// Glyphs dropped after an allocation failure
    pub skipped: usize,
}

/// Draws shaped runs with one font
pub struct Compositor<'f> {
    font: &'f dyn FontRef,
    policy: AllocationPolicy,
}

impl<'f> Compositor<'f> {
    /// Starts with the process-wide default allocation policy
    pub fn new(font: &'f dyn FontRef) -> Self {
        Self {
            font,
            policy: config::default_allocation_policy(),
        }
    }

    /// Choose what happens when a glyph cannot be allocated
    pub fn with_policy(mut self, policy: AllocationPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Draw `shaped` with its pen starting at `origin`, clipped to `bounds`
    ///
    /// The run's baseline is measured first so the cursor starts on it; on
    /// the main axis the pen starts exactly at `origin`, so ink ahead of it
    /// (see [`InkBounds::leading_overhang`](crate::layout::InkBounds::leading_overhang))
    /// lands before `origin`. Glyphs without extents draw nothing but still
    /// advance the pen. Every coordinate reaching `sink` lies inside `bounds`.
    pub fn draw_with_sink<S: PixelSink + ?Sized>(
        &self,
        shaped: &ShapingResult,
        origin: (i32, i32),
        bounds: (u32, u32),
        sink: &mut S,
    ) -> Result<CompositeReport> {
        let mut report = CompositeReport::default();
        let metrics = measure(shaped, self.font);
        let baseline = metrics.baseline as i32;
        let vertical = shaped.direction.is_vertical();

        let mut cursor_x =
            F26Dot6::from_int(origin.0.saturating_add(if vertical { baseline } else { 0 }));
        let mut cursor_y =
            F26Dot6::from_int(origin.1.saturating_add(if vertical { 0 } else { baseline }));

        for glyph in &shaped.glyphs {
            let Some(extents) = self.font.glyph_extents(glyph.id, shaped.size) else {
                log::debug!("No extents for glyph {}, skipping", glyph.id);
                report.missing += 1;
                cursor_x += glyph.x_advance;
                cursor_y = cursor_y - glyph.y_advance;
                continue;
            };

            // Canvas y points down, font y points up
            let start_x = cursor_x + glyph.x_offset + extents.x_bearing;
            let start_y = cursor_y - glyph.y_offset - extents.y_bearing;

            let mut clip = ClipSink {
                inner: &mut *sink,
                offset_x: start_x.floor_div() as i64,
                offset_y: start_y.floor_div() as i64,
                width: bounds.0,
                height: bounds.1,
            };

            match render_glyph(
                self.font,
                glyph.id,
                shaped.size,
                &extents,
                start_x.frac(),
                start_y.frac(),
                &mut clip,
            ) {
                Ok(Some(stats)) => {
                    report.drawn += 1;
                    if stats.dropped_cubics > 0 {
                        log::debug!(
                            "Glyph {} lost {} cubic segments",
                            glyph.id,
                            stats.dropped_cubics
                        );
                    }
                },
                Ok(None) => report.empty += 1,
                Err(e) if e.is_allocation_failure() => match self.policy {
                    AllocationPolicy::SkipGlyph => {
                        log::warn!("Skipping glyph {}: {}", glyph.id, e);
                        report.skipped += 1;
                    },
                    AllocationPolicy::AbortRender => return Err(e),
                },
                Err(e) => return Err(e),
            }

            cursor_x += glyph.x_advance;
            cursor_y = cursor_y - glyph.y_advance;
        }

        log::debug!(
            "Composited {} glyphs ({} empty, {} missing, {} skipped)",
            report.drawn,
            report.empty,
            report.missing,
            report.skipped
        );
        Ok(report)
    }

    /// Draw onto an owned canvas, blending with its configured mode
    pub fn draw_on_canvas(
        &self,
        shaped: &ShapingResult,
        origin: (i32, i32),
        canvas: &mut GrayCanvas,
    ) -> Result<CompositeReport> {
        let bounds = (canvas.width(), canvas.height());
        self.draw_with_sink(shaped, origin, bounds, canvas)
    }
}
