//! Fonts for ttr: loading, glyph metrics and outline decomposition
//!
//! Fonts keep their raw bytes and parse a `FontRef` on demand, which keeps
//! [`Font`] free of self-references and lets collections pick a face by index.
//!
//! Sizes handed to [`FontRef`] methods are pixels per em. Outlines are drawn
//! unhinted at `size · 64` pixels per em, so every coordinate arrives in 26.6
//! units, the space the rasterizer's outline builder expects.

use std::fs;
use std::path::Path;

use read_fonts::{FontRef as ReadFontRef, TableProvider};
use skrifa::instance::{LocationRef, Size};
use skrifa::outline::{DrawSettings, OutlinePen};
use skrifa::{GlyphId as SkrifaGlyphId, MetadataProvider};

use ttr_core::{
    error::{FontLoadError, RenderError, Result, TtrError},
    fixed::{F26Dot6, SCALE_FACTOR},
    traits::{FontRef, OutlineSink},
    types::{GlyphExtents, GlyphId},
};

/// A font held in memory
pub struct Font {
    data: Vec<u8>,
    face_index: u32,
    units_per_em: u16,
}

impl Font {
    /// Opens a font file from disk
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_file_index(path, 0)
    }

    /// Opens a specific face from a font file (for TTC collections)
    pub fn from_file_index(path: impl AsRef<Path>, face_index: u32) -> Result<Self> {
        let data = fs::read(path.as_ref())
            .map_err(|_| FontLoadError::FileNotFound(path.as_ref().display().to_string()))?;

        Self::from_data_index(data, face_index)
    }

    pub fn from_data(data: Vec<u8>) -> Result<Self> {
        Self::from_data_index(data, 0)
    }

    /// Validates the bytes and reads `head.unitsPerEm`
    pub fn from_data_index(data: Vec<u8>, face_index: u32) -> Result<Self> {
        let font_ref =
            ReadFontRef::from_index(&data, face_index).map_err(|_| FontLoadError::InvalidData)?;

        let units_per_em = font_ref
            .head()
            .map(|head| head.units_per_em())
            .unwrap_or(1000);

        log::debug!(
            "Loaded face {} ({} bytes, {} units per em)",
            face_index,
            data.len(),
            units_per_em
        );

        Ok(Font {
            data,
            face_index,
            units_per_em,
        })
    }

    fn font_ref(&self) -> Option<ReadFontRef<'_>> {
        ReadFontRef::from_index(&self.data, self.face_index).ok()
    }

    /// The same face as skrifa sees it, for outline access
    fn outline_font(&self) -> Option<skrifa::FontRef<'_>> {
        skrifa::FontRef::from_index(&self.data, self.face_index).ok()
    }

    /// Number of glyphs in `maxp`
    pub fn glyph_count(&self) -> Option<u32> {
        self.font_ref()
            .and_then(|font| font.maxp().ok().map(|maxp| maxp.num_glyphs() as u32))
    }
}

/// Pixels per em scaled so skrifa emits 26.6 units
fn fixed_size(size: f32) -> Option<Size> {
    if size.is_finite() && size > 0.0 {
        Some(Size::new(size * SCALE_FACTOR as f32))
    } else {
        None
    }
}

/// Tracks the control box of everything a glyph draws
struct BoundsPen {
    x_min: f32,
    y_min: f32,
    x_max: f32,
    y_max: f32,
    has_points: bool,
}

impl BoundsPen {
    fn new() -> Self {
        Self {
            x_min: f32::MAX,
            y_min: f32::MAX,
            x_max: f32::MIN,
            y_max: f32::MIN,
            has_points: false,
        }
    }

    fn include(&mut self, x: f32, y: f32) {
        self.x_min = self.x_min.min(x);
        self.y_min = self.y_min.min(y);
        self.x_max = self.x_max.max(x);
        self.y_max = self.y_max.max(y);
        self.has_points = true;
    }

    /// Snap outward to whole 26.6 units; height is negative, origin at top
    fn extents(&self) -> GlyphExtents {
        if !self.has_points {
            return GlyphExtents::default();
        }
        let x_min = self.x_min.floor() as i32;
        let y_min = self.y_min.floor() as i32;
        let x_max = self.x_max.ceil() as i32;
        let y_max = self.y_max.ceil() as i32;
        GlyphExtents {
            x_bearing: F26Dot6::from_raw(x_min),
            y_bearing: F26Dot6::from_raw(y_max),
            width: F26Dot6::from_raw(x_max - x_min),
            height: F26Dot6::from_raw(y_min - y_max),
        }
    }
}

impl OutlinePen for BoundsPen {
    fn move_to(&mut self, x: f32, y: f32) {
        self.include(x, y);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.include(x, y);
    }

    fn quad_to(&mut self, cx0: f32, cy0: f32, x: f32, y: f32) {
        self.include(cx0, cy0);
        self.include(x, y);
    }

    fn curve_to(&mut self, cx0: f32, cy0: f32, cx1: f32, cy1: f32, x: f32, y: f32) {
        self.include(cx0, cy0);
        self.include(cx1, cy1);
        self.include(x, y);
    }

    fn close(&mut self) {}
}

/// Forwards skrifa's infallible pen calls to a fallible [`OutlineSink`]
///
/// The first sink error is kept and every later command is ignored, so a
/// full outline arena stops growing instead of failing once per command.
struct SinkPen<'s> {
    sink: &'s mut dyn OutlineSink,
    error: Option<TtrError>,
}

impl<'s> SinkPen<'s> {
    fn new(sink: &'s mut dyn OutlineSink) -> Self {
        Self { sink, error: None }
    }

    fn record(&mut self, result: Result<()>) {
        if let Err(e) = result {
            self.error = Some(e);
        }
    }

    fn finish(self) -> Result<()> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl OutlinePen for SinkPen<'_> {
    fn move_to(&mut self, x: f32, y: f32) {
        if self.error.is_none() {
            let result = self.sink.move_to(x, y);
            self.record(result);
        }
    }

    fn line_to(&mut self, x: f32, y: f32) {
        if self.error.is_none() {
            let result = self.sink.line_to(x, y);
            self.record(result);
        }
    }

    fn quad_to(&mut self, cx0: f32, cy0: f32, x: f32, y: f32) {
        if self.error.is_none() {
            let result = self.sink.quad_to(cx0, cy0, x, y);
            self.record(result);
        }
    }

    fn curve_to(&mut self, cx0: f32, cy0: f32, cx1: f32, cy1: f32, x: f32, y: f32) {
        if self.error.is_none() {
            let result = self.sink.cubic_to(cx0, cy0, cx1, cy1, x, y);
            self.record(result);
        }
    }

    fn close(&mut self) {
        if self.error.is_none() {
            let result = self.sink.close();
            self.record(result);
        }
    }
}

impl FontRef for Font {
    fn data(&self) -> &[u8] {
        &self.data
    }

    fn face_index(&self) -> u32 {
        self.face_index
    }

    fn units_per_em(&self) -> u16 {
        self.units_per_em
    }

    fn glyph_id(&self, ch: char) -> Option<GlyphId> {
        self.font_ref()
            .and_then(|font| font.cmap().ok()?.map_codepoint(ch).map(|gid| gid.to_u32()))
    }

    fn glyph_extents(&self, glyph_id: GlyphId, size: f32) -> Option<GlyphExtents> {
        let size = fixed_size(size)?;
        let font = self.outline_font()?;
        let outlines = font.outline_glyphs();
        let glyph = outlines.get(SkrifaGlyphId::new(glyph_id))?;

        let mut pen = BoundsPen::new();
        let settings = DrawSettings::unhinted(size, LocationRef::default());
        if let Err(e) = glyph.draw(settings, &mut pen) {
            log::debug!("Glyph {} bounds failed: {:?}", glyph_id, e);
            return None;
        }
        Some(pen.extents())
    }

    fn draw_outline(
        &self,
        glyph_id: GlyphId,
        size: f32,
        sink: &mut dyn OutlineSink,
    ) -> Result<()> {
        let size = fixed_size(size)
            .ok_or_else(|| RenderError::OutlineFailed(format!("invalid size {}", size)))?;
        let font = self.outline_font().ok_or(FontLoadError::InvalidData)?;
        let outlines = font.outline_glyphs();
        let glyph = outlines
            .get(SkrifaGlyphId::new(glyph_id))
            .ok_or(RenderError::GlyphNotFound(glyph_id))?;

        let mut pen = SinkPen::new(sink);
        let settings = DrawSettings::unhinted(size, LocationRef::default());
        glyph
            .draw(settings, &mut pen)
            .map_err(|e| RenderError::OutlineFailed(format!("{:?}", e)))?;
        pen.finish()
    }
}
