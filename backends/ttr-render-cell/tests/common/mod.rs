//! Synthetic fonts for exercising the renderer without font files

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use ttr_core::{
    error::Result,
    fixed::F26Dot6,
    traits::{FontRef, OutlineSink},
    types::{Direction, GlyphExtents, GlyphId, ShapedGlyph, ShapingResult},
};

/// Outline commands in 26.6 units, y up
#[derive(Debug, Clone)]
pub enum Cmd {
    Move(f32, f32),
    Line(f32, f32),
    Quad(f32, f32, f32, f32),
    Cubic(f32, f32, f32, f32, f32, f32),
    Close,
    /// Emits this many `line_to` calls in a zigzag
    Flood(usize),
}

pub struct TestGlyph {
    pub extents: GlyphExtents,
    pub commands: Vec<Cmd>,
}

#[derive(Default)]
pub struct TestFont {
    glyphs: HashMap<GlyphId, TestGlyph>,
    pub draw_calls: AtomicUsize,
}

impl TestFont {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_glyph(mut self, id: GlyphId, glyph: TestGlyph) -> Self {
        self.glyphs.insert(id, glyph);
        self
    }

    pub fn glyph_extents_for(&self, id: GlyphId) -> GlyphExtents {
        self.glyphs[&id].extents
    }

    pub fn draws(&self) -> usize {
        self.draw_calls.load(Ordering::SeqCst)
    }
}

impl FontRef for TestFont {
    fn data(&self) -> &[u8] {
        &[]
    }

    fn units_per_em(&self) -> u16 {
        1000
    }

    fn glyph_id(&self, _ch: char) -> Option<GlyphId> {
        None
    }

    fn glyph_extents(&self, glyph_id: GlyphId, _size: f32) -> Option<GlyphExtents> {
        self.glyphs.get(&glyph_id).map(|g| g.extents)
    }

    fn draw_outline(&self, glyph_id: GlyphId, _size: f32, sink: &mut dyn OutlineSink) -> Result<()> {
        self.draw_calls.fetch_add(1, Ordering::SeqCst);
        let Some(glyph) = self.glyphs.get(&glyph_id) else {
            return Ok(());
        };
        for cmd in &glyph.commands {
            match *cmd {
                Cmd::Move(x, y) => sink.move_to(x, y)?,
                Cmd::Line(x, y) => sink.line_to(x, y)?,
                Cmd::Quad(cx, cy, x, y) => sink.quad_to(cx, cy, x, y)?,
                Cmd::Cubic(a, b, c, d, x, y) => sink.cubic_to(a, b, c, d, x, y)?,
                Cmd::Close => sink.close()?,
                Cmd::Flood(n) => {
                    for i in 0..n {
                        sink.line_to((i % 2) as f32 * 64.0, 64.0)?;
                    }
                },
            }
        }
        Ok(())
    }
}

pub fn px(v: i32) -> F26Dot6 {
    F26Dot6::from_int(v)
}

/// A filled `w × h` pixel rectangle sitting on the baseline
pub fn rect_glyph(w: i32, h: i32) -> TestGlyph {
    let (fw, fh) = ((w * 64) as f32, (h * 64) as f32);
    TestGlyph {
        extents: GlyphExtents {
            x_bearing: F26Dot6::ZERO,
            y_bearing: px(h),
            width: px(w),
            height: px(-h),
        },
        commands: vec![
            Cmd::Move(0.0, 0.0),
            Cmd::Line(fw, 0.0),
            Cmd::Line(fw, fh),
            Cmd::Line(0.0, fh),
            Cmd::Close,
        ],
    }
}

/// A glyph with zero width, like a space that still carries commands
pub fn empty_glyph() -> TestGlyph {
    let mut glyph = rect_glyph(4, 4);
    glyph.extents.width = F26Dot6::ZERO;
    glyph
}

/// A glyph whose outline overflows the point arena
pub fn flood_glyph() -> TestGlyph {
    let mut glyph = rect_glyph(2, 2);
    glyph.commands = vec![Cmd::Move(0.0, 0.0), Cmd::Flood(70_000), Cmd::Close];
    glyph
}

pub fn shaped_glyph(id: GlyphId, x_advance: i32) -> ShapedGlyph {
    ShapedGlyph {
        id,
        cluster: 0,
        x_advance: px(x_advance),
        y_advance: F26Dot6::ZERO,
        x_offset: F26Dot6::ZERO,
        y_offset: F26Dot6::ZERO,
    }
}

pub fn run(glyphs: Vec<ShapedGlyph>) -> ShapingResult {
    ShapingResult {
        glyphs,
        direction: Direction::LeftToRight,
        size: 16.0,
    }
}
