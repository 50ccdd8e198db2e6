//! ttr core: the shared vocabulary of the text renderer
//!
//! Text goes through three hands before it becomes an image:
//!
//! 1. **Shaping** - characters become glyph ids with 26.6 fixed-point advances
//! 2. **Rendering** - each glyph outline becomes coverage on a grayscale canvas
//! 3. **Export** - the canvas becomes PGM, BMP or PNG bytes
//!
//! This crate holds the types that travel between those stages, the traits
//! backends implement, the fixed-point scale adapter and the error types.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use ttr_core::{Pipeline, RenderParams, ShapingParams};
//! # use ttr_core::traits::*;
//! # fn backends() -> (Arc<dyn Shaper>, Arc<dyn Renderer>, Arc<dyn Exporter>) { unimplemented!() }
//! # fn load_font() -> Arc<dyn FontRef> { unimplemented!() }
//!
//! let (shaper, renderer, exporter) = backends();
//! let pipeline = Pipeline::builder()
//!     .shaper(shaper)
//!     .renderer(renderer)
//!     .exporter(exporter)
//!     .build()?;
//!
//! let bytes = pipeline.process(
//!     "Hello",
//!     load_font(),
//!     &ShapingParams::default(),
//!     &RenderParams::default(),
//! )?;
//! # Ok::<(), ttr_core::TtrError>(())
//! ```

pub mod config;
pub mod error;
pub mod fixed;
pub mod pipeline;
pub mod traits;

pub use config::AllocationPolicy;
pub use error::{Result, TtrError};
pub use fixed::F26Dot6;
pub use pipeline::{Pipeline, PipelineBuilder};
pub use traits::{Exporter, FontRef, OutlineSink, PixelSink, Renderer, Shaper};

/// The data structures that travel between stages
pub mod types {
    use crate::fixed::F26Dot6;

    /// Unique identifier for a glyph within a font
    pub type GlyphId = u32;

    /// Which way the text flows
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum Direction {
        LeftToRight,
        RightToLeft,
        TopToBottom,
        BottomToTop,
    }

    impl Direction {
        pub fn is_horizontal(self) -> bool {
            matches!(self, Direction::LeftToRight | Direction::RightToLeft)
        }

        pub fn is_vertical(self) -> bool {
            !self.is_horizontal()
        }
    }

    /// One shaped glyph with its pen movement, all in 26.6 units
    ///
    /// `y_advance` and `y_offset` follow font convention: positive is up.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ShapedGlyph {
        pub id: GlyphId,
        pub cluster: u32,
        pub x_advance: F26Dot6,
        pub y_advance: F26Dot6,
        pub x_offset: F26Dot6,
        pub y_offset: F26Dot6,
    }

    /// What emerges after shaping
    #[derive(Debug, Clone, PartialEq)]
    pub struct ShapingResult {
        pub glyphs: Vec<ShapedGlyph>,
        pub direction: Direction,
        /// Pixels per em the positions were computed for
        pub size: f32,
    }

    /// Glyph bounding box relative to its origin, in 26.6 units
    ///
    /// `y_bearing` is the top edge; `height` is negative because it extends
    /// downward from there.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct GlyphExtents {
        pub x_bearing: F26Dot6,
        pub y_bearing: F26Dot6,
        pub width: F26Dot6,
        pub height: F26Dot6,
    }

    impl GlyphExtents {
        /// Nothing to draw: zero width or zero height
        pub fn is_degenerate(&self) -> bool {
            self.width == F26Dot6::ZERO || self.height == F26Dot6::ZERO
        }
    }

    /// 8-bit coverage, one byte per pixel, row-major
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct BitmapData {
        pub width: u32,
        pub height: u32,
        pub data: Vec<u8>,
    }

    impl BitmapData {
        /// Coverage at `(x, y)`, `None` outside the bitmap
        pub fn pixel(&self, x: u32, y: u32) -> Option<u8> {
            if x >= self.width || y >= self.height {
                return None;
            }
            self.data.get((y * self.width + x) as usize).copied()
        }
    }
}

/// How shaping should behave
#[derive(Debug, Clone)]
pub struct ShapingParams {
    /// Pixels per em
    pub size: f32,
    /// `None` lets the shaper guess from the text
    pub direction: Option<types::Direction>,
    pub language: Option<String>,
    pub script: Option<String>,
    pub features: Vec<(String, u32)>,
}

impl Default for ShapingParams {
    fn default() -> Self {
        Self {
            size: 32.0,
            direction: None,
            language: None,
            script: None,
            features: Vec::new(),
        }
    }
}

/// How glyph coverage lands on a canvas that already holds pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlendMode {
    /// `min(existing + coverage, 255)`
    #[default]
    Add,
    /// `max(existing, coverage)`
    Max,
    /// Coverage overwrites whatever was there
    Replace,
}

impl BlendMode {
    #[inline]
    pub fn blend(self, existing: u8, coverage: u8) -> u8 {
        match self {
            BlendMode::Add => existing.saturating_add(coverage),
            BlendMode::Max => existing.max(coverage),
            BlendMode::Replace => coverage,
        }
    }
}

impl std::str::FromStr for BlendMode {
    type Err = TtrError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "add" => Ok(BlendMode::Add),
            "max" => Ok(BlendMode::Max),
            "replace" => Ok(BlendMode::Replace),
            other => Err(TtrError::ConfigError(format!("Unknown blend mode '{}'", other))),
        }
    }
}

/// How rendering should look
#[derive(Debug, Clone)]
pub struct RenderParams {
    /// Blank pixels around the measured text on every side
    pub padding: u32,
    pub blend: BlendMode,
    pub allocation_policy: AllocationPolicy,
}

impl Default for RenderParams {
    fn default() -> Self {
        Self {
            padding: 0,
            blend: BlendMode::default(),
            allocation_policy: config::default_allocation_policy(),
        }
    }
}
