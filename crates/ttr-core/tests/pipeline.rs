use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use ttr_core::traits::{Exporter, FontRef, OutlineSink, Renderer, Shaper};
use ttr_core::{
    types::{BitmapData, Direction, GlyphExtents, GlyphId, ShapedGlyph, ShapingResult},
    F26Dot6, Pipeline, RenderParams, Result, ShapingParams, TtrError,
};

struct TestFont;

impl FontRef for TestFont {
    fn data(&self) -> &[u8] {
        b"font"
    }

    fn units_per_em(&self) -> u16 {
        1000
    }

    fn glyph_id(&self, _ch: char) -> Option<GlyphId> {
        Some(1)
    }

    fn glyph_extents(&self, _glyph_id: GlyphId, _size: f32) -> Option<GlyphExtents> {
        None
    }

    fn draw_outline(
        &self,
        _glyph_id: GlyphId,
        _size: f32,
        _sink: &mut dyn OutlineSink,
    ) -> Result<()> {
        Ok(())
    }
}

struct CountingShaper {
    calls: Arc<AtomicUsize>,
}

impl Shaper for CountingShaper {
    fn name(&self) -> &'static str {
        "counting-shaper"
    }

    fn shape(
        &self,
        text: &str,
        _font: Arc<dyn FontRef>,
        params: &ShapingParams,
    ) -> Result<ShapingResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let glyphs = text
            .chars()
            .enumerate()
            .map(|(i, _)| ShapedGlyph {
                id: 1,
                cluster: i as u32,
                x_advance: F26Dot6::from_int(10),
                y_advance: F26Dot6::ZERO,
                x_offset: F26Dot6::ZERO,
                y_offset: F26Dot6::ZERO,
            })
            .collect();
        Ok(ShapingResult {
            glyphs,
            direction: Direction::LeftToRight,
            size: params.size,
        })
    }
}

struct WidthRenderer;

impl Renderer for WidthRenderer {
    fn name(&self) -> &'static str {
        "width-renderer"
    }

    fn render(
        &self,
        shaped: &ShapingResult,
        _font: Arc<dyn FontRef>,
        _params: &RenderParams,
    ) -> Result<BitmapData> {
        let width = shaped.glyphs.len() as u32;
        Ok(BitmapData {
            width,
            height: 1,
            data: vec![255; width as usize],
        })
    }
}

struct LenExporter;

impl Exporter for LenExporter {
    fn name(&self) -> &'static str {
        "len"
    }

    fn export(&self, bitmap: &BitmapData) -> Result<Vec<u8>> {
        Ok(vec![bitmap.width as u8, bitmap.height as u8])
    }

    fn extension(&self) -> &'static str {
        "len"
    }

    fn mime_type(&self) -> &'static str {
        "application/octet-stream"
    }
}

#[test]
fn pipeline_chains_all_three_stages() {
    let calls = Arc::new(AtomicUsize::new(0));
    let pipeline = Pipeline::builder()
        .shaper(Arc::new(CountingShaper {
            calls: calls.clone(),
        }))
        .renderer(Arc::new(WidthRenderer))
        .exporter(Arc::new(LenExporter))
        .build()
        .unwrap();

    let bytes = pipeline
        .process(
            "abc",
            Arc::new(TestFont),
            &ShapingParams::default(),
            &RenderParams::default(),
        )
        .unwrap();

    assert_eq!(bytes, vec![3, 1]);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn pipeline_without_exporter_can_still_render() {
    let pipeline = Pipeline::builder()
        .shaper(Arc::new(CountingShaper {
            calls: Arc::new(AtomicUsize::new(0)),
        }))
        .renderer(Arc::new(WidthRenderer))
        .build()
        .unwrap();

    let bitmap = pipeline
        .render(
            "ab",
            Arc::new(TestFont),
            &ShapingParams::default(),
            &RenderParams::default(),
        )
        .unwrap();
    assert_eq!(bitmap.width, 2);

    let err = pipeline
        .process(
            "ab",
            Arc::new(TestFont),
            &ShapingParams::default(),
            &RenderParams::default(),
        )
        .unwrap_err();
    assert!(matches!(err, TtrError::ConfigError(_)));
}

#[test]
fn builder_requires_shaper_and_renderer() {
    let err = Pipeline::builder()
        .renderer(Arc::new(WidthRenderer))
        .build()
        .err()
        .unwrap();
    assert!(matches!(err, TtrError::ConfigError(_)));

    let err = Pipeline::builder()
        .shaper(Arc::new(CountingShaper {
            calls: Arc::new(AtomicUsize::new(0)),
        }))
        .build()
        .err()
        .unwrap();
    assert!(matches!(err, TtrError::ConfigError(_)));
}
