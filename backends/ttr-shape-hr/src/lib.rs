//! Text shaping with harfrust
//!
//! harfrust is a pure Rust port of HarfBuzz. It reports glyph positions in
//! font units; this crate scales them to 26.6 fixed point at the requested
//! pixel size, which is the space the cell renderer and its measurement work
//! in.

use std::str::FromStr;
use std::sync::Arc;

use harfrust::{
    Direction as HrDirection, Feature, FontRef as HrFontRef, GlyphBuffer, Language, Script,
    ShaperData, Tag, UnicodeBuffer,
};

use ttr_core::{
    error::{Result, ShapingError},
    fixed::{F26Dot6, SCALE_FACTOR},
    traits::{FontRef, Shaper},
    types::{Direction, ShapedGlyph, ShapingResult},
    ShapingParams,
};

/// Shapes text with harfrust
#[derive(Debug, Default, Clone, Copy)]
pub struct HarfrustShaper;

impl HarfrustShaper {
    pub fn new() -> Self {
        Self
    }

    fn to_hr_direction(dir: Direction) -> HrDirection {
        match dir {
            Direction::LeftToRight => HrDirection::LeftToRight,
            Direction::RightToLeft => HrDirection::RightToLeft,
            Direction::TopToBottom => HrDirection::TopToBottom,
            Direction::BottomToTop => HrDirection::BottomToTop,
        }
    }

    fn from_hr_direction(dir: HrDirection) -> Direction {
        match dir {
            HrDirection::RightToLeft => Direction::RightToLeft,
            HrDirection::TopToBottom => Direction::TopToBottom,
            HrDirection::BottomToTop => Direction::BottomToTop,
            _ => Direction::LeftToRight,
        }
    }

    /// Parse a 4-character tag string into a harfrust Tag
    fn parse_tag(tag_str: &str) -> Option<Tag> {
        let bytes: [u8; 4] = tag_str.as_bytes().try_into().ok()?;
        Some(Tag::new(&bytes))
    }

    fn features(params: &ShapingParams) -> Vec<Feature> {
        params
            .features
            .iter()
            .filter_map(|(name, value)| match Self::parse_tag(name) {
                Some(tag) => Some(Feature {
                    tag,
                    value: *value,
                    start: 0,
                    end: u32::MAX,
                }),
                None => {
                    log::warn!("Ignoring malformed feature tag '{}'", name);
                    None
                },
            })
            .collect()
    }

    fn prepare_buffer(text: &str, params: &ShapingParams) -> UnicodeBuffer {
        let mut buffer = UnicodeBuffer::new();
        buffer.push_str(text);

        if let Some(dir) = params.direction {
            buffer.set_direction(Self::to_hr_direction(dir));
        }
        if let Some(ref lang) = params.language {
            match Language::from_str(lang) {
                Ok(language) => buffer.set_language(language),
                Err(_) => log::warn!("Ignoring unknown language '{}'", lang),
            }
        }
        if let Some(ref script_str) = params.script {
            match Self::parse_tag(script_str).and_then(Script::from_iso15924_tag) {
                Some(script) => buffer.set_script(script),
                None => log::warn!("Ignoring unknown script '{}'", script_str),
            }
        }

        // Fills in whatever the caller left unset
        buffer.guess_segment_properties();
        buffer
    }

    /// Convert harfrust's font-unit positions into 26.6 at `size` pixels per em
    fn extract_glyphs(buffer: &GlyphBuffer, size: f32, upem: u16) -> Vec<ShapedGlyph> {
        let scale = size * SCALE_FACTOR as f32 / upem as f32;
        let to_fixed = |units: i32| F26Dot6::from_raw((units as f32 * scale).round() as i32);

        buffer
            .glyph_infos()
            .iter()
            .zip(buffer.glyph_positions())
            .map(|(info, pos)| ShapedGlyph {
                id: info.glyph_id,
                cluster: info.cluster,
                x_advance: to_fixed(pos.x_advance),
                y_advance: to_fixed(pos.y_advance),
                x_offset: to_fixed(pos.x_offset),
                y_offset: to_fixed(pos.y_offset),
            })
            .collect()
    }
}

impl Shaper for HarfrustShaper {
    fn name(&self) -> &'static str {
        "harfrust"
    }

    fn shape(
        &self,
        text: &str,
        font: Arc<dyn FontRef>,
        params: &ShapingParams,
    ) -> Result<ShapingResult> {
        if text.is_empty() {
            return Ok(ShapingResult {
                glyphs: Vec::new(),
                direction: params.direction.unwrap_or(Direction::LeftToRight),
                size: params.size,
            });
        }

        if !(params.size.is_finite() && params.size > 0.0) {
            return Err(ShapingError::BackendError(format!(
                "Invalid font size {}",
                params.size
            ))
            .into());
        }

        let upem = font.units_per_em();
        if upem == 0 {
            return Err(ShapingError::BackendError("Font reports zero units per em".into()).into());
        }

        let hr_font = HrFontRef::from_index(font.data(), font.face_index())
            .map_err(|e| ShapingError::BackendError(format!("Failed to parse font: {}", e)))?;

        let shaper_data = ShaperData::new(&hr_font);
        let shaper = shaper_data
            .shaper(&hr_font)
            .point_size(Some(params.size))
            .build();

        let buffer = Self::prepare_buffer(text, params);
        let direction = Self::from_hr_direction(buffer.direction());
        let output = shaper.shape(buffer, &Self::features(params));
        let glyphs = Self::extract_glyphs(&output, params.size, upem);

        log::debug!(
            "Shaped {} chars into {} glyphs ({:?}) at {}px",
            text.chars().count(),
            glyphs.len(),
            direction,
            params.size
        );

        Ok(ShapingResult {
            glyphs,
            direction,
            size: params.size,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use ttr_core::{
        traits::OutlineSink,
        types::{GlyphExtents, GlyphId},
    };

    struct TestFont {
        data: Vec<u8>,
        upem: u16,
    }

    impl FontRef for TestFont {
        fn data(&self) -> &[u8] {
            &self.data
        }

        fn units_per_em(&self) -> u16 {
            self.upem
        }

        fn glyph_id(&self, _ch: char) -> Option<GlyphId> {
            None
        }

        fn glyph_extents(&self, _: GlyphId, _: f32) -> Option<GlyphExtents> {
            None
        }

        fn draw_outline(&self, _: GlyphId, _: f32, _: &mut dyn OutlineSink) -> Result<()> {
            Ok(())
        }
    }

    /// A font from `TTR_TEST_FONT` or a common system location
    fn system_font() -> Option<Arc<TestFont>> {
        let candidates = std::env::var_os("TTR_TEST_FONT")
            .map(PathBuf::from)
            .into_iter()
            .chain(
                [
                    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
                    "/usr/share/fonts/TTF/DejaVuSans.ttf",
                    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
                    "/System/Library/Fonts/Supplemental/Arial.ttf",
                    "C:\\Windows\\Fonts\\arial.ttf",
                ]
                .into_iter()
                .map(PathBuf::from),
            );
        for path in candidates {
            if let Ok(data) = std::fs::read(&path) {
                let upem = {
                    use read_fonts::TableProvider;
                    let font = read_fonts::FontRef::new(&data).ok()?;
                    font.head().ok()?.units_per_em()
                };
                return Some(Arc::new(TestFont { data, upem }));
            }
        }
        None
    }

    #[test]
    fn test_empty_text() {
        let font = Arc::new(TestFont {
            data: vec![],
            upem: 1000,
        });
        let result = HarfrustShaper::new()
            .shape("", font, &ShapingParams::default())
            .unwrap();
        assert!(result.glyphs.is_empty());
        assert_eq!(result.direction, Direction::LeftToRight);
        assert_eq!(result.size, 32.0);
    }

    #[test]
    fn test_unparseable_font_is_backend_error() {
        let font = Arc::new(TestFont {
            data: b"definitely not a font".to_vec(),
            upem: 1000,
        });
        let err = HarfrustShaper::new()
            .shape("Hi", font, &ShapingParams::default())
            .unwrap_err();
        assert!(matches!(
            err,
            ttr_core::TtrError::ShapingFailed(ShapingError::BackendError(_))
        ));
    }

    #[test]
    fn test_invalid_size_is_rejected() {
        let font = Arc::new(TestFont {
            data: vec![0; 16],
            upem: 1000,
        });
        let params = ShapingParams {
            size: 0.0,
            ..Default::default()
        };
        assert!(HarfrustShaper::new().shape("Hi", font, &params).is_err());
    }

    #[test]
    fn test_parse_tag() {
        assert!(HarfrustShaper::parse_tag("liga").is_some());
        assert!(HarfrustShaper::parse_tag("lig").is_none());
        assert!(HarfrustShaper::parse_tag("ligatures").is_none());
    }

    #[test]
    fn test_malformed_features_are_dropped() {
        let params = ShapingParams {
            features: vec![("kern".into(), 0), ("x".into(), 1)],
            ..Default::default()
        };
        let features = HarfrustShaper::features(&params);
        assert_eq!(features.len(), 1);
        assert_eq!(features[0].value, 0);
    }

    #[test]
    fn test_direction_round_trip() {
        for dir in [
            Direction::LeftToRight,
            Direction::RightToLeft,
            Direction::TopToBottom,
            Direction::BottomToTop,
        ] {
            let hr = HarfrustShaper::to_hr_direction(dir);
            assert_eq!(HarfrustShaper::from_hr_direction(hr), dir);
        }
    }

    #[test]
    fn test_shape_with_system_font() {
        let Some(font) = system_font() else {
            eprintln!("skipping: no system font found (set TTR_TEST_FONT)");
            return;
        };
        let shaper = HarfrustShaper::new();
        let params = ShapingParams {
            size: 64.0,
            ..Default::default()
        };
        let result = shaper.shape("Hello", font.clone(), &params).unwrap();

        assert_eq!(result.glyphs.len(), 5);
        assert_eq!(result.direction, Direction::LeftToRight);
        for glyph in &result.glyphs {
            assert!(glyph.id > 0);
            assert!(glyph.x_advance > F26Dot6::ZERO);
            assert_eq!(glyph.y_advance, F26Dot6::ZERO);
        }

        // Doubling the size doubles the advances, give or take rounding
        let big = shaper
            .shape(
                "Hello",
                font,
                &ShapingParams {
                    size: 128.0,
                    ..Default::default()
                },
            )
            .unwrap();
        for (small, large) in result.glyphs.iter().zip(&big.glyphs) {
            let diff = large.x_advance.raw() - 2 * small.x_advance.raw();
            assert!(diff.abs() <= 1);
        }
    }

    #[test]
    fn test_rtl_text_is_detected() {
        let Some(font) = system_font() else {
            eprintln!("skipping: no system font found (set TTR_TEST_FONT)");
            return;
        };
        let result = HarfrustShaper::new()
            .shape("שלום", font, &ShapingParams::default())
            .unwrap();
        assert_eq!(result.direction, Direction::RightToLeft);
    }
}
