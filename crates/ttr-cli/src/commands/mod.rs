//! Command implementations

pub mod measure;
pub mod render;

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use ttr_core::{traits::FontRef, ShapingParams};
use ttr_fontdb::Font;

use crate::cli::TextArgs;

fn load_font(args: &TextArgs) -> Result<Arc<dyn FontRef>> {
    let font = Font::from_file_index(&args.font, args.face_index)
        .with_context(|| format!("failed to load font {}", args.font.display()))?;
    Ok(Arc::new(font))
}

fn shaping_params(args: &TextArgs) -> Result<ShapingParams> {
    if !(args.size.is_finite() && args.size > 0.0) {
        bail!("font size must be a positive number, got {}", args.size);
    }
    let features = match args.features {
        Some(ref list) => parse_features(list)?,
        None => Vec::new(),
    };
    Ok(ShapingParams {
        size: args.size,
        direction: args.direction.map(Into::into),
        language: args.language.clone(),
        script: args.script.clone(),
        features,
    })
}

/// Parse `kern,-liga,+dlig,ss01=2` into (tag, value) pairs
fn parse_features(list: &str) -> Result<Vec<(String, u32)>> {
    let mut features = Vec::new();
    for item in list.split([',', ' ']).map(str::trim).filter(|s| !s.is_empty()) {
        let (tag, value) = if let Some(tag) = item.strip_prefix('-') {
            (tag, 0)
        } else if let Some(tag) = item.strip_prefix('+') {
            (tag, 1)
        } else if let Some((tag, value)) = item.split_once('=') {
            let value = value
                .parse()
                .with_context(|| format!("invalid value in feature '{}'", item))?;
            (tag, value)
        } else {
            (item, 1)
        };
        if tag.len() != 4 || !tag.is_ascii() {
            bail!("feature tag '{}' must be four ASCII characters", tag);
        }
        features.push((tag.to_string(), value));
    }
    Ok(features)
}
