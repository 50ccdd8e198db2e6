//! Measure command implementation

use anyhow::{Context, Result};
use ttr_core::traits::Shaper;
use ttr_render_cell::measure;
use ttr_shape_hr::HarfrustShaper;

use crate::cli::MeasureArgs;

pub fn run(args: &MeasureArgs) -> Result<()> {
    let font = super::load_font(&args.text)?;
    let params = super::shaping_params(&args.text)?;

    let shaped = HarfrustShaper::new()
        .shape(&args.text.text, font.clone(), &params)
        .context("shaping failed")?;
    let metrics = measure(&shaped, font.as_ref());

    println!("width: {}", metrics.width);
    println!("height: {}", metrics.height);
    println!("baseline: {}", metrics.baseline);
    Ok(())
}
