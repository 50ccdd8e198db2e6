//! Render command implementation

use std::fs;
use std::sync::Arc;

use anyhow::{Context, Result};
use ttr_core::{config, Pipeline, RenderParams};
use ttr_export::ExportFormat;
use ttr_render_cell::CellRenderer;
use ttr_shape_hr::HarfrustShaper;

use crate::cli::RenderArgs;

pub fn run(args: &RenderArgs) -> Result<()> {
    let format = match args.format {
        Some(format) => ExportFormat::from(format),
        None => ExportFormat::from_path(&args.output).with_context(|| {
            format!(
                "cannot infer an image format from {}; pass --format",
                args.output.display()
            )
        })?,
    };

    let font = super::load_font(&args.text)?;
    let shaping_params = super::shaping_params(&args.text)?;
    let render_params = RenderParams {
        padding: args.padding,
        blend: args.blend.into(),
        allocation_policy: args
            .on_alloc_failure
            .map(Into::into)
            .unwrap_or_else(config::default_allocation_policy),
    };

    let pipeline = Pipeline::builder()
        .shaper(Arc::new(HarfrustShaper::new()))
        .renderer(Arc::new(CellRenderer::new()))
        .exporter(Arc::from(format.exporter()))
        .build()?;

    log::debug!(
        "Rendering {:?} at {}px as {:?} ({:?})",
        args.text.text,
        shaping_params.size,
        format,
        render_params
    );
    let bytes = pipeline
        .process(&args.text.text, font, &shaping_params, &render_params)
        .context("rendering failed")?;

    fs::write(&args.output, &bytes)
        .with_context(|| format!("failed to write {}", args.output.display()))?;
    println!("Wrote {} ({} bytes)", args.output.display(), bytes.len());
    Ok(())
}
