//! Shape → Render → Export, wired once and reused

use crate::{
    error::{Result, TtrError},
    traits::{Exporter, FontRef, Renderer, Shaper},
    types::BitmapData,
    RenderParams, ShapingParams,
};
use std::sync::Arc;

/// Pipeline for text rendering: Shape → Render → Export
///
/// ```ignore
/// use ttr_core::Pipeline;
///
/// let pipeline = Pipeline::builder()
///     .shaper(Arc::new(HarfrustShaper::new()))
///     .renderer(Arc::new(CellRenderer::new()))
///     .exporter(Arc::new(PnmExporter::new()))
///     .build()?;
///
/// let bytes = pipeline.process("Hello", font, &shaping_params, &render_params)?;
/// ```
pub struct Pipeline {
    shaper: Arc<dyn Shaper>,
    renderer: Arc<dyn Renderer>,
    exporter: Option<Arc<dyn Exporter>>,
}

impl Pipeline {
    /// Start building a new pipeline
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::new()
    }

    /// Shape and render, stopping before export
    pub fn render(
        &self,
        text: &str,
        font: Arc<dyn FontRef>,
        shaping_params: &ShapingParams,
        render_params: &RenderParams,
    ) -> Result<BitmapData> {
        let shaped = self.shaper.shape(text, font.clone(), shaping_params)?;
        log::debug!(
            "{} shaped {} glyphs, handing to {}",
            self.shaper.name(),
            shaped.glyphs.len(),
            self.renderer.name()
        );
        self.renderer.render(&shaped, font, render_params)
    }

    /// Send text through all stages and get the encoded bytes
    pub fn process(
        &self,
        text: &str,
        font: Arc<dyn FontRef>,
        shaping_params: &ShapingParams,
        render_params: &RenderParams,
    ) -> Result<Vec<u8>> {
        let exporter = self
            .exporter
            .as_ref()
            .ok_or_else(|| TtrError::ConfigError("No exporter configured".into()))?;

        let bitmap = self.render(text, font, shaping_params, render_params)?;
        log::debug!(
            "Exporting {}x{} bitmap as {}",
            bitmap.width,
            bitmap.height,
            exporter.name()
        );
        exporter.export(&bitmap)
    }
}

/// Build pipelines piece by piece
#[derive(Default)]
pub struct PipelineBuilder {
    shaper: Option<Arc<dyn Shaper>>,
    renderer: Option<Arc<dyn Renderer>>,
    exporter: Option<Arc<dyn Exporter>>,
}

impl PipelineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Choose who turns characters into glyphs
    pub fn shaper(mut self, shaper: Arc<dyn Shaper>) -> Self {
        self.shaper = Some(shaper);
        self
    }

    /// Choose who turns glyphs into pixels
    pub fn renderer(mut self, renderer: Arc<dyn Renderer>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    /// Choose who packages the final output
    pub fn exporter(mut self, exporter: Arc<dyn Exporter>) -> Self {
        self.exporter = Some(exporter);
        self
    }

    /// Create the pipeline; shaper and renderer are mandatory
    pub fn build(self) -> Result<Pipeline> {
        let shaper = self
            .shaper
            .ok_or_else(|| TtrError::ConfigError("No shaper configured".into()))?;
        let renderer = self
            .renderer
            .ok_or_else(|| TtrError::ConfigError("No renderer configured".into()))?;

        Ok(Pipeline {
            shaper,
            renderer,
            exporter: self.exporter,
        })
    }
}
