//! Error types for ttr

use thiserror::Error;

pub type Result<T> = std::result::Result<T, TtrError>;

/// Main error type for ttr
#[derive(Debug, Error)]
pub enum TtrError {
    #[error("Font loading failed: {0}")]
    FontLoad(#[from] FontLoadError),

    #[error("Shaping failed: {0}")]
    ShapingFailed(#[from] ShapingError),

    #[error("Rendering failed: {0}")]
    RenderingFailed(#[from] RenderError),

    #[error("Export failed: {0}")]
    ExportFailed(#[from] ExportError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Other error: {0}")]
    Other(String),
}

impl TtrError {
    /// True when the error is an exhausted outline sequence or cell grid
    pub fn is_allocation_failure(&self) -> bool {
        matches!(
            self,
            TtrError::RenderingFailed(RenderError::AllocationFailure { .. })
        )
    }
}

/// Font loading errors
#[derive(Debug, Error)]
pub enum FontLoadError {
    #[error("Font file not found: {0}")]
    FileNotFound(String),

    #[error("Invalid font data")]
    InvalidData,

    #[error("Font not supported: {0}")]
    NotSupported(String),
}

/// Shaping errors
#[derive(Debug, Error)]
pub enum ShapingError {
    #[error("Invalid text input")]
    InvalidText,

    #[error("Backend error: {0}")]
    BackendError(String),
}

/// Rendering errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// A grow-only outline sequence or the cell grid could not be extended
    #[error("Allocation failed: {what} cannot grow to {requested} elements")]
    AllocationFailure {
        what: &'static str,
        requested: usize,
    },

    #[error("Invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("Glyph {0} not found")]
    GlyphNotFound(u32),

    #[error("Outline decomposition failed: {0}")]
    OutlineFailed(String),
}

/// Export errors
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Format not supported: {0}")]
    FormatNotSupported(String),

    #[error("Encoding failed: {0}")]
    EncodingFailed(String),
}
