//! CLI argument definitions using Clap v4

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use ttr_core::{types::Direction, AllocationPolicy, BlendMode};
use ttr_export::ExportFormat;

/// ttr - anti-aliased text rendering from the command line
#[derive(Parser, Debug)]
#[command(name = "ttr")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Log at debug level (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render text to an image file
    #[command(alias = "r")]
    Render(RenderArgs),

    /// Print the pixel size and baseline the text would occupy
    #[command(alias = "m")]
    Measure(MeasureArgs),
}

/// Options shared by every command that shapes text
#[derive(Args, Debug)]
pub struct TextArgs {
    /// Font file path (.ttf, .otf, .ttc)
    pub font: PathBuf,

    /// Text to shape
    pub text: String,

    /// Face index for TTC collections
    #[arg(short = 'y', long = "face-index", default_value_t = 0)]
    pub face_index: u32,

    /// Font size in pixels per em
    #[arg(short, long, default_value_t = 32.0)]
    pub size: f32,

    /// Text direction; guessed from the text when omitted
    #[arg(short, long, value_enum)]
    pub direction: Option<DirectionArg>,

    /// Language tag (BCP 47), e.g. en, ar
    #[arg(short, long)]
    pub language: Option<String>,

    /// Script tag (ISO 15924), e.g. Latn, Arab
    #[arg(short = 'S', long)]
    pub script: Option<String>,

    /// Font features, comma separated: kern, -liga, ss01=1
    #[arg(short = 'F', long)]
    pub features: Option<String>,
}

#[derive(Args, Debug)]
pub struct RenderArgs {
    #[command(flatten)]
    pub text: TextArgs,

    /// Output file
    #[arg(short, long, default_value = "output.bmp")]
    pub output: PathBuf,

    /// Output format; inferred from the output extension when omitted
    #[arg(long, value_enum)]
    pub format: Option<FormatArg>,

    /// How overlapping glyphs combine
    #[arg(long, value_enum, default_value_t = BlendArg::Add)]
    pub blend: BlendArg,

    /// What to do when a glyph outline is too large to rasterize;
    /// defaults to TTR_ALLOC_POLICY or skip
    #[arg(long = "on-alloc-failure", value_enum)]
    pub on_alloc_failure: Option<PolicyArg>,

    /// Blank pixels around the text
    #[arg(short, long, default_value_t = 0)]
    pub padding: u32,
}

#[derive(Args, Debug)]
pub struct MeasureArgs {
    #[command(flatten)]
    pub text: TextArgs,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum DirectionArg {
    Ltr,
    Rtl,
    Ttb,
    Btt,
}

impl From<DirectionArg> for Direction {
    fn from(arg: DirectionArg) -> Self {
        match arg {
            DirectionArg::Ltr => Direction::LeftToRight,
            DirectionArg::Rtl => Direction::RightToLeft,
            DirectionArg::Ttb => Direction::TopToBottom,
            DirectionArg::Btt => Direction::BottomToTop,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormatArg {
    Pgm,
    Bmp,
    Png,
}

impl From<FormatArg> for ExportFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Pgm => ExportFormat::Pgm,
            FormatArg::Bmp => ExportFormat::Bmp,
            FormatArg::Png => ExportFormat::Png,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlendArg {
    Add,
    Max,
    Replace,
}

impl From<BlendArg> for BlendMode {
    fn from(arg: BlendArg) -> Self {
        match arg {
            BlendArg::Add => BlendMode::Add,
            BlendArg::Max => BlendMode::Max,
            BlendArg::Replace => BlendMode::Replace,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum PolicyArg {
    Skip,
    Abort,
}

impl From<PolicyArg> for AllocationPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Skip => AllocationPolicy::SkipGlyph,
            PolicyArg::Abort => AllocationPolicy::AbortRender,
        }
    }
}
