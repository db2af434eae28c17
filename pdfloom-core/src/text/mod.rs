pub mod encoding;
mod font;
mod layout;
mod metrics;
mod split;

pub use encoding::{encode_win_ansi, pdf_text_literal};
pub use font::{Font, FontStyle, STANDARD_FONTS};
pub use layout::{
    Baseline, RenderingMode, RotationDirection, TextAlign, TextBlock, TextContent, TextLayoutEngine,
    TextOptions, TextStateUse, TextStyle,
};
pub use metrics::{metrics_for, FontMetrics};
pub use split::{split_text_to_size, wrap_paragraphs, WrappedLine};
