use thiserror::Error;

#[derive(Error, Debug)]
pub enum PdfError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Operation requires extended coordinate mode: {0}")]
    ModeViolation(String),

    #[error("Unsupported feature: {0}")]
    UnsupportedFeature(String),

    #[error("Invalid page number: {0}")]
    InvalidPageNumber(usize),

    #[error("No current page, call add_page first")]
    NoCurrentPage,

    #[error("Invalid color: {0}")]
    InvalidColor(String),

    #[error("Invalid image: {0}")]
    InvalidImage(String),

    #[error("Compression error: {0}")]
    CompressionError(String),

    #[error("Object {0} has no resolved offset")]
    UnresolvedOffset(u32),

    #[error("Render target error: {0}")]
    RenderTarget(String),
}

pub type Result<T> = std::result::Result<T, PdfError>;

/// Rejects NaN and infinities before they reach a content stream.
pub(crate) fn ensure_finite(name: &str, values: &[f64]) -> Result<()> {
    if values.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(PdfError::InvalidArgument(format!(
            "{name} expects finite numbers, got {values:?}"
        )))
    }
}
