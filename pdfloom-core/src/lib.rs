//! # pdfloom
//!
//! Incremental PDF document assembly. A [`Document`] collects pages of
//! content stream operators, tracks graphics and text state, registers
//! shared resources (fonts, graphics states, patterns, form objects and
//! images) and serializes everything into a single PDF file with a
//! classic cross-reference table.
//!
//! ## Features
//!
//! - **Two coordinate modes**: top-left origin in document units, or raw
//!   PDF user space with full transformation matrices
//! - **Text layout**: the 14 standard fonts, wrapping, alignment,
//!   justification, rotation and character spacing
//! - **Vector graphics**: paths, shapes, dash patterns, clipping and
//!   graphics state stacks
//! - **Patterns and forms**: axial and radial shadings, tiling patterns and
//!   reusable form objects, recorded through scoped render targets
//! - **Images**: raw pixel buffers, JPEG pass-through and soft masks
//!
//! ## Quick Start
//!
//! ```rust
//! use pdfloom::{ColorSpec, Document, PathStyle, Result};
//!
//! # fn main() -> Result<()> {
//! let mut doc = Document::new();
//! doc.set_title("Hello");
//! doc.add_page()?;
//! doc.text("Hello, PDF!", 20.0, 20.0, None)?;
//! doc.set_fill_color(ColorSpec::rgb(0.0, 128.0, 255.0))?;
//! doc.circle(100.0, 100.0, 25.0, Some(PathStyle::Fill))?;
//!
//! let bytes = doc.build()?;
//! assert!(bytes.starts_with(b"%PDF-1.3"));
//! # Ok(())
//! # }
//! ```
//!
//! ### Extended mode
//!
//! ```rust
//! use pdfloom::{Document, Matrix, PathStyle, Rectangle, Point, Result};
//!
//! # fn main() -> Result<()> {
//! let mut doc = Document::new();
//! doc.add_page()?;
//! doc.extended(|doc| {
//!     let bbox = Rectangle::new(Point::origin(), Point::new(10.0, 10.0));
//!     let mut form = doc.begin_form_object(bbox, Matrix::identity())?;
//!     form.rect(0.0, 0.0, 10.0, 10.0, Some(PathStyle::Fill))?;
//!     form.end("square")?;
//!     doc.do_form_object("square", Matrix::translation(50.0, 50.0))?;
//!     Ok(())
//! })?;
//! # Ok(())
//! # }
//! ```

pub mod coordinates;
pub mod document;
pub mod error;
pub mod format;
pub mod geometry;
pub mod graphics;
pub mod objects;
pub mod page;
pub mod resources;
pub mod text;
pub mod writer;

pub use coordinates::{CoordinateMode, Unit};
pub use document::{
    AdditionalObject, DisplayMode, Document, DocumentMetadata, DocumentOptions, Layout, Output,
    OutputType, PageInfo, PageMode, RenderTarget, Zoom,
};
pub use error::{PdfError, Result};
pub use format::FloatPrecision;
pub use geometry::{Matrix, Point, Rectangle};
pub use graphics::{
    ColorSpec, ColorStop, DashPattern, ExtGState, ImageColorSpace, ImageEncoding, LineCap,
    LineJoin, PathStyle, Pattern, PatternFill, RasterImage, Segment, ShadingPattern,
    TilingPattern,
};
pub use page::{Orientation, PageBox, PageFormat};
pub use text::{
    Baseline, FontStyle, RenderingMode, RotationDirection, TextAlign, TextContent, TextOptions,
};

/// Current version of pdfloom
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
