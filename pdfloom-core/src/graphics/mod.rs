mod color;
mod image;
mod path;
mod patterns;
mod shadings;
mod state;

pub use color::{decode_color, ColorRole, ColorSpec};
pub use image::{ColorSpace as ImageColorSpace, ImageEncoding, RasterImage};
pub use path::{DashPattern, LineCap, LineJoin, PathStyle, Segment};
pub use patterns::{Pattern, PatternFill, TilingPattern};
pub use shadings::{ColorStop, ShadingPattern, ShadingType, DEFAULT_SAMPLES};
pub use state::{ExtGState, GraphicsStateStack, SavedState};
