//! Extended graphics states and the save/restore stack that shadows `q`/`Q`.

use crate::error::{PdfError, Result};
use crate::objects::{Dictionary, Object};

/// Extended graphics state parameters (`/ExtGState` resource).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExtGState {
    /// Non-stroking alpha (`/ca`)
    pub opacity: Option<f64>,
    /// Stroking alpha (`/CA`)
    pub stroke_opacity: Option<f64>,
}

impl ExtGState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = Some(opacity);
        self
    }

    pub fn with_stroke_opacity(mut self, opacity: f64) -> Self {
        self.stroke_opacity = Some(opacity);
        self
    }

    pub fn validate(&self) -> Result<()> {
        for value in [self.opacity, self.stroke_opacity].into_iter().flatten() {
            if !(0.0..=1.0).contains(&value) {
                return Err(PdfError::InvalidArgument(format!(
                    "opacity {value} outside 0..=1"
                )));
            }
        }
        Ok(())
    }

    pub fn to_dictionary(&self) -> Dictionary {
        let mut dict = Dictionary::new();
        if let Some(opacity) = self.opacity {
            dict.set("ca", Object::Real(opacity));
        }
        if let Some(opacity) = self.stroke_opacity {
            dict.set("CA", Object::Real(opacity));
        }
        dict
    }
}

/// Font and color settings saved alongside `q`, since the PDF graphics state
/// stack does not track font selection.
#[derive(Debug, Clone, PartialEq)]
pub struct SavedState {
    pub font_key: String,
    pub font_size: f64,
    pub text_color: String,
    pub fill_color: String,
    pub draw_color: String,
    pub line_width: f64,
}

#[derive(Debug, Clone, Default)]
pub struct GraphicsStateStack {
    saved: Vec<SavedState>,
    active_gstate: Option<String>,
}

impl GraphicsStateStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn depth(&self) -> usize {
        self.saved.len()
    }

    pub fn push(&mut self, state: SavedState) {
        self.saved.push(state);
    }

    /// Pops the innermost saved state and forgets the active gstate.
    pub fn pop(&mut self) -> Option<SavedState> {
        self.active_gstate = None;
        self.saved.pop()
    }

    pub fn active_gstate(&self) -> Option<&str> {
        self.active_gstate.as_deref()
    }

    /// Records `key` as active; returns false when it already was.
    pub fn activate(&mut self, key: &str) -> bool {
        if self.active_gstate.as_deref() == Some(key) {
            return false;
        }
        self.active_gstate = Some(key.to_string());
        true
    }

    /// Drops the active gstate after a `Q` the stack did not push, or when
    /// the current page changes.
    pub(crate) fn forget_active(&mut self) {
        self.active_gstate = None;
    }
}
