//! Tiling patterns and the pattern resource variants.

use crate::error::{PdfError, Result};
use crate::format::NumberFormat;
use crate::geometry::{Matrix, Rectangle};
use crate::graphics::shadings::ShadingPattern;
use crate::graphics::state::ExtGState;
use crate::objects::{Dictionary, Object, ObjectId};

/// Colored tiling pattern (`/PatternType 1 /PaintType 1 /TilingType 1`).
///
/// The cell content is recorded between `begin_tiling_pattern` and `end` on
/// the document, like a form object.
#[derive(Debug, Clone, PartialEq)]
pub struct TilingPattern {
    pub bbox: Rectangle,
    pub x_step: f64,
    pub y_step: f64,
    pub matrix: Matrix,
    pub gstate: Option<ExtGState>,
    pub(crate) content: Vec<String>,
}

impl TilingPattern {
    pub fn new(bbox: Rectangle, x_step: f64, y_step: f64) -> Self {
        Self {
            bbox,
            x_step,
            y_step,
            matrix: Matrix::identity(),
            gstate: None,
            content: Vec::new(),
        }
    }

    pub fn with_matrix(mut self, matrix: Matrix) -> Self {
        self.matrix = matrix;
        self
    }

    pub fn with_gstate(mut self, gstate: ExtGState) -> Self {
        self.gstate = Some(gstate);
        self
    }

    pub fn content(&self) -> &[String] {
        &self.content
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.x_step.is_finite() && self.y_step.is_finite())
            || self.x_step == 0.0
            || self.y_step == 0.0
        {
            return Err(PdfError::InvalidArgument(format!(
                "tiling steps must be non-zero, got {} x {}",
                self.x_step, self.y_step
            )));
        }
        if self.bbox.width() <= 0.0 || self.bbox.height() <= 0.0 {
            return Err(PdfError::InvalidArgument("tiling pattern bbox is empty".to_string()));
        }
        Ok(())
    }

    /// Copy sharing the cell content but placed with another matrix.
    pub(crate) fn clone_with_matrix(&self, matrix: Matrix) -> Self {
        Self {
            matrix,
            ..self.clone()
        }
    }

    pub fn to_dictionary(&self, resources: ObjectId, fmt: &NumberFormat) -> Dictionary {
        let bbox = self
            .bbox
            .to_array()
            .iter()
            .map(|v| fmt.hpf(*v))
            .collect::<Vec<_>>()
            .join(" ");

        let mut dict = Dictionary::new();
        dict.set("Type", Object::name("Pattern"));
        dict.set("PatternType", 1);
        dict.set("PaintType", 1);
        dict.set("TilingType", 1);
        dict.set("BBox", Object::raw(format!("[{bbox}]")));
        dict.set("XStep", Object::raw(fmt.hpf(self.x_step)));
        dict.set("YStep", Object::raw(fmt.hpf(self.y_step)));
        dict.set("Resources", resources);
        if !self.matrix.is_identity() {
            dict.set("Matrix", Object::raw(format!("[{}]", self.matrix.to_pdf_string(fmt))));
        }
        dict
    }
}

/// A registered pattern resource.
#[derive(Debug, Clone, PartialEq)]
pub enum Pattern {
    Shading(ShadingPattern),
    Tiling(TilingPattern),
}

impl Pattern {
    /// Resource category the pattern is listed under.
    pub fn resource_category(&self) -> &'static str {
        match self {
            Pattern::Shading(_) => "Shading",
            Pattern::Tiling(_) => "Pattern",
        }
    }
}

/// Reference to a registered pattern used to paint a path.
#[derive(Debug, Clone, PartialEq)]
pub struct PatternFill {
    pub key: String,
    /// Placement, composed onto the pattern's own matrix
    pub matrix: Option<Matrix>,
    /// Applied inside the fill's `q`/`Q`; overrides a tiling pattern's own
    pub gstate: Option<ExtGState>,
}

impl PatternFill {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            matrix: None,
            gstate: None,
        }
    }

    pub fn with_matrix(mut self, matrix: Matrix) -> Self {
        self.matrix = Some(matrix);
        self
    }

    pub fn with_gstate(mut self, gstate: ExtGState) -> Self {
        self.gstate = Some(gstate);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphics::shadings::ColorStop;

    fn cell() -> TilingPattern {
        TilingPattern::new(Rectangle::from_position_and_size(0.0, 0.0, 10.0, 10.0), 10.0, 10.0)
    }

    #[test]
    fn test_validate() {
        assert!(cell().validate().is_ok());
        let mut bad = cell();
        bad.x_step = 0.0;
        assert!(bad.validate().is_err());
        let empty = TilingPattern::new(Rectangle::from_position_and_size(0.0, 0.0, 0.0, 5.0), 1.0, 1.0);
        assert!(empty.validate().is_err());
    }

    #[test]
    fn test_dictionary() {
        let fmt = NumberFormat::default();
        let lines = cell()
            .with_matrix(Matrix::scaling(2.0, 2.0))
            .to_dictionary(ObjectId::from(9), &fmt)
            .to_lines();
        assert_eq!(
            lines,
            vec![
                "<<",
                "/Type /Pattern",
                "/PatternType 1",
                "/PaintType 1",
                "/TilingType 1",
                "/BBox [0. 0. 10. 10.]",
                "/XStep 10.",
                "/YStep 10.",
                "/Resources 9 0 R",
                "/Matrix [2. 0. 0. 2. 0. 0.]",
                ">>",
            ]
        );
    }

    #[test]
    fn test_clone_keeps_content() {
        let mut original = cell();
        original.content.push("0 0 5 5 re".to_string());
        let copy = original.clone_with_matrix(Matrix::translation(3.0, 4.0));
        assert_eq!(copy.content(), original.content());
        assert_eq!(copy.matrix, Matrix::translation(3.0, 4.0));
    }

    #[test]
    fn test_resource_category() {
        let shading = ShadingPattern::axial(0.0, 0.0, 1.0, 0.0, vec![ColorStop::new(0.0, [0, 0, 0])]);
        assert_eq!(Pattern::Shading(shading).resource_category(), "Shading");
        assert_eq!(Pattern::Tiling(cell()).resource_category(), "Pattern");
    }
}
