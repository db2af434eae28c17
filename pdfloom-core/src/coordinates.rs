//! User units and the mapping from user space to PDF points.

use crate::error::{PdfError, Result};
use crate::format::NumberFormat;
use crate::geometry::Matrix;
use std::str::FromStr;

/// Measurement unit for every coordinate a caller passes in.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Unit {
    Pt,
    Mm,
    Cm,
    In,
    Px,
    Pc,
    Em,
    Ex,
    /// Points per user unit
    Custom(f64),
}

impl Default for Unit {
    fn default() -> Self {
        Unit::Mm
    }
}

impl Unit {
    /// Points per unit. `px_hotfix` selects 72/96 for pixels instead of the
    /// legacy 96/72.
    pub fn scale_factor(&self, px_hotfix: bool) -> f64 {
        match self {
            Unit::Pt => 1.0,
            Unit::Mm => 72.0 / 25.4,
            Unit::Cm => 72.0 / 2.54,
            Unit::In => 72.0,
            Unit::Px => {
                if px_hotfix {
                    72.0 / 96.0
                } else {
                    96.0 / 72.0
                }
            }
            Unit::Pc => 12.0,
            Unit::Em => 12.0,
            Unit::Ex => 6.0,
            Unit::Custom(factor) => *factor,
        }
    }
}

impl FromStr for Unit {
    type Err = PdfError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pt" => Ok(Unit::Pt),
            "mm" => Ok(Unit::Mm),
            "cm" => Ok(Unit::Cm),
            "in" => Ok(Unit::In),
            "px" => Ok(Unit::Px),
            "pc" => Ok(Unit::Pc),
            "em" => Ok(Unit::Em),
            "ex" => Ok(Unit::Ex),
            other => other
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite() && *v > 0.0)
                .map(Unit::Custom)
                .ok_or_else(|| PdfError::InvalidArgument(format!("invalid unit: {s}"))),
        }
    }
}

/// How user coordinates reach the content stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CoordinateMode {
    /// Y grows downward; every coordinate is scaled and mirrored per call
    #[default]
    Compat,
    /// A change-of-basis matrix is pushed once per page and coordinates pass
    /// through untouched
    Extended,
}

/// Converts user-space values into content-stream operands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateTransformer {
    scale_factor: f64,
    mode: CoordinateMode,
}

impl CoordinateTransformer {
    pub fn new(unit: Unit, px_hotfix: bool) -> Self {
        Self {
            scale_factor: unit.scale_factor(px_hotfix),
            mode: CoordinateMode::Compat,
        }
    }

    pub fn scale_factor(&self) -> f64 {
        self.scale_factor
    }

    pub fn mode(&self) -> CoordinateMode {
        self.mode
    }

    pub fn is_extended(&self) -> bool {
        self.mode == CoordinateMode::Extended
    }

    pub(crate) fn set_mode(&mut self, mode: CoordinateMode) {
        self.mode = mode;
    }

    /// Scale applied to lengths: the unit factor in compat mode, 1 in
    /// extended mode where the basis matrix already carries it.
    pub fn k(&self) -> f64 {
        match self.mode {
            CoordinateMode::Compat => self.scale_factor,
            CoordinateMode::Extended => 1.0,
        }
    }

    pub fn scale(&self, value: f64) -> f64 {
        value * self.k()
    }

    pub fn transform_x(&self, x: f64) -> f64 {
        self.scale(x)
    }

    /// `page_height` is in user units.
    pub fn transform_y(&self, y: f64, page_height: f64) -> f64 {
        match self.mode {
            CoordinateMode::Compat => (page_height - y) * self.scale_factor,
            CoordinateMode::Extended => y,
        }
    }

    /// Matrix mapping user space (y down, user units) onto PDF default space
    /// for a page `page_height` user units tall.
    pub fn basis_matrix(&self, page_height: f64) -> Matrix {
        Matrix::new(
            self.scale_factor,
            0.0,
            0.0,
            -self.scale_factor,
            0.0,
            page_height * self.scale_factor,
        )
    }

    pub(crate) fn basis_lines(&self, page_height: f64, fmt: &NumberFormat) -> [String; 2] {
        [
            "q".to_string(),
            format!("{} cm", self.basis_matrix(page_height).to_pdf_string(fmt)),
        ]
    }

    pub(crate) fn require_extended(&self, feature: &str) -> Result<()> {
        if self.is_extended() {
            Ok(())
        } else {
            Err(PdfError::ModeViolation(feature.to_string()))
        }
    }
}
