use crate::error::{PdfError, Result};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq)]
#[repr(u8)]
pub enum LineCap {
    Butt = 0,
    Round = 1,
    Square = 2,
}

impl FromStr for LineCap {
    type Err = PdfError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "butt" | "0" => Ok(LineCap::Butt),
            "round" | "1" => Ok(LineCap::Round),
            "square" | "projecting" | "2" => Ok(LineCap::Square),
            other => Err(PdfError::InvalidArgument(format!("line cap '{other}'"))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[repr(u8)]
pub enum LineJoin {
    Miter = 0,
    Round = 1,
    Bevel = 2,
}

impl FromStr for LineJoin {
    type Err = PdfError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "miter" | "0" => Ok(LineJoin::Miter),
            "round" | "1" => Ok(LineJoin::Round),
            "bevel" | "2" => Ok(LineJoin::Bevel),
            other => Err(PdfError::InvalidArgument(format!("line join '{other}'"))),
        }
    }
}

/// How a finished path is painted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PathStyle {
    #[default]
    Stroke,
    Fill,
    FillEvenOdd,
    FillStroke,
    FillStrokeEvenOdd,
    /// End the path without painting, `n`
    Discard,
}

impl PathStyle {
    pub fn operator(&self) -> &'static str {
        match self {
            PathStyle::Stroke => "S",
            PathStyle::Fill => "f",
            PathStyle::FillEvenOdd => "f*",
            PathStyle::FillStroke => "B",
            PathStyle::FillStrokeEvenOdd => "B*",
            PathStyle::Discard => "n",
        }
    }

    pub fn fills(&self) -> bool {
        !matches!(self, PathStyle::Stroke | PathStyle::Discard)
    }

    pub fn strokes(&self) -> bool {
        matches!(
            self,
            PathStyle::Stroke | PathStyle::FillStroke | PathStyle::FillStrokeEvenOdd
        )
    }

    /// Clipping operator pair matching the fill rule.
    pub(crate) fn clip_rule(&self) -> &'static str {
        match self {
            PathStyle::FillEvenOdd | PathStyle::FillStrokeEvenOdd => "W* n",
            _ => "W n",
        }
    }
}

impl FromStr for PathStyle {
    type Err = PdfError;

    /// Accepts the short tokens `S`, `D`, `F`, `FD`, `DF` as well as the raw
    /// operators `f`, `f*`, `B`, `B*` and `n`.
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "S" | "D" => Ok(PathStyle::Stroke),
            "F" | "f" => Ok(PathStyle::Fill),
            "f*" => Ok(PathStyle::FillEvenOdd),
            "FD" | "DF" | "B" => Ok(PathStyle::FillStroke),
            "B*" => Ok(PathStyle::FillStrokeEvenOdd),
            "n" => Ok(PathStyle::Discard),
            other => Err(PdfError::InvalidArgument(format!("unknown path style '{other}'"))),
        }
    }
}

/// One piece of a [`lines`](crate::Document::lines) polyline, relative to the
/// previous end point.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Segment {
    Line(f64, f64),
    /// Two control points and the end point
    Curve(f64, f64, f64, f64, f64, f64),
}

/// Dash array and phase, in user units.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DashPattern {
    pub array: Vec<f64>,
    pub phase: f64,
}

impl DashPattern {
    pub fn new(array: Vec<f64>, phase: f64) -> Self {
        Self { array, phase }
    }

    pub fn solid() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_cap_values() {
        assert_eq!(LineCap::Butt as u8, 0);
        assert_eq!(LineCap::Round as u8, 1);
        assert_eq!(LineCap::Square as u8, 2);
        assert_eq!("projecting".parse::<LineCap>().unwrap(), LineCap::Square);
        assert!("pointy".parse::<LineCap>().is_err());
    }

    #[test]
    fn test_line_join_values() {
        assert_eq!(LineJoin::Bevel as u8, 2);
        assert_eq!("round".parse::<LineJoin>().unwrap(), LineJoin::Round);
        assert!("mitre".parse::<LineJoin>().is_err());
    }

    #[test]
    fn test_style_tokens() {
        let cases = [
            ("S", "S"),
            ("D", "S"),
            ("F", "f"),
            ("FD", "B"),
            ("DF", "B"),
            ("f", "f"),
            ("f*", "f*"),
            ("B", "B"),
            ("B*", "B*"),
            ("n", "n"),
        ];
        for (token, operator) in cases {
            assert_eq!(token.parse::<PathStyle>().unwrap().operator(), operator, "{token}");
        }
        assert!("X".parse::<PathStyle>().is_err());
    }

    #[test]
    fn test_fill_and_clip_rules() {
        assert!(PathStyle::FillStroke.fills());
        assert!(PathStyle::FillStroke.strokes());
        assert!(!PathStyle::Discard.fills());
        assert_eq!(PathStyle::FillEvenOdd.clip_rule(), "W* n");
        assert_eq!(PathStyle::Fill.clip_rule(), "W n");
    }
}
