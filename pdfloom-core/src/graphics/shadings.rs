//! Axial and radial shadings with a sampled color function.

use crate::error::{PdfError, Result};
use crate::objects::{Dictionary, Object, ObjectId};

/// Samples taken from the color stops for the type 0 function.
pub const DEFAULT_SAMPLES: usize = 21;

/// Shading type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ShadingType {
    /// Axial shading, `Coords [x0 y0 x1 y1]`
    Axial = 2,
    /// Radial shading, `Coords [x0 y0 r0 x1 y1 r1]`
    Radial = 3,
}

/// Color at a position along the gradient, `offset` in 0..=1.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ColorStop {
    pub offset: f64,
    pub color: [u8; 3],
}

impl ColorStop {
    pub fn new(offset: f64, color: [u8; 3]) -> Self {
        Self { offset, color }
    }
}

/// Gradient fill registered as a shading resource.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ShadingPattern {
    pub shading_type: ShadingType,
    pub coords: Vec<f64>,
    pub stops: Vec<ColorStop>,
    pub samples: usize,
}

impl ShadingPattern {
    pub fn axial(x0: f64, y0: f64, x1: f64, y1: f64, stops: Vec<ColorStop>) -> Self {
        Self {
            shading_type: ShadingType::Axial,
            coords: vec![x0, y0, x1, y1],
            stops,
            samples: DEFAULT_SAMPLES,
        }
    }

    pub fn radial(center0: (f64, f64, f64), center1: (f64, f64, f64), stops: Vec<ColorStop>) -> Self {
        Self {
            shading_type: ShadingType::Radial,
            coords: vec![center0.0, center0.1, center0.2, center1.0, center1.1, center1.2],
            stops,
            samples: DEFAULT_SAMPLES,
        }
    }

    pub fn validate(&self) -> Result<()> {
        let expected = match self.shading_type {
            ShadingType::Axial => 4,
            ShadingType::Radial => 6,
        };
        if self.coords.len() != expected {
            return Err(PdfError::InvalidArgument(format!(
                "shading type {} expects {expected} coordinates, got {}",
                self.shading_type as u8,
                self.coords.len()
            )));
        }
        if self.coords.iter().any(|c| !c.is_finite()) {
            return Err(PdfError::InvalidArgument("non-finite shading coordinate".to_string()));
        }
        if self.stops.is_empty() {
            return Err(PdfError::InvalidArgument("shading needs at least one color stop".to_string()));
        }
        if self.samples < 2 {
            return Err(PdfError::InvalidArgument("shading needs at least two samples".to_string()));
        }
        Ok(())
    }

    /// Resamples the stops into `samples` equidistant colors by linear
    /// interpolation between the bracketing stops.
    pub fn sample_colors(&self) -> Vec<[u8; 3]> {
        let mut stops = self.stops.clone();
        stops.sort_by(|a, b| a.offset.total_cmp(&b.offset));

        let (first, last) = match (stops.first(), stops.last()) {
            (Some(first), Some(last)) => (*first, *last),
            _ => return Vec::new(),
        };

        (0..self.samples)
            .map(|i| {
                let t = i as f64 / (self.samples - 1) as f64;
                if t <= first.offset {
                    return first.color;
                }
                if t >= last.offset {
                    return last.color;
                }
                let upper = stops
                    .iter()
                    .position(|s| s.offset >= t)
                    .unwrap_or(stops.len() - 1);
                let (lo, hi) = (stops[upper.saturating_sub(1)], stops[upper]);
                let span = hi.offset - lo.offset;
                let u = if span > 0.0 { (t - lo.offset) / span } else { 0.0 };
                let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * u).round() as u8;
                [
                    mix(lo.color[0], hi.color[0]),
                    mix(lo.color[1], hi.color[1]),
                    mix(lo.color[2], hi.color[2]),
                ]
            })
            .collect()
    }

    /// ASCII hex stream body for the sampled function, `>` terminated.
    pub fn function_data(&self) -> Vec<u8> {
        let mut hex = String::with_capacity(self.samples * 6 + 1);
        for color in self.sample_colors() {
            for channel in color {
                hex.push_str(&format!("{channel:02x}"));
            }
        }
        hex.push('>');
        hex.into_bytes()
    }

    pub fn function_dictionary(&self) -> Dictionary {
        let mut dict = Dictionary::new();
        dict.set("FunctionType", 0);
        dict.set("Domain", Object::raw("[0.0 1.0]"));
        dict.set("Size", Object::Array(vec![Object::from(self.samples)]));
        dict.set("BitsPerSample", 8);
        dict.set("Range", Object::raw("[0.0 1.0 0.0 1.0 0.0 1.0]"));
        dict.set("Decode", Object::raw("[0.0 1.0 0.0 1.0 0.0 1.0]"));
        dict.set("Filter", Object::name("ASCIIHexDecode"));
        dict
    }

    pub fn shading_dictionary(&self, function: ObjectId, coords: Vec<String>) -> Dictionary {
        let mut dict = Dictionary::new();
        dict.set("ShadingType", self.shading_type as i64);
        dict.set("ColorSpace", Object::name("DeviceRGB"));
        dict.set("Coords", Object::raw(format!("[{}]", coords.join(" "))));
        dict.set("Function", function);
        dict.set("Extend", Object::raw("[true true]"));
        dict
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn red_to_blue() -> Vec<ColorStop> {
        vec![ColorStop::new(0.0, [255, 0, 0]), ColorStop::new(1.0, [0, 0, 255])]
    }

    #[test]
    fn test_validate_coords() {
        assert!(ShadingPattern::axial(0.0, 0.0, 100.0, 0.0, red_to_blue()).validate().is_ok());

        let mut bad = ShadingPattern::axial(0.0, 0.0, 100.0, 0.0, red_to_blue());
        bad.coords.pop();
        assert!(bad.validate().is_err());

        let radial = ShadingPattern::radial((50.0, 50.0, 0.0), (50.0, 50.0, 40.0), red_to_blue());
        assert_eq!(radial.coords.len(), 6);
        assert!(radial.validate().is_ok());

        assert!(ShadingPattern::axial(0.0, 0.0, 1.0, 1.0, vec![]).validate().is_err());
    }

    #[test]
    fn test_sample_colors_interpolates() {
        let shading = ShadingPattern::axial(0.0, 0.0, 100.0, 0.0, red_to_blue());
        let samples = shading.sample_colors();
        assert_eq!(samples.len(), DEFAULT_SAMPLES);
        assert_eq!(samples[0], [255, 0, 0]);
        assert_eq!(samples[10], [128, 0, 128]);
        assert_eq!(samples[20], [0, 0, 255]);
    }

    #[test]
    fn test_sample_colors_clamps_outside_stops() {
        let mut shading = ShadingPattern::axial(
            0.0,
            0.0,
            1.0,
            0.0,
            vec![ColorStop::new(0.75, [0, 255, 0]), ColorStop::new(0.25, [0, 0, 0])],
        );
        shading.samples = 5;
        assert_eq!(
            shading.sample_colors(),
            vec![[0, 0, 0], [0, 0, 0], [0, 128, 0], [0, 255, 0], [0, 255, 0]]
        );
    }

    #[test]
    fn test_function_data_is_hex() {
        let mut shading = ShadingPattern::axial(0.0, 0.0, 1.0, 0.0, red_to_blue());
        shading.samples = 2;
        assert_eq!(shading.function_data(), b"ff00000000ff>".to_vec());
    }

    #[test]
    fn test_dictionaries() {
        let shading = ShadingPattern::axial(0.0, 0.0, 1.0, 0.0, red_to_blue());
        let lines = shading
            .shading_dictionary(ObjectId::from(7), vec!["0.".into(), "0.".into(), "1.".into(), "0.".into()])
            .to_lines();
        assert_eq!(
            lines,
            vec![
                "<<",
                "/ShadingType 2",
                "/ColorSpace /DeviceRGB",
                "/Coords [0. 0. 1. 0.]",
                "/Function 7 0 R",
                "/Extend [true true]",
                ">>",
            ]
        );
        let function = shading.function_dictionary();
        assert_eq!(function.get("Size"), Some(&Object::Array(vec![Object::Integer(21)])));
    }
}
