//! Color specifications and their content-stream operators.

use crate::error::{PdfError, Result};
use crate::format::NumberFormat;
use std::collections::HashMap;
use std::str::FromStr;

/// Represents a color as supplied by a caller.
///
/// Gray and RGB channels are 0-255, CMYK channels and alpha are 0.0-1.0.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ColorSpec {
    Gray(f64),
    Rgb(f64, f64, f64),
    /// RGB with alpha; alpha 0 paints white
    Rgba(f64, f64, f64, f64),
    Cmyk(f64, f64, f64, f64),
    /// Hex (`#fff`, `#ffffff`), a CSS color name, or 1, 3 or 4 space
    /// separated fractions written through verbatim
    Css(String),
}

/// Which operator family a color is emitted for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorRole {
    Fill,
    Text,
    Draw,
    Stroke,
}

impl ColorRole {
    fn is_stroking(self) -> bool {
        matches!(self, ColorRole::Draw | ColorRole::Stroke)
    }

    /// Fill and draw colors carry two decimals, text colors three.
    fn precision(self) -> usize {
        match self {
            ColorRole::Text => 3,
            _ => 2,
        }
    }

    fn operator(self, channels: usize) -> &'static str {
        match (channels, self.is_stroking()) {
            (1, false) => "g",
            (1, true) => "G",
            (3, false) => "rg",
            (3, true) => "RG",
            (_, false) => "k",
            (_, true) => "K",
        }
    }
}

impl ColorSpec {
    pub fn gray(value: f64) -> Self {
        ColorSpec::Gray(value)
    }

    pub fn rgb(r: f64, g: f64, b: f64) -> Self {
        ColorSpec::Rgb(r, g, b)
    }

    pub fn cmyk(c: f64, m: f64, y: f64, k: f64) -> Self {
        ColorSpec::Cmyk(c, m, y, k)
    }

    pub fn black() -> Self {
        ColorSpec::Gray(0.0)
    }

    pub fn white() -> Self {
        ColorSpec::Gray(255.0)
    }

    /// Encodes the color as a complete operator, e.g. `1. 0. 0. rg`.
    pub fn encode(&self, role: ColorRole, fmt: &NumberFormat) -> Result<String> {
        let digits = role.precision();
        let num = |v: f64| fmt.round(v, digits);

        let (operands, channels) = match self {
            ColorSpec::Css(text) => return encode_css(text, role, fmt),
            ColorSpec::Gray(v) => {
                check_range(&[*v], 255.0)?;
                (num(v / 255.0), 1)
            }
            ColorSpec::Rgb(r, g, b) => {
                check_range(&[*r, *g, *b], 255.0)?;
                if r == g && g == b {
                    (num(r / 255.0), 1)
                } else {
                    (
                        format!("{} {} {}", num(r / 255.0), num(g / 255.0), num(b / 255.0)),
                        3,
                    )
                }
            }
            ColorSpec::Rgba(r, g, b, a) => {
                check_range(&[*r, *g, *b], 255.0)?;
                check_range(&[*a], 1.0)?;
                if *a == 0.0 {
                    ("1. 1. 1.".to_string(), 3)
                } else if r == g && g == b {
                    (num(r / 255.0), 1)
                } else {
                    (
                        format!("{} {} {}", num(r / 255.0), num(g / 255.0), num(b / 255.0)),
                        3,
                    )
                }
            }
            ColorSpec::Cmyk(c, m, y, k) => {
                check_range(&[*c, *m, *y, *k], 1.0)?;
                (
                    format!("{} {} {} {}", num(*c), num(*m), num(*y), num(*k)),
                    4,
                )
            }
        };

        Ok(format!("{operands} {}", role.operator(channels)))
    }
}

impl FromStr for ColorSpec {
    type Err = PdfError;

    fn from_str(s: &str) -> Result<Self> {
        let spec = ColorSpec::Css(s.trim().to_string());
        // Validates eagerly so parse errors surface at the call site.
        spec.encode(ColorRole::Fill, &NumberFormat::default())?;
        Ok(spec)
    }
}

fn check_range(values: &[f64], max: f64) -> Result<()> {
    for v in values {
        if !v.is_finite() || *v < 0.0 || *v > max {
            return Err(PdfError::InvalidColor(format!(
                "channel {v} outside 0..={max}"
            )));
        }
    }
    Ok(())
}

fn encode_css(text: &str, role: ColorRole, fmt: &NumberFormat) -> Result<String> {
    let lower = text.trim().to_ascii_lowercase();

    let hex = if lower.starts_with('#') {
        Some(lower)
    } else {
        NAMED_COLORS.get(lower.as_str()).map(|hex| hex.to_string())
    };

    if let Some(hex) = hex {
        let (r, g, b) = parse_hex(&hex)?;
        return ColorSpec::Rgb(r as f64, g as f64, b as f64).encode(role, fmt);
    }

    // Fraction strings are already in operator space.
    let parts: Vec<&str> = text.split_whitespace().collect();
    if !matches!(parts.len(), 1 | 3 | 4) {
        return Err(PdfError::InvalidColor(text.to_string()));
    }
    for part in &parts {
        let value: f64 = part
            .parse()
            .map_err(|_| PdfError::InvalidColor(text.to_string()))?;
        if !(0.0..=1.0).contains(&value) {
            return Err(PdfError::InvalidColor(text.to_string()));
        }
    }
    Ok(format!("{} {}", parts.join(" "), role.operator(parts.len())))
}

fn parse_hex(hex: &str) -> Result<(u8, u8, u8)> {
    let digits = hex.trim_start_matches('#');
    let expanded: String = match digits.len() {
        3 => digits.chars().flat_map(|c| [c, c]).collect(),
        6 => digits.to_string(),
        _ => return Err(PdfError::InvalidColor(hex.to_string())),
    };
    let channel = |i: usize| {
        u8::from_str_radix(&expanded[i..i + 2], 16)
            .map_err(|_| PdfError::InvalidColor(hex.to_string()))
    };
    Ok((channel(0)?, channel(2)?, channel(4)?))
}

/// Converts an operator string produced by [`ColorSpec::encode`] back to a
/// `#rrggbb` hex color. Gray and CMYK are converted to RGB.
pub fn decode_color(encoded: &str) -> Result<String> {
    let parts: Vec<&str> = encoded.split_whitespace().collect();
    let invalid = || PdfError::InvalidColor(encoded.to_string());
    let values = |count: usize| -> Result<Vec<f64>> {
        parts[..count]
            .iter()
            .map(|p| p.parse::<f64>().map_err(|_| invalid()))
            .collect()
    };

    let (r, g, b) = match (parts.len(), parts.last().copied()) {
        (2, Some("g" | "G")) => {
            let v = values(1)?;
            (v[0], v[0], v[0])
        }
        (4, Some("rg" | "RG")) => {
            let v = values(3)?;
            (v[0], v[1], v[2])
        }
        (5, Some("k" | "K")) => {
            let v = values(4)?;
            let (c, m, y, k) = (v[0], v[1], v[2], v[3]);
            ((1.0 - c) * (1.0 - k), (1.0 - m) * (1.0 - k), (1.0 - y) * (1.0 - k))
        }
        _ => return Err(invalid()),
    };

    let to_byte = |v: f64| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    Ok(format!("#{:02x}{:02x}{:02x}", to_byte(r), to_byte(g), to_byte(b)))
}

lazy_static::lazy_static! {
    static ref NAMED_COLORS: HashMap<&'static str, &'static str> = {
        let entries: &[(&str, &str)] = &[
            ("aliceblue", "#f0f8ff"), ("antiquewhite", "#faebd7"), ("aqua", "#00ffff"),
            ("aquamarine", "#7fffd4"), ("azure", "#f0ffff"), ("beige", "#f5f5dc"),
            ("bisque", "#ffe4c4"), ("black", "#000000"), ("blanchedalmond", "#ffebcd"),
            ("blue", "#0000ff"), ("blueviolet", "#8a2be2"), ("brown", "#a52a2a"),
            ("burlywood", "#deb887"), ("cadetblue", "#5f9ea0"), ("chartreuse", "#7fff00"),
            ("chocolate", "#d2691e"), ("coral", "#ff7f50"), ("cornflowerblue", "#6495ed"),
            ("cornsilk", "#fff8dc"), ("crimson", "#dc143c"), ("cyan", "#00ffff"),
            ("darkblue", "#00008b"), ("darkcyan", "#008b8b"), ("darkgoldenrod", "#b8860b"),
            ("darkgray", "#a9a9a9"), ("darkgrey", "#a9a9a9"), ("darkgreen", "#006400"),
            ("darkkhaki", "#bdb76b"), ("darkmagenta", "#8b008b"), ("darkolivegreen", "#556b2f"),
            ("darkorange", "#ff8c00"), ("darkorchid", "#9932cc"), ("darkred", "#8b0000"),
            ("darksalmon", "#e9967a"), ("darkseagreen", "#8fbc8f"), ("darkslateblue", "#483d8b"),
            ("darkslategray", "#2f4f4f"), ("darkslategrey", "#2f4f4f"), ("darkturquoise", "#00ced1"),
            ("darkviolet", "#9400d3"), ("deeppink", "#ff1493"), ("deepskyblue", "#00bfff"),
            ("dimgray", "#696969"), ("dimgrey", "#696969"), ("dodgerblue", "#1e90ff"),
            ("firebrick", "#b22222"), ("floralwhite", "#fffaf0"), ("forestgreen", "#228b22"),
            ("fuchsia", "#ff00ff"), ("gainsboro", "#dcdcdc"), ("ghostwhite", "#f8f8ff"),
            ("gold", "#ffd700"), ("goldenrod", "#daa520"), ("gray", "#808080"),
            ("grey", "#808080"), ("green", "#008000"), ("greenyellow", "#adff2f"),
            ("honeydew", "#f0fff0"), ("hotpink", "#ff69b4"), ("indianred", "#cd5c5c"),
            ("indigo", "#4b0082"), ("ivory", "#fffff0"), ("khaki", "#f0e68c"),
            ("lavender", "#e6e6fa"), ("lavenderblush", "#fff0f5"), ("lawngreen", "#7cfc00"),
            ("lemonchiffon", "#fffacd"), ("lightblue", "#add8e6"), ("lightcoral", "#f08080"),
            ("lightcyan", "#e0ffff"), ("lightgoldenrodyellow", "#fafad2"), ("lightgray", "#d3d3d3"),
            ("lightgrey", "#d3d3d3"), ("lightgreen", "#90ee90"), ("lightpink", "#ffb6c1"),
            ("lightsalmon", "#ffa07a"), ("lightseagreen", "#20b2aa"), ("lightskyblue", "#87cefa"),
            ("lightslategray", "#778899"), ("lightslategrey", "#778899"), ("lightsteelblue", "#b0c4de"),
            ("lightyellow", "#ffffe0"), ("lime", "#00ff00"), ("limegreen", "#32cd32"),
            ("linen", "#faf0e6"), ("magenta", "#ff00ff"), ("maroon", "#800000"),
            ("mediumaquamarine", "#66cdaa"), ("mediumblue", "#0000cd"), ("mediumorchid", "#ba55d3"),
            ("mediumpurple", "#9370db"), ("mediumseagreen", "#3cb371"), ("mediumslateblue", "#7b68ee"),
            ("mediumspringgreen", "#00fa9a"), ("mediumturquoise", "#48d1cc"), ("mediumvioletred", "#c71585"),
            ("midnightblue", "#191970"), ("mintcream", "#f5fffa"), ("mistyrose", "#ffe4e1"),
            ("moccasin", "#ffe4b5"), ("navajowhite", "#ffdead"), ("navy", "#000080"),
            ("oldlace", "#fdf5e6"), ("olive", "#808000"), ("olivedrab", "#6b8e23"),
            ("orange", "#ffa500"), ("orangered", "#ff4500"), ("orchid", "#da70d6"),
            ("palegoldenrod", "#eee8aa"), ("palegreen", "#98fb98"), ("paleturquoise", "#afeeee"),
            ("palevioletred", "#db7093"), ("papayawhip", "#ffefd5"), ("peachpuff", "#ffdab9"),
            ("peru", "#cd853f"), ("pink", "#ffc0cb"), ("plum", "#dda0dd"),
            ("powderblue", "#b0e0e6"), ("purple", "#800080"), ("rebeccapurple", "#663399"),
            ("red", "#ff0000"), ("rosybrown", "#bc8f8f"), ("royalblue", "#4169e1"),
            ("saddlebrown", "#8b4513"), ("salmon", "#fa8072"), ("sandybrown", "#f4a460"),
            ("seagreen", "#2e8b57"), ("seashell", "#fff5ee"), ("sienna", "#a0522d"),
            ("silver", "#c0c0c0"), ("skyblue", "#87ceeb"), ("slateblue", "#6a5acd"),
            ("slategray", "#708090"), ("slategrey", "#708090"), ("snow", "#fffafa"),
            ("springgreen", "#00ff7f"), ("steelblue", "#4682b4"), ("tan", "#d2b48c"),
            ("teal", "#008080"), ("thistle", "#d8bfd8"), ("tomato", "#ff6347"),
            ("turquoise", "#40e0d0"), ("violet", "#ee82ee"), ("wheat", "#f5deb3"),
            ("white", "#ffffff"), ("whitesmoke", "#f5f5f5"), ("yellow", "#ffff00"),
            ("yellowgreen", "#9acd32"),
        ];
        entries.iter().copied().collect()
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fmt() -> NumberFormat {
        NumberFormat::default()
    }

    #[test]
    fn test_gray_and_rgb_operators() {
        assert_eq!(ColorSpec::gray(0.0).encode(ColorRole::Fill, &fmt()).unwrap(), "0. g");
        assert_eq!(ColorSpec::gray(255.0).encode(ColorRole::Draw, &fmt()).unwrap(), "1. G");
        assert_eq!(
            ColorSpec::rgb(255.0, 0.0, 0.0).encode(ColorRole::Fill, &fmt()).unwrap(),
            "1. 0. 0. rg"
        );
        assert_eq!(
            ColorSpec::rgb(255.0, 0.0, 0.0).encode(ColorRole::Stroke, &fmt()).unwrap(),
            "1. 0. 0. RG"
        );
        // equal channels collapse to gray
        assert_eq!(
            ColorSpec::rgb(51.0, 51.0, 51.0).encode(ColorRole::Fill, &fmt()).unwrap(),
            "0.2 g"
        );
    }

    #[test]
    fn test_text_role_uses_three_decimals() {
        assert_eq!(
            ColorSpec::rgb(200.0, 10.0, 0.0).encode(ColorRole::Text, &fmt()).unwrap(),
            "0.784 0.039 0. rg"
        );
        assert_eq!(
            ColorSpec::rgb(200.0, 10.0, 0.0).encode(ColorRole::Fill, &fmt()).unwrap(),
            "0.78 0.04 0. rg"
        );
    }

    #[test]
    fn test_cmyk() {
        assert_eq!(
            ColorSpec::cmyk(0.1, 0.2, 0.3, 0.4).encode(ColorRole::Fill, &fmt()).unwrap(),
            "0.1 0.2 0.3 0.4 k"
        );
        assert_eq!(
            ColorSpec::cmyk(1.0, 0.0, 0.0, 0.0).encode(ColorRole::Draw, &fmt()).unwrap(),
            "1. 0. 0. 0. K"
        );
    }

    #[test]
    fn test_hex_and_named() {
        let red = ColorSpec::Css("#f00".to_string());
        assert_eq!(red.encode(ColorRole::Fill, &fmt()).unwrap(), "1. 0. 0. rg");

        let navy = ColorSpec::Css("Navy".to_string());
        assert_eq!(navy.encode(ColorRole::Fill, &fmt()).unwrap(), "0. 0. 0.5 rg");

        let white = ColorSpec::Css("#FFFFFF".to_string());
        assert_eq!(white.encode(ColorRole::Draw, &fmt()).unwrap(), "1. G");
    }

    #[test]
    fn test_fraction_strings_pass_through() {
        let gray = ColorSpec::Css("0.5".to_string());
        assert_eq!(gray.encode(ColorRole::Fill, &fmt()).unwrap(), "0.5 g");

        let rgb = ColorSpec::Css("0.1 0.2 0.3".to_string());
        assert_eq!(rgb.encode(ColorRole::Stroke, &fmt()).unwrap(), "0.1 0.2 0.3 RG");
    }

    #[test]
    fn test_transparent_rgba_is_white() {
        let clear = ColorSpec::Rgba(10.0, 20.0, 30.0, 0.0);
        assert_eq!(clear.encode(ColorRole::Fill, &fmt()).unwrap(), "1. 1. 1. rg");

        let opaque = ColorSpec::Rgba(255.0, 0.0, 0.0, 1.0);
        assert_eq!(opaque.encode(ColorRole::Fill, &fmt()).unwrap(), "1. 0. 0. rg");
    }

    #[test]
    fn test_invalid_colors() {
        for bad in ["#12", "#ggg", "notacolor", "0.1 0.2", "2.0"] {
            assert!(
                matches!(
                    ColorSpec::Css(bad.to_string()).encode(ColorRole::Fill, &fmt()),
                    Err(PdfError::InvalidColor(_))
                ),
                "{bad} should be rejected"
            );
        }
        assert!(ColorSpec::rgb(256.0, 0.0, 0.0).encode(ColorRole::Fill, &fmt()).is_err());
        assert!(ColorSpec::gray(f64::NAN).encode(ColorRole::Fill, &fmt()).is_err());
        assert!("nope".parse::<ColorSpec>().is_err());
        assert!("teal".parse::<ColorSpec>().is_ok());
    }

    #[test]
    fn test_decode() {
        assert_eq!(decode_color("0 g").unwrap(), "#000000");
        assert_eq!(decode_color("1. G").unwrap(), "#ffffff");
        assert_eq!(decode_color("1. 0. 0. rg").unwrap(), "#ff0000");
        assert_eq!(decode_color("0. 0. 0. 1. k").unwrap(), "#000000");
        assert_eq!(decode_color("0. 1. 1. 0. K").unwrap(), "#ff0000");
        assert!(decode_color("1 2 3").is_err());
        assert!(decode_color("x g").is_err());
    }
}
