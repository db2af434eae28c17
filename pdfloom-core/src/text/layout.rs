//! Positioning of text lines and emission of the text object operators.
//!
//! The engine is a pure function of the document's text state: it measures,
//! wraps and aligns lines, then returns the complete `BT` ... `ET` block.
//! Nothing is written to a page until layout has succeeded.

use crate::coordinates::CoordinateTransformer;
use crate::error::{ensure_finite, PdfError, Result};
use crate::format::NumberFormat;
use crate::geometry::{Matrix, Point};
use crate::text::encoding::pdf_text_literal;
use crate::text::font::Font;
use crate::text::split::{paragraphs, wrap_paragraphs, WrappedLine};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

impl FromStr for TextAlign {
    type Err = PdfError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "left" => Ok(TextAlign::Left),
            "center" => Ok(TextAlign::Center),
            "right" => Ok(TextAlign::Right),
            "justify" => Ok(TextAlign::Justify),
            other => Err(PdfError::InvalidArgument(format!("unknown text align '{other}'"))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Baseline {
    #[default]
    Alphabetic,
    Ideographic,
    Bottom,
    Top,
    Middle,
    Hanging,
}

impl FromStr for Baseline {
    type Err = PdfError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "alphabetic" => Ok(Baseline::Alphabetic),
            "ideographic" => Ok(Baseline::Ideographic),
            "bottom" => Ok(Baseline::Bottom),
            "top" => Ok(Baseline::Top),
            "middle" => Ok(Baseline::Middle),
            "hanging" => Ok(Baseline::Hanging),
            other => Err(PdfError::InvalidArgument(format!("unknown baseline '{other}'"))),
        }
    }
}

/// Text rendering mode, the operand of `Tr`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum RenderingMode {
    #[default]
    Fill = 0,
    Stroke = 1,
    FillThenStroke = 2,
    Invisible = 3,
    FillAndAddForClipping = 4,
    StrokeAndAddPathForClipping = 5,
    FillThenStrokeAndAddToPathForClipping = 6,
    AddToPathForClipping = 7,
}

impl FromStr for RenderingMode {
    type Err = PdfError;

    fn from_str(s: &str) -> Result<Self> {
        let mode = match s {
            "fill" | "0" => RenderingMode::Fill,
            "stroke" | "1" => RenderingMode::Stroke,
            "fillThenStroke" | "2" => RenderingMode::FillThenStroke,
            "invisible" | "3" => RenderingMode::Invisible,
            "fillAndAddForClipping" | "4" => RenderingMode::FillAndAddForClipping,
            "strokeAndAddPathForClipping" | "5" => RenderingMode::StrokeAndAddPathForClipping,
            "fillThenStrokeAndAddToPathForClipping" | "6" => {
                RenderingMode::FillThenStrokeAndAddToPathForClipping
            }
            "addToPathForClipping" | "7" => RenderingMode::AddToPathForClipping,
            other => {
                return Err(PdfError::InvalidArgument(format!("unknown rendering mode '{other}'")))
            }
        };
        Ok(mode)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RotationDirection {
    #[default]
    CounterClockwise,
    Clockwise,
}

/// Per-call text options. `None` falls back to the document's text state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextOptions {
    pub align: TextAlign,
    pub baseline: Baseline,
    /// Degrees
    pub angle: Option<f64>,
    pub rotation_direction: RotationDirection,
    pub char_space: Option<f64>,
    pub line_height_factor: Option<f64>,
    pub max_width: Option<f64>,
    pub rendering_mode: Option<RenderingMode>,
    pub r2l: Option<bool>,
    /// 1.0 is 100 percent
    pub horizontal_scale: Option<f64>,
    /// Extended coordinate mode only
    pub matrix: Option<Matrix>,
}

impl TextOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn align(mut self, align: TextAlign) -> Self {
        self.align = align;
        self
    }

    pub fn baseline(mut self, baseline: Baseline) -> Self {
        self.baseline = baseline;
        self
    }

    pub fn angle(mut self, degrees: f64) -> Self {
        self.angle = Some(degrees);
        self
    }

    pub fn rotation_direction(mut self, direction: RotationDirection) -> Self {
        self.rotation_direction = direction;
        self
    }

    pub fn char_space(mut self, space: f64) -> Self {
        self.char_space = Some(space);
        self
    }

    pub fn line_height_factor(mut self, factor: f64) -> Self {
        self.line_height_factor = Some(factor);
        self
    }

    pub fn max_width(mut self, width: f64) -> Self {
        self.max_width = Some(width);
        self
    }

    pub fn rendering_mode(mut self, mode: RenderingMode) -> Self {
        self.rendering_mode = Some(mode);
        self
    }

    pub fn r2l(mut self, r2l: bool) -> Self {
        self.r2l = Some(r2l);
        self
    }

    pub fn horizontal_scale(mut self, scale: f64) -> Self {
        self.horizontal_scale = Some(scale);
        self
    }

    pub fn matrix(mut self, matrix: Matrix) -> Self {
        self.matrix = Some(matrix);
        self
    }
}

/// A single string, split on line breaks, or explicit lines.
#[derive(Debug, Clone, PartialEq)]
pub enum TextContent {
    Text(String),
    Lines(Vec<String>),
}

impl From<&str> for TextContent {
    fn from(text: &str) -> Self {
        TextContent::Text(text.to_string())
    }
}

impl From<String> for TextContent {
    fn from(text: String) -> Self {
        TextContent::Text(text)
    }
}

impl From<Vec<String>> for TextContent {
    fn from(lines: Vec<String>) -> Self {
        TextContent::Lines(lines)
    }
}

impl From<&[&str]> for TextContent {
    fn from(lines: &[&str]) -> Self {
        TextContent::Lines(lines.iter().map(|l| l.to_string()).collect())
    }
}

/// Which text state operators have been set away from their defaults in the
/// document so far. Once set, later text objects restate them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextStateUse {
    pub char_space: bool,
    pub horizontal_scale: bool,
    pub rendering_mode: bool,
}

/// Document text state the engine lays out against.
#[derive(Debug, Clone, Copy)]
pub struct TextStyle<'a> {
    pub font: &'a Font,
    /// In content-stream units
    pub font_size: f64,
    pub line_height_factor: f64,
    pub char_space: f64,
    pub r2l: bool,
    /// Encoded color operator
    pub text_color: &'a str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextBlock {
    pub lines: Vec<String>,
    pub state_use: TextStateUse,
}

pub struct TextLayoutEngine<'a> {
    transformer: &'a CoordinateTransformer,
    fmt: &'a NumberFormat,
    /// Current page height in user units
    page_height: f64,
}

impl<'a> TextLayoutEngine<'a> {
    pub fn new(transformer: &'a CoordinateTransformer, fmt: &'a NumberFormat, page_height: f64) -> Self {
        Self {
            transformer,
            fmt,
            page_height,
        }
    }

    /// Rendered width of `text` in user units.
    pub fn text_width(&self, style: &TextStyle<'_>, text: &str, char_space: f64) -> f64 {
        let glyphs = style.font.metrics().unit_width(text) * style.font_size / self.transformer.k();
        glyphs + char_space * text.chars().count() as f64
    }

    pub fn layout(
        &self,
        content: &TextContent,
        x: f64,
        y: f64,
        options: &TextOptions,
        style: &TextStyle<'_>,
        state_use: TextStateUse,
    ) -> Result<TextBlock> {
        ensure_finite("text", &[x, y])?;
        for value in [options.angle, options.char_space, options.line_height_factor, options.horizontal_scale]
            .into_iter()
            .flatten()
        {
            ensure_finite("text option", &[value])?;
        }
        if options.matrix.is_some() {
            self.transformer.require_extended("matrix text transform")?;
        }

        let char_space = options.char_space.unwrap_or(style.char_space);
        let line_height_factor = options.line_height_factor.unwrap_or(style.line_height_factor);
        let r2l = options.r2l.unwrap_or(style.r2l);
        let fmt = self.fmt;

        let max_width = match options.max_width {
            Some(w) if !w.is_finite() || w < 0.0 => {
                return Err(PdfError::InvalidArgument(format!("max width {w}")))
            }
            Some(w) if w > 0.0 => Some(w),
            _ => None,
        };
        if options.align == TextAlign::Justify && max_width.is_none() {
            return Err(PdfError::InvalidArgument(
                "justified text needs a max width".to_string(),
            ));
        }

        let lines = self.collect_lines(content, max_width, style, char_space);
        if lines.is_empty() {
            return Err(PdfError::InvalidArgument("text has no lines".to_string()));
        }

        let y = y + baseline_shift(options.baseline, style.font_size / self.transformer.k(), line_height_factor);
        let widths: Vec<f64> = lines
            .iter()
            .map(|l| self.text_width(style, &l.text, char_space))
            .collect();
        let offsets: Vec<f64> = widths
            .iter()
            .map(|w| match options.align {
                TextAlign::Left | TextAlign::Justify => x,
                TextAlign::Right => x - w,
                TextAlign::Center => x - w / 2.0,
            })
            .collect();
        let word_spacing: Vec<Option<f64>> = lines
            .iter()
            .zip(&widths)
            .map(|(line, width)| match (options.align, max_width) {
                (TextAlign::Justify, Some(max)) if !line.paragraph_end => {
                    let gaps = line.text.split(' ').count() - 1;
                    (gaps > 0).then(|| self.transformer.scale((max - width) / gaps as f64))
                }
                _ => None,
            })
            .collect();

        let leading = style.font_size * line_height_factor;
        let mut out = vec![
            "BT".to_string(),
            format!("/{} {} Tf", style.font.key, fmt.hpf(style.font_size)),
            format!("{} TL", fmt.hpf(leading)),
            style.text_color.to_string(),
        ];

        let mut state = state_use;
        if char_space != 0.0 || state.char_space {
            out.push(format!("{} Tc", fmt.hpf(self.transformer.scale(char_space))));
            state.char_space |= char_space != 0.0;
        }
        let rendering_mode = options.rendering_mode.unwrap_or_default();
        if rendering_mode != RenderingMode::Fill || state.rendering_mode {
            out.push(format!("{} Tr", rendering_mode as u8));
            state.rendering_mode |= rendering_mode != RenderingMode::Fill;
        }
        let horizontal_scale = options.horizontal_scale.unwrap_or(1.0);
        if horizontal_scale != 1.0 || state.horizontal_scale {
            out.push(format!("{} Tz", fmt.hpf(horizontal_scale * 100.0)));
            state.horizontal_scale |= horizontal_scale != 1.0;
        }

        let shown: Vec<String> = lines
            .iter()
            .map(|l| {
                let text = if r2l { l.text.chars().rev().collect() } else { l.text.clone() };
                pdf_text_literal(&text)
            })
            .collect();

        let angle = options.angle.filter(|a| *a != 0.0);
        if self.transformer.is_extended() || options.matrix.is_some() || angle.is_some() {
            let linear = self.glyph_matrix(angle, options.rotation_direction, options.matrix);
            let origin = Point::new(
                self.transformer.transform_x(offsets[0]),
                self.transformer.transform_y(y, self.page_height),
            );
            for (i, literal) in shown.iter().enumerate() {
                let dx = self.transformer.scale(offsets[i] - offsets[0]);
                let dy = -(i as f64) * leading;
                let position = Point::new(
                    origin.x + linear.sx * dx + linear.shx * dy,
                    origin.y + linear.shy * dx + linear.sy * dy,
                );
                let tm = Matrix::new(linear.sx, linear.shy, linear.shx, linear.sy, position.x, position.y);
                push_line(&mut out, word_spacing[i], format!("{} Tm", tm.to_pdf_string(fmt)), literal, fmt);
            }
        } else {
            out.push(format!(
                "{} {} Td",
                fmt.hpf(self.transformer.transform_x(offsets[0])),
                fmt.hpf(self.transformer.transform_y(y, self.page_height)),
            ));
            for (i, literal) in shown.iter().enumerate() {
                if i == 0 {
                    push_shown(&mut out, word_spacing[i], literal, fmt);
                } else if options.align == TextAlign::Left {
                    out.push(format!("T* {literal} Tj"));
                } else {
                    let dx = self.transformer.scale(offsets[i] - offsets[i - 1]);
                    let position = format!("{} {} Td", fmt.hpf(dx), fmt.hpf(-leading));
                    push_line(&mut out, word_spacing[i], position, literal, fmt);
                }
            }
        }

        out.push("ET".to_string());
        Ok(TextBlock {
            lines: out,
            state_use: state,
        })
    }

    fn collect_lines(
        &self,
        content: &TextContent,
        max_width: Option<f64>,
        style: &TextStyle<'_>,
        char_space: f64,
    ) -> Vec<WrappedLine> {
        let sources: Vec<&str> = match content {
            TextContent::Text(text) => match max_width {
                Some(_) => vec![text.as_str()],
                None => paragraphs(text),
            },
            TextContent::Lines(lines) => lines.iter().map(String::as_str).collect(),
        };

        match max_width {
            Some(max) => sources
                .into_iter()
                .flat_map(|s| wrap_paragraphs(s, max, |t| self.text_width(style, t, char_space)))
                .collect(),
            None => sources
                .into_iter()
                .map(|s| WrappedLine {
                    text: s.to_string(),
                    paragraph_end: true,
                })
                .collect(),
        }
    }

    /// Glyph space to user space without translation: flip (extended mode),
    /// then rotation, then the caller's matrix.
    fn glyph_matrix(&self, angle: Option<f64>, direction: RotationDirection, matrix: Option<Matrix>) -> Matrix {
        let flip = if self.transformer.is_extended() {
            Matrix::flip_y()
        } else {
            Matrix::identity()
        };
        let rotation = match angle {
            Some(degrees) => {
                let mut radians = degrees.to_radians();
                if direction == RotationDirection::Clockwise {
                    radians = -radians;
                }
                if self.transformer.is_extended() {
                    radians = -radians;
                }
                Matrix::rotation(radians)
            }
            None => Matrix::identity(),
        };
        let user = matrix.unwrap_or_default();
        user.multiply(&rotation.multiply(&flip))
    }
}

/// Vertical anchor shift for `baseline`, in user units (y grows downward).
fn baseline_shift(baseline: Baseline, height: f64, line_height_factor: f64) -> f64 {
    let descent = height * (line_height_factor - 1.0);
    match baseline {
        Baseline::Alphabetic | Baseline::Ideographic => 0.0,
        Baseline::Bottom => -descent,
        Baseline::Top => height - descent,
        Baseline::Hanging => height - 2.0 * descent,
        Baseline::Middle => height / 2.0 - descent,
    }
}

fn push_shown(out: &mut Vec<String>, word_spacing: Option<f64>, literal: &str, fmt: &NumberFormat) {
    if let Some(tw) = word_spacing {
        out.push(format!("{} Tw", fmt.hpf(tw)));
    }
    out.push(format!("{literal} Tj"));
    if word_spacing.is_some() {
        out.push("0 Tw".to_string());
    }
}

fn push_line(
    out: &mut Vec<String>,
    word_spacing: Option<f64>,
    position: String,
    literal: &str,
    fmt: &NumberFormat,
) {
    out.push(position);
    push_shown(out, word_spacing, literal, fmt);
}
