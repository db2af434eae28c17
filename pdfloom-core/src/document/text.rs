use super::Document;
use crate::error::{ensure_finite, PdfError, Result};
use crate::text::{self, Font, FontStyle, TextContent, TextLayoutEngine, TextOptions, TextStyle};
use std::collections::BTreeMap;

impl Document {
    /// Writes `content` at `(x, y)` with the current font, size and color.
    ///
    /// Content given as [`TextContent::Lines`] is written one entry per line;
    /// a string is split on line breaks, or wrapped when `max_width` is set.
    pub fn text(
        &mut self,
        content: impl Into<TextContent>,
        x: f64,
        y: f64,
        options: Option<&TextOptions>,
    ) -> Result<&mut Self> {
        let content = content.into();
        let default_options = TextOptions::default();
        let options = options.unwrap_or(&default_options);
        let page_height = self.page_height_user()?;

        let font = self.current_font()?;
        let style = self.text_style(font);
        let engine = TextLayoutEngine::new(&self.transformer, &self.fmt, page_height);
        let block = engine.layout(&content, x, y, options, &style, self.text.state_use)?;
        let key = font.key.clone();

        self.text.state_use = block.state_use;
        self.resources.mark_font_used(&key);
        let page = self.pages.current_mut()?;
        for line in block.lines {
            page.out(line);
        }
        Ok(self)
    }

    /// Selects a registered font by family and style. A `weight` of 700 or
    /// more turns the style bold.
    pub fn set_font(&mut self, family: &str, style: FontStyle, weight: Option<u16>) -> Result<&mut Self> {
        let style = style.with_weight(weight);
        self.text.font_key = self.resources.resolve_font(family, style)?;
        Ok(self)
    }

    /// The current font's key, e.g. `F1`.
    pub fn font_key(&self) -> &str {
        &self.text.font_key
    }

    /// Font size in points.
    pub fn set_font_size(&mut self, size: f64) -> Result<&mut Self> {
        ensure_finite("font size", &[size])?;
        if size <= 0.0 {
            return Err(PdfError::InvalidArgument(format!("font size {size}")));
        }
        self.text.font_size = if self.transformer.is_extended() {
            size / self.transformer.scale_factor()
        } else {
            size
        };
        Ok(self)
    }

    /// Font size in points, whatever the coordinate mode.
    pub fn font_size(&self) -> f64 {
        if self.transformer.is_extended() {
            self.text.font_size * self.transformer.scale_factor()
        } else {
            self.text.font_size
        }
    }

    pub fn set_line_height_factor(&mut self, factor: f64) -> Result<&mut Self> {
        ensure_finite("line height factor", &[factor])?;
        self.text.line_height_factor = factor;
        Ok(self)
    }

    pub fn line_height_factor(&self) -> f64 {
        self.text.line_height_factor
    }

    /// Extra space after every character, in user units.
    pub fn set_char_space(&mut self, space: f64) -> Result<&mut Self> {
        ensure_finite("char space", &[space])?;
        self.text.char_space = space;
        Ok(self)
    }

    pub fn char_space(&self) -> f64 {
        self.text.char_space
    }

    /// Reverses every line of subsequent text.
    pub fn set_r2l(&mut self, r2l: bool) -> &mut Self {
        self.text.r2l = r2l;
        self
    }

    /// Advance of `text` in the current font at size 1, in text space units.
    pub fn get_string_unit_width(&self, text: &str) -> Result<f64> {
        Ok(self.current_font()?.metrics().unit_width(text))
    }

    /// Width of `text` in user units with the current font, size and char
    /// space.
    pub fn get_text_width(&self, text: &str) -> Result<f64> {
        let font = self.current_font()?;
        let engine = TextLayoutEngine::new(&self.transformer, &self.fmt, 0.0);
        Ok(engine.text_width(&self.text_style(font), text, self.text.char_space))
    }

    /// Wraps `text` into lines no wider than `max_width` user units.
    pub fn split_text_to_size(&self, text: &str, max_width: f64) -> Result<Vec<String>> {
        ensure_finite("max width", &[max_width])?;
        if max_width <= 0.0 {
            return Err(PdfError::InvalidArgument(format!("max width {max_width}")));
        }
        let font = self.current_font()?;
        let style = self.text_style(font);
        let engine = TextLayoutEngine::new(&self.transformer, &self.fmt, 0.0);
        Ok(text::split_text_to_size(text, max_width, |t| {
            engine.text_width(&style, t, self.text.char_space)
        }))
    }

    /// Registers a non-embedded Type1 font, e.g. `add_font("Optima",
    /// "optima", FontStyle::Normal)`; returns its key.
    pub fn add_font(&mut self, postscript_name: &str, family: &str, style: FontStyle) -> Result<String> {
        if postscript_name.is_empty() || postscript_name.contains(|c: char| c.is_whitespace() || c == '/') {
            return Err(PdfError::InvalidArgument(format!(
                "font name '{postscript_name}'"
            )));
        }
        Ok(self.resources.add_font(postscript_name, family, style))
    }

    /// Registered families and their styles.
    pub fn font_list(&self) -> BTreeMap<String, Vec<String>> {
        self.resources.font_list()
    }

    fn current_font(&self) -> Result<&Font> {
        self.resources.font(&self.text.font_key).ok_or_else(|| {
            PdfError::InvalidArgument(format!("font '{}' is not registered", self.text.font_key))
        })
    }

    fn text_style<'a>(&'a self, font: &'a Font) -> TextStyle<'a> {
        TextStyle {
            font,
            font_size: self.text.font_size,
            line_height_factor: self.text.line_height_factor,
            char_space: self.text.char_space,
            r2l: self.text.r2l,
            text_color: &self.text.color,
        }
    }
}
