//! Colors, line state, paths, graphics states and pattern fills.
//!
//! Coordinates are user units, y growing downwards in compat mode. In
//! extended mode they pass through unchanged.

use super::Document;
use crate::coordinates::CoordinateMode;
use crate::error::{ensure_finite, PdfError, Result};
use crate::geometry::Matrix;
use crate::graphics::{
    decode_color, ColorRole, ColorSpec, DashPattern, ExtGState, LineCap, LineJoin, PathStyle,
    Pattern, PatternFill, SavedState, Segment,
};

/// Bézier handle length for a quarter circle of radius 1.
const KAPPA: f64 = 4.0 / 3.0 * (std::f64::consts::SQRT_2 - 1.0);

impl Document {
    // Colors

    /// Sets the stroking color (`G`, `RG` or `K`).
    pub fn set_draw_color(&mut self, color: ColorSpec) -> Result<&mut Self> {
        let encoded = self.encode_color(&color, ColorRole::Draw)?;
        self.out_state(&encoded)?;
        self.draw_color = encoded;
        Ok(self)
    }

    /// Sets the non-stroking color (`g`, `rg` or `k`).
    pub fn set_fill_color(&mut self, color: ColorSpec) -> Result<&mut Self> {
        let encoded = self.encode_color(&color, ColorRole::Fill)?;
        self.out_state(&encoded)?;
        self.fill_color = encoded;
        Ok(self)
    }

    /// Sets the color of subsequent text; written inside each text object.
    pub fn set_text_color(&mut self, color: ColorSpec) -> Result<&mut Self> {
        self.text.color = self.encode_color(&color, ColorRole::Text)?;
        Ok(self)
    }

    /// Current draw color as `#rrggbb`.
    pub fn draw_color(&self) -> Result<String> {
        decode_color(&self.draw_color)
    }

    pub fn fill_color(&self) -> Result<String> {
        decode_color(&self.fill_color)
    }

    pub fn text_color(&self) -> Result<String> {
        decode_color(&self.text.color)
    }

    // Line state

    pub fn set_line_width(&mut self, width: f64) -> Result<&mut Self> {
        ensure_finite("line width", &[width])?;
        if width < 0.0 {
            return Err(PdfError::InvalidArgument(format!("line width {width}")));
        }
        let line = format!("{} w", self.fmt.hpf(self.transformer.scale(width)));
        self.out_state(&line)?;
        self.line_width = width;
        Ok(self)
    }

    pub fn line_width(&self) -> f64 {
        self.line_width
    }

    pub fn set_line_cap(&mut self, cap: LineCap) -> Result<&mut Self> {
        self.out_state(&format!("{} J", cap as u8))?;
        self.line_cap = cap;
        Ok(self)
    }

    pub fn set_line_join(&mut self, join: LineJoin) -> Result<&mut Self> {
        self.out_state(&format!("{} j", join as u8))?;
        self.line_join = join;
        Ok(self)
    }

    pub fn set_line_miter_limit(&mut self, limit: f64) -> Result<&mut Self> {
        ensure_finite("miter limit", &[limit])?;
        if limit < 1.0 {
            return Err(PdfError::InvalidArgument(format!("miter limit {limit}")));
        }
        self.out(format!("{} M", self.fmt.hpf(limit)))?;
        Ok(self)
    }

    /// Sets the dash array and phase; an empty array draws solid lines.
    pub fn set_line_dash_pattern(&mut self, dash: &DashPattern) -> Result<&mut Self> {
        ensure_finite("dash pattern", &dash.array)?;
        ensure_finite("dash phase", &[dash.phase])?;
        if dash.array.iter().any(|v| *v < 0.0) {
            return Err(PdfError::InvalidArgument("negative dash length".to_string()));
        }
        let array = dash
            .array
            .iter()
            .map(|v| self.fmt.hpf(self.transformer.scale(*v)))
            .collect::<Vec<_>>()
            .join(" ");
        let phase = self.fmt.hpf(self.transformer.scale(dash.phase));
        self.out(format!("[{array}] {phase} d"))?;
        Ok(self)
    }

    // Path construction

    pub fn move_to(&mut self, x: f64, y: f64) -> Result<&mut Self> {
        ensure_finite("move_to", &[x, y])?;
        let point = self.point(x, y)?;
        self.out_path(format!("{point} m"))?;
        Ok(self)
    }

    pub fn line_to(&mut self, x: f64, y: f64) -> Result<&mut Self> {
        ensure_finite("line_to", &[x, y])?;
        let point = self.point(x, y)?;
        self.out_path(format!("{point} l"))?;
        Ok(self)
    }

    /// Cubic Bézier from the current point through two control points.
    pub fn curve_to(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, x3: f64, y3: f64) -> Result<&mut Self> {
        ensure_finite("curve_to", &[x1, y1, x2, y2, x3, y3])?;
        let line = format!(
            "{} {} {} c",
            self.point(x1, y1)?,
            self.point(x2, y2)?,
            self.point(x3, y3)?
        );
        self.out_path(line)?;
        Ok(self)
    }

    pub fn close_path(&mut self) -> Result<&mut Self> {
        self.out_path("h")?;
        Ok(self)
    }

    // Painting

    pub fn stroke(&mut self) -> Result<&mut Self> {
        self.paint(PathStyle::Stroke)
    }

    pub fn fill(&mut self) -> Result<&mut Self> {
        self.paint(PathStyle::Fill)
    }

    pub fn fill_even_odd(&mut self) -> Result<&mut Self> {
        self.paint(PathStyle::FillEvenOdd)
    }

    pub fn fill_stroke(&mut self) -> Result<&mut Self> {
        self.paint(PathStyle::FillStroke)
    }

    pub fn fill_stroke_even_odd(&mut self) -> Result<&mut Self> {
        self.paint(PathStyle::FillStrokeEvenOdd)
    }

    /// Intersects the clipping path with the current path. The path stays
    /// open; end it with [`discard_path`](Self::discard_path) or a paint op.
    pub fn clip(&mut self) -> Result<&mut Self> {
        self.out("W")?;
        Ok(self)
    }

    pub fn clip_even_odd(&mut self) -> Result<&mut Self> {
        self.out("W*")?;
        Ok(self)
    }

    pub fn discard_path(&mut self) -> Result<&mut Self> {
        self.paint(PathStyle::Discard)
    }

    /// Ends the current path with `style`.
    pub fn paint(&mut self, style: PathStyle) -> Result<&mut Self> {
        let page = self.pages.current_mut()?;
        page.out(style.operator());
        page.take_path_start();
        Ok(self)
    }

    // Shapes. A `None` style leaves the path open for a later paint call.

    pub fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, style: Option<PathStyle>) -> Result<&mut Self> {
        ensure_finite("line", &[x1, y1, x2, y2])?;
        self.lines(&[Segment::Line(x2 - x1, y2 - y1)], x1, y1, (1.0, 1.0), style, false)
    }

    /// Polyline starting at `(x, y)`; every segment is relative to the end
    /// of the previous one and scaled by `scale`.
    pub fn lines(
        &mut self,
        segments: &[Segment],
        x: f64,
        y: f64,
        scale: (f64, f64),
        style: Option<PathStyle>,
        closed: bool,
    ) -> Result<&mut Self> {
        ensure_finite("lines", &[x, y, scale.0, scale.1])?;
        for segment in segments {
            match *segment {
                Segment::Line(dx, dy) => ensure_finite("lines", &[dx, dy])?,
                Segment::Curve(a, b, c, d, e, f) => ensure_finite("lines", &[a, b, c, d, e, f])?,
            }
        }
        let (sx, sy) = scale;

        let mut path = vec![format!("{} m", self.point(x, y)?)];
        let (mut cx, mut cy) = (x, y);
        for segment in segments {
            match *segment {
                Segment::Line(dx, dy) => {
                    cx += dx * sx;
                    cy += dy * sy;
                    path.push(format!("{} l", self.point(cx, cy)?));
                }
                Segment::Curve(x1, y1, x2, y2, x3, y3) => {
                    let first = self.point(cx + x1 * sx, cy + y1 * sy)?;
                    let second = self.point(cx + x2 * sx, cy + y2 * sy)?;
                    cx += x3 * sx;
                    cy += y3 * sy;
                    path.push(format!("{first} {second} {} c", self.point(cx, cy)?));
                }
            }
        }
        if closed {
            path.push("h".to_string());
        }

        for line in path {
            self.out_path(line)?;
        }
        self.finish_shape(style)
    }

    pub fn rect(&mut self, x: f64, y: f64, w: f64, h: f64, style: Option<PathStyle>) -> Result<&mut Self> {
        ensure_finite("rect", &[x, y, w, h])?;
        let height = match self.transformer.mode() {
            CoordinateMode::Compat => -self.transformer.scale(h),
            CoordinateMode::Extended => h,
        };
        let line = format!(
            "{} {} {} re",
            self.point(x, y)?,
            self.fmt.hpf(self.transformer.scale(w)),
            self.fmt.hpf(height)
        );
        self.out_path(line)?;
        self.finish_shape(style)
    }

    pub fn triangle(
        &mut self,
        (x1, y1): (f64, f64),
        (x2, y2): (f64, f64),
        (x3, y3): (f64, f64),
        style: Option<PathStyle>,
    ) -> Result<&mut Self> {
        ensure_finite("triangle", &[x1, y1, x2, y2, x3, y3])?;
        let segments = [Segment::Line(x2 - x1, y2 - y1), Segment::Line(x3 - x2, y3 - y2)];
        self.lines(&segments, x1, y1, (1.0, 1.0), style, true)
    }

    /// Rectangle with elliptic corners; radii are capped at half the sides.
    pub fn rounded_rect(
        &mut self,
        x: f64,
        y: f64,
        w: f64,
        h: f64,
        rx: f64,
        ry: f64,
        style: Option<PathStyle>,
    ) -> Result<&mut Self> {
        ensure_finite("rounded_rect", &[x, y, w, h, rx, ry])?;
        if rx < 0.0 || ry < 0.0 {
            return Err(PdfError::InvalidArgument("negative corner radius".to_string()));
        }
        let rx = rx.min(w.abs() * 0.5);
        let ry = ry.min(h.abs() * 0.5);
        let (kx, ky) = (rx * KAPPA, ry * KAPPA);
        let segments = [
            Segment::Line(w - 2.0 * rx, 0.0),
            Segment::Curve(kx, 0.0, rx, ry - ky, rx, ry),
            Segment::Line(0.0, h - 2.0 * ry),
            Segment::Curve(0.0, ky, -kx, ry, -rx, ry),
            Segment::Line(-w + 2.0 * rx, 0.0),
            Segment::Curve(-kx, 0.0, -rx, -ky, -rx, -ry),
            Segment::Line(0.0, -h + 2.0 * ry),
            Segment::Curve(0.0, -ky, kx, -ry, rx, -ry),
        ];
        self.lines(&segments, x + rx, y, (1.0, 1.0), style, true)
    }

    pub fn ellipse(&mut self, x: f64, y: f64, rx: f64, ry: f64, style: Option<PathStyle>) -> Result<&mut Self> {
        ensure_finite("ellipse", &[x, y, rx, ry])?;
        if rx < 0.0 || ry < 0.0 {
            return Err(PdfError::InvalidArgument("negative radius".to_string()));
        }
        let (lx, ly) = (KAPPA * rx, KAPPA * ry);
        self.move_to(x + rx, y)?;
        self.curve_to(x + rx, y - ly, x + lx, y - ry, x, y - ry)?;
        self.curve_to(x - lx, y - ry, x - rx, y - ly, x - rx, y)?;
        self.curve_to(x - rx, y + ly, x - lx, y + ry, x, y + ry)?;
        self.curve_to(x + lx, y + ry, x + rx, y + ly, x + rx, y)?;
        self.finish_shape(style)
    }

    pub fn circle(&mut self, x: f64, y: f64, r: f64, style: Option<PathStyle>) -> Result<&mut Self> {
        self.ellipse(x, y, r, r, style)
    }

    // Graphics state

    /// Registers an extended graphics state, optionally under an alias.
    pub fn add_gstate(&mut self, alias: Option<&str>, gstate: ExtGState) -> Result<String> {
        self.resources.add_gstate(alias, gstate)
    }

    /// Activates `gstate`, registering it first if no equal one exists.
    pub fn set_gstate(&mut self, gstate: ExtGState) -> Result<&mut Self> {
        self.pages.current()?;
        let key = self.resources.add_gstate(None, gstate)?;
        self.activate_gstate(&key)
    }

    /// Activates a registered gstate by alias or key.
    pub fn set_gstate_by_name(&mut self, name: &str) -> Result<&mut Self> {
        let key = self
            .resources
            .gstate_key(name)
            .ok_or_else(|| PdfError::InvalidArgument(format!("unknown gstate '{name}'")))?
            .to_string();
        self.activate_gstate(&key)
    }

    fn activate_gstate(&mut self, key: &str) -> Result<&mut Self> {
        self.pages.current()?;
        if self.gstack.activate(key) {
            self.out(format!("/{key} gs"))?;
        }
        Ok(self)
    }

    /// `q`, also saving font, colors and line width.
    pub fn save_graphics_state(&mut self) -> Result<&mut Self> {
        self.out("q")?;
        self.gstack.push(SavedState {
            font_key: self.text.font_key.clone(),
            font_size: self.text.font_size,
            text_color: self.text.color.clone(),
            fill_color: self.fill_color.clone(),
            draw_color: self.draw_color.clone(),
            line_width: self.line_width,
        });
        Ok(self)
    }

    /// `Q`, restoring what the matching save recorded.
    ///
    /// Unlike a bare `Q`, an unbalanced restore is guarded: without a
    /// matching save it logs a warning and writes nothing, so the content
    /// stream never pops below its own state.
    pub fn restore_graphics_state(&mut self) -> Result<&mut Self> {
        self.pages.current()?;
        let Some(saved) = self.gstack.pop() else {
            tracing::warn!("restore_graphics_state without a matching save");
            return Ok(self);
        };
        self.out("Q")?;
        self.text.font_key = saved.font_key;
        self.text.font_size = saved.font_size;
        self.text.color = saved.text_color;
        self.fill_color = saved.fill_color;
        self.draw_color = saved.draw_color;
        self.line_width = saved.line_width;
        Ok(self)
    }

    // Coordinate modes

    /// Switches to extended mode: coordinates pass through unchanged under a
    /// basis matrix pushed on every page that gets drawn on.
    pub fn enter_extended_mode(&mut self) -> Result<&mut Self> {
        if self.transformer.is_extended() {
            return Ok(self);
        }
        self.transformer.set_mode(CoordinateMode::Extended);
        self.text.font_size /= self.transformer.scale_factor();
        if self.pages.count() > 0 {
            self.sync_basis()?;
        }
        tracing::debug!("entered extended coordinate mode");
        Ok(self)
    }

    pub fn exit_extended_mode(&mut self) -> Result<&mut Self> {
        if !self.transformer.is_extended() {
            return Ok(self);
        }
        if self.in_render_target() {
            return Err(PdfError::RenderTarget(
                "cannot leave extended mode inside a form object or pattern".to_string(),
            ));
        }
        self.transformer.set_mode(CoordinateMode::Compat);
        self.text.font_size *= self.transformer.scale_factor();
        if self.pages.count() > 0 {
            self.sync_basis()?;
        }
        self.gstack.forget_active();
        tracing::debug!("left extended coordinate mode");
        Ok(self)
    }

    /// Runs `body` in extended mode, restoring the previous mode afterwards.
    pub fn extended<F>(&mut self, body: F) -> Result<&mut Self>
    where
        F: FnOnce(&mut Self) -> Result<()>,
    {
        let was_extended = self.transformer.is_extended();
        self.enter_extended_mode()?;
        let result = body(self);
        if !was_extended {
            self.exit_extended_mode()?;
        }
        result?;
        Ok(self)
    }

    // Patterns

    /// Registers a shading or tiling pattern under `key`; extended mode only.
    pub fn add_pattern(&mut self, key: &str, pattern: Pattern) -> Result<String> {
        self.transformer.require_extended("patterns")?;
        self.resources.add_pattern(key, pattern)
    }

    /// Paints the current path with a registered pattern.
    ///
    /// Shadings are painted through a clip of the path; tiling patterns are
    /// set as the fill color space. A stroking `style` strokes the path with
    /// the draw color afterwards.
    pub fn fill_with_pattern(&mut self, fill: &PatternFill, style: PathStyle) -> Result<&mut Self> {
        self.transformer.require_extended("pattern fill")?;
        if !style.fills() {
            return Err(PdfError::InvalidArgument(format!(
                "pattern fill needs a filling style, got {}",
                style.operator()
            )));
        }
        if let Some(matrix) = &fill.matrix {
            ensure_finite("pattern matrix", &matrix.to_array())?;
        }
        if let Some(gstate) = &fill.gstate {
            gstate.validate()?;
        }
        let start = self
            .pages
            .current()?
            .path_start()
            .ok_or_else(|| PdfError::InvalidArgument("no path to fill".to_string()))?;
        let pattern = self
            .resources
            .pattern(&fill.key)
            .cloned()
            .ok_or_else(|| PdfError::InvalidArgument(format!("unknown pattern '{}'", fill.key)))?;

        let (setup, tail) = match pattern {
            Pattern::Shading(_) => {
                let internal = self.resources.pattern_key(&fill.key).unwrap_or_default().to_string();
                let mut tail = vec![style.clip_rule().to_string()];
                if let Some(matrix) = &fill.matrix {
                    tail.push(format!("{} cm", matrix.to_pdf_string(&self.fmt)));
                }
                tail.push(format!("/{internal} sh"));
                tail.push("Q".to_string());
                if style.strokes() {
                    let path = self.pages.current()?.content()[start..].to_vec();
                    tail.extend(path);
                    tail.push("S".to_string());
                }
                let mut setup = vec!["q".to_string()];
                if let Some(gstate) = fill.gstate {
                    let key = self.resources.add_gstate(None, gstate)?;
                    setup.push(format!("/{key} gs"));
                }
                (setup, tail)
            }
            Pattern::Tiling(tiling) => {
                let basis = if self.in_render_target() {
                    Matrix::identity()
                } else {
                    self.transformer.basis_matrix(self.page_height_user()?)
                };
                let user = fill.matrix.unwrap_or_else(Matrix::identity);
                let placement = basis.multiply(&user.multiply(&tiling.matrix));
                let clone = self.resources.clone_tiling(&fill.key, placement)?;
                let mut setup = vec![
                    "q".to_string(),
                    "/Pattern cs".to_string(),
                    format!("/{clone} scn"),
                ];
                if let Some(gstate) = fill.gstate.or(tiling.gstate) {
                    let key = self.resources.add_gstate(None, gstate)?;
                    setup.push(format!("/{key} gs"));
                }
                (setup, vec![style.operator().to_string(), "Q".to_string()])
            }
        };

        let page = self.pages.current_mut()?;
        for (offset, line) in setup.into_iter().enumerate() {
            page.insert_line(start + offset, line);
        }
        for line in tail {
            page.out(line);
        }
        page.take_path_start();
        Ok(self)
    }

    // Helpers

    /// `x y` operands of a user-space point.
    pub(crate) fn point(&self, x: f64, y: f64) -> Result<String> {
        let height = match self.transformer.mode() {
            CoordinateMode::Compat => self.page_height_user()?,
            CoordinateMode::Extended => 0.0,
        };
        Ok(format!(
            "{} {}",
            self.fmt.hpf(self.transformer.transform_x(x)),
            self.fmt.hpf(self.transformer.transform_y(y, height))
        ))
    }

    /// Writes a state operator to the current page, or only records it when
    /// there is no page yet; new pages replay the recorded state.
    fn out_state(&mut self, line: &str) -> Result<()> {
        if self.pages.count() == 0 {
            return Ok(());
        }
        self.out(line)
    }

    fn finish_shape(&mut self, style: Option<PathStyle>) -> Result<&mut Self> {
        match style {
            Some(style) => self.paint(style),
            None => Ok(self),
        }
    }
}
