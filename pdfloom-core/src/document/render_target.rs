//! Form XObjects and tiling pattern cells.
//!
//! Opening a render target parks the document's pages and graphics state
//! on a stack and records drawing into a fresh single-page buffer. The
//! returned [`RenderTarget`] guard puts everything back when it is ended or
//! dropped.

use super::Document;
use crate::error::{ensure_finite, PdfError, Result};
use crate::geometry::{Matrix, Rectangle};
use crate::graphics::{GraphicsStateStack, Pattern, TilingPattern};
use crate::page::{Page, PageContext, PageManager};
use crate::resources::FormObject;
use std::ops::{Deref, DerefMut};

#[derive(Debug)]
pub(crate) enum TargetKind {
    Form { bbox: Rectangle, matrix: Matrix },
    Tiling(TilingPattern),
}

/// State parked while a render target is open.
#[derive(Debug)]
pub(crate) struct DocumentSnapshot {
    pages: PageManager,
    gstack: GraphicsStateStack,
    kind: TargetKind,
}

/// Scoped recording of a form object or tiling pattern cell.
///
/// Derefs to the [`Document`], so every drawing call is available. Call
/// [`end`](Self::end) to register what was drawn; dropping the guard instead
/// discards it.
#[derive(Debug)]
pub struct RenderTarget<'a> {
    doc: &'a mut Document,
    finished: bool,
}

impl RenderTarget<'_> {
    /// Registers the recorded content under `key` and returns its resource
    /// name (`Xo1`, `P2`, ...). A key already in use keeps its first content.
    pub fn end(mut self, key: &str) -> Result<String> {
        self.finished = true;
        self.doc.end_render_target(key)
    }

    /// Same as [`end`](Self::end), failing when the target is a form object.
    pub fn end_tiling_pattern(self, key: &str) -> Result<String> {
        let is_tiling = matches!(
            self.doc.snapshots.last().map(|s| &s.kind),
            Some(TargetKind::Tiling(_))
        );
        if !is_tiling {
            return Err(PdfError::RenderTarget(
                "the open render target is not a tiling pattern".to_string(),
            ));
        }
        self.end(key)
    }
}

impl Deref for RenderTarget<'_> {
    type Target = Document;

    fn deref(&self) -> &Document {
        &*self.doc
    }
}

impl DerefMut for RenderTarget<'_> {
    fn deref_mut(&mut self) -> &mut Document {
        &mut *self.doc
    }
}

impl Drop for RenderTarget<'_> {
    fn drop(&mut self) {
        if !self.finished {
            self.doc.discard_render_target();
        }
    }
}

impl Document {
    /// Starts recording a form object with bounding box `bbox` in form
    /// space and `matrix` mapping form space into user space. Extended mode
    /// only.
    pub fn begin_form_object(&mut self, bbox: Rectangle, matrix: Matrix) -> Result<RenderTarget<'_>> {
        self.transformer.require_extended("form objects")?;
        ensure_finite("form matrix", &matrix.to_array())?;
        check_bbox(&bbox)?;
        self.push_render_target(TargetKind::Form { bbox, matrix }, bbox);
        Ok(RenderTarget {
            doc: self,
            finished: false,
        })
    }

    /// Starts recording the cell of a tiling pattern. Extended mode only.
    pub fn begin_tiling_pattern(&mut self, pattern: TilingPattern) -> Result<RenderTarget<'_>> {
        self.transformer.require_extended("tiling patterns")?;
        pattern.validate()?;
        check_bbox(&pattern.bbox)?;
        let bbox = pattern.bbox;
        self.push_render_target(TargetKind::Tiling(pattern), bbox);
        Ok(RenderTarget {
            doc: self,
            finished: false,
        })
    }

    /// Draws the form object registered under `key`, placed with `matrix`.
    pub fn do_form_object(&mut self, key: &str, matrix: Matrix) -> Result<&mut Self> {
        self.transformer.require_extended("form objects")?;
        ensure_finite("form matrix", &matrix.to_array())?;
        let internal = self
            .resources
            .form_key(key)
            .ok_or_else(|| PdfError::InvalidArgument(format!("unknown form object '{key}'")))?
            .to_string();
        let placement = format!("{} cm", matrix.to_pdf_string(&self.fmt));
        let page = self.pages.current_mut()?;
        page.out("q");
        page.out(placement);
        page.out(format!("/{internal} Do"));
        page.out("Q");
        Ok(self)
    }

    /// Number of render targets currently open.
    pub fn render_target_depth(&self) -> usize {
        self.snapshots.len()
    }

    fn push_render_target(&mut self, kind: TargetKind, bbox: Rectangle) {
        let snapshot = DocumentSnapshot {
            pages: std::mem::take(&mut self.pages),
            gstack: std::mem::take(&mut self.gstack),
            kind,
        };
        self.snapshots.push(snapshot);

        let mut context = PageContext::new(bbox.width(), bbox.height(), 1.0);
        context.media_box = bbox;
        self.pages.add(Page::new(context));
        tracing::debug!(depth = self.snapshots.len(), "render target opened");
    }

    fn end_render_target(&mut self, key: &str) -> Result<String> {
        let snapshot = self
            .snapshots
            .pop()
            .ok_or_else(|| PdfError::RenderTarget("no render target is open".to_string()))?;
        let body = std::mem::replace(&mut self.pages, snapshot.pages);
        self.gstack = snapshot.gstack;
        let content = body
            .iter()
            .next()
            .map(|page| page.content().to_vec())
            .unwrap_or_default();

        match snapshot.kind {
            TargetKind::Form { bbox, matrix } => Ok(self.resources.add_form(
                key,
                FormObject {
                    bbox,
                    matrix,
                    content,
                    object_id: None,
                },
            )),
            TargetKind::Tiling(mut pattern) => {
                pattern.content = content;
                self.resources.add_pattern(key, Pattern::Tiling(pattern))
            }
        }
    }

    fn discard_render_target(&mut self) {
        if let Some(snapshot) = self.snapshots.pop() {
            self.pages = snapshot.pages;
            self.gstack = snapshot.gstack;
            tracing::warn!("render target dropped without end, recorded content discarded");
        }
    }
}

fn check_bbox(bbox: &Rectangle) -> Result<()> {
    ensure_finite("bbox", &bbox.to_array())?;
    if bbox.width() <= 0.0 || bbox.height() <= 0.0 {
        return Err(PdfError::InvalidArgument("empty bounding box".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coordinates::Unit;
    use crate::geometry::Point;
    use crate::graphics::{PathStyle, PatternFill};
    use crate::DocumentOptions;

    fn doc() -> Document {
        let options = DocumentOptions::new().unit(Unit::Pt).format((200.0, 100.0));
        let mut doc = Document::with_options(options).unwrap();
        doc.add_page().unwrap();
        doc.enter_extended_mode().unwrap();
        doc
    }

    fn square(side: f64) -> Rectangle {
        Rectangle::new(Point::origin(), Point::new(side, side))
    }

    #[test]
    fn test_form_object_records_and_draws() {
        let mut doc = doc();
        let before = doc.pages.current().unwrap().content().len();

        let mut form = doc.begin_form_object(square(10.0), Matrix::identity()).unwrap();
        form.rect(0.0, 0.0, 10.0, 10.0, Some(PathStyle::Fill)).unwrap();
        assert_eq!(form.render_target_depth(), 1);
        let key = form.end("box").unwrap();
        assert_eq!(key, "Xo1");

        assert_eq!(doc.render_target_depth(), 0);
        assert_eq!(doc.pages.current().unwrap().content().len(), before);
        let recorded = doc.resources.form("box").unwrap();
        assert_eq!(recorded.content, vec!["0. 0. 10. 10. re", "f"]);

        doc.do_form_object("box", Matrix::translation(5.0, 5.0)).unwrap();
        let content = doc.pages.current().unwrap().content().to_vec();
        assert_eq!(&content[before..], ["q", "1. 0. 0. 1. 5. 5. cm", "/Xo1 Do", "Q"]);
    }

    #[test]
    fn test_dropped_guard_discards_content() {
        let mut doc = doc();
        {
            let mut form = doc.begin_form_object(square(10.0), Matrix::identity()).unwrap();
            form.rect(0.0, 0.0, 1.0, 1.0, Some(PathStyle::Fill)).unwrap();
        }
        assert_eq!(doc.render_target_depth(), 0);
        assert!(doc.resources.forms.is_empty());
        assert_eq!(doc.page_count(), 1);
    }

    #[test]
    fn test_nested_targets() {
        let mut doc = doc();
        let mut outer = doc.begin_form_object(square(20.0), Matrix::identity()).unwrap();
        {
            let mut inner = outer.begin_form_object(square(5.0), Matrix::identity()).unwrap();
            inner.circle(2.0, 2.0, 1.0, Some(PathStyle::Fill)).unwrap();
            inner.end("dot").unwrap();
        }
        outer.do_form_object("dot", Matrix::identity()).unwrap();
        outer.end("twice").unwrap();
        let forms: Vec<_> = doc.resources.forms.keys().cloned().collect();
        assert_eq!(forms, vec!["Xo1", "Xo2"]);
        assert!(doc.resources.form("twice").unwrap().content.contains(&"/Xo1 Do".to_string()));
    }

    #[test]
    fn test_page_changes_blocked_inside_target() {
        let mut doc = doc();
        let mut form = doc.begin_form_object(square(10.0), Matrix::identity()).unwrap();
        assert!(matches!(form.add_page(), Err(PdfError::RenderTarget(_))));
        assert!(matches!(form.exit_extended_mode(), Err(PdfError::RenderTarget(_))));
        form.end("empty").unwrap();
    }

    #[test]
    fn test_tiling_pattern_cell() {
        let mut doc = doc();
        let cell = TilingPattern::new(square(4.0), 4.0, 4.0);
        let mut target = doc.begin_tiling_pattern(cell).unwrap();
        target.circle(2.0, 2.0, 1.0, Some(PathStyle::Fill)).unwrap();
        let key = target.end_tiling_pattern("dots").unwrap();
        assert_eq!(key, "P1");
        match doc.resources.pattern("dots") {
            Some(Pattern::Tiling(tiling)) => assert_eq!(tiling.content().len(), 6),
            other => panic!("unexpected pattern {other:?}"),
        }

        doc.rect(0.0, 0.0, 50.0, 50.0, None).unwrap();
        doc.fill_with_pattern(&PatternFill::new("dots"), PathStyle::Fill).unwrap();
        assert_eq!(doc.resources.patterns.len(), 2);
    }

    #[test]
    fn test_forms_need_extended_mode() {
        let options = DocumentOptions::new().unit(Unit::Pt);
        let mut doc = Document::with_options(options).unwrap();
        doc.add_page().unwrap();
        assert!(matches!(
            doc.begin_form_object(square(1.0), Matrix::identity()),
            Err(PdfError::ModeViolation(_))
        ));
        let form = doc.begin_tiling_pattern(TilingPattern::new(square(1.0), 0.0, 1.0));
        assert!(form.is_err());
    }

    #[test]
    fn test_end_tiling_pattern_rejects_forms() {
        let mut doc = doc();
        let form = doc.begin_form_object(square(1.0), Matrix::identity()).unwrap();
        assert!(form.end_tiling_pattern("x").is_err());
        assert_eq!(doc.render_target_depth(), 0);
    }
}
