//! The document builder.
//!
//! A [`Document`] collects page content and resources as drawing calls come
//! in; nothing is numbered or serialized until [`Document::build`].

mod drawing;
mod images;
mod options;
mod output;
mod render_target;
mod text;

pub use options::{DisplayMode, DocumentMetadata, DocumentOptions, Layout, PageMode, Zoom};
pub use output::{Output, OutputType};
pub use render_target::RenderTarget;

use crate::coordinates::{CoordinateMode, CoordinateTransformer};
use crate::error::{ensure_finite, PdfError, Result};
use crate::format::NumberFormat;
use crate::geometry::{Point, Rectangle};
use crate::graphics::{ColorRole, ColorSpec, GraphicsStateStack, LineCap, LineJoin};
use crate::objects::{Dictionary, ObjectId, Stream};
use crate::page::{Orientation, Page, PageBox, PageContext, PageFormat, PageManager};
use crate::resources::ResourceRegistry;
use crate::text::TextStateUse;
use render_target::DocumentSnapshot;

/// Default line width, 0.200025 user units as in the usual mm setup.
pub(crate) const DEFAULT_LINE_WIDTH: f64 = 0.200025;

/// An object written between the pages and the resources.
#[derive(Debug, Clone)]
pub enum AdditionalObject {
    Dictionary(Dictionary),
    Stream(Stream),
}

/// Font and text settings applied to the next text call.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct TextState {
    pub font_key: String,
    /// In content-stream units; divided by the scale factor in extended mode
    pub font_size: f64,
    pub line_height_factor: f64,
    pub char_space: f64,
    pub r2l: bool,
    pub color: String,
    pub state_use: TextStateUse,
}

/// Geometry of one page, in user units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageInfo {
    pub number: usize,
    pub width: f64,
    pub height: f64,
    /// Page dictionary object, known after a build
    pub object_id: Option<ObjectId>,
}

/// A PDF document under construction.
///
/// # Example
///
/// ```rust
/// use pdfloom::{Document, DocumentOptions, PathStyle, Unit};
///
/// let mut doc = Document::with_options(DocumentOptions::new().unit(Unit::Pt))?;
/// doc.add_page()?;
/// doc.text("Hello", 72.0, 72.0, None)?;
/// doc.rect(72.0, 100.0, 200.0, 50.0, Some(PathStyle::Stroke))?;
/// let bytes = doc.build()?;
/// assert!(bytes.starts_with(b"%PDF-1.3"));
/// # Ok::<(), pdfloom::PdfError>(())
/// ```
#[derive(Debug)]
pub struct Document {
    pub(crate) options: DocumentOptions,
    pub(crate) metadata: DocumentMetadata,
    pub(crate) display: DisplayMode,
    pub(crate) fmt: NumberFormat,
    pub(crate) transformer: CoordinateTransformer,
    pub(crate) pages: PageManager,
    pub(crate) resources: ResourceRegistry,
    pub(crate) gstack: GraphicsStateStack,
    pub(crate) text: TextState,
    pub(crate) fill_color: String,
    pub(crate) draw_color: String,
    /// In user units
    pub(crate) line_width: f64,
    pub(crate) line_cap: LineCap,
    pub(crate) line_join: LineJoin,
    pub(crate) snapshots: Vec<DocumentSnapshot>,
    pub(crate) additional_objects: Vec<AdditionalObject>,
    pub(crate) additional_object_ids: Vec<ObjectId>,
    pub(crate) file_id: Option<String>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Creates an empty document with default options: millimeters, A4
    /// portrait, no pages yet.
    pub fn new() -> Self {
        Self::from_valid_options(DocumentOptions::default())
    }

    pub fn with_options(options: DocumentOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self::from_valid_options(options))
    }

    fn from_valid_options(options: DocumentOptions) -> Self {
        let fmt = NumberFormat::new(options.precision, options.float_precision);
        let transformer = CoordinateTransformer::new(options.unit, options.px_scaling_hotfix);
        let resources = ResourceRegistry::new();
        let font_key = resources
            .font_key("helvetica", Default::default())
            .unwrap_or("F1")
            .to_string();
        Self {
            options,
            metadata: DocumentMetadata::default(),
            display: DisplayMode::default(),
            fmt,
            transformer,
            pages: PageManager::new(),
            resources,
            gstack: GraphicsStateStack::new(),
            text: TextState {
                font_key,
                font_size: 16.0,
                line_height_factor: 1.15,
                char_space: 0.0,
                r2l: false,
                color: "0 g".to_string(),
                state_use: TextStateUse::default(),
            },
            fill_color: "0 g".to_string(),
            draw_color: "0 G".to_string(),
            line_width: DEFAULT_LINE_WIDTH,
            line_cap: LineCap::Butt,
            line_join: LineJoin::Miter,
            snapshots: Vec::new(),
            additional_objects: Vec::new(),
            additional_object_ids: Vec::new(),
            file_id: None,
        }
    }

    pub fn options(&self) -> &DocumentOptions {
        &self.options
    }

    pub fn metadata(&self) -> &DocumentMetadata {
        &self.metadata
    }

    pub fn set_metadata(&mut self, metadata: DocumentMetadata) -> &mut Self {
        self.metadata = metadata;
        self
    }

    pub fn set_title(&mut self, title: impl Into<String>) -> &mut Self {
        self.metadata.title = Some(title.into());
        self
    }

    pub fn set_subject(&mut self, subject: impl Into<String>) -> &mut Self {
        self.metadata.subject = Some(subject.into());
        self
    }

    pub fn set_author(&mut self, author: impl Into<String>) -> &mut Self {
        self.metadata.author = Some(author.into());
        self
    }

    pub fn set_keywords(&mut self, keywords: impl Into<String>) -> &mut Self {
        self.metadata.keywords = Some(keywords.into());
        self
    }

    pub fn set_creator(&mut self, creator: impl Into<String>) -> &mut Self {
        self.metadata.creator = Some(creator.into());
        self
    }

    pub fn display_mode(&self) -> DisplayMode {
        self.display
    }

    pub fn set_display_mode(&mut self, display: DisplayMode) -> &mut Self {
        self.display = display;
        self
    }

    pub fn coordinate_mode(&self) -> CoordinateMode {
        self.transformer.mode()
    }

    pub fn scale_factor(&self) -> f64 {
        self.transformer.scale_factor()
    }

    /// Queues an object written right after the pages; returns its index
    /// for [`additional_object_id`](Self::additional_object_id).
    pub fn add_object(&mut self, object: AdditionalObject) -> usize {
        self.additional_objects.push(object);
        self.additional_objects.len() - 1
    }

    /// Object id of a queued object, known after a build.
    pub fn additional_object_id(&self, index: usize) -> Option<ObjectId> {
        self.additional_object_ids.get(index).copied()
    }

    // Pages

    /// Appends a page in the default format and orientation.
    pub fn add_page(&mut self) -> Result<&mut Self> {
        let format = self.options.format.clone();
        let orientation = self.options.orientation;
        self.add_page_with(format, orientation)
    }

    pub fn add_page_with(&mut self, format: impl Into<PageFormat>, orientation: Orientation) -> Result<&mut Self> {
        self.ensure_page_target("add a page")?;
        let (width, height) = format
            .into()
            .dimensions(self.transformer.scale_factor(), orientation)?;
        let page = Page::new(PageContext::new(width, height, self.options.user_unit));
        let number = self.pages.add(page);
        tracing::debug!(number, width, height, "page added");

        self.sync_basis()?;
        self.begin_page_state()?;
        Ok(self)
    }

    /// Adds a page and moves it in front of page `before`.
    pub fn insert_page(&mut self, before: usize) -> Result<&mut Self> {
        if before == 0 || before > self.pages.count() {
            return Err(PdfError::InvalidPageNumber(before));
        }
        self.add_page()?;
        let last = self.pages.count();
        self.move_page(last, before)
    }

    pub fn set_page(&mut self, number: usize) -> Result<&mut Self> {
        self.ensure_page_target("switch pages")?;
        self.pages.set_current(number)?;
        self.gstack.forget_active();
        self.sync_basis()?;
        Ok(self)
    }

    pub fn delete_page(&mut self, number: usize) -> Result<&mut Self> {
        self.ensure_page_target("delete a page")?;
        self.pages.delete(number)?;
        self.gstack.forget_active();
        if self.pages.count() > 0 {
            self.sync_basis()?;
        }
        Ok(self)
    }

    /// Moves page `from` to position `to` and makes it current.
    pub fn move_page(&mut self, from: usize, to: usize) -> Result<&mut Self> {
        self.ensure_page_target("move a page")?;
        self.pages.move_page(from, to)?;
        self.gstack.forget_active();
        self.sync_basis()?;
        Ok(self)
    }

    pub fn page_count(&self) -> usize {
        self.pages.count()
    }

    /// 0 when the document has no pages.
    pub fn current_page_number(&self) -> usize {
        self.pages.current_number()
    }

    pub fn page_info(&self, number: usize) -> Result<PageInfo> {
        let context = self.pages.get(number)?.context();
        let sf = self.transformer.scale_factor();
        Ok(PageInfo {
            number,
            width: context.width() / sf,
            height: context.height() / sf,
            object_id: context.object_id,
        })
    }

    /// Width of the current page in user units.
    pub fn page_width(&self) -> Result<f64> {
        Ok(self.pages.current()?.context().width() / self.transformer.scale_factor())
    }

    /// Height of the current page in user units.
    pub fn page_height(&self) -> Result<f64> {
        self.page_height_user()
    }

    /// Sets a box of the current page. `rect` is in user units measured
    /// from the lower-left corner of the page.
    pub fn set_page_box(&mut self, kind: PageBox, rect: Rectangle) -> Result<&mut Self> {
        ensure_finite(
            "page box",
            &[rect.lower_left.x, rect.lower_left.y, rect.upper_right.x, rect.upper_right.y],
        )?;
        let sf = self.transformer.scale_factor();
        let scaled = Rectangle::new(
            Point::new(rect.lower_left.x * sf, rect.lower_left.y * sf),
            Point::new(rect.upper_right.x * sf, rect.upper_right.y * sf),
        );
        self.pages.current_mut()?.context_mut().set_box(kind, scaled);
        Ok(self)
    }

    // Internal helpers

    /// Appends a content line to the current page.
    pub(crate) fn out(&mut self, line: impl Into<String>) -> Result<()> {
        self.pages.current_mut()?.out(line);
        Ok(())
    }

    pub(crate) fn out_path(&mut self, line: impl Into<String>) -> Result<()> {
        self.pages.current_mut()?.out_path(line);
        Ok(())
    }

    pub(crate) fn page_height_user(&self) -> Result<f64> {
        Ok(self.pages.current()?.context().height() / self.transformer.scale_factor())
    }

    pub(crate) fn in_render_target(&self) -> bool {
        !self.snapshots.is_empty()
    }

    fn ensure_page_target(&self, action: &str) -> Result<()> {
        if self.in_render_target() {
            return Err(PdfError::RenderTarget(format!(
                "cannot {action} while a form object or pattern is open"
            )));
        }
        Ok(())
    }

    /// Emits the line state and colors every new page starts with.
    fn begin_page_state(&mut self) -> Result<()> {
        self.gstack.forget_active();
        let width = self.fmt.hpf(self.transformer.scale(self.line_width));
        self.out(format!("{width} w"))?;
        let draw_color = self.draw_color.clone();
        self.out(draw_color)?;
        if self.fill_color != "0 g" {
            let fill_color = self.fill_color.clone();
            self.out(fill_color)?;
        }
        if self.line_cap != LineCap::Butt {
            self.out(format!("{} J", self.line_cap as u8))?;
        }
        if self.line_join != LineJoin::Miter {
            self.out(format!("{} j", self.line_join as u8))?;
        }
        Ok(())
    }

    /// Makes the current page's basis transform agree with the coordinate
    /// mode: pushed once in extended mode, popped in compat mode.
    pub(crate) fn sync_basis(&mut self) -> Result<()> {
        if self.in_render_target() {
            return Ok(());
        }
        let extended = self.transformer.is_extended();
        let height = self.page_height_user()?;
        let lines = self.transformer.basis_lines(height, &self.fmt);
        let page = self.pages.current_mut()?;
        let depth = page.context().basis_depth;
        if extended && depth == 0 {
            for line in lines {
                page.out(line);
            }
            page.context_mut().basis_depth = 1;
        } else if !extended && depth > 0 {
            for _ in 0..depth {
                page.out("Q");
            }
            page.context_mut().basis_depth = 0;
        }
        Ok(())
    }

    pub(crate) fn encode_color(&self, color: &ColorSpec, role: ColorRole) -> Result<String> {
        color.encode(role, &self.fmt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coordinates::Unit;
    use crate::page::Orientation;

    fn pt_document() -> Document {
        Document::with_options(DocumentOptions::new().unit(Unit::Pt)).unwrap()
    }

    #[test]
    fn test_new_document_has_no_pages() {
        let mut doc = Document::new();
        assert_eq!(doc.page_count(), 0);
        assert_eq!(doc.current_page_number(), 0);
        assert!(matches!(doc.out("0 g"), Err(PdfError::NoCurrentPage)));
        assert!(matches!(doc.page_width(), Err(PdfError::NoCurrentPage)));
    }

    #[test]
    fn test_invalid_options_are_rejected() {
        assert!(Document::with_options(DocumentOptions::new().user_unit(-1.0)).is_err());
    }

    #[test]
    fn test_add_page_starts_with_line_state() {
        let mut doc = Document::new();
        doc.add_page().unwrap();
        let content = doc.pages.current().unwrap().content().to_vec();
        assert_eq!(content.len(), 2);
        assert!(content[0].starts_with("0.567") && content[0].ends_with(" w"));
        assert_eq!(content[1], "0 G");
        assert!((doc.page_width().unwrap() - 210.0).abs() < 0.01);
        assert!((doc.page_height().unwrap() - 297.0).abs() < 0.01);
    }

    #[test]
    fn test_landscape_page_swaps_sides() {
        let mut doc = pt_document();
        doc.add_page_with("a4", Orientation::Landscape).unwrap();
        let info = doc.page_info(1).unwrap();
        assert!(info.width > info.height);
        assert_eq!(info.object_id, None);
    }

    #[test]
    fn test_page_navigation() {
        let mut doc = pt_document();
        for _ in 0..3 {
            doc.add_page().unwrap();
        }
        assert_eq!(doc.current_page_number(), 3);
        doc.set_page(1).unwrap();
        assert_eq!(doc.current_page_number(), 1);
        assert!(matches!(doc.set_page(4), Err(PdfError::InvalidPageNumber(4))));

        doc.insert_page(2).unwrap();
        assert_eq!(doc.page_count(), 4);
        assert_eq!(doc.current_page_number(), 2);

        doc.delete_page(2).unwrap();
        assert_eq!(doc.page_count(), 3);
        assert!(matches!(doc.insert_page(0), Err(PdfError::InvalidPageNumber(0))));
    }

    #[test]
    fn test_set_page_box_scales_to_points() {
        let mut doc = Document::with_options(DocumentOptions::new().unit(Unit::In)).unwrap();
        doc.add_page().unwrap();
        doc.set_page_box(PageBox::Crop, Rectangle::new(Point::new(1.0, 1.0), Point::new(2.0, 3.0)))
            .unwrap();
        let crop = doc.pages.current().unwrap().context().crop_box.unwrap();
        assert_eq!(crop.lower_left, Point::new(72.0, 72.0));
        assert_eq!(crop.upper_right, Point::new(144.0, 216.0));
    }

    #[test]
    fn test_additional_objects_are_indexed() {
        let mut doc = pt_document();
        let index = doc.add_object(AdditionalObject::Dictionary(Dictionary::new()));
        assert_eq!(index, 0);
        assert_eq!(doc.additional_object_id(index), None);
    }
}
