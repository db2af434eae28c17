//! Pages, page formats and the ordered page list.

use crate::error::{PdfError, Result};
use crate::geometry::{Point, Rectangle};
use crate::objects::ObjectId;
use std::collections::HashMap;
use std::str::FromStr;

/// Largest page side PDF readers accept, in points.
pub const MAX_PAGE_SIDE: f64 = 14400.0;

/// Page orientation requested by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

impl FromStr for Orientation {
    type Err = PdfError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "p" | "portrait" => Ok(Orientation::Portrait),
            "l" | "landscape" => Ok(Orientation::Landscape),
            other => Err(PdfError::InvalidArgument(format!("invalid orientation: {other}"))),
        }
    }
}

/// Page size, either a named format or explicit dimensions in user units.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PageFormat {
    Named(String),
    Size(f64, f64),
}

impl Default for PageFormat {
    fn default() -> Self {
        PageFormat::Named("a4".to_string())
    }
}

impl From<&str> for PageFormat {
    fn from(name: &str) -> Self {
        PageFormat::Named(name.to_string())
    }
}

impl From<(f64, f64)> for PageFormat {
    fn from((width, height): (f64, f64)) -> Self {
        PageFormat::Size(width, height)
    }
}

lazy_static::lazy_static! {
    static ref PAGE_FORMATS: HashMap<&'static str, (f64, f64)> = {
        let entries: &[(&str, (f64, f64))] = &[
            ("a0", (2383.94, 3370.39)), ("a1", (1683.78, 2383.94)),
            ("a2", (1190.55, 1683.78)), ("a3", (841.89, 1190.55)),
            ("a4", (595.28, 841.89)), ("a5", (419.53, 595.28)),
            ("a6", (297.64, 419.53)), ("a7", (209.76, 297.64)),
            ("a8", (147.40, 209.76)), ("a9", (104.88, 147.40)),
            ("a10", (73.70, 104.88)),
            ("b0", (2834.65, 4008.19)), ("b1", (2004.09, 2834.65)),
            ("b2", (1417.32, 2004.09)), ("b3", (1000.63, 1417.32)),
            ("b4", (708.66, 1000.63)), ("b5", (498.90, 708.66)),
            ("b6", (354.33, 498.90)), ("b7", (249.45, 354.33)),
            ("b8", (175.75, 249.45)), ("b9", (124.72, 175.75)),
            ("b10", (87.87, 124.72)),
            ("c0", (2599.37, 3676.54)), ("c1", (1836.85, 2599.37)),
            ("c2", (1298.27, 1836.85)), ("c3", (918.43, 1298.27)),
            ("c4", (649.13, 918.43)), ("c5", (459.21, 649.13)),
            ("c6", (323.15, 459.21)), ("c7", (229.61, 323.15)),
            ("c8", (161.57, 229.61)), ("c9", (113.39, 161.57)),
            ("c10", (79.37, 113.39)),
            ("dl", (311.81, 623.62)),
            ("letter", (612.0, 792.0)),
            ("government-letter", (576.0, 756.0)),
            ("legal", (612.0, 1008.0)),
            ("junior-legal", (576.0, 360.0)),
            ("ledger", (1224.0, 792.0)),
            ("tabloid", (792.0, 1224.0)),
            ("credit-card", (153.0, 243.0)),
        ];
        entries.iter().copied().collect()
    };
}

/// Names accepted by [`PageFormat::Named`], sorted.
pub fn page_format_names() -> Vec<&'static str> {
    let mut names: Vec<_> = PAGE_FORMATS.keys().copied().collect();
    names.sort();
    names
}

impl PageFormat {
    /// Resolves to `(width, height)` in points, applying orientation and the
    /// maximum page size.
    pub fn dimensions(&self, scale_factor: f64, orientation: Orientation) -> Result<(f64, f64)> {
        let (mut width, mut height) = match self {
            PageFormat::Named(name) => *PAGE_FORMATS
                .get(name.trim().to_ascii_lowercase().as_str())
                .ok_or_else(|| PdfError::InvalidArgument(format!("invalid format: {name}")))?,
            PageFormat::Size(w, h) => {
                if !(w.is_finite() && h.is_finite()) || *w <= 0.0 || *h <= 0.0 {
                    return Err(PdfError::InvalidArgument(format!(
                        "invalid page size: {w} x {h}"
                    )));
                }
                (w * scale_factor, h * scale_factor)
            }
        };

        if width > MAX_PAGE_SIDE || height > MAX_PAGE_SIDE {
            tracing::warn!(
                width,
                height,
                "page sides are limited to {MAX_PAGE_SIDE} points, clamping"
            );
            width = width.min(MAX_PAGE_SIDE);
            height = height.min(MAX_PAGE_SIDE);
        }

        match orientation {
            Orientation::Portrait if width > height => std::mem::swap(&mut width, &mut height),
            Orientation::Landscape if height > width => std::mem::swap(&mut width, &mut height),
            _ => {}
        }

        Ok((width, height))
    }
}

/// Optional boxes a page may declare besides its media box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageBox {
    Media,
    Crop,
    Bleed,
    Trim,
    Art,
}

impl PageBox {
    pub fn pdf_name(&self) -> &'static str {
        match self {
            PageBox::Media => "MediaBox",
            PageBox::Crop => "CropBox",
            PageBox::Bleed => "BleedBox",
            PageBox::Trim => "TrimBox",
            PageBox::Art => "ArtBox",
        }
    }
}

/// Per-page metadata. Boxes are kept in points.
#[derive(Debug, Clone, PartialEq)]
pub struct PageContext {
    pub media_box: Rectangle,
    pub crop_box: Option<Rectangle>,
    pub bleed_box: Option<Rectangle>,
    pub trim_box: Option<Rectangle>,
    pub art_box: Option<Rectangle>,
    pub user_unit: f64,
    /// Ids assigned by the last build
    pub object_id: Option<ObjectId>,
    pub contents_id: Option<ObjectId>,
    /// Open `q` pushed by extended coordinate mode on this page
    pub basis_depth: usize,
}

impl PageContext {
    pub fn new(width: f64, height: f64, user_unit: f64) -> Self {
        Self {
            media_box: Rectangle::new(Point::origin(), Point::new(width, height)),
            crop_box: None,
            bleed_box: None,
            trim_box: None,
            art_box: None,
            user_unit,
            object_id: None,
            contents_id: None,
            basis_depth: 0,
        }
    }

    pub fn width(&self) -> f64 {
        self.media_box.width()
    }

    pub fn height(&self) -> f64 {
        self.media_box.height()
    }

    pub fn set_box(&mut self, kind: PageBox, rect: Rectangle) {
        match kind {
            PageBox::Media => self.media_box = rect,
            PageBox::Crop => self.crop_box = Some(rect),
            PageBox::Bleed => self.bleed_box = Some(rect),
            PageBox::Trim => self.trim_box = Some(rect),
            PageBox::Art => self.art_box = Some(rect),
        }
    }

    /// Boxes in serialization order, media box first.
    pub fn boxes(&self) -> Vec<(PageBox, Rectangle)> {
        let mut boxes = vec![(PageBox::Media, self.media_box)];
        let optional = [
            (PageBox::Crop, self.crop_box),
            (PageBox::Bleed, self.bleed_box),
            (PageBox::Trim, self.trim_box),
            (PageBox::Art, self.art_box),
        ];
        boxes.extend(optional.into_iter().filter_map(|(k, r)| r.map(|r| (k, r))));
        boxes
    }
}

/// A page: its content-stream lines and metadata.
#[derive(Debug, Clone)]
pub struct Page {
    content: Vec<String>,
    context: PageContext,
    /// Index of the first line of the path under construction
    path_start: Option<usize>,
}

impl Page {
    pub fn new(context: PageContext) -> Self {
        Self {
            content: Vec::new(),
            context,
            path_start: None,
        }
    }

    pub fn content(&self) -> &[String] {
        &self.content
    }

    pub fn context(&self) -> &PageContext {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut PageContext {
        &mut self.context
    }

    pub fn out(&mut self, line: impl Into<String>) {
        self.content.push(line.into());
    }

    /// Appends a path-construction operator, remembering where the path began.
    pub(crate) fn out_path(&mut self, line: impl Into<String>) {
        if self.path_start.is_none() {
            self.path_start = Some(self.content.len());
        }
        self.content.push(line.into());
    }

    pub(crate) fn path_start(&self) -> Option<usize> {
        self.path_start
    }

    /// Ends the current path and returns the index of its first line.
    pub(crate) fn take_path_start(&mut self) -> Option<usize> {
        self.path_start.take()
    }

    pub(crate) fn insert_line(&mut self, index: usize, line: impl Into<String>) {
        let index = index.min(self.content.len());
        self.content.insert(index, line.into());
    }
}

/// Ordered, 1-based list of pages with a current-page pointer.
///
/// `current == 0` means there is no page yet.
#[derive(Debug, Clone, Default)]
pub struct PageManager {
    pages: Vec<Page>,
    current: usize,
}

impl PageManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        self.pages.len()
    }

    pub fn current_number(&self) -> usize {
        self.current
    }

    /// Appends `page` and makes it current; returns its number.
    pub fn add(&mut self, page: Page) -> usize {
        self.pages.push(page);
        self.current = self.pages.len();
        self.current
    }

    pub fn set_current(&mut self, number: usize) -> Result<()> {
        self.check(number)?;
        self.current = number;
        Ok(())
    }

    pub fn delete(&mut self, number: usize) -> Result<Page> {
        self.check(number)?;
        let removed = self.pages.remove(number - 1);
        if self.current > self.pages.len() {
            self.current = self.pages.len();
        } else if self.current > number {
            self.current -= 1;
        }
        Ok(removed)
    }

    /// Moves page `from` to position `to`, shifting the pages in between by
    /// one slot, and makes `to` current.
    pub fn move_page(&mut self, from: usize, to: usize) -> Result<()> {
        self.check(from)?;
        self.check(to)?;
        if from < to {
            self.pages[from - 1..to].rotate_left(1);
        } else if from > to {
            self.pages[to - 1..from].rotate_right(1);
        }
        self.current = to;
        Ok(())
    }

    pub fn get(&self, number: usize) -> Result<&Page> {
        self.check(number)?;
        Ok(&self.pages[number - 1])
    }

    pub fn get_mut(&mut self, number: usize) -> Result<&mut Page> {
        self.check(number)?;
        Ok(&mut self.pages[number - 1])
    }

    pub fn current(&self) -> Result<&Page> {
        self.pages
            .get(self.current.wrapping_sub(1))
            .ok_or(PdfError::NoCurrentPage)
    }

    pub fn current_mut(&mut self) -> Result<&mut Page> {
        self.pages
            .get_mut(self.current.wrapping_sub(1))
            .ok_or(PdfError::NoCurrentPage)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Page> {
        self.pages.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Page> {
        self.pages.iter_mut()
    }

    fn check(&self, number: usize) -> Result<()> {
        if number >= 1 && number <= self.pages.len() {
            Ok(())
        } else {
            Err(PdfError::InvalidPageNumber(number))
        }
    }
}
