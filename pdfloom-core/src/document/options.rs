use crate::coordinates::Unit;
use crate::error::{PdfError, Result};
use crate::format::{round_to_precision, FloatPrecision};
use crate::page::{Orientation, PageFormat};
use chrono::{DateTime, FixedOffset, Local};
use std::str::FromStr;

/// Construction options of a [`Document`](crate::Document).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DocumentOptions {
    pub orientation: Orientation,
    pub unit: Unit,
    /// Default format for new pages
    pub format: PageFormat,
    /// Flate-compress content and image streams
    pub compress: bool,
    /// Write only fonts that some text call used
    pub put_only_used_fonts: bool,
    /// Overrides every number precision when set
    pub precision: Option<usize>,
    pub float_precision: FloatPrecision,
    /// Pixels are 72/96 points instead of 96/72
    pub px_scaling_hotfix: bool,
    pub user_unit: f64,
    pub pdf_version: String,
}

impl Default for DocumentOptions {
    fn default() -> Self {
        Self {
            orientation: Orientation::Portrait,
            unit: Unit::Mm,
            format: PageFormat::default(),
            compress: false,
            put_only_used_fonts: false,
            precision: None,
            float_precision: FloatPrecision::Smart,
            px_scaling_hotfix: false,
            user_unit: 1.0,
            pdf_version: "1.3".to_string(),
        }
    }
}

impl DocumentOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn unit(mut self, unit: Unit) -> Self {
        self.unit = unit;
        self
    }

    pub fn format(mut self, format: impl Into<PageFormat>) -> Self {
        self.format = format.into();
        self
    }

    pub fn compress(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }

    pub fn put_only_used_fonts(mut self, only_used: bool) -> Self {
        self.put_only_used_fonts = only_used;
        self
    }

    pub fn precision(mut self, digits: usize) -> Self {
        self.precision = Some(digits);
        self
    }

    pub fn float_precision(mut self, precision: FloatPrecision) -> Self {
        self.float_precision = precision;
        self
    }

    pub fn px_scaling_hotfix(mut self, enabled: bool) -> Self {
        self.px_scaling_hotfix = enabled;
        self
    }

    pub fn user_unit(mut self, user_unit: f64) -> Self {
        self.user_unit = user_unit;
        self
    }

    pub fn pdf_version(mut self, version: impl Into<String>) -> Self {
        self.pdf_version = version.into();
        self
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if !self.user_unit.is_finite() || self.user_unit <= 0.0 {
            return Err(PdfError::InvalidArgument(format!("user unit {}", self.user_unit)));
        }
        let version_ok = self
            .pdf_version
            .split_once('.')
            .map(|(major, minor)| {
                !major.is_empty()
                    && !minor.is_empty()
                    && major.chars().chain(minor.chars()).all(|c| c.is_ascii_digit())
            })
            .unwrap_or(false);
        if !version_ok {
            return Err(PdfError::InvalidArgument(format!(
                "pdf version '{}'",
                self.pdf_version
            )));
        }
        if self.compress && !cfg!(feature = "compression") {
            tracing::warn!("compress requested without the compression feature, writing plain streams");
        }
        Ok(())
    }
}

/// Document information dictionary entries.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentMetadata {
    pub title: Option<String>,
    pub subject: Option<String>,
    pub author: Option<String>,
    pub keywords: Option<String>,
    pub creator: Option<String>,
    pub producer: String,
    pub creation_date: DateTime<FixedOffset>,
}

impl Default for DocumentMetadata {
    fn default() -> Self {
        Self {
            title: None,
            subject: None,
            author: None,
            keywords: None,
            creator: None,
            producer: format!("pdfloom {}", env!("CARGO_PKG_VERSION")),
            creation_date: {
                let now = Local::now();
                now.with_timezone(now.offset())
            },
        }
    }
}

impl DocumentMetadata {
    /// `D:YYYYMMDDHHmmSS+HH'mm'`
    pub fn pdf_date(&self) -> String {
        let date = self.creation_date;
        let offset = date.offset().local_minus_utc();
        let sign = if offset < 0 { '-' } else { '+' };
        let offset = offset.abs();
        format!(
            "D:{}{sign}{:02}'{:02}'",
            date.format("%Y%m%d%H%M%S"),
            offset / 3600,
            (offset % 3600) / 60
        )
    }
}

/// Initial zoom of the viewer.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Zoom {
    FullHeight,
    #[default]
    FullWidth,
    FullPage,
    Original,
    /// 100.0 is actual size
    Percent(f64),
}

impl FromStr for Zoom {
    type Err = PdfError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "fullheight" => Ok(Zoom::FullHeight),
            "fullwidth" => Ok(Zoom::FullWidth),
            "fullpage" => Ok(Zoom::FullPage),
            "original" => Ok(Zoom::Original),
            other => other
                .strip_suffix('%')
                .unwrap_or(other)
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite() && *v > 0.0)
                .map(Zoom::Percent)
                .ok_or_else(|| PdfError::InvalidArgument(format!("zoom mode '{s}'"))),
        }
    }
}

/// Page layout of the viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Layout {
    #[default]
    Continuous,
    Single,
    TwoLeft,
    TwoRight,
}

impl FromStr for Layout {
    type Err = PdfError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "continuous" | "onecolumn" => Ok(Layout::Continuous),
            "single" | "singlepage" => Ok(Layout::Single),
            "two" | "twoleft" | "twocolumnleft" => Ok(Layout::TwoLeft),
            "tworight" | "twocolumnright" => Ok(Layout::TwoRight),
            other => Err(PdfError::InvalidArgument(format!("layout mode '{other}'"))),
        }
    }
}

/// What the viewer shows next to the pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageMode {
    UseNone,
    UseOutlines,
    UseThumbs,
    FullScreen,
}

impl PageMode {
    pub fn pdf_name(&self) -> &'static str {
        match self {
            PageMode::UseNone => "UseNone",
            PageMode::UseOutlines => "UseOutlines",
            PageMode::UseThumbs => "UseThumbs",
            PageMode::FullScreen => "FullScreen",
        }
    }
}

impl FromStr for PageMode {
    type Err = PdfError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "UseNone" => Ok(PageMode::UseNone),
            "UseOutlines" => Ok(PageMode::UseOutlines),
            "UseThumbs" => Ok(PageMode::UseThumbs),
            "FullScreen" => Ok(PageMode::FullScreen),
            other => Err(PdfError::InvalidArgument(format!("page mode '{other}'"))),
        }
    }
}

/// Catalog display preferences.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DisplayMode {
    pub zoom: Zoom,
    pub layout: Layout,
    pub page_mode: Option<PageMode>,
}

impl DisplayMode {
    /// Value of the catalog's `/OpenAction`, `first_page` being the first
    /// page object.
    pub(crate) fn open_action(&self, first_page: &str) -> String {
        match self.zoom {
            Zoom::FullPage => format!("[{first_page} /Fit]"),
            Zoom::FullWidth => format!("[{first_page} /FitH null]"),
            Zoom::FullHeight => format!("[{first_page} /FitV null]"),
            Zoom::Original => format!("[{first_page} /XYZ null null 1]"),
            Zoom::Percent(percent) => {
                let zoom = round_to_precision(percent / 100.0, 2);
                format!("[{first_page} /XYZ null null {zoom}]")
            }
        }
    }

    pub(crate) fn layout_name(&self) -> &'static str {
        match self.layout {
            Layout::Continuous => "OneColumn",
            Layout::Single => "SinglePage",
            Layout::TwoLeft => "TwoColumnLeft",
            Layout::TwoRight => "TwoColumnRight",
        }
    }
}
