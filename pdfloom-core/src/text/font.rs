//! Font descriptions for the non-embedded Type1 fonts.

use crate::error::{PdfError, Result};
use crate::objects::{Dictionary, Object, ObjectId};
use crate::text::metrics::{metrics_for, FontMetrics};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FontStyle {
    #[default]
    Normal,
    Bold,
    Italic,
    BoldItalic,
}

impl FontStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            FontStyle::Normal => "normal",
            FontStyle::Bold => "bold",
            FontStyle::Italic => "italic",
            FontStyle::BoldItalic => "bolditalic",
        }
    }

    /// Folds a numeric CSS weight into the style: 700 and above is bold.
    pub fn with_weight(self, weight: Option<u16>) -> Self {
        match (self, weight) {
            (FontStyle::Normal, Some(w)) if w >= 700 => FontStyle::Bold,
            (FontStyle::Italic, Some(w)) if w >= 700 => FontStyle::BoldItalic,
            (style, _) => style,
        }
    }
}

impl fmt::Display for FontStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FontStyle {
    type Err = PdfError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "normal" | "regular" | "roman" => Ok(FontStyle::Normal),
            "bold" => Ok(FontStyle::Bold),
            "italic" | "oblique" => Ok(FontStyle::Italic),
            "bolditalic" | "italicbold" | "boldoblique" => Ok(FontStyle::BoldItalic),
            other => Err(PdfError::InvalidArgument(format!("unknown font style '{other}'"))),
        }
    }
}

/// The fourteen standard fonts: PostScript name, family, style.
pub const STANDARD_FONTS: [(&str, &str, FontStyle); 14] = [
    ("Helvetica", "helvetica", FontStyle::Normal),
    ("Helvetica-Bold", "helvetica", FontStyle::Bold),
    ("Helvetica-Oblique", "helvetica", FontStyle::Italic),
    ("Helvetica-BoldOblique", "helvetica", FontStyle::BoldItalic),
    ("Courier", "courier", FontStyle::Normal),
    ("Courier-Bold", "courier", FontStyle::Bold),
    ("Courier-Oblique", "courier", FontStyle::Italic),
    ("Courier-BoldOblique", "courier", FontStyle::BoldItalic),
    ("Times-Roman", "times", FontStyle::Normal),
    ("Times-Bold", "times", FontStyle::Bold),
    ("Times-Italic", "times", FontStyle::Italic),
    ("Times-BoldItalic", "times", FontStyle::BoldItalic),
    ("ZapfDingbats", "zapfdingbats", FontStyle::Normal),
    ("Symbol", "symbol", FontStyle::Normal),
];

/// A registered font resource.
#[derive(Debug, Clone, PartialEq)]
pub struct Font {
    pub key: String,
    pub postscript_name: String,
    pub family: String,
    pub style: FontStyle,
    /// `None` for the symbolic fonts, which use their built-in encoding
    pub encoding: Option<&'static str>,
    pub object_id: Option<ObjectId>,
}

impl Font {
    pub fn new(key: impl Into<String>, postscript_name: &str, family: &str, style: FontStyle) -> Self {
        let encoding = match postscript_name {
            "Symbol" | "ZapfDingbats" => None,
            _ => Some("WinAnsiEncoding"),
        };
        Self {
            key: key.into(),
            postscript_name: postscript_name.to_string(),
            family: family.to_ascii_lowercase(),
            style,
            encoding,
            object_id: None,
        }
    }

    pub fn metrics(&self) -> &'static FontMetrics {
        metrics_for(&self.postscript_name)
    }

    pub fn to_dictionary(&self) -> Dictionary {
        let mut dict = Dictionary::new();
        dict.set("Type", Object::name("Font"));
        dict.set("BaseFont", Object::name(self.postscript_name.clone()));
        dict.set("Subtype", Object::name("Type1"));
        if let Some(encoding) = self.encoding {
            dict.set("Encoding", Object::name(encoding));
        }
        dict.set("FirstChar", 32);
        dict.set("LastChar", 255);
        dict
    }
}
