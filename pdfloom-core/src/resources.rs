//! Document-scoped resources and the resource dictionaries that name them.
//!
//! Every resource gets a stable string key when registered (`F1`, `GS2`,
//! `P3`, `Sh4`, `Xo5`, `I6`). Object numbers are only assigned while the
//! document is assembled.

use crate::error::{PdfError, Result};
use crate::geometry::{Matrix, Rectangle};
use crate::graphics::{ExtGState, Pattern, RasterImage};
use crate::objects::{Dictionary, Object, ObjectId};
use crate::text::{Font, FontStyle, STANDARD_FONTS};
use indexmap::{IndexMap, IndexSet};
use std::collections::{BTreeMap, HashMap};

const PROC_SET: &str = "[/PDF /Text /ImageB /ImageC /ImageI]";

#[derive(Debug, Clone, PartialEq)]
pub struct GStateEntry {
    pub gstate: ExtGState,
    pub object_id: Option<ObjectId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PatternEntry {
    pub pattern: Pattern,
    pub object_id: Option<ObjectId>,
    /// Sampled function of a shading
    pub(crate) function_id: Option<ObjectId>,
    /// Resource dictionary of a tiling pattern, written after all patterns
    pub(crate) resources_id: Option<ObjectId>,
    /// Copies made for pattern fills so far
    pub(crate) clones: usize,
}

/// A recorded Form XObject.
#[derive(Debug, Clone, PartialEq)]
pub struct FormObject {
    pub bbox: Rectangle,
    pub matrix: Matrix,
    pub content: Vec<String>,
    pub object_id: Option<ObjectId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImageEntry {
    pub image: RasterImage,
    pub object_id: Option<ObjectId>,
}

#[derive(Debug, Clone, Default)]
pub struct ResourceRegistry {
    pub(crate) fonts: IndexMap<String, Font>,
    font_aliases: HashMap<(String, FontStyle), String>,
    pub(crate) used_fonts: IndexSet<String>,
    pub(crate) gstates: IndexMap<String, GStateEntry>,
    gstate_aliases: HashMap<String, String>,
    pub(crate) patterns: IndexMap<String, PatternEntry>,
    pattern_aliases: HashMap<String, String>,
    pub(crate) forms: IndexMap<String, FormObject>,
    form_aliases: HashMap<String, String>,
    pub(crate) images: IndexMap<String, ImageEntry>,
    image_aliases: HashMap<String, String>,
}

impl ResourceRegistry {
    /// Registry holding the fourteen standard fonts as `F1` to `F14`.
    pub fn new() -> Self {
        let mut registry = Self::default();
        for (postscript_name, family, style) in STANDARD_FONTS {
            registry.add_font(postscript_name, family, style);
        }
        registry
    }

    /// Registers a non-embedded Type1 font under `(family, style)`, returning
    /// its key. An existing alias keeps its font.
    pub fn add_font(&mut self, postscript_name: &str, family: &str, style: FontStyle) -> String {
        let alias = (family.to_ascii_lowercase(), style);
        if let Some(key) = self.font_aliases.get(&alias) {
            return key.clone();
        }
        let key = format!("F{}", self.fonts.len() + 1);
        self.fonts
            .insert(key.clone(), Font::new(key.clone(), postscript_name, family, style));
        self.font_aliases.insert(alias, key.clone());
        key
    }

    pub fn font(&self, key: &str) -> Option<&Font> {
        self.fonts.get(key)
    }

    pub fn font_key(&self, family: &str, style: FontStyle) -> Option<&str> {
        self.font_aliases
            .get(&(family.to_ascii_lowercase(), style))
            .map(String::as_str)
    }

    /// Looks a font up by family and style, falling back to the family's
    /// normal face and then to Times.
    pub fn resolve_font(&self, family: &str, style: FontStyle) -> Result<String> {
        if let Some(key) = self.font_key(family, style) {
            return Ok(key.to_string());
        }
        let fallback = self
            .font_key(family, FontStyle::Normal)
            .or_else(|| self.font_key("times", style))
            .or_else(|| self.font_key("times", FontStyle::Normal))
            .ok_or_else(|| PdfError::InvalidArgument(format!("no font for '{family}' {style}")))?;
        tracing::warn!(family, %style, fallback, "font not registered, using fallback");
        Ok(fallback.to_string())
    }

    /// Families with their registered styles.
    pub fn font_list(&self) -> BTreeMap<String, Vec<String>> {
        let mut list: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for font in self.fonts.values() {
            list.entry(font.family.clone())
                .or_default()
                .push(font.style.as_str().to_string());
        }
        list
    }

    pub fn mark_font_used(&mut self, key: &str) {
        self.used_fonts.insert(key.to_string());
    }

    pub(crate) fn font_is_written(&self, key: &str, only_used: bool) -> bool {
        !only_used || self.used_fonts.contains(key)
    }

    /// Registers `gstate`, reusing a structurally equal one. `alias`, when
    /// given and already known, is a no-op.
    pub fn add_gstate(&mut self, alias: Option<&str>, gstate: ExtGState) -> Result<String> {
        if let Some(existing) = alias.and_then(|a| self.gstate_aliases.get(a)) {
            return Ok(existing.clone());
        }
        gstate.validate()?;

        let key = match self.gstates.iter().find(|(_, entry)| entry.gstate == gstate) {
            Some((key, _)) => key.clone(),
            None => {
                let key = format!("GS{}", self.gstates.len() + 1);
                self.gstates.insert(
                    key.clone(),
                    GStateEntry {
                        gstate,
                        object_id: None,
                    },
                );
                key
            }
        };
        if let Some(alias) = alias {
            self.gstate_aliases.insert(alias.to_string(), key.clone());
        }
        Ok(key)
    }

    /// Key of a gstate by alias or by its own key.
    pub fn gstate_key(&self, name: &str) -> Option<&str> {
        self.gstate_aliases
            .get(name)
            .map(String::as_str)
            .or_else(|| self.gstates.get_key_value(name).map(|(k, _)| k.as_str()))
    }

    /// Registers a pattern under the caller's `key`; the returned internal
    /// key names it in resource dictionaries. Re-registering a key is a no-op.
    pub fn add_pattern(&mut self, key: &str, pattern: Pattern) -> Result<String> {
        if let Some(existing) = self.pattern_aliases.get(key) {
            return Ok(existing.clone());
        }
        match &pattern {
            Pattern::Shading(shading) => shading.validate()?,
            Pattern::Tiling(tiling) => tiling.validate()?,
        }
        let prefix = match pattern {
            Pattern::Shading(_) => "Sh",
            Pattern::Tiling(_) => "P",
        };
        let internal = format!("{prefix}{}", self.patterns.len() + 1);
        self.patterns.insert(
            internal.clone(),
            PatternEntry {
                pattern,
                object_id: None,
                function_id: None,
                resources_id: None,
                clones: 0,
            },
        );
        self.pattern_aliases.insert(key.to_string(), internal.clone());
        Ok(internal)
    }

    pub fn pattern_key(&self, key: &str) -> Option<&str> {
        self.pattern_aliases.get(key).map(String::as_str)
    }

    pub fn pattern(&self, key: &str) -> Option<&Pattern> {
        self.pattern_key(key)
            .and_then(|internal| self.patterns.get(internal))
            .map(|entry| &entry.pattern)
    }

    /// Registers a copy of tiling pattern `key` placed with `matrix` and
    /// returns the copy's internal key.
    pub(crate) fn clone_tiling(&mut self, key: &str, matrix: Matrix) -> Result<String> {
        let internal = self
            .pattern_key(key)
            .ok_or_else(|| PdfError::InvalidArgument(format!("unknown pattern '{key}'")))?
            .to_string();
        let entry = self
            .patterns
            .get_mut(&internal)
            .ok_or_else(|| PdfError::InvalidArgument(format!("unknown pattern '{key}'")))?;
        let Pattern::Tiling(tiling) = &entry.pattern else {
            return Err(PdfError::InvalidArgument(format!("'{key}' is not a tiling pattern")));
        };
        let copy = tiling.clone_with_matrix(matrix);
        let alias = format!("{key}${}", entry.clones);
        entry.clones += 1;
        self.add_pattern(&alias, Pattern::Tiling(copy))
    }

    /// Registers a form object under `key`; returns its `Xo` key.
    pub fn add_form(&mut self, key: &str, form: FormObject) -> String {
        if let Some(existing) = self.form_aliases.get(key) {
            tracing::debug!(key, "form object already defined, keeping the first");
            return existing.clone();
        }
        let internal = format!("Xo{}", self.forms.len() + 1);
        self.forms.insert(internal.clone(), form);
        self.form_aliases.insert(key.to_string(), internal.clone());
        internal
    }

    pub fn form_key(&self, key: &str) -> Option<&str> {
        self.form_aliases.get(key).map(String::as_str)
    }

    pub fn form(&self, key: &str) -> Option<&FormObject> {
        self.form_key(key).and_then(|internal| self.forms.get(internal))
    }

    /// Registers an image; an `alias` seen before returns the existing key.
    pub fn add_image(&mut self, alias: Option<&str>, image: RasterImage) -> Result<String> {
        if let Some(existing) = alias.and_then(|a| self.image_aliases.get(a)) {
            return Ok(existing.clone());
        }
        image.validate()?;
        let key = format!("I{}", self.images.len() + 1);
        self.images.insert(
            key.clone(),
            ImageEntry {
                image,
                object_id: None,
            },
        );
        if let Some(alias) = alias {
            self.image_aliases.insert(alias.to_string(), key.clone());
        }
        Ok(key)
    }

    pub fn image_key(&self, alias: &str) -> Option<&str> {
        self.image_aliases.get(alias).map(String::as_str)
    }

    pub fn image(&self, key: &str) -> Option<&RasterImage> {
        self.images.get(key).map(|entry| &entry.image)
    }

    /// Forgets object numbers from a previous build.
    pub(crate) fn reset_object_ids(&mut self) {
        self.fonts.values_mut().for_each(|f| f.object_id = None);
        self.gstates.values_mut().for_each(|g| g.object_id = None);
        for entry in self.patterns.values_mut() {
            entry.object_id = None;
            entry.function_id = None;
            entry.resources_id = None;
        }
        self.forms.values_mut().for_each(|f| f.object_id = None);
        self.images.values_mut().for_each(|i| i.object_id = None);
    }

    /// Resource dictionary for the object `owner`, listing only resources
    /// with a lower object number. `None` builds the page-level dictionary,
    /// which lists everything written.
    pub fn resource_dictionary(&self, owner: Option<ObjectId>, only_used_fonts: bool) -> Dictionary {
        let visible = |id: Option<ObjectId>| match (id, owner) {
            (Some(id), Some(owner)) => id < owner,
            (Some(_), None) => true,
            (None, _) => false,
        };

        let fonts = self
            .fonts
            .iter()
            .filter(|(key, font)| self.font_is_written(key, only_used_fonts) && visible(font.object_id))
            .filter_map(|(key, font)| font.object_id.map(|id| (key.clone(), Object::from(id))))
            .collect::<Dictionary>();

        let patterns_of = |category: &str| {
            self.patterns
                .iter()
                .filter(|(_, e)| e.pattern.resource_category() == category && visible(e.object_id))
                .filter_map(|(key, e)| e.object_id.map(|id| (key.clone(), Object::from(id))))
                .collect::<Dictionary>()
        };

        let gstates = self
            .gstates
            .iter()
            .filter(|(_, g)| visible(g.object_id))
            .filter_map(|(key, g)| g.object_id.map(|id| (key.clone(), Object::from(id))))
            .collect::<Dictionary>();

        let xobjects = self
            .forms
            .iter()
            .map(|(key, form)| (key, form.object_id))
            .chain(self.images.iter().map(|(key, image)| (key, image.object_id)))
            .filter(|(_, id)| visible(*id))
            .filter_map(|(key, id)| id.map(|id| (key.clone(), Object::from(id))))
            .collect::<Dictionary>();

        let mut dict = Dictionary::new();
        dict.set("ProcSet", Object::raw(PROC_SET));
        for (category, entries) in [
            ("Font", fonts),
            ("Shading", patterns_of("Shading")),
            ("Pattern", patterns_of("Pattern")),
            ("ExtGState", gstates),
            ("XObject", xobjects),
        ] {
            if !entries.is_empty() {
                dict.set(category, entries);
            }
        }
        dict
    }
}
