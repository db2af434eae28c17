//! Serialization of a [`Document`] into PDF bytes.
//!
//! The assembler walks a fixed sequence of phases. Object numbers are
//! handed out as objects are written, except for the page tree root and the
//! shared resource dictionary, which are reserved up front as objects 1 and
//! 2 and written once everything they reference exists.

use crate::document::{AdditionalObject, Document};
use crate::error::Result;
use crate::format::box_number;
use crate::graphics::{ImageColorSpace, Pattern};
use crate::objects::{Dictionary, Object, ObjectId, Stream};
use crate::writer::{ByteSink, ObjectAllocator};
use tracing::{debug, trace};

const BINARY_MARKER: &[u8] = b"%\xBA\xDF\xAC\xE0";

/// Assembly phases, in output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Reset,
    Header,
    Pages,
    AdditionalObjects,
    Resources,
    Info,
    Catalog,
    Xref,
    Trailer,
    Done,
}

impl Phase {
    fn next(self) -> Phase {
        match self {
            Phase::Reset => Phase::Header,
            Phase::Header => Phase::Pages,
            Phase::Pages => Phase::AdditionalObjects,
            Phase::AdditionalObjects => Phase::Resources,
            Phase::Resources => Phase::Info,
            Phase::Info => Phase::Catalog,
            Phase::Catalog => Phase::Xref,
            Phase::Xref => Phase::Trailer,
            Phase::Trailer | Phase::Done => Phase::Done,
        }
    }
}

/// One build of a document. Every build starts from [`Phase::Reset`], so
/// object numbers never leak from one build into the next.
pub struct DocumentAssembler<'a> {
    doc: &'a mut Document,
    sink: ByteSink,
    allocator: ObjectAllocator,
    phase: Phase,
    root_id: ObjectId,
    resources_id: ObjectId,
    info_id: ObjectId,
    catalog_id: ObjectId,
    page_ids: Vec<ObjectId>,
    /// (tiling pattern, its resource dictionary)
    deferred_resources: Vec<(ObjectId, ObjectId)>,
    startxref: usize,
}

impl<'a> DocumentAssembler<'a> {
    pub fn new(doc: &'a mut Document) -> Self {
        // Object 0 is never written; it marks ids not assigned yet.
        let unassigned = ObjectId::from(0);
        Self {
            doc,
            sink: ByteSink::new(),
            allocator: ObjectAllocator::new(),
            phase: Phase::Reset,
            root_id: unassigned,
            resources_id: unassigned,
            info_id: unassigned,
            catalog_id: unassigned,
            page_ids: Vec::new(),
            deferred_resources: Vec::new(),
            startxref: 0,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Runs the remaining phases and returns the file.
    pub fn assemble(mut self) -> Result<Vec<u8>> {
        while self.phase != Phase::Done {
            self.step()?;
        }
        Ok(self.sink.into_bytes())
    }

    /// Runs the current phase and moves on to the next one.
    pub fn step(&mut self) -> Result<Phase> {
        match self.phase {
            Phase::Reset => self.reset(),
            Phase::Header => self.write_header(),
            Phase::Pages => self.write_pages()?,
            Phase::AdditionalObjects => self.write_additional_objects()?,
            Phase::Resources => self.write_resources()?,
            Phase::Info => self.write_info(),
            Phase::Catalog => self.write_catalog(),
            Phase::Xref => self.write_xref()?,
            Phase::Trailer => self.write_trailer(),
            Phase::Done => return Ok(Phase::Done),
        }
        debug!(
            phase = ?self.phase,
            offset = self.sink.len(),
            objects = self.allocator.object_number(),
            "assembly phase written"
        );
        self.phase = self.phase.next();
        Ok(self.phase)
    }

    fn compress(&self) -> bool {
        self.doc.options.compress && cfg!(feature = "compression")
    }

    fn reset(&mut self) {
        self.sink = ByteSink::new();
        self.allocator = ObjectAllocator::new();
        self.page_ids.clear();
        self.deferred_resources.clear();
        self.doc.resources.reset_object_ids();
        self.doc.additional_object_ids.clear();
        for page in self.doc.pages.iter_mut() {
            let context = page.context_mut();
            context.object_id = None;
            context.contents_id = None;
        }

        self.root_id = self.allocator.allocate_deferred();
        self.resources_id = self.allocator.allocate_deferred();
    }

    fn write_header(&mut self) {
        self.sink.out(&format!("%PDF-{}", self.doc.options.pdf_version));
        self.sink.out_bytes(BINARY_MARKER);
    }

    fn write_pages(&mut self) -> Result<()> {
        let compress = self.compress();

        let mut ids = Vec::with_capacity(self.doc.pages.count());
        for page in self.doc.pages.iter_mut() {
            let page_id = self.allocator.allocate_deferred();
            let contents_id = self.allocator.allocate_deferred();
            let context = page.context_mut();
            context.object_id = Some(page_id);
            context.contents_id = Some(contents_id);
            ids.push((page_id, contents_id));
        }

        for (page, (page_id, contents_id)) in self.doc.pages.iter().zip(ids.iter().copied()) {
            let context = page.context();
            let mut dict = Dictionary::new();
            dict.set("Type", Object::name("Page"));
            dict.set("Parent", self.root_id);
            dict.set("Resources", self.resources_id);
            for (kind, rect) in context.boxes() {
                let numbers = rect.to_array().map(box_number).join(" ");
                dict.set(kind.pdf_name(), Object::raw(format!("[{numbers}]")));
            }
            if context.user_unit != 1.0 {
                dict.set("UserUnit", Object::raw(box_number(context.user_unit)));
            }
            dict.set("Contents", contents_id);

            self.allocator.begin_at(page_id, &mut self.sink, true)?;
            self.sink.out_lines(dict.to_lines());
            self.sink.out("endobj");

            self.sink.redirect();
            self.sink.out_lines(page.content());
            // Extended mode left open on this page.
            for _ in 0..context.basis_depth {
                self.sink.out("Q");
            }
            let data = self.sink.restore().unwrap_or_default();

            self.allocator.begin_at(contents_id, &mut self.sink, true)?;
            put_stream(&mut self.sink, Dictionary::new(), data, compress)?;
            self.sink.out("endobj");
        }

        let kids = ids
            .iter()
            .map(|(page_id, _)| page_id.to_string())
            .collect::<Vec<_>>()
            .join(" ");
        let mut root = Dictionary::new();
        root.set("Type", Object::name("Pages"));
        root.set("Kids", Object::raw(format!("[{kids}]")));
        root.set("Count", ids.len());
        self.allocator.begin_at(self.root_id, &mut self.sink, true)?;
        self.sink.out_lines(root.to_lines());
        self.sink.out("endobj");

        self.page_ids = ids.into_iter().map(|(page_id, _)| page_id).collect();
        Ok(())
    }

    fn write_additional_objects(&mut self) -> Result<()> {
        let compress = self.compress();
        let mut ids = Vec::with_capacity(self.doc.additional_objects.len());
        for object in &self.doc.additional_objects {
            let id = self.allocator.allocate(&mut self.sink);
            match object {
                AdditionalObject::Dictionary(dict) => self.sink.out_lines(dict.to_lines()),
                AdditionalObject::Stream(stream) => put_stream(
                    &mut self.sink,
                    stream.dictionary().clone(),
                    stream.data().to_vec(),
                    compress,
                )?,
            }
            self.sink.out("endobj");
            ids.push(id);
        }
        self.doc.additional_object_ids = ids;
        Ok(())
    }

    fn write_resources(&mut self) -> Result<()> {
        self.write_fonts();
        self.write_gstates();
        self.write_forms()?;
        self.write_images()?;
        self.write_patterns()?;
        self.write_resource_dictionaries()
    }

    fn write_fonts(&mut self) {
        let only_used = self.doc.options.put_only_used_fonts;
        let resources = &mut self.doc.resources;
        let written: Vec<String> = resources
            .fonts
            .keys()
            .filter(|key| resources.font_is_written(key, only_used))
            .cloned()
            .collect();
        for key in written {
            if let Some(font) = resources.fonts.get_mut(&key) {
                let id = self.allocator.allocate(&mut self.sink);
                self.sink.out_lines(font.to_dictionary().to_lines());
                self.sink.out("endobj");
                font.object_id = Some(id);
                trace!(key, object = id.number(), "font written");
            }
        }
    }

    fn write_gstates(&mut self) {
        for (key, entry) in self.doc.resources.gstates.iter_mut() {
            let id = self.allocator.allocate(&mut self.sink);
            self.sink.out_lines(entry.gstate.to_dictionary().to_lines());
            self.sink.out("endobj");
            entry.object_id = Some(id);
            trace!(key, object = id.number(), "graphics state written");
        }
    }

    fn write_forms(&mut self) -> Result<()> {
        let compress = self.compress();
        let fmt = self.doc.fmt;
        let resources = self.resources_id;
        for (key, form) in self.doc.resources.forms.iter_mut() {
            let id = self.allocator.allocate(&mut self.sink);
            let bbox = form.bbox.to_array().map(|v| fmt.hpf(v)).join(" ");
            let mut dict = Dictionary::new();
            dict.set("Type", Object::name("XObject"));
            dict.set("Subtype", Object::name("Form"));
            dict.set("BBox", Object::raw(format!("[{bbox}]")));
            dict.set(
                "Matrix",
                Object::raw(format!("[{}]", form.matrix.to_pdf_string(&fmt))),
            );
            // the top-level dictionary is the one resource dict exempt from id ordering
            dict.set("Resources", resources);
            let data = form.content.join("\n").into_bytes();
            put_stream(&mut self.sink, dict, data, compress)?;
            self.sink.out("endobj");
            form.object_id = Some(id);
            trace!(key, object = id.number(), "form object written");
        }
        Ok(())
    }

    fn write_images(&mut self) -> Result<()> {
        let compress = self.compress();
        for (key, entry) in self.doc.resources.images.iter_mut() {
            let image = &entry.image;
            let id = self.allocator.allocate(&mut self.sink);
            let soft_mask_id = image
                .soft_mask
                .as_ref()
                .map(|_| self.allocator.allocate_deferred());
            let palette_id = match image.color_space {
                ImageColorSpace::Indexed(_) => Some(self.allocator.allocate_deferred()),
                _ => None,
            };

            let dict = image.to_dictionary(soft_mask_id, palette_id);
            put_stream(&mut self.sink, dict, image.data.clone(), compress)?;
            self.sink.out("endobj");

            if let (Some(mask_id), Some(alpha)) = (soft_mask_id, &image.soft_mask) {
                self.allocator.begin_at(mask_id, &mut self.sink, true)?;
                put_stream(&mut self.sink, image.soft_mask_dictionary(), alpha.clone(), compress)?;
                self.sink.out("endobj");
            }
            if let (Some(palette_id), ImageColorSpace::Indexed(palette)) = (palette_id, &image.color_space) {
                self.allocator.begin_at(palette_id, &mut self.sink, true)?;
                put_stream(&mut self.sink, Dictionary::new(), palette.clone(), compress)?;
                self.sink.out("endobj");
            }

            entry.object_id = Some(id);
            trace!(key, object = id.number(), "image written");
        }
        Ok(())
    }

    /// Patterns go out in registration order, so a tiling cell only sees
    /// patterns registered before it.
    fn write_patterns(&mut self) -> Result<()> {
        let compress = self.compress();
        let fmt = self.doc.fmt;
        for (key, entry) in self.doc.resources.patterns.iter_mut() {
            match &entry.pattern {
                Pattern::Shading(shading) => {
                    let function_id = self.allocator.allocate(&mut self.sink);
                    put_stream(
                        &mut self.sink,
                        shading.function_dictionary(),
                        shading.function_data(),
                        false,
                    )?;
                    self.sink.out("endobj");

                    let id = self.allocator.allocate(&mut self.sink);
                    let coords = shading.coords.iter().map(|c| fmt.hpf(*c)).collect();
                    self.sink
                        .out_lines(shading.shading_dictionary(function_id, coords).to_lines());
                    self.sink.out("endobj");

                    entry.function_id = Some(function_id);
                    entry.object_id = Some(id);
                }
                Pattern::Tiling(tiling) => {
                    let resources_id = self.allocator.allocate_deferred();
                    let id = self.allocator.allocate(&mut self.sink);
                    let data = tiling.content().join("\n").into_bytes();
                    put_stream(&mut self.sink, tiling.to_dictionary(resources_id, &fmt), data, compress)?;
                    self.sink.out("endobj");

                    entry.resources_id = Some(resources_id);
                    entry.object_id = Some(id);
                    self.deferred_resources.push((id, resources_id));
                }
            }
            trace!(key, category = entry.pattern.resource_category(), "pattern written");
        }
        Ok(())
    }

    fn write_resource_dictionaries(&mut self) -> Result<()> {
        let only_used = self.doc.options.put_only_used_fonts;
        for (owner, resources_id) in std::mem::take(&mut self.deferred_resources) {
            self.allocator.begin_at(resources_id, &mut self.sink, true)?;
            let dict = self.doc.resources.resource_dictionary(Some(owner), only_used);
            self.sink.out_lines(dict.to_lines());
            self.sink.out("endobj");
        }

        self.allocator.begin_at(self.resources_id, &mut self.sink, true)?;
        let dict = self.doc.resources.resource_dictionary(None, only_used);
        self.sink.out_lines(dict.to_lines());
        self.sink.out("endobj");
        Ok(())
    }

    fn write_info(&mut self) {
        let meta = &self.doc.metadata;
        let mut dict = Dictionary::new();
        dict.set("Producer", Object::String(meta.producer.clone()));
        for (key, value) in [
            ("Title", &meta.title),
            ("Subject", &meta.subject),
            ("Author", &meta.author),
            ("Keywords", &meta.keywords),
            ("Creator", &meta.creator),
        ] {
            if let Some(value) = value {
                dict.set(key, Object::String(value.clone()));
            }
        }
        dict.set("CreationDate", Object::String(meta.pdf_date()));

        self.info_id = self.allocator.allocate(&mut self.sink);
        self.sink.out_lines(dict.to_lines());
        self.sink.out("endobj");
    }

    fn write_catalog(&mut self) {
        let display = &self.doc.display;
        let mut dict = Dictionary::new();
        dict.set("Type", Object::name("Catalog"));
        dict.set("Pages", self.root_id);
        if let Some(first) = self.page_ids.first() {
            dict.set("OpenAction", Object::raw(display.open_action(&first.to_string())));
        }
        dict.set("PageLayout", Object::name(display.layout_name()));
        if let Some(mode) = display.page_mode {
            dict.set("PageMode", Object::name(mode.pdf_name()));
        }

        self.catalog_id = self.allocator.allocate(&mut self.sink);
        self.sink.out_lines(dict.to_lines());
        self.sink.out("endobj");
    }

    fn write_xref(&mut self) -> Result<()> {
        self.startxref = self.sink.len();
        let offsets = self.allocator.finalize()?;
        self.sink.out("xref");
        self.sink.out(&format!("0 {}", offsets.len() + 1));
        self.sink.out("0000000000 65535 f ");
        for offset in offsets {
            self.sink.out(&format!("{offset:010} 00000 n "));
        }
        Ok(())
    }

    fn write_trailer(&mut self) {
        let file_id = self.doc.file_id();
        self.sink.out("trailer");
        self.sink.out("<<");
        self.sink
            .out(&format!("/Size {}", self.allocator.object_number() + 1));
        self.sink.out(&format!("/Root {}", self.catalog_id));
        self.sink.out(&format!("/Info {}", self.info_id));
        self.sink.out(&format!("/ID [ <{file_id}> <{file_id}> ]"));
        self.sink.out(">>");
        self.sink.out("startxref");
        self.sink.out(&self.startxref.to_string());
        self.sink.out("%%EOF");
    }
}

/// Writes a stream body, flate-compressing data that carries no filter yet.
fn put_stream(sink: &mut ByteSink, dictionary: Dictionary, data: Vec<u8>, compress: bool) -> Result<()> {
    let mut stream = Stream::with_dictionary(dictionary, data);
    if compress && !stream.has_filter() && !stream.data().is_empty() {
        stream.compress_flate()?;
    }
    sink.out_lines(stream.header_lines());
    sink.out("stream");
    sink.out_bytes(stream.data());
    sink.out("endstream");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coordinates::Unit;
    use crate::document::DocumentMetadata;
    use crate::geometry::{Matrix, Point, Rectangle};
    use crate::graphics::{ColorStop, PathStyle, PatternFill, RasterImage, ShadingPattern, TilingPattern};
    use crate::DocumentOptions;
    use chrono::{FixedOffset, TimeZone};
    use pretty_assertions::assert_eq;

    fn doc(options: DocumentOptions) -> Document {
        let mut doc = Document::with_options(options.unit(Unit::Pt).format((200.0, 100.0))).unwrap();
        let date = FixedOffset::east_opt(0).unwrap().with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        doc.set_metadata(DocumentMetadata {
            creation_date: date,
            ..DocumentMetadata::default()
        });
        doc
    }

    fn text(bytes: &[u8]) -> String {
        String::from_utf8_lossy(bytes).into_owned()
    }

    /// Parses the xref table into (object number, offset) pairs.
    fn xref_entries(bytes: &[u8]) -> Vec<(usize, usize)> {
        let pdf = text(bytes);
        let table = &pdf[pdf.rfind("\nxref\n").unwrap() + 6..];
        table
            .lines()
            .skip(2)
            .take_while(|line| line.ends_with(" n "))
            .enumerate()
            .map(|(i, line)| (i + 1, line[..10].parse().unwrap()))
            .collect()
    }

    #[test]
    fn test_minimal_document_layout() {
        let mut doc = doc(DocumentOptions::new().compress(false));
        doc.add_page().unwrap();
        let bytes = DocumentAssembler::new(&mut doc).assemble().unwrap();

        assert!(bytes.starts_with(b"%PDF-1.3\n%\xBA\xDF\xAC\xE0\n"));
        assert!(bytes.ends_with(b"%%EOF"));
        let pdf = text(&bytes);
        assert!(pdf.contains("3 0 obj\n<<\n/Type /Page\n/Parent 1 0 R\n/Resources 2 0 R\n/MediaBox [0 0 200 100]\n/Contents 4 0 R\n>>"));
        assert!(pdf.contains("1 0 obj\n<<\n/Type /Pages\n/Kids [3 0 R]\n/Count 1\n>>"));
        assert!(pdf.contains("/OpenAction [3 0 R /FitH null]"));
        assert!(pdf.contains("/PageLayout /OneColumn"));
        // 14 standard fonts between the page objects and the info dictionary
        assert!(pdf.contains("/Size 21"));
        assert!(pdf.contains("/Root 20 0 R\n/Info 19 0 R"));
    }

    #[test]
    fn test_xref_offsets_point_at_objects() {
        let mut doc = doc(DocumentOptions::new().compress(false));
        doc.add_page().unwrap();
        doc.rect(10.0, 10.0, 50.0, 20.0, Some(PathStyle::Fill)).unwrap();
        doc.add_page().unwrap();
        doc.add_object(AdditionalObject::Dictionary(Dictionary::new()));
        let bytes = DocumentAssembler::new(&mut doc).assemble().unwrap();

        let entries = xref_entries(&bytes);
        assert!(!entries.is_empty());
        for (number, offset) in entries {
            let expected = format!("{number} 0 obj");
            assert!(bytes[offset..].starts_with(expected.as_bytes()), "object {number}");
        }

        let pdf = text(&bytes);
        let startxref: usize = pdf.lines().rev().nth(1).unwrap().parse().unwrap();
        assert!(bytes[startxref..].starts_with(b"xref\n0 "));
    }

    #[test]
    fn test_only_used_fonts() {
        let mut doc = doc(DocumentOptions::new().compress(false).put_only_used_fonts(true));
        doc.add_page().unwrap();
        doc.text("hello", 10.0, 10.0, None).unwrap();
        let pdf = text(&DocumentAssembler::new(&mut doc).assemble().unwrap());
        assert_eq!(pdf.matches("/Type /Font").count(), 1);
        assert!(pdf.contains("/BaseFont /Helvetica\n"));
    }

    #[cfg(feature = "compression")]
    #[test]
    fn test_compressed_contents() {
        let mut doc = doc(DocumentOptions::new().compress(true));
        doc.add_page().unwrap();
        doc.rect(10.0, 10.0, 50.0, 20.0, Some(PathStyle::Stroke)).unwrap();
        let pdf = text(&DocumentAssembler::new(&mut doc).assemble().unwrap());
        assert!(pdf.contains("/Filter /FlateDecode"));
        assert!(!pdf.contains("re\nS"));
    }

    #[test]
    fn test_open_extended_mode_is_balanced() {
        let mut doc = doc(DocumentOptions::new().compress(false));
        doc.add_page().unwrap();
        doc.enter_extended_mode().unwrap();
        doc.rect(0.0, 0.0, 5.0, 5.0, Some(PathStyle::Fill)).unwrap();
        let pdf = text(&DocumentAssembler::new(&mut doc).assemble().unwrap());
        let contents = &pdf[pdf.find("stream\n").unwrap()..pdf.find("endstream").unwrap()];
        assert_eq!(contents.matches("\nq\n").count(), contents.matches("\nQ\n").count());
    }

    #[test]
    fn test_tiling_resources_only_list_earlier_objects() {
        let mut doc = doc(DocumentOptions::new().compress(false));
        doc.add_page().unwrap();
        doc.enter_extended_mode().unwrap();
        let shading = ShadingPattern::axial(
            0.0,
            0.0,
            4.0,
            0.0,
            vec![ColorStop::new(0.0, [255, 0, 0]), ColorStop::new(1.0, [0, 0, 255])],
        );
        doc.add_pattern("fade", Pattern::Shading(shading)).unwrap();

        let cell = Rectangle::new(Point::origin(), Point::new(4.0, 4.0));
        let mut target = doc.begin_tiling_pattern(TilingPattern::new(cell, 4.0, 4.0)).unwrap();
        target.rect(0.0, 0.0, 4.0, 4.0, None).unwrap();
        target
            .fill_with_pattern(&PatternFill::new("fade"), PathStyle::Fill)
            .unwrap();
        target.end("tiles").unwrap();

        doc.rect(0.0, 0.0, 100.0, 100.0, None).unwrap();
        doc.fill_with_pattern(&PatternFill::new("tiles"), PathStyle::Fill).unwrap();
        let _ = DocumentAssembler::new(&mut doc).assemble().unwrap();

        let patterns = &doc.resources.patterns;
        let shading_id = patterns["Sh1"].object_id.unwrap();
        for entry in patterns.values() {
            if let Some(resources_id) = entry.resources_id {
                let owner = entry.object_id.unwrap();
                assert!(resources_id < owner);
                let dict = doc.resources.resource_dictionary(Some(owner), false);
                assert!(shading_id < owner);
                assert!(dict.get("Shading").is_some());
            }
        }
    }

    #[test]
    fn test_form_points_at_top_level_resources() {
        let mut doc = doc(DocumentOptions::new().compress(false));
        doc.add_page().unwrap();
        doc.enter_extended_mode().unwrap();
        let bbox = Rectangle::new(Point::origin(), Point::new(50.0, 50.0));
        let mut form = doc.begin_form_object(bbox, Matrix::identity()).unwrap();
        form.text("hi", 5.0, 5.0, None).unwrap();
        form.end("label").unwrap();
        doc.do_form_object("label", Matrix::translation(10.0, 10.0)).unwrap();
        let bytes = DocumentAssembler::new(&mut doc).assemble().unwrap();

        let pdf = text(&bytes);
        assert!(pdf.contains(
            "/Subtype /Form\n/BBox [0. 0. 50. 50.]\n/Matrix [1. 0. 0. 1. 0. 0.]\n/Resources 2 0 R\n"
        ));
        let top_level = doc.resources.resource_dictionary(None, false);
        assert!(top_level.get("Font").is_some());
    }

    #[test]
    fn test_image_with_soft_mask() {
        let mut doc = doc(DocumentOptions::new().compress(false));
        doc.add_page().unwrap();
        let mut image =
            RasterImage::from_pixels(1, 1, ImageColorSpace::DeviceRGB, 8, vec![255, 0, 0]).unwrap();
        image.soft_mask = Some(vec![128]);
        doc.add_image(image, 0.0, 0.0, Some(10.0), Some(10.0), None).unwrap();
        let bytes = DocumentAssembler::new(&mut doc).assemble().unwrap();

        let image_id = doc.resources.images["I1"].object_id.unwrap();
        let pdf = text(&bytes);
        assert!(pdf.contains(&format!("/SMask {} 0 R", image_id.number() + 1)));
        assert!(pdf.contains("/ColorSpace /DeviceGray"));
        for (number, offset) in xref_entries(&bytes) {
            assert!(bytes[offset..].starts_with(format!("{number} 0 obj").as_bytes()));
        }
    }

    #[test]
    fn test_rebuild_is_identical() {
        let mut doc = doc(DocumentOptions::new().compress(false));
        doc.add_page().unwrap();
        doc.text("again", 10.0, 10.0, None).unwrap();
        let first = DocumentAssembler::new(&mut doc).assemble().unwrap();
        let second = DocumentAssembler::new(&mut doc).assemble().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_phases_run_in_order() {
        let mut doc = doc(DocumentOptions::new());
        let mut assembler = DocumentAssembler::new(&mut doc);
        assert_eq!(assembler.phase(), Phase::Reset);
        let mut seen = vec![Phase::Reset];
        while assembler.phase() != Phase::Done {
            seen.push(assembler.step().unwrap());
        }
        assert_eq!(seen.len(), 10);
        assert_eq!(seen[2], Phase::Pages);
        assert_eq!(seen[8], Phase::Trailer);
    }

    #[test]
    fn test_empty_document_has_no_open_action() {
        let mut doc = doc(DocumentOptions::new());
        let pdf = text(&DocumentAssembler::new(&mut doc).assemble().unwrap());
        assert!(pdf.contains("/Kids []\n/Count 0"));
        assert!(!pdf.contains("/OpenAction"));
    }
}
