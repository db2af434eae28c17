//! Integration tests for end-to-end document workflows
//!
//! These tests drive the public API from document creation to the final
//! bytes and check the structure of the produced file.

use chrono::{FixedOffset, TimeZone};
use pdfloom::{
    ColorSpec, ColorStop, DisplayMode, Document, DocumentMetadata, DocumentOptions, ExtGState,
    ImageColorSpace, Layout, Matrix, Orientation, PageMode, PathStyle, Pattern, PatternFill,
    PdfError, Point, RasterImage, Rectangle, Result, ShadingPattern, TextAlign, TextOptions,
    TilingPattern, Unit, Zoom,
};
use pretty_assertions::assert_eq;
use std::fs;
use tempfile::TempDir;

fn fixed_metadata() -> DocumentMetadata {
    DocumentMetadata {
        creation_date: FixedOffset::east_opt(3600)
            .unwrap()
            .with_ymd_and_hms(2024, 2, 29, 8, 30, 0)
            .unwrap(),
        ..DocumentMetadata::default()
    }
}

fn plain_document() -> Document {
    let options = DocumentOptions::new().unit(Unit::Pt).format("a4").compress(false);
    let mut doc = Document::with_options(options).unwrap();
    doc.set_metadata(fixed_metadata());
    doc
}

fn as_text(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

/// Checks every in-use xref entry points at its `n 0 obj` header.
fn assert_xref_consistent(bytes: &[u8]) {
    let pdf = as_text(bytes);
    let start: usize = pdf.lines().rev().nth(1).unwrap().parse().unwrap();
    let table = as_text(&bytes[start..]);
    let mut lines = table.lines();
    assert_eq!(lines.next(), Some("xref"));
    let count: usize = lines.next().unwrap()[2..].parse().unwrap();
    assert_eq!(lines.next(), Some("0000000000 65535 f "));
    for number in 1..count {
        let entry = lines.next().unwrap();
        assert!(entry.ends_with(" 00000 n "), "entry {entry}");
        let offset: usize = entry[..10].parse().unwrap();
        let header = format!("{number} 0 obj");
        assert!(bytes[offset..].starts_with(header.as_bytes()), "object {number}");
    }
    assert_eq!(lines.next(), Some("trailer"));
    assert!(pdf.contains(&format!("/Size {count}")));
}

/// Test complete creation workflow with text, graphics and metadata
#[test]
fn test_complete_document_workflow() -> Result<()> {
    let temp_dir = TempDir::new().unwrap();
    let file_path = temp_dir.path().join("complete_workflow.pdf");

    let mut doc = plain_document();
    doc.set_title("Integration Test Document")
        .set_author("Test Suite")
        .set_subject("End-to-end workflow testing")
        .set_keywords("integration, test, pdf")
        .set_creator("pdfloom integration tests");

    for page_num in 1..=3 {
        doc.add_page()?;
        doc.set_font_size(16.0)?;
        doc.text(format!("Page {page_num} - Integration Test"), 50.0, 60.0, None)?;

        let color = match page_num % 3 {
            1 => ColorSpec::rgb(255.0, 0.0, 0.0),
            2 => ColorSpec::rgb(0.0, 255.0, 0.0),
            _ => ColorSpec::rgb(0.0, 0.0, 255.0),
        };
        doc.set_fill_color(color)?;
        doc.rect(50.0, 100.0, 200.0, 100.0, Some(PathStyle::Fill))?;
        doc.set_draw_color(ColorSpec::black())?;
        doc.set_line_width(2.0)?;
        doc.rect(45.0, 95.0, 210.0, 110.0, Some(PathStyle::Stroke))?;
    }

    doc.save(&file_path)?;
    let bytes = fs::read(&file_path).unwrap();
    let pdf = as_text(&bytes);

    assert!(bytes.starts_with(b"%PDF-1.3\n"));
    assert!(bytes.ends_with(b"%%EOF"));
    assert_eq!(pdf.matches("/Type /Page\n").count(), 3);
    assert!(pdf.contains("/Count 3"));
    assert!(pdf.contains("/Title (Integration Test Document)"));
    assert!(pdf.contains("/Author (Test Suite)"));
    assert!(pdf.contains("/CreationDate (D:20240229083000+01'00')"));
    assert!(pdf.contains("/MediaBox [0 0 595.28 841.89]"));
    assert!(pdf.contains("0. 0. 1. rg"));
    assert_xref_consistent(&bytes);
    Ok(())
}

#[test]
fn test_every_resource_kind_in_one_file() -> Result<()> {
    let mut doc = plain_document();
    doc.add_page()?;
    doc.text("resources", 20.0, 20.0, None)?;

    let pixels = vec![0, 0, 255, 255, 0, 0, 0, 255, 0, 255, 255, 255];
    let image = RasterImage::from_pixels(2, 2, ImageColorSpace::DeviceRGB, 8, pixels)?;
    doc.add_image(image, 20.0, 40.0, Some(40.0), None, Some("checker"))?;

    doc.extended(|doc| {
        let half = doc.add_gstate(Some("half"), ExtGState::new().with_opacity(0.5))?;
        assert_eq!(half, "GS1");
        doc.set_gstate_by_name("half")?;

        let stops = vec![ColorStop::new(0.0, [255, 255, 0]), ColorStop::new(1.0, [0, 128, 0])];
        doc.add_pattern("sunset", Pattern::Shading(ShadingPattern::axial(0.0, 0.0, 100.0, 0.0, stops)))?;
        doc.rect(100.0, 100.0, 100.0, 50.0, None)?;
        doc.fill_with_pattern(&PatternFill::new("sunset"), PathStyle::Fill)?;

        let bbox = Rectangle::new(Point::origin(), Point::new(20.0, 20.0));
        let mut form = doc.begin_form_object(bbox, Matrix::identity())?;
        form.circle(10.0, 10.0, 8.0, Some(PathStyle::FillStroke))?;
        form.end("badge")?;
        doc.do_form_object("badge", Matrix::translation(300.0, 300.0))?;
        Ok(())
    })?;

    let bytes = doc.build()?;
    let pdf = as_text(&bytes);
    assert_xref_consistent(&bytes);
    assert!(pdf.contains("/Subtype /Form"));
    assert!(pdf.contains("/ShadingType 2"));
    assert!(pdf.contains("/Filter /ASCIIHexDecode"));
    assert!(pdf.contains("/ca 0.5"));
    assert!(pdf.contains("/I1 Do"));
    assert!(pdf.contains("/Xo1 Do"));
    assert!(pdf.contains("/Sh1 sh"));
    Ok(())
}

#[test]
fn test_graphics_state_is_balanced() -> Result<()> {
    let mut doc = plain_document();
    doc.add_page()?;
    doc.save_graphics_state()?;
    doc.set_line_width(4.0)?;
    doc.save_graphics_state()?;
    doc.set_fill_color(ColorSpec::gray(128.0))?;
    doc.restore_graphics_state()?;
    doc.restore_graphics_state()?;
    // one restore too many is ignored
    doc.restore_graphics_state()?;
    doc.enter_extended_mode()?;
    doc.line(0.0, 0.0, 50.0, 50.0, Some(PathStyle::Stroke))?;

    let pdf = as_text(&doc.build()?);
    let saves = pdf.lines().filter(|line| *line == "q").count();
    let restores = pdf.lines().filter(|line| *line == "Q").count();
    assert_eq!(saves, restores);
    assert_eq!(saves, 3);
    Ok(())
}

#[test]
fn test_nested_tiling_pattern_numbering() -> Result<()> {
    let mut doc = plain_document();
    doc.add_page()?;
    doc.enter_extended_mode()?;

    let cell = Rectangle::new(Point::origin(), Point::new(10.0, 10.0));
    let mut dots = doc.begin_tiling_pattern(TilingPattern::new(cell, 10.0, 10.0))?;
    dots.circle(5.0, 5.0, 2.0, Some(PathStyle::Fill))?;
    dots.end_tiling_pattern("dots")?;

    let big = Rectangle::new(Point::origin(), Point::new(40.0, 40.0));
    let mut grid = doc.begin_tiling_pattern(TilingPattern::new(big, 40.0, 40.0))?;
    grid.rect(0.0, 0.0, 40.0, 40.0, None)?;
    grid.fill_with_pattern(&PatternFill::new("dots"), PathStyle::Fill)?;
    grid.end_tiling_pattern("grid")?;

    doc.rect(0.0, 0.0, 200.0, 200.0, None)?;
    doc.fill_with_pattern(
        &PatternFill::new("grid").with_matrix(Matrix::scaling(2.0, 2.0)),
        PathStyle::Fill,
    )?;

    let bytes = doc.build()?;
    assert_xref_consistent(&bytes);
    let pdf = as_text(&bytes);
    assert_eq!(pdf.matches("/PatternType 1").count(), 4);
    assert!(pdf.contains("/Pattern cs"));
    Ok(())
}

#[test]
fn test_page_reordering() -> Result<()> {
    let mut doc = plain_document();
    for width in [100.0, 200.0, 300.0] {
        doc.add_page_with((width, 400.0), Orientation::Portrait)?;
    }
    doc.move_page(3, 1)?;
    assert_eq!(doc.current_page_number(), 1);
    doc.delete_page(2)?;

    let widths: Vec<f64> = (1..=doc.page_count())
        .map(|n| doc.page_info(n).map(|info| info.width))
        .collect::<Result<_>>()?;
    assert_eq!(widths, vec![300.0, 200.0]);

    assert!(matches!(doc.set_page(3), Err(PdfError::InvalidPageNumber(3))));
    let bytes = doc.build()?;
    assert!(as_text(&bytes).contains("/MediaBox [0 0 300 400]"));
    assert!(doc.page_info(1)?.object_id.is_some());
    Ok(())
}

#[test]
fn test_display_preferences_reach_the_catalog() -> Result<()> {
    let mut doc = plain_document();
    doc.add_page()?;
    doc.set_display_mode(DisplayMode {
        zoom: Zoom::Percent(150.0),
        layout: Layout::Single,
        page_mode: Some(PageMode::UseOutlines),
    });
    let pdf = as_text(&doc.build()?);
    assert!(pdf.contains("/OpenAction [3 0 R /XYZ null null 1.5]"));
    assert!(pdf.contains("/PageLayout /SinglePage"));
    assert!(pdf.contains("/PageMode /UseOutlines"));
    Ok(())
}

#[test]
fn test_wrapped_and_justified_text() -> Result<()> {
    let mut doc = plain_document();
    doc.add_page()?;
    let options = TextOptions::new().max_width(120.0).align(TextAlign::Justify);
    doc.text(
        "The quick brown fox jumps over the lazy dog and keeps on running",
        20.0,
        20.0,
        Some(&options),
    )?;
    let pdf = as_text(&doc.build()?);
    assert!(pdf.contains(" Tw"));
    assert!(pdf.matches(" Tj").count() > 1 || pdf.contains("T*"));
    Ok(())
}

#[test]
fn test_content_needs_a_page() {
    let mut doc = plain_document();
    assert!(matches!(
        doc.rect(0.0, 0.0, 1.0, 1.0, Some(PathStyle::Fill)),
        Err(PdfError::NoCurrentPage)
    ));
    // colors set before the first page are carried onto it
    doc.set_draw_color(ColorSpec::rgb(255.0, 0.0, 0.0)).unwrap();
    doc.add_page().unwrap();
    let pdf = as_text(&doc.build().unwrap());
    assert!(pdf.contains("1. 0. 0. RG"));
}

#[test]
fn test_builds_are_repeatable() -> Result<()> {
    let mut doc = plain_document();
    doc.add_page()?;
    doc.text("same bytes", 10.0, 10.0, None)?;
    let first = doc.build()?;
    let second = doc.build()?;
    assert_eq!(first, second);
    let id = doc.file_id();
    assert!(as_text(&first).contains(&format!("/ID [ <{id}> <{id}> ]")));
    Ok(())
}
