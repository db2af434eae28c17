use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pdfloom::page::page_format_names;
use pdfloom::{
    ColorSpec, ColorStop, Document, DocumentOptions, FontStyle, Matrix, Orientation, PathStyle,
    Pattern, PatternFill, Point, Rectangle, ShadingPattern, TextAlign, TextOptions, TilingPattern,
};
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "pdfloom", about = "Assemble PDF documents", version, author)]
struct Cli {
    /// Log assembly phases and resource numbering
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a demo document using text, shapes, patterns and forms
    Sample {
        /// Output file path
        #[arg(short, long, default_value = "sample.pdf")]
        output: PathBuf,
    },

    /// Replay a JSON drawing script into a PDF
    Render {
        /// Script file: a JSON array of drawing commands
        script: PathBuf,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,

        /// Flate-compress content streams
        #[arg(short, long)]
        compress: bool,
    },

    /// List page formats and fonts
    Info,
}

/// One drawing step of a render script, e.g.
/// `{"op": "rect", "x": 10, "y": 10, "w": 50, "h": 20, "style": "Fill"}`.
#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
enum ScriptCommand {
    AddPage {
        format: Option<String>,
        #[serde(default)]
        landscape: bool,
    },
    Text {
        text: String,
        x: f64,
        y: f64,
        align: Option<TextAlign>,
        max_width: Option<f64>,
    },
    Rect {
        x: f64,
        y: f64,
        w: f64,
        h: f64,
        style: Option<PathStyle>,
    },
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
    },
    Circle {
        x: f64,
        y: f64,
        r: f64,
        style: Option<PathStyle>,
    },
    SetFillColor {
        color: ColorSpec,
    },
    SetDrawColor {
        color: ColorSpec,
    },
    SetTextColor {
        color: ColorSpec,
    },
    SetLineWidth {
        width: f64,
    },
    SetFont {
        family: String,
        #[serde(default)]
        style: FontStyle,
    },
    SetFontSize {
        size: f64,
    },
    Save,
    Restore,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Sample { output } => {
            let mut doc = sample_document()?;
            doc.save(&output)?;
            println!("Sample PDF written to {}", output.display());
        }

        Commands::Render {
            script,
            output,
            compress,
        } => {
            let source = fs::read_to_string(&script)
                .with_context(|| format!("reading script {}", script.display()))?;
            let commands: Vec<ScriptCommand> = serde_json::from_str(&source)
                .with_context(|| format!("parsing script {}", script.display()))?;

            let mut doc = Document::with_options(DocumentOptions::new().compress(compress))?;
            for (index, command) in commands.into_iter().enumerate() {
                tracing::debug!(index, ?command, "script command");
                apply(&mut doc, command).with_context(|| format!("script command #{}", index + 1))?;
            }
            doc.save(&output)?;
            println!(
                "Rendered {} page(s) to {}",
                doc.page_count(),
                output.display()
            );
        }

        Commands::Info => {
            println!("pdfloom {}", pdfloom::VERSION);
            println!();
            println!("Page formats:");
            println!("  {}", page_format_names().join(", "));
            println!();
            println!("Fonts:");
            for (family, styles) in Document::new().font_list() {
                println!("  {family}: {}", styles.join(", "));
            }
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "pdfloom=debug" } else { "pdfloom=info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn apply(doc: &mut Document, command: ScriptCommand) -> pdfloom::Result<()> {
    match command {
        ScriptCommand::AddPage { format, landscape } => {
            let orientation = if landscape {
                Orientation::Landscape
            } else {
                Orientation::Portrait
            };
            let format = format.unwrap_or_else(|| "a4".to_string());
            doc.add_page_with(format.as_str(), orientation)?;
        }
        ScriptCommand::Text {
            text,
            x,
            y,
            align,
            max_width,
        } => {
            let mut options = TextOptions::new().align(align.unwrap_or_default());
            if let Some(width) = max_width {
                options = options.max_width(width);
            }
            doc.text(text, x, y, Some(&options))?;
        }
        ScriptCommand::Rect { x, y, w, h, style } => {
            doc.rect(x, y, w, h, Some(style.unwrap_or_default()))?;
        }
        ScriptCommand::Line { x1, y1, x2, y2 } => {
            doc.line(x1, y1, x2, y2, Some(PathStyle::Stroke))?;
        }
        ScriptCommand::Circle { x, y, r, style } => {
            doc.circle(x, y, r, Some(style.unwrap_or_default()))?;
        }
        ScriptCommand::SetFillColor { color } => {
            doc.set_fill_color(color)?;
        }
        ScriptCommand::SetDrawColor { color } => {
            doc.set_draw_color(color)?;
        }
        ScriptCommand::SetTextColor { color } => {
            doc.set_text_color(color)?;
        }
        ScriptCommand::SetLineWidth { width } => {
            doc.set_line_width(width)?;
        }
        ScriptCommand::SetFont { family, style } => {
            doc.set_font(&family, style, None)?;
        }
        ScriptCommand::SetFontSize { size } => {
            doc.set_font_size(size)?;
        }
        ScriptCommand::Save => {
            doc.save_graphics_state()?;
        }
        ScriptCommand::Restore => {
            doc.restore_graphics_state()?;
        }
    }
    Ok(())
}

fn sample_document() -> pdfloom::Result<Document> {
    let mut doc = Document::new();
    doc.set_title("pdfloom sample").set_creator("pdfloom CLI");
    doc.add_page()?;

    doc.set_font("helvetica", FontStyle::Bold, None)?;
    doc.set_font_size(28.0)?;
    doc.text("pdfloom sample", 20.0, 30.0, None)?;

    doc.set_font("times", FontStyle::Normal, None)?;
    doc.set_font_size(12.0)?;
    doc.text(
        "Text wraps inside a maximum width and can be justified, centered or right aligned. \
         This paragraph is justified across a 120 mm column.",
        20.0,
        45.0,
        Some(&TextOptions::new().max_width(120.0).align(TextAlign::Justify)),
    )?;

    doc.set_draw_color(ColorSpec::rgb(200.0, 30.0, 30.0))?;
    doc.set_line_width(0.8)?;
    doc.rounded_rect(20.0, 70.0, 80.0, 40.0, 5.0, 5.0, Some(PathStyle::Stroke))?;
    doc.set_fill_color(ColorSpec::rgb(30.0, 90.0, 200.0))?;
    doc.circle(150.0, 90.0, 20.0, Some(PathStyle::FillStroke))?;

    doc.extended(|doc| {
        let stops = vec![
            ColorStop::new(0.0, [255, 200, 0]),
            ColorStop::new(1.0, [200, 0, 80]),
        ];
        doc.add_pattern(
            "sunset",
            Pattern::Shading(ShadingPattern::axial(60.0, 0.0, 480.0, 0.0, stops)),
        )?;
        doc.rect(60.0, 360.0, 420.0, 120.0, None)?;
        doc.fill_with_pattern(&PatternFill::new("sunset"), PathStyle::Fill)?;

        let cell = Rectangle::new(Point::origin(), Point::new(12.0, 12.0));
        let mut dots = doc.begin_tiling_pattern(TilingPattern::new(cell, 12.0, 12.0))?;
        dots.circle(6.0, 6.0, 3.0, Some(PathStyle::Fill))?;
        dots.end_tiling_pattern("dots")?;
        doc.rect(60.0, 520.0, 200.0, 120.0, None)?;
        doc.fill_with_pattern(&PatternFill::new("dots"), PathStyle::FillStroke)?;

        let bbox = Rectangle::new(Point::origin(), Point::new(40.0, 40.0));
        let mut star = doc.begin_form_object(bbox, Matrix::identity())?;
        star.triangle((20.0, 0.0), (40.0, 40.0), (0.0, 40.0), Some(PathStyle::Fill))?;
        star.end("marker")?;
        for step in 0..4 {
            let offset = 300.0 + step as f64 * 50.0;
            doc.do_form_object("marker", Matrix::translation(offset, 560.0))?;
        }
        Ok(())
    })?;

    Ok(doc)
}
