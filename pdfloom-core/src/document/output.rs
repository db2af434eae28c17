use super::Document;
use crate::error::{PdfError, Result};
use crate::writer::DocumentAssembler;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

/// Delivery shape requested from [`Document::output`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputType {
    #[default]
    Bytes,
    /// Bytes mapped one to one onto chars (Latin-1)
    String,
    DataUri,
    Blob,
}

impl FromStr for OutputType {
    type Err = PdfError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "arraybuffer" | "bytes" => Ok(OutputType::Bytes),
            "string" => Ok(OutputType::String),
            "datauristring" | "dataurlstring" | "datauri" | "dataurl" => Ok(OutputType::DataUri),
            "blob" => Ok(OutputType::Blob),
            other => Err(PdfError::InvalidArgument(format!("output type '{other}'"))),
        }
    }
}

/// A built document in the requested shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Output {
    Bytes(Vec<u8>),
    String(String),
    DataUri(String),
    Blob { mime: &'static str, data: Vec<u8> },
}

pub(crate) const PDF_MIME: &str = "application/pdf";

impl Document {
    /// Serializes the document.
    ///
    /// Every call numbers all objects afresh; object ids seen through
    /// [`page_info`](Self::page_info) refer to the latest build.
    pub fn build(&mut self) -> Result<Vec<u8>> {
        if self.in_render_target() {
            return Err(PdfError::RenderTarget(
                "cannot build while a form object or pattern is open".to_string(),
            ));
        }
        DocumentAssembler::new(self).assemble()
    }

    pub fn output(&mut self, kind: OutputType) -> Result<Output> {
        let bytes = self.build()?;
        Ok(match kind {
            OutputType::Bytes => Output::Bytes(bytes),
            OutputType::String => Output::String(bytes.iter().map(|b| *b as char).collect()),
            OutputType::DataUri => Output::DataUri(format!(
                "data:{PDF_MIME};filename=generated.pdf;base64,{}",
                STANDARD.encode(&bytes)
            )),
            OutputType::Blob => Output::Blob {
                mime: PDF_MIME,
                data: bytes,
            },
        })
    }

    /// Builds the document and writes it to `path`.
    pub fn save<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let bytes = self.build()?;
        let file = File::create(path.as_ref())?;
        let mut writer = BufWriter::new(file);
        writer.write_all(&bytes)?;
        writer.flush()?;
        tracing::debug!(path = %path.as_ref().display(), bytes = bytes.len(), "document saved");
        Ok(())
    }

    /// Sets the `/ID` of the trailer. `id` must be 32 hex digits.
    pub fn set_file_id(&mut self, id: &str) -> Result<&mut Self> {
        if id.len() != 32 || !id.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(PdfError::InvalidArgument(format!("file id '{id}'")));
        }
        self.file_id = Some(id.to_ascii_uppercase());
        Ok(self)
    }

    /// The explicit file id, or an MD5 digest of the creation date and
    /// metadata.
    pub fn file_id(&self) -> String {
        if let Some(id) = &self.file_id {
            return id.clone();
        }
        let meta = &self.metadata;
        let mut seed = meta.pdf_date();
        for field in [&meta.title, &meta.subject, &meta.author, &meta.keywords, &meta.creator] {
            seed.push('\u{0}');
            seed.push_str(field.as_deref().unwrap_or_default());
        }
        seed.push('\u{0}');
        seed.push_str(&meta.producer);
        md5::compute(seed.as_bytes())
            .iter()
            .map(|byte| format!("{byte:02X}"))
            .collect()
    }
}
