#[cfg(feature = "compression")]
use crate::error::PdfError;
use crate::error::Result;
use crate::objects::{Dictionary, Object};

/// Stream payload plus the dictionary entries that precede `/Length`.
#[derive(Debug, Clone)]
pub struct Stream {
    dictionary: Dictionary,
    data: Vec<u8>,
}

impl Stream {
    pub fn new(data: Vec<u8>) -> Self {
        Self {
            dictionary: Dictionary::new(),
            data,
        }
    }

    pub fn with_dictionary(dictionary: Dictionary, data: Vec<u8>) -> Self {
        Self { dictionary, data }
    }

    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    pub fn dictionary_mut(&mut self) -> &mut Dictionary {
        &mut self.dictionary
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn has_filter(&self) -> bool {
        self.dictionary.contains_key("Filter")
    }

    pub fn set_filter(&mut self, filter: &str) {
        self.dictionary.set("Filter", Object::Name(filter.to_string()));
    }

    #[cfg(feature = "compression")]
    pub fn compress_flate(&mut self) -> Result<()> {
        use flate2::write::ZlibEncoder;
        use flate2::Compression;
        use std::io::Write;

        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder
            .write_all(&self.data)
            .map_err(|e| PdfError::CompressionError(e.to_string()))?;
        let compressed = encoder
            .finish()
            .map_err(|e| PdfError::CompressionError(e.to_string()))?;

        self.data = compressed;
        self.set_filter("FlateDecode");

        Ok(())
    }

    #[cfg(not(feature = "compression"))]
    pub fn compress_flate(&mut self) -> Result<()> {
        tracing::warn!("compression feature disabled, stream left unfiltered");
        Ok(())
    }

    /// Header lines with `/Length` (and `/Filter`) appended after the
    /// caller-supplied entries.
    pub fn header_lines(&self) -> Vec<String> {
        let mut dict = Dictionary::new();
        for (key, value) in self.dictionary.iter() {
            if key != "Filter" && key != "Length" {
                dict.set(key.clone(), value.clone());
            }
        }
        dict.set("Length", self.data.len());
        if let Some(filter) = self.dictionary.get("Filter") {
            dict.set("Filter", filter.clone());
        }
        dict.to_lines()
    }
}
