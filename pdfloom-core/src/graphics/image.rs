//! Raster images embedded as image XObjects.
//!
//! Input is an already decoded pixel buffer, or JPEG data passed through
//! untouched with `DCTDecode`. With the `external-images` feature, PNG and
//! JPEG files can be decoded through the `image` crate.

use crate::error::{PdfError, Result};
use crate::objects::{Dictionary, Object, ObjectId};

/// Color spaces for images
#[derive(Debug, Clone, PartialEq)]
pub enum ColorSpace {
    DeviceGray,
    DeviceRGB,
    DeviceCMYK,
    /// RGB palette, three bytes per entry
    Indexed(Vec<u8>),
}

impl ColorSpace {
    pub fn components(&self) -> usize {
        match self {
            ColorSpace::DeviceGray | ColorSpace::Indexed(_) => 1,
            ColorSpace::DeviceRGB => 3,
            ColorSpace::DeviceCMYK => 4,
        }
    }
}

/// How the image data is already encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageEncoding {
    /// Uncompressed samples, flate-compressed on output when enabled
    Raw,
    /// JPEG stream passed through as `DCTDecode`
    Jpeg,
    /// Samples already zlib-compressed by the caller
    Flate,
}

/// Decoded raster supplied by the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterImage {
    pub width: u32,
    pub height: u32,
    pub color_space: ColorSpace,
    pub bits_per_component: u8,
    pub data: Vec<u8>,
    pub encoding: ImageEncoding,
    /// 8-bit gray alpha channel, written as a separate `/SMask` image
    pub soft_mask: Option<Vec<u8>>,
    /// Color key mask, one `[min max]` pair per component
    pub transparency: Option<Vec<u16>>,
    pub decode: Option<Vec<f64>>,
}

impl RasterImage {
    pub fn from_pixels(
        width: u32,
        height: u32,
        color_space: ColorSpace,
        bits_per_component: u8,
        data: Vec<u8>,
    ) -> Result<Self> {
        let image = Self {
            width,
            height,
            color_space,
            bits_per_component,
            data,
            encoding: ImageEncoding::Raw,
            soft_mask: None,
            transparency: None,
            decode: None,
        };
        image.validate()?;
        Ok(image)
    }

    /// Wraps JPEG data, reading size and components from its frame header.
    pub fn from_jpeg_data(data: Vec<u8>) -> Result<Self> {
        let (width, height, color_space, bits_per_component) = parse_jpeg_header(&data)?;
        Ok(Self {
            width,
            height,
            color_space,
            bits_per_component,
            data,
            encoding: ImageEncoding::Jpeg,
            soft_mask: None,
            transparency: None,
            decode: None,
        })
    }

    /// Decodes a PNG or JPEG file into RGB samples plus an alpha soft mask
    /// when the source has transparency.
    #[cfg(feature = "external-images")]
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let decoded = image::open(path).map_err(|e| PdfError::InvalidImage(e.to_string()))?;
        let rgba = decoded.to_rgba8();
        let (width, height) = rgba.dimensions();

        let mut rgb = Vec::with_capacity((width * height * 3) as usize);
        let mut alpha = Vec::with_capacity((width * height) as usize);
        for pixel in rgba.pixels() {
            rgb.extend_from_slice(&pixel.0[..3]);
            alpha.push(pixel.0[3]);
        }

        let mut raster = Self::from_pixels(width, height, ColorSpace::DeviceRGB, 8, rgb)?;
        if alpha.iter().any(|a| *a != 255) {
            raster = raster.with_soft_mask(alpha)?;
        }
        Ok(raster)
    }

    pub fn with_soft_mask(mut self, alpha: Vec<u8>) -> Result<Self> {
        let expected = self.width as usize * self.height as usize;
        if alpha.len() != expected {
            return Err(PdfError::InvalidImage(format!(
                "soft mask has {} samples, expected {expected}",
                alpha.len()
            )));
        }
        self.soft_mask = Some(alpha);
        Ok(self)
    }

    pub fn with_transparency(mut self, key: Vec<u16>) -> Self {
        self.transparency = Some(key);
        self
    }

    pub fn with_decode(mut self, decode: Vec<f64>) -> Self {
        self.decode = Some(decode);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(PdfError::InvalidImage("image has no pixels".to_string()));
        }
        if !matches!(self.bits_per_component, 1 | 2 | 4 | 8 | 16) {
            return Err(PdfError::UnsupportedFeature(format!(
                "{} bits per component",
                self.bits_per_component
            )));
        }
        if let ColorSpace::Indexed(palette) = &self.color_space {
            if palette.is_empty() || palette.len() % 3 != 0 || palette.len() > 256 * 3 {
                return Err(PdfError::InvalidImage("palette must hold 1..=256 RGB entries".to_string()));
            }
        }
        if self.encoding == ImageEncoding::Raw {
            let bits_per_row = self.width as usize
                * self.color_space.components()
                * self.bits_per_component as usize;
            let expected = bits_per_row.div_ceil(8) * self.height as usize;
            if self.data.len() != expected {
                return Err(PdfError::InvalidImage(format!(
                    "pixel buffer has {} bytes, expected {expected}",
                    self.data.len()
                )));
            }
        }
        Ok(())
    }

    /// Image XObject dictionary; `soft_mask` and `palette` are the ids the
    /// companion objects are written under.
    pub(crate) fn to_dictionary(
        &self,
        soft_mask: Option<ObjectId>,
        palette: Option<ObjectId>,
    ) -> Dictionary {
        let mut dict = Dictionary::new();
        dict.set("Type", Object::name("XObject"));
        dict.set("Subtype", Object::name("Image"));
        dict.set("Width", self.width);
        dict.set("Height", self.height);

        match (&self.color_space, palette) {
            (ColorSpace::Indexed(entries), Some(palette)) => {
                dict.set(
                    "ColorSpace",
                    Object::raw(format!("[/Indexed /DeviceRGB {} {palette}]", entries.len() / 3 - 1)),
                );
            }
            (ColorSpace::DeviceGray, _) | (ColorSpace::Indexed(_), None) => {
                dict.set("ColorSpace", Object::name("DeviceGray"))
            }
            (ColorSpace::DeviceRGB, _) => dict.set("ColorSpace", Object::name("DeviceRGB")),
            (ColorSpace::DeviceCMYK, _) => dict.set("ColorSpace", Object::name("DeviceCMYK")),
        }

        dict.set("BitsPerComponent", self.bits_per_component as i64);

        if let Some(decode) = &self.decode {
            dict.set("Decode", Object::Array(decode.iter().map(|v| Object::Real(*v)).collect()));
        }
        if let Some(key) = &self.transparency {
            dict.set(
                "Mask",
                Object::Array(key.iter().map(|v| Object::Integer(*v as i64)).collect()),
            );
        }
        if let Some(mask) = soft_mask {
            dict.set("SMask", mask);
        }
        match self.encoding {
            ImageEncoding::Jpeg => dict.set("Filter", Object::name("DCTDecode")),
            ImageEncoding::Flate => dict.set("Filter", Object::name("FlateDecode")),
            ImageEncoding::Raw => {}
        }
        dict
    }

    pub(crate) fn soft_mask_dictionary(&self) -> Dictionary {
        let mut dict = Dictionary::new();
        dict.set("Type", Object::name("XObject"));
        dict.set("Subtype", Object::name("Image"));
        dict.set("Width", self.width);
        dict.set("Height", self.height);
        dict.set("ColorSpace", Object::name("DeviceGray"));
        dict.set("BitsPerComponent", 8);
        dict
    }
}

/// Parse JPEG header to extract image information
fn parse_jpeg_header(data: &[u8]) -> Result<(u32, u32, ColorSpace, u8)> {
    if data.len() < 2 || data[0] != 0xFF || data[1] != 0xD8 {
        return Err(PdfError::InvalidImage("Not a valid JPEG file".to_string()));
    }

    let mut pos = 2;
    while pos + 1 < data.len() {
        if data[pos] != 0xFF {
            return Err(PdfError::InvalidImage("Invalid JPEG marker".to_string()));
        }
        let marker = data[pos + 1];
        pos += 2;

        match marker {
            0xFF => pos -= 1,
            0xD8 | 0xD0..=0xD7 => {}
            0xD9 => break,
            0xC0..=0xCF if !matches!(marker, 0xC4 | 0xC8 | 0xCC) => {
                // length (2), precision (1), height (2), width (2), components (1)
                if pos + 7 >= data.len() {
                    return Err(PdfError::InvalidImage("Truncated JPEG file".to_string()));
                }
                let bits = data[pos + 2];
                let height = u16::from_be_bytes([data[pos + 3], data[pos + 4]]) as u32;
                let width = u16::from_be_bytes([data[pos + 5], data[pos + 6]]) as u32;
                let color_space = match data[pos + 7] {
                    1 => ColorSpace::DeviceGray,
                    3 => ColorSpace::DeviceRGB,
                    4 => ColorSpace::DeviceCMYK,
                    other => {
                        return Err(PdfError::UnsupportedFeature(format!(
                            "JPEG with {other} components"
                        )))
                    }
                };
                if width == 0 || height == 0 {
                    break;
                }
                return Ok((width, height, color_space, bits));
            }
            _ => {
                if pos + 1 >= data.len() {
                    return Err(PdfError::InvalidImage("Truncated JPEG file".to_string()));
                }
                pos += u16::from_be_bytes([data[pos], data[pos + 1]]) as usize;
            }
        }
    }

    Err(PdfError::InvalidImage("Could not find image dimensions".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jpeg_header(components: u8) -> Vec<u8> {
        vec![
            0xFF, 0xD8, // SOI
            0xFF, 0xE0, 0x00, 0x04, 0x00, 0x00, // APP0 with two payload bytes
            0xFF, 0xC0, // SOF0
            0x00, 0x11, // length
            0x08, // precision
            0x00, 0x64, // height 100
            0x00, 0xC8, // width 200
            components,
        ]
    }

    #[test]
    fn test_parse_jpeg_header() {
        let (width, height, color_space, bits) = parse_jpeg_header(&jpeg_header(3)).unwrap();
        assert_eq!((width, height, bits), (200, 100, 8));
        assert_eq!(color_space, ColorSpace::DeviceRGB);

        let (_, _, color_space, _) = parse_jpeg_header(&jpeg_header(4)).unwrap();
        assert_eq!(color_space, ColorSpace::DeviceCMYK);
    }

    #[test]
    fn test_invalid_jpeg() {
        assert!(parse_jpeg_header(&[0x00, 0x00]).is_err());
        assert!(parse_jpeg_header(&jpeg_header(2)).is_err());
        assert!(parse_jpeg_header(&[0xFF, 0xD8, 0xFF, 0xD9]).is_err());
    }

    #[test]
    fn test_from_pixels_validates_length() {
        assert!(RasterImage::from_pixels(2, 2, ColorSpace::DeviceRGB, 8, vec![0; 12]).is_ok());
        assert!(RasterImage::from_pixels(2, 2, ColorSpace::DeviceRGB, 8, vec![0; 11]).is_err());
        // 1-bit rows are padded to whole bytes
        assert!(RasterImage::from_pixels(9, 2, ColorSpace::DeviceGray, 1, vec![0; 4]).is_ok());
        assert!(RasterImage::from_pixels(0, 2, ColorSpace::DeviceGray, 8, vec![]).is_err());
        assert!(RasterImage::from_pixels(1, 1, ColorSpace::DeviceGray, 3, vec![0]).is_err());
    }

    #[test]
    fn test_indexed_dictionary() {
        let image = RasterImage::from_pixels(
            2,
            1,
            ColorSpace::Indexed(vec![255, 0, 0, 0, 0, 255]),
            8,
            vec![0, 1],
        )
        .unwrap();
        let dict = image.to_dictionary(None, Some(ObjectId::from(12)));
        assert_eq!(
            dict.get("ColorSpace"),
            Some(&Object::raw("[/Indexed /DeviceRGB 1 12 0 R]"))
        );
    }

    #[test]
    fn test_dictionary_with_masks() {
        let image = RasterImage::from_pixels(1, 1, ColorSpace::DeviceRGB, 8, vec![1, 2, 3])
            .unwrap()
            .with_soft_mask(vec![128])
            .unwrap()
            .with_transparency(vec![0, 0, 255, 255, 0, 0]);
        let dict = image.to_dictionary(Some(ObjectId::from(5)), None);
        assert_eq!(dict.get("SMask"), Some(&Object::Reference(ObjectId::from(5))));
        assert_eq!(
            dict.get("Mask").map(Object::to_pdf_string),
            Some("[0 0 255 255 0 0]".to_string())
        );
        assert!(dict.get("Filter").is_none());

        assert!(RasterImage::from_pixels(1, 1, ColorSpace::DeviceRGB, 8, vec![1, 2, 3])
            .unwrap()
            .with_soft_mask(vec![1, 2])
            .is_err());
    }

    #[test]
    fn test_jpeg_dictionary_uses_dct() {
        let image = RasterImage::from_jpeg_data(jpeg_header(1)).unwrap();
        let dict = image.to_dictionary(None, None);
        assert_eq!(dict.get("Filter"), Some(&Object::name("DCTDecode")));
        assert_eq!(dict.get("ColorSpace"), Some(&Object::name("DeviceGray")));
    }
}
