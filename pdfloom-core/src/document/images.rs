use super::Document;
use crate::error::{ensure_finite, PdfError, Result};
use crate::graphics::RasterImage;

impl Document {
    /// Draws `image` with its top-left corner at `(x, y)`.
    ///
    /// A missing width or height keeps the aspect ratio; with both missing
    /// the image is drawn at 96 pixels per inch. Images registered with the
    /// same `alias` share one XObject, the first one registered wins.
    pub fn add_image(
        &mut self,
        image: RasterImage,
        x: f64,
        y: f64,
        width: Option<f64>,
        height: Option<f64>,
        alias: Option<&str>,
    ) -> Result<&mut Self> {
        ensure_finite("image position", &[x, y])?;
        for value in [width, height].into_iter().flatten() {
            ensure_finite("image size", &[value])?;
            if value <= 0.0 {
                return Err(PdfError::InvalidArgument(format!("image size {value}")));
            }
        }
        let page_height = self.page_height_user()?;

        let key = self.resources.add_image(alias, image)?;
        let (pixel_width, pixel_height) = self
            .resources
            .image(&key)
            .map(|image| (image.width as f64, image.height as f64))
            .ok_or_else(|| PdfError::InvalidImage(format!("image '{key}' vanished")))?;
        let (w, h) = match (width, height) {
            (Some(w), Some(h)) => (w, h),
            (Some(w), None) => (w, w * pixel_height / pixel_width),
            (None, Some(h)) => (h * pixel_width / pixel_height, h),
            (None, None) => {
                let sf = self.transformer.scale_factor();
                (pixel_width * 72.0 / 96.0 / sf, pixel_height * 72.0 / 96.0 / sf)
            }
        };

        let fmt = &self.fmt;
        let placement = if self.transformer.is_extended() {
            format!(
                "{} 0 0 {} {} {} cm",
                fmt.hpf(w),
                fmt.hpf(-h),
                fmt.hpf(x),
                fmt.hpf(y + h)
            )
        } else {
            let k = self.transformer.scale_factor();
            format!(
                "{} 0 0 {} {} {} cm",
                fmt.hpf(w * k),
                fmt.hpf(h * k),
                fmt.hpf(x * k),
                fmt.hpf((page_height - (y + h)) * k)
            )
        };

        let page = self.pages.current_mut()?;
        page.out("q");
        page.out(placement);
        page.out(format!("/{key} Do"));
        page.out("Q");
        tracing::trace!(key, w, h, "image placed");
        Ok(self)
    }
}
