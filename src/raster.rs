//! # Rendered Images
//!
//! [`RenderedImage`] is the only artifact that leaves the crate: an immutable
//! RGBA pixel buffer. Encoding for transport (PNG, base64, ...) is left to the
//! caller; [`RenderedImage::to_png`] is provided for convenience.

use image::{ImageEncoder, Rgba, RgbaImage};
use std::path::Path;

use crate::error::MenuError;

/// Fully transparent pixel, the background of every text block.
pub const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// An immutable RGBA raster.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedImage {
    image: RgbaImage,
}

impl RenderedImage {
    /// Create an image filled with a single colour.
    ///
    /// Zero dimensions are bumped to 1 so every image has at least one pixel.
    pub fn filled(width: u32, height: u32, color: Rgba<u8>) -> Self {
        Self {
            image: RgbaImage::from_pixel(width.max(1), height.max(1), color),
        }
    }

    /// Create a fully transparent image.
    pub fn transparent(width: u32, height: u32) -> Self {
        Self::filled(width, height, TRANSPARENT)
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// `(width, height)` in pixels.
    pub fn size(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    /// Read a single pixel. Returns `None` outside the image.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba<u8>> {
        self.image.get_pixel_checked(x, y).copied()
    }

    pub fn as_rgba(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_rgba(self) -> RgbaImage {
        self.image
    }

    /// True if any pixel has non-zero alpha.
    pub fn has_ink(&self) -> bool {
        self.image.pixels().any(|p| p[3] > 0)
    }

    /// Encode as PNG bytes.
    pub fn to_png(&self) -> Result<Vec<u8>, MenuError> {
        let mut png_bytes = Vec::new();
        let encoder = image::codecs::png::PngEncoder::new(&mut png_bytes);
        encoder
            .write_image(
                self.image.as_raw(),
                self.image.width(),
                self.image.height(),
                image::ExtendedColorType::Rgba8,
            )
            .map_err(|e: image::ImageError| MenuError::Image(e.to_string()))?;
        Ok(png_bytes)
    }

    /// Write the image to disk as PNG.
    pub fn save_png(&self, path: &Path) -> Result<(), MenuError> {
        std::fs::write(path, self.to_png()?)?;
        Ok(())
    }
}

impl From<RgbaImage> for RenderedImage {
    fn from(image: RgbaImage) -> Self {
        Self { image }
    }
}
