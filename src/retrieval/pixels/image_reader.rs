//! Pixel source backed by the `image` crate.
//!
//! Any format the `image` crate can decode with its default features is
//! accepted (JPEG and PNG among them). Decoded data is converted to 8-bit RGB,
//! dropping alpha and widening grayscale.

use std::path::Path;

use tracing::debug;

use crate::retrieval::common::error::{Result, RetrievalError};
use crate::retrieval::pixels::reader::PixelSource;
use crate::retrieval::pixels::types::{RawImage, Rgb};

#[derive(Debug, Default, Clone, Copy)]
pub struct ImageCrateReader;

impl ImageCrateReader {
    /// Decodes an in-memory encoded image.
    pub fn decode(&self, data: &[u8]) -> Result<RawImage> {
        let decoded = image::load_from_memory(data)
            .map_err(|e| RetrievalError::DecodeError(e.to_string()))?;
        Self::into_raw(decoded)
    }

    fn into_raw(decoded: image::DynamicImage) -> Result<RawImage> {
        let rgb = decoded.to_rgb8();
        let (width, height) = (rgb.width() as usize, rgb.height() as usize);

        debug!("Decoded image: {}x{}", width, height);

        let pixels = rgb.pixels().map(|p| Rgb::from(p.0)).collect();
        RawImage::new(width, height, pixels)
    }
}

impl PixelSource for ImageCrateReader {
    fn read_pixels(&self, path: &Path) -> Result<RawImage> {
        let data = std::fs::read(path).map_err(|e| {
            RetrievalError::InputReadError(format!("{}: {}", path.display(), e))
        })?;

        debug!("Decoding {}, {} bytes", path.display(), data.len());

        let decoded = image::load_from_memory(&data)
            .map_err(|e| RetrievalError::DecodeError(format!("{}: {}", path.display(), e)))?;
        Self::into_raw(decoded)
    }
}
