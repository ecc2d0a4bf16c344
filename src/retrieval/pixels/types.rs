//! Decoded image types

use crate::retrieval::common::error::{Result, RetrievalError};

/// A single 8-bit RGB triple
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
    pub const PINK: Rgb = Rgb::new(255, 192, 203);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn channels(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    /// Sum of absolute per-channel differences.
    pub fn l1_distance(self, other: Rgb) -> u64 {
        self.channels()
            .iter()
            .zip(other.channels().iter())
            .map(|(&a, &b)| a.abs_diff(b) as u64)
            .sum()
    }
}

impl AsRef<RawImage> for RawImage {
    fn as_ref(&self) -> &RawImage {
        self
    }
}

impl From<[u8; 3]> for Rgb {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self { r, g, b }
    }
}

/// Decoded image data, one RGB triple per pixel in row-major order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawImage {
    width: usize,
    height: usize,
    pixels: Vec<Rgb>,
}

impl RawImage {
    /// Wraps a pixel buffer, rejecting empty dimensions and buffers whose
    /// length is not `width * height`.
    pub fn new(width: usize, height: usize, pixels: Vec<Rgb>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(RetrievalError::InvalidDimensions(width, height));
        }

        let expected = checked_pixel_count(width, height)?;
        if pixels.len() != expected {
            return Err(RetrievalError::PixelBufferMismatch {
                expected,
                found: pixels.len(),
            });
        }

        Ok(Self { width, height, pixels })
    }

    /// An image where every pixel has the same color.
    pub fn filled(width: usize, height: usize, color: Rgb) -> Result<Self> {
        Self::new(width, height, vec![color; checked_pixel_count(width, height)?])
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    pub fn pixel_count(&self) -> usize {
        self.pixels.len()
    }

    /// Interleaved `[R, G, B, R, G, B, ...]` bytes.
    pub fn to_interleaved(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|p| p.channels()).collect()
    }
}

fn checked_pixel_count(width: usize, height: usize) -> Result<usize> {
    width
        .checked_mul(height)
        .ok_or(RetrievalError::InvalidDimensions(width, height))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_zero_dimensions() {
        let result = RawImage::new(0, 4, Vec::new());
        assert!(matches!(result, Err(RetrievalError::InvalidDimensions(0, 4))));
    }

    #[test]
    fn test_rejects_short_buffer() {
        let result = RawImage::new(2, 2, vec![Rgb::BLACK; 3]);
        assert!(matches!(
            result,
            Err(RetrievalError::PixelBufferMismatch { expected: 4, found: 3 })
        ));
    }

    #[test]
    fn test_overflowing_dimensions_are_rejected() {
        let result = RawImage::new(usize::MAX, 2, Vec::new());
        assert!(matches!(result, Err(RetrievalError::InvalidDimensions(usize::MAX, 2))));

        let result = RawImage::filled(2, usize::MAX, Rgb::BLACK);
        assert!(matches!(result, Err(RetrievalError::InvalidDimensions(2, usize::MAX))));
    }

    #[test]
    fn test_l1_distance() {
        let a = Rgb::new(10, 20, 30);
        let b = Rgb::new(20, 10, 30);
        assert_eq!(a.l1_distance(b), 20);
        assert_eq!(b.l1_distance(a), 20);
        assert_eq!(Rgb::BLACK.l1_distance(Rgb::WHITE), 765);
    }

    #[test]
    fn test_interleaved_layout() {
        let image = RawImage::new(2, 1, vec![Rgb::new(1, 2, 3), Rgb::new(4, 5, 6)]).unwrap();
        assert_eq!(image.to_interleaved(), vec![1, 2, 3, 4, 5, 6]);
    }
}
