//! Mean color and mean image extraction.
//!
//! Both features are integer-truncating averages over 64-bit channel sums,
//! with no rounding and no gamma handling.

use tracing::trace;

use crate::retrieval::common::error::{Result, RetrievalError};
use crate::retrieval::features::types::{MeanColor, MeanImage};
use crate::retrieval::pixels::types::{RawImage, Rgb};

/// Average color over every pixel of every image.
///
/// Each channel sum is divided by the total number of pixels across all
/// images, so larger images weigh more. Returns `None` for an empty input;
/// the caller picks its own placeholder color.
pub fn compute_mean_color<I: AsRef<RawImage>>(images: &[I]) -> Option<MeanColor> {
    if images.is_empty() {
        return None;
    }

    let mut sums = [0u64; 3];
    let mut pixel_count = 0u64;

    for image in images {
        let image = image.as_ref();
        pixel_count += image.pixel_count() as u64;
        for pixel in image.pixels() {
            sums[0] += pixel.r as u64;
            sums[1] += pixel.g as u64;
            sums[2] += pixel.b as u64;
        }
    }

    trace!(images = images.len(), pixel_count, "mean color sums {:?}", sums);

    // RawImage guarantees at least one pixel per image
    Some(Rgb::new(
        (sums[0] / pixel_count) as u8,
        (sums[1] / pixel_count) as u8,
        (sums[2] / pixel_count) as u8,
    ))
}

/// Pixel-wise average over images sharing one width and height.
///
/// Returns `Ok(None)` for an empty input and
/// [`RetrievalError::DimensionMismatch`] as soon as an image differs in size
/// from the first one.
pub fn compute_mean_image<I: AsRef<RawImage>>(images: &[I]) -> Result<Option<MeanImage>> {
    let Some(first) = images.first() else {
        return Ok(None);
    };
    let expected = first.as_ref().dimensions();

    if let Some(found) = images
        .iter()
        .map(|image| image.as_ref().dimensions())
        .find(|&dimensions| dimensions != expected)
    {
        return Err(RetrievalError::DimensionMismatch { expected, found });
    }

    let (width, height) = expected;
    let mut sums = vec![[0u64; 3]; width * height];

    for image in images {
        for (sum, pixel) in sums.iter_mut().zip(image.as_ref().pixels()) {
            sum[0] += pixel.r as u64;
            sum[1] += pixel.g as u64;
            sum[2] += pixel.b as u64;
        }
    }

    let count = images.len() as u64;
    let pixels = sums
        .into_iter()
        .map(|[r, g, b]| Rgb::new((r / count) as u8, (g / count) as u8, (b / count) as u8))
        .collect();

    RawImage::new(width, height, pixels).map(|image| Some(MeanImage::from_raw(image)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pixel(color: Rgb) -> RawImage {
        RawImage::filled(1, 1, color).unwrap()
    }

    #[test]
    fn test_uniform_image_keeps_its_color() {
        let color = Rgb::new(17, 130, 254);
        let image = RawImage::filled(4, 3, color).unwrap();
        assert_eq!(compute_mean_color(&[image]), Some(color));
    }

    #[test]
    fn test_mean_color_averages_images() {
        let images = [pixel(Rgb::new(0, 0, 0)), pixel(Rgb::new(10, 10, 10))];
        assert_eq!(compute_mean_color(&images), Some(Rgb::new(5, 5, 5)));
    }

    #[test]
    fn test_mean_color_truncates() {
        let images = [pixel(Rgb::new(0, 0, 0)), pixel(Rgb::new(1, 1, 1))];
        assert_eq!(compute_mean_color(&images), Some(Rgb::new(0, 0, 0)));
    }

    #[test]
    fn test_mean_color_weights_by_pixel_count() {
        // 3 black pixels and 1 pixel of 100 average to 25, not 50
        let images = [
            RawImage::filled(3, 1, Rgb::BLACK).unwrap(),
            pixel(Rgb::new(100, 100, 100)),
        ];
        assert_eq!(compute_mean_color(&images), Some(Rgb::new(25, 25, 25)));
    }

    #[test]
    fn test_mean_color_of_nothing_is_none() {
        let images: [RawImage; 0] = [];
        assert_eq!(compute_mean_color(&images), None);
    }

    #[test]
    fn test_mean_color_accepts_borrowed_images() {
        let a = pixel(Rgb::new(255, 255, 255));
        let b = pixel(Rgb::new(255, 255, 255));
        assert_eq!(compute_mean_color(&[&a, &b]), Some(Rgb::WHITE));
    }

    #[test]
    fn test_mean_image_is_pixelwise() {
        let a = RawImage::new(2, 1, vec![Rgb::new(0, 0, 0), Rgb::new(255, 255, 255)]).unwrap();
        let b = RawImage::new(2, 1, vec![Rgb::new(3, 4, 5), Rgb::new(255, 254, 0)]).unwrap();

        let mean = compute_mean_image(&[a, b]).unwrap().unwrap();

        assert_eq!(mean.dimensions(), (2, 1));
        assert_eq!(
            mean.as_image().pixels(),
            &[Rgb::new(1, 2, 2), Rgb::new(255, 254, 127)]
        );
    }

    #[test]
    fn test_mean_image_of_nothing_is_none() {
        let images: [RawImage; 0] = [];
        assert!(compute_mean_image(&images).unwrap().is_none());
    }

    #[test]
    fn test_mean_image_rejects_mixed_sizes() {
        let images = [
            RawImage::filled(2, 2, Rgb::BLACK).unwrap(),
            RawImage::filled(2, 3, Rgb::BLACK).unwrap(),
        ];
        let result = compute_mean_image(&images);
        assert!(matches!(
            result,
            Err(RetrievalError::DimensionMismatch { expected: (2, 2), found: (2, 3) })
        ));
    }

    #[test]
    fn test_mean_image_saturated_channels_do_not_overflow() {
        let images: Vec<RawImage> = (0..1000).map(|_| pixel(Rgb::WHITE)).collect();
        let mean = compute_mean_image(&images).unwrap().unwrap();
        assert_eq!(mean.as_image().pixels(), &[Rgb::WHITE]);
    }
}
