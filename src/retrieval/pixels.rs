//! Pixel source module
//!
//! Decoded RGB images and the readers that produce them.

mod reader;
mod image_reader;
pub mod types;

pub use reader::PixelSource;
pub use image_reader::ImageCrateReader;
pub use types::{RawImage, Rgb};
