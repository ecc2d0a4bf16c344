use std::path::Path;

use crate::retrieval::common::error::Result;
use crate::retrieval::pixels::types::RawImage;

/// Decodes an image file into RGB pixels.
///
/// Implementations must be shareable across the threads that decode a dataset.
pub trait PixelSource: Send + Sync {
    fn read_pixels(&self, path: &Path) -> Result<RawImage>;
}
