use std::io::Write;

use tiff::encoder::compression::DeflateLevel;
use tiff::encoder::{Compression, TiffEncoder, colortype};
use tracing::debug;

use crate::retrieval::common::error::{Result, RetrievalError};
use crate::retrieval::export::types::TiffCompression;
use crate::retrieval::export::writer::MeanImageWriter;
use crate::retrieval::features::types::MeanImage;

/// Writes mean images as 8-bit RGB TIFF files
#[derive(Debug, Default, Clone, Copy)]
pub struct TiffMeanImageWriter {
    pub compression: TiffCompression,
}

impl TiffMeanImageWriter {
    pub fn new(compression: TiffCompression) -> Self {
        Self { compression }
    }
}

impl MeanImageWriter for TiffMeanImageWriter {
    fn write_mean_image(&self, image: &MeanImage, output: &mut dyn Write) -> Result<()> {
        let raw = image.as_image();
        let (width, height) = tiff_dimensions(raw.width(), raw.height())?;
        debug!("Encoding TIFF image: {}x{}", raw.width(), raw.height());

        let compression = match self.compression {
            TiffCompression::None => Compression::Uncompressed,
            TiffCompression::Lzw => Compression::Lzw,
            TiffCompression::DeflateFast => Compression::Deflate(DeflateLevel::Fast),
            TiffCompression::DeflateBalanced => Compression::Deflate(DeflateLevel::Balanced),
            TiffCompression::DeflateBest => Compression::Deflate(DeflateLevel::Best),
        };

        // The encoder needs Seek, so encode into memory first
        let mut buffer = Vec::new();
        let mut encoder = TiffEncoder::new(std::io::Cursor::new(&mut buffer))
            .map_err(|e| RetrievalError::EncodeError(e.to_string()))?
            .with_compression(compression);

        encoder
            .write_image::<colortype::RGB8>(width, height, &raw.to_interleaved())
            .map_err(|e| RetrievalError::EncodeError(e.to_string()))?;

        output.write_all(&buffer)?;
        Ok(())
    }
}

fn tiff_dimensions(width: usize, height: usize) -> Result<(u32, u32)> {
    match (u32::try_from(width), u32::try_from(height)) {
        (Ok(width), Ok(height)) => Ok((width, height)),
        _ => Err(RetrievalError::EncodeError(format!(
            "{}x{} exceeds the TIFF size limit",
            width, height
        ))),
    }
}
