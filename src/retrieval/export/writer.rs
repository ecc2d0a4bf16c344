use std::io::Write;

use crate::retrieval::common::error::Result;
use crate::retrieval::features::types::MeanImage;

pub trait MeanImageWriter {
    fn write_mean_image(&self, image: &MeanImage, output: &mut dyn Write) -> Result<()>;
}
