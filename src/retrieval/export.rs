//! Mean image export module
//!
//! Writes mean images to disk so they can be inspected outside the process.

mod writer;
mod tiff_writer;
pub mod types;

use std::path::{Path, PathBuf};

use tracing::info;

use crate::retrieval::common::error::{Result, RetrievalError};
use crate::retrieval::store::FeatureStore;

pub use writer::MeanImageWriter;
pub use tiff_writer::TiffMeanImageWriter;
pub use types::TiffCompression;

/// Writes the mean image of every category, plus the `All` record when
/// present, as `<dir>/<category>.tiff`. Returns the written paths.
pub fn write_category_means<W: MeanImageWriter>(
    writer: &W,
    store: &FeatureStore,
    dir: &Path,
) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)?;

    let mut written = Vec::new();
    for record in store.categories().iter().chain(store.all()) {
        let path = dir.join(format!("{}.tiff", record.name));
        let mut file = std::fs::File::create(&path).map_err(|e| {
            RetrievalError::OutputWriteError(format!("{}: {}", path.display(), e))
        })?;
        writer.write_mean_image(&record.mean_image, &mut file)?;
        written.push(path);
    }

    info!(dir = %dir.display(), count = written.len(), "Exported mean images");
    Ok(written)
}
