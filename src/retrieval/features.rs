//! Feature extraction module
//!
//! Reduces one or more decoded images into the two comparable feature types,
//! a mean color and a mean image.

mod extractor;
pub mod types;

pub use extractor::{compute_mean_color, compute_mean_image};
pub use types::{FeatureRecord, FeatureType, MeanColor, MeanImage};
