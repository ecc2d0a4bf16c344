//! Feature types

use std::fmt;
use std::str::FromStr;

use crate::retrieval::common::error::{Result, RetrievalError};
use crate::retrieval::features::extractor::{compute_mean_color, compute_mean_image};
use crate::retrieval::pixels::types::{RawImage, Rgb};

/// Per-channel average color of a set of images
pub type MeanColor = Rgb;

/// Pixel-wise average of a set of equally sized images
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeanImage(RawImage);

impl MeanImage {
    pub(crate) fn from_raw(image: RawImage) -> Self {
        Self(image)
    }

    pub fn as_image(&self) -> &RawImage {
        &self.0
    }

    pub fn dimensions(&self) -> (usize, usize) {
        self.0.dimensions()
    }

    /// Sum of absolute per-channel, per-pixel differences.
    pub fn l1_distance(&self, other: &MeanImage) -> Result<u64> {
        if self.dimensions() != other.dimensions() {
            return Err(RetrievalError::DimensionMismatch {
                expected: self.dimensions(),
                found: other.dimensions(),
            });
        }

        Ok(self
            .0
            .pixels()
            .iter()
            .zip(other.0.pixels())
            .map(|(&a, &b)| a.l1_distance(b))
            .sum())
    }
}

/// Selects which feature of a [`FeatureRecord`] takes part in ranking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FeatureType {
    #[default]
    MeanColor,
    MeanImage,
}

impl FeatureType {
    pub const ALL: [FeatureType; 2] = [FeatureType::MeanColor, FeatureType::MeanImage];

    pub fn label(self) -> &'static str {
        match self {
            FeatureType::MeanColor => "Mean Color",
            FeatureType::MeanImage => "Mean Image",
        }
    }
}

impl fmt::Display for FeatureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Accepts display labels such as `"Mean Color"` as well as `"MeanColor"`;
/// whitespace is ignored and letters compare ASCII case-insensitively.
impl FromStr for FeatureType {
    type Err = RetrievalError;

    fn from_str(value: &str) -> Result<Self> {
        let compact: String = value
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| c.to_ascii_lowercase())
            .collect();

        match compact.as_str() {
            "meancolor" => Ok(FeatureType::MeanColor),
            "meanimage" => Ok(FeatureType::MeanImage),
            _ => Err(RetrievalError::UnknownFeatureType(value.to_string())),
        }
    }
}

/// Precomputed features of one image or one category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureRecord {
    pub name: String,
    pub category: String,
    pub mean_color: MeanColor,
    pub mean_image: MeanImage,
}

impl FeatureRecord {
    pub fn new(
        name: impl Into<String>,
        category: impl Into<String>,
        mean_color: MeanColor,
        mean_image: MeanImage,
    ) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            mean_color,
            mean_image,
        }
    }

    /// Extracts both features from `images`.
    ///
    /// Fails with [`RetrievalError::EmptyInput`] when `images` is empty and
    /// with [`RetrievalError::DimensionMismatch`] when their sizes differ.
    pub fn from_images(
        name: impl Into<String>,
        category: impl Into<String>,
        images: &[&RawImage],
    ) -> Result<Self> {
        let mean_color = compute_mean_color(images).ok_or(RetrievalError::EmptyInput)?;
        let mean_image = compute_mean_image(images)?.ok_or(RetrievalError::EmptyInput)?;
        Ok(Self::new(name, category, mean_color, mean_image))
    }

    /// Distance between the selected features of two records.
    pub fn distance(&self, other: &FeatureRecord, feature_type: FeatureType) -> Result<u64> {
        match feature_type {
            FeatureType::MeanColor => Ok(self.mean_color.l1_distance(other.mean_color)),
            FeatureType::MeanImage => self.mean_image.l1_distance(&other.mean_image),
        }
    }
}
