//! Feature store
//!
//! Holds the per-image and per-category feature databases built from one
//! dataset load. A store is never updated in place; loading another dataset
//! produces a new store.

use std::collections::BTreeMap;

use rayon::prelude::*;
use tracing::{info, warn};

use crate::retrieval::common::error::{Result, RetrievalError};
use crate::retrieval::config::DatabaseKind;
use crate::retrieval::dataset::ALL_CATEGORY;
use crate::retrieval::features::types::FeatureRecord;
use crate::retrieval::pixels::types::RawImage;

/// A decoded image together with its file name
#[derive(Debug, Clone)]
pub struct NamedImage {
    pub name: String,
    pub image: RawImage,
}

impl NamedImage {
    pub fn new(name: impl Into<String>, image: RawImage) -> Self {
        Self {
            name: name.into(),
            image,
        }
    }
}

/// Decoded images grouped by category name
pub type CategorizedImages = BTreeMap<String, Vec<NamedImage>>;

#[derive(Debug, Clone, Default)]
pub struct FeatureStore {
    images: Vec<FeatureRecord>,
    categories: Vec<FeatureRecord>,
    all: Option<FeatureRecord>,
}

impl FeatureStore {
    /// Extracts features for every image and every category.
    ///
    /// Fails with [`RetrievalError::EmptyInput`] for a category without
    /// images and with [`RetrievalError::DimensionMismatch`] when images of
    /// one category differ in size. A category named [`ALL_CATEGORY`] is
    /// rejected with [`RetrievalError::ReservedCategory`]. The synthetic
    /// [`ALL_CATEGORY`] record is only built when every image shares one size.
    pub fn build(groups: &CategorizedImages) -> Result<Self> {
        let _span = tracing::info_span!("build_features", categories = groups.len()).entered();

        if groups.contains_key(ALL_CATEGORY) {
            return Err(RetrievalError::ReservedCategory(ALL_CATEGORY.to_string()));
        }

        let categories = groups
            .par_iter()
            .map(|(category, images)| {
                let refs: Vec<&RawImage> = images.iter().map(|n| &n.image).collect();
                FeatureRecord::from_images(category.as_str(), category.as_str(), &refs)
            })
            .collect::<Result<Vec<_>>>()?;

        let images = groups
            .iter()
            .flat_map(|(category, images)| images.iter().map(move |named| (category, named)))
            .collect::<Vec<_>>()
            .into_par_iter()
            .map(|(category, named)| {
                FeatureRecord::from_images(named.name.as_str(), category.as_str(), &[&named.image])
            })
            .collect::<Result<Vec<_>>>()?;

        let every: Vec<&RawImage> = groups.values().flatten().map(|n| &n.image).collect();
        let all = match FeatureRecord::from_images(ALL_CATEGORY, ALL_CATEGORY, &every) {
            Ok(record) => Some(record),
            Err(RetrievalError::EmptyInput) => None,
            Err(e) => {
                warn!("No {} features: {}", ALL_CATEGORY, e);
                None
            }
        };

        info!(
            images = images.len(),
            categories = categories.len(),
            "Features computed"
        );

        Ok(Self {
            images,
            categories,
            all,
        })
    }

    /// One record per image, grouped by category in name order.
    pub fn images(&self) -> &[FeatureRecord] {
        &self.images
    }

    /// One record per category in name order, without [`ALL_CATEGORY`].
    pub fn categories(&self) -> &[FeatureRecord] {
        &self.categories
    }

    /// The record aggregating every image, if all images share one size.
    pub fn all(&self) -> Option<&FeatureRecord> {
        self.all.as_ref()
    }

    pub fn database(&self, kind: DatabaseKind) -> &[FeatureRecord] {
        match kind {
            DatabaseKind::AllImages => &self.images,
            DatabaseKind::Categories => &self.categories,
        }
    }

    pub fn image(&self, name: &str) -> Option<&FeatureRecord> {
        self.images.iter().find(|r| r.name == name)
    }

    pub fn category(&self, name: &str) -> Option<&FeatureRecord> {
        if name == ALL_CATEGORY {
            return self.all();
        }
        self.categories.iter().find(|r| r.name == name)
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::retrieval::pixels::types::Rgb;

    fn named(name: &str, w: usize, h: usize, color: Rgb) -> NamedImage {
        NamedImage::new(name, RawImage::filled(w, h, color).unwrap())
    }

    fn groups() -> CategorizedImages {
        let mut groups = CategorizedImages::new();
        groups.insert(
            "sky".to_string(),
            vec![
                named("sky_1.png", 2, 2, Rgb::new(0, 0, 200)),
                named("sky_2.png", 2, 2, Rgb::new(0, 0, 100)),
            ],
        );
        groups.insert(
            "grass".to_string(),
            vec![named("grass_1.png", 2, 2, Rgb::new(0, 90, 0))],
        );
        groups
    }

    #[test]
    fn test_builds_both_databases() {
        let store = FeatureStore::build(&groups()).unwrap();

        let names: Vec<_> = store.images().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["grass_1.png", "sky_1.png", "sky_2.png"]);
        assert_eq!(store.image("sky_2.png").unwrap().category, "sky");

        let categories: Vec<_> = store.categories().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(categories, vec!["grass", "sky"]);
        assert_eq!(store.category("sky").unwrap().mean_color, Rgb::new(0, 0, 150));
        assert_eq!(store.database(DatabaseKind::Categories).len(), 2);
        assert_eq!(store.database(DatabaseKind::AllImages).len(), 3);
    }

    #[test]
    fn test_all_category_spans_every_image() {
        let store = FeatureStore::build(&groups()).unwrap();
        let all = store.category(ALL_CATEGORY).unwrap();
        assert_eq!(all.mean_color, Rgb::new(0, 30, 100));
        assert!(store.categories().iter().all(|r| r.name != ALL_CATEGORY));
    }

    #[test]
    fn test_all_category_needs_uniform_sizes() {
        let mut groups = groups();
        groups.insert("tall".to_string(), vec![named("tall_1.png", 1, 5, Rgb::WHITE)]);

        let store = FeatureStore::build(&groups).unwrap();

        assert!(store.all().is_none());
        assert_eq!(store.categories().len(), 3);
    }

    #[test]
    fn test_mixed_sizes_inside_category_fail() {
        let mut groups = groups();
        groups.get_mut("sky").unwrap().push(named("sky_3.png", 3, 3, Rgb::WHITE));

        let result = FeatureStore::build(&groups);
        assert!(matches!(result, Err(RetrievalError::DimensionMismatch { .. })));
    }

    #[test]
    fn test_real_all_category_is_rejected() {
        let mut groups = groups();
        groups.insert(ALL_CATEGORY.to_string(), vec![named("All_1.png", 2, 2, Rgb::WHITE)]);

        let result = FeatureStore::build(&groups);
        assert!(matches!(result, Err(RetrievalError::ReservedCategory(_))));
    }

    #[test]
    fn test_empty_category_fails() {
        let mut groups = groups();
        groups.insert("void".to_string(), Vec::new());

        let result = FeatureStore::build(&groups);
        assert!(matches!(result, Err(RetrievalError::EmptyInput)));
    }
}
