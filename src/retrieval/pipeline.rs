//! Retrieval pipeline
//!
//! Ties a [`PixelSource`] to feature extraction, ranking, classification and
//! evaluation.


use std::path::Path;

use rayon::prelude::*;
use tracing::{info, instrument};

use crate::retrieval::{
    classify::classify,
    common::error::{Result, RetrievalError},
    config::RetrievalConfig,
    dataset::Dataset,
    evaluation::{EvaluationReport, Evaluator},
    pixels::{ImageCrateReader, PixelSource},
    ranking::retrieve,
    store::{CategorizedImages, FeatureStore, NamedImage},
};

/// One ranked database record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub name: String,
    pub category: String,
    pub distance: u64,
}

/// Ranking and prediction for one query image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOutcome {
    pub query: String,
    pub hits: Vec<SearchHit>,
    pub predicted: String,
}

pub struct RetrievalPipeline<S: PixelSource> {
    source: S,
    config: RetrievalConfig,
}

impl RetrievalPipeline<ImageCrateReader> {
    pub fn new(config: RetrievalConfig) -> Self {
        Self {
            source: ImageCrateReader,
            config,
        }
    }
}

impl<S: PixelSource> RetrievalPipeline<S> {
    pub fn with_custom(source: S, config: RetrievalConfig) -> Self {
        Self { source, config }
    }

    /// Scans `dir` and computes the features of every image in it.
    #[instrument(skip(self, dir), fields(dir = %dir.as_ref().display()))]
    pub fn load_directory<P: AsRef<Path>>(&self, dir: P) -> Result<FeatureStore> {
        let dataset = {
            let _span = tracing::info_span!("scan_directory").entered();
            Dataset::scan(dir.as_ref())?
        };
        self.load_dataset(&dataset)
    }

    /// Decodes every file of `dataset` and builds a fresh feature store.
    pub fn load_dataset(&self, dataset: &Dataset) -> Result<FeatureStore> {
        let groups = {
            let _span = tracing::info_span!("decode_images", images = dataset.len()).entered();
            self.decode(dataset)?
        };

        FeatureStore::build(&groups)
    }

    fn decode(&self, dataset: &Dataset) -> Result<CategorizedImages> {
        let mut groups = CategorizedImages::new();

        for (category, files) in dataset.categories() {
            let images = files
                .par_iter()
                .map(|path| {
                    let image = self.source.read_pixels(path)?;
                    Ok(NamedImage::new(file_name(path), image))
                })
                .collect::<Result<Vec<_>>>()?;
            groups.insert(category.to_string(), images);
        }

        Ok(groups)
    }

    /// Ranks the configured database against the image named `image_name`
    /// and predicts its category.
    #[instrument(skip(self, store))]
    pub fn search(&self, store: &FeatureStore, image_name: &str) -> Result<SearchOutcome> {
        let query = store
            .image(image_name)
            .ok_or_else(|| RetrievalError::UnknownRecord(image_name.to_string()))?;
        let database = store.database(self.config.database);

        let ranked = retrieve(query, database, self.config.feature_type)?;
        let predicted = classify(&ranked, self.config.k)?.to_string();

        info!(
            query = image_name,
            database = %self.config.database,
            feature = %self.config.feature_type,
            k = self.config.k,
            predicted = %predicted,
            "Search complete"
        );

        Ok(SearchOutcome {
            query: query.name.clone(),
            hits: ranked
                .entries()
                .iter()
                .map(|entry| SearchHit {
                    name: entry.record.name.clone(),
                    category: entry.record.category.clone(),
                    distance: entry.distance,
                })
                .collect(),
            predicted,
        })
    }

    /// Evaluates the configured database, using every image as a query.
    pub fn evaluate(&self, store: &FeatureStore) -> Result<EvaluationReport> {
        let evaluator = Evaluator::from_config(&self.config)?;
        evaluator.run(
            store.images(),
            store.database(self.config.database),
            self.config.feature_type,
            self.config.k,
        )
    }

    pub fn config(&self) -> &RetrievalConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: RetrievalConfig) {
        self.config = config;
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
