//! Content-based image retrieval module
//!
//! Computes mean color and mean image features for a categorized image
//! collection, ranks the collection against a query feature, predicts
//! categories by k-nearest-neighbour vote and measures how often those
//! predictions are correct.

pub mod common;
pub mod pixels;
pub mod features;
pub mod dataset;
pub mod store;
pub mod ranking;
pub mod classify;
pub mod config;
pub mod evaluation;
pub mod export;
pub mod pipeline;

pub use common::{
    Result,
    RetrievalError,
};

pub use pixels::{
    ImageCrateReader,
    PixelSource,
    RawImage,
    Rgb,
};

pub use features::{
    FeatureRecord,
    FeatureType,
    MeanColor,
    MeanImage,
    compute_mean_color,
    compute_mean_image,
};

pub use dataset::{ALL_CATEGORY, Dataset};
pub use store::{CategorizedImages, FeatureStore, NamedImage};
pub use ranking::{RankedEntry, RankedResult, retrieve};
pub use classify::classify;

pub use config::{
    DatabaseKind,
    Denominator,
    RetrievalConfig,
    RetrievalConfigBuilder,
};

pub use evaluation::{EvaluationReport, Evaluator, Tally, evaluate};

pub use export::{
    MeanImageWriter,
    TiffCompression,
    TiffMeanImageWriter,
    write_category_means,
};

pub use pipeline::{RetrievalPipeline, SearchHit, SearchOutcome};
