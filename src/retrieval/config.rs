//! Retrieval and evaluation configuration types

use std::fmt;
use std::str::FromStr;

use crate::retrieval::common::error::{Result, RetrievalError};
use crate::retrieval::features::types::FeatureType;

/// Which feature database queries are ranked against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DatabaseKind {
    /// One record per image
    #[default]
    AllImages,
    /// One record per category, aggregating all of its images
    Categories,
}

impl DatabaseKind {
    pub fn label(self) -> &'static str {
        match self {
            DatabaseKind::AllImages => "All Images",
            DatabaseKind::Categories => "Categories",
        }
    }
}

impl fmt::Display for DatabaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for DatabaseKind {
    type Err = RetrievalError;

    fn from_str(value: &str) -> Result<Self> {
        let compact: String = value
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| c.to_ascii_lowercase())
            .collect();

        match compact.as_str() {
            "allimages" | "images" => Ok(DatabaseKind::AllImages),
            "categories" => Ok(DatabaseKind::Categories),
            _ => Err(RetrievalError::UnknownDatabase(value.to_string())),
        }
    }
}

/// What the number of correct predictions is divided by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Denominator {
    /// Length of the query set, although the database is what gets evaluated
    #[default]
    Queries,
    /// Length of the database, i.e. the number of records actually evaluated
    Database,
}

impl FromStr for Denominator {
    type Err = RetrievalError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "queries" => Ok(Denominator::Queries),
            "database" => Ok(Denominator::Database),
            _ => Err(RetrievalError::UnknownDenominator(value.to_string())),
        }
    }
}

/// Configuration for search and evaluation
#[derive(Debug, Clone)]
pub struct RetrievalConfig {
    /// Feature used for ranking
    pub feature_type: FeatureType,
    /// Database queries are ranked against
    pub database: DatabaseKind,
    /// Number of nearest neighbours that vote on a category
    pub k: usize,
    /// Evaluation worker threads, `None` for one per logical CPU
    pub workers: Option<usize>,
    /// Divisor of the correct rate
    pub denominator: Denominator,
    /// Count failing records as skipped instead of aborting the evaluation
    pub skip_failed: bool,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            feature_type: FeatureType::MeanColor,
            database: DatabaseKind::AllImages,
            k: 1,
            workers: None,
            denominator: Denominator::Queries,
            skip_failed: false,
        }
    }
}

impl RetrievalConfig {
    pub fn builder() -> RetrievalConfigBuilder {
        RetrievalConfigBuilder::default()
    }
}

/// Builder for RetrievalConfig
#[derive(Default)]
pub struct RetrievalConfigBuilder {
    feature_type: Option<FeatureType>,
    database: Option<DatabaseKind>,
    k: Option<usize>,
    workers: Option<Option<usize>>,
    denominator: Option<Denominator>,
    skip_failed: Option<bool>,
}

impl RetrievalConfigBuilder {
    pub fn feature_type(mut self, feature_type: FeatureType) -> Self {
        self.feature_type = Some(feature_type);
        self
    }

    pub fn database(mut self, database: DatabaseKind) -> Self {
        self.database = Some(database);
        self
    }

    pub fn k(mut self, k: usize) -> Self {
        self.k = Some(k);
        self
    }

    pub fn workers(mut self, workers: Option<usize>) -> Self {
        self.workers = Some(workers);
        self
    }

    pub fn denominator(mut self, denominator: Denominator) -> Self {
        self.denominator = Some(denominator);
        self
    }

    pub fn skip_failed(mut self, skip: bool) -> Self {
        self.skip_failed = Some(skip);
        self
    }

    pub fn build(self) -> RetrievalConfig {
        let default = RetrievalConfig::default();
        RetrievalConfig {
            feature_type: self.feature_type.unwrap_or(default.feature_type),
            database: self.database.unwrap_or(default.database),
            k: self.k.unwrap_or(default.k),
            workers: self.workers.unwrap_or(default.workers),
            denominator: self.denominator.unwrap_or(default.denominator),
            skip_failed: self.skip_failed.unwrap_or(default.skip_failed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = RetrievalConfig::builder()
            .feature_type(FeatureType::MeanImage)
            .database(DatabaseKind::Categories)
            .k(5)
            .workers(Some(3))
            .skip_failed(true)
            .build();

        assert_eq!(config.feature_type, FeatureType::MeanImage);
        assert_eq!(config.database, DatabaseKind::Categories);
        assert_eq!(config.k, 5);
        assert_eq!(config.workers, Some(3));
        assert_eq!(config.denominator, Denominator::Queries);
        assert!(config.skip_failed);
    }

    #[test]
    fn test_database_kind_labels() {
        assert_eq!("All Images".parse::<DatabaseKind>().unwrap(), DatabaseKind::AllImages);
        assert_eq!("categories".parse::<DatabaseKind>().unwrap(), DatabaseKind::Categories);
        assert!(matches!(
            "Everything".parse::<DatabaseKind>(),
            Err(RetrievalError::UnknownDatabase(_))
        ));
    }
}
