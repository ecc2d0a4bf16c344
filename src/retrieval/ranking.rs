//! Similarity ranking
//!
//! Orders a feature database by L1 distance to a query. Records with equal
//! distance keep their database order, so every record appears exactly once in
//! the result, including ties.

use tracing::trace;

use crate::retrieval::common::error::{Result, RetrievalError};
use crate::retrieval::features::types::{FeatureRecord, FeatureType};

/// A database record together with its distance to the query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankedEntry<'a> {
    pub record: &'a FeatureRecord,
    pub distance: u64,
}

/// Database records sorted ascending by distance to a query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedResult<'a> {
    entries: Vec<RankedEntry<'a>>,
}

impl<'a> RankedResult<'a> {
    pub fn entries(&self) -> &[RankedEntry<'a>] {
        &self.entries
    }

    pub fn records(&self) -> impl Iterator<Item = &'a FeatureRecord> + '_ {
        self.entries.iter().map(|e| e.record)
    }

    pub fn names(&self) -> Vec<&'a str> {
        self.entries.iter().map(|e| e.record.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Ranks every record of `database` by its distance to `query`.
///
/// The sort key is `(distance, database index)`.
pub fn retrieve<'a>(
    query: &FeatureRecord,
    database: &'a [FeatureRecord],
    feature_type: FeatureType,
) -> Result<RankedResult<'a>> {
    if database.is_empty() {
        return Err(RetrievalError::EmptyDatabase);
    }

    let mut keyed = database
        .iter()
        .enumerate()
        .map(|(index, record)| Ok((query.distance(record, feature_type)?, index)))
        .collect::<Result<Vec<(u64, usize)>>>()?;

    keyed.sort_unstable();

    trace!(query = %query.name, %feature_type, "ranked {} records", keyed.len());

    Ok(RankedResult {
        entries: keyed
            .into_iter()
            .map(|(distance, index)| RankedEntry {
                record: &database[index],
                distance,
            })
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::retrieval::features::compute_mean_image;
    use crate::retrieval::pixels::types::{RawImage, Rgb};

    fn record(name: &str, category: &str, color: Rgb) -> FeatureRecord {
        let image = RawImage::filled(2, 2, color).unwrap();
        let mean_image = compute_mean_image(&[&image]).unwrap().unwrap();
        FeatureRecord::new(name, category, color, mean_image)
    }

    #[test]
    fn test_orders_by_distance() {
        let database = vec![
            record("far", "a", Rgb::new(200, 200, 200)),
            record("near", "b", Rgb::new(12, 10, 10)),
            record("middle", "c", Rgb::new(60, 10, 10)),
        ];
        let query = record("q", "b", Rgb::new(10, 10, 10));

        for feature_type in FeatureType::ALL {
            let ranked = retrieve(&query, &database, feature_type).unwrap();
            assert_eq!(ranked.names(), vec!["near", "middle", "far"]);
        }
    }

    #[test]
    fn test_reports_distances() {
        let database = vec![record("x", "a", Rgb::new(1, 2, 3))];
        let query = record("q", "a", Rgb::new(0, 0, 0));

        let by_color = retrieve(&query, &database, FeatureType::MeanColor).unwrap();
        let by_image = retrieve(&query, &database, FeatureType::MeanImage).unwrap();

        assert_eq!(by_color.entries()[0].distance, 6);
        assert_eq!(by_image.entries()[0].distance, 4 * 6);
    }

    #[test]
    fn test_ties_keep_every_record_in_database_order() {
        // A distance-keyed map would collapse these three into one slot.
        let database = vec![
            record("first", "a", Rgb::new(20, 0, 0)),
            record("second", "b", Rgb::new(0, 20, 0)),
            record("closest", "c", Rgb::new(1, 0, 0)),
            record("third", "c", Rgb::new(0, 0, 20)),
        ];
        let query = record("q", "a", Rgb::BLACK);

        let ranked = retrieve(&query, &database, FeatureType::MeanColor).unwrap();

        assert_eq!(ranked.len(), database.len());
        assert_eq!(ranked.names(), vec!["closest", "first", "second", "third"]);
    }

    #[test]
    fn test_is_deterministic() {
        let database: Vec<FeatureRecord> = (0..50u8)
            .map(|i| record(&format!("img{i}"), "a", Rgb::new(i.wrapping_mul(37), i, 255 - i)))
            .collect();
        let query = record("q", "a", Rgb::new(90, 40, 200));

        let first = retrieve(&query, &database, FeatureType::MeanColor).unwrap();
        for _ in 0..5 {
            assert_eq!(retrieve(&query, &database, FeatureType::MeanColor).unwrap(), first);
        }
    }

    #[test]
    fn test_empty_database() {
        let query = record("q", "a", Rgb::BLACK);
        let result = retrieve(&query, &[], FeatureType::MeanColor);
        assert!(matches!(result, Err(RetrievalError::EmptyDatabase)));
    }

    #[test]
    fn test_mean_image_size_mismatch_propagates() {
        let small = RawImage::filled(1, 1, Rgb::BLACK).unwrap();
        let database = vec![FeatureRecord::new(
            "small",
            "a",
            Rgb::BLACK,
            compute_mean_image(&[&small]).unwrap().unwrap(),
        )];
        let query = record("q", "a", Rgb::BLACK);

        let result = retrieve(&query, &database, FeatureType::MeanImage);
        assert!(matches!(result, Err(RetrievalError::DimensionMismatch { .. })));
        assert!(retrieve(&query, &database, FeatureType::MeanColor).is_ok());
    }
}
