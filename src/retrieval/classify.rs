//! k-nearest-neighbour classification over a ranked result.

use std::collections::BTreeMap;

use crate::retrieval::common::error::{Result, RetrievalError};
use crate::retrieval::ranking::RankedResult;

/// Predicts a category by majority vote among the first `k` ranked records.
///
/// Ties go to the lexicographically smallest category name.
pub fn classify<'a>(ranked: &RankedResult<'a>, k: usize) -> Result<&'a str> {
    if k == 0 || k > ranked.len() {
        return Err(RetrievalError::InvalidK {
            k,
            available: ranked.len(),
        });
    }

    let mut votes: BTreeMap<&'a str, usize> = BTreeMap::new();
    for record in ranked.records().take(k) {
        *votes.entry(record.category.as_str()).or_default() += 1;
    }

    let mut winner: Option<(&'a str, usize)> = None;
    for (category, count) in votes {
        if winner.is_none_or(|(_, best)| count > best) {
            winner = Some((category, count));
        }
    }

    // k >= 1, so at least one vote was cast
    winner
        .map(|(category, _)| category)
        .ok_or(RetrievalError::InvalidK { k, available: 0 })
}
