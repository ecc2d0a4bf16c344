//! Evaluation result types

use std::fmt;
use std::ops::Add;

use crate::retrieval::common::error::{Result, RetrievalError};
use crate::retrieval::config::Denominator;

/// Per-worker partial counts, merged by addition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Tally {
    pub correct: usize,
    pub evaluated: usize,
    pub skipped: usize,
}

impl Tally {
    pub fn hit() -> Self {
        Self { correct: 1, evaluated: 1, skipped: 0 }
    }

    pub fn miss() -> Self {
        Self { correct: 0, evaluated: 1, skipped: 0 }
    }

    pub fn skip() -> Self {
        Self { correct: 0, evaluated: 0, skipped: 1 }
    }
}

impl Add for Tally {
    type Output = Tally;

    fn add(self, other: Tally) -> Tally {
        Tally {
            correct: self.correct + other.correct,
            evaluated: self.evaluated + other.evaluated,
            skipped: self.skipped + other.skipped,
        }
    }
}

/// Outcome of evaluating a database
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvaluationReport {
    pub tally: Tally,
    pub queries_len: usize,
    pub database_len: usize,
    pub denominator: Denominator,
}

impl EvaluationReport {
    pub fn correct(&self) -> usize {
        self.tally.correct
    }

    /// Correct predictions over the configured denominator.
    pub fn correct_rate(&self) -> Result<f64> {
        self.correct_rate_over(self.denominator)
    }

    /// Correct predictions over an explicit denominator.
    ///
    /// With [`Denominator::Queries`] the value exceeds 1.0 whenever the
    /// database is larger than the query set.
    pub fn correct_rate_over(&self, denominator: Denominator) -> Result<f64> {
        let divisor = match denominator {
            Denominator::Queries => self.queries_len,
            Denominator::Database => self.database_len,
        };

        if divisor == 0 {
            return Err(match denominator {
                Denominator::Queries => RetrievalError::EmptyQueries,
                Denominator::Database => RetrievalError::EmptyDatabase,
            });
        }

        Ok(self.tally.correct as f64 / divisor as f64)
    }
}

impl fmt::Display for EvaluationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.correct_rate() {
            // whole percent, truncated
            Ok(rate) => write!(f, "Correct Rate: {}%", (rate * 100.0) as u64),
            Err(_) => f.write_str("Correct Rate: n/a"),
        }
    }
}
