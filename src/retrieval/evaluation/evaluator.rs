use std::panic::{self, AssertUnwindSafe};

use rayon::prelude::*;
use tracing::{debug, info, instrument, warn};

use crate::retrieval::classify::classify;
use crate::retrieval::common::error::{Result, RetrievalError};
use crate::retrieval::config::{Denominator, RetrievalConfig};
use crate::retrieval::evaluation::types::{EvaluationReport, Tally};
use crate::retrieval::features::types::{FeatureRecord, FeatureType};
use crate::retrieval::ranking::retrieve;

/// Evaluates k-NN classification over a database on a dedicated worker pool.
///
/// Every database record is ranked against the whole database (itself
/// included) and classified; each worker produces partial [`Tally`] values
/// that are summed once all records are done.
pub struct Evaluator {
    pool: rayon::ThreadPool,
    denominator: Denominator,
    skip_failed: bool,
}

impl Evaluator {
    /// Creates an evaluator with `workers` threads, or one per logical CPU.
    pub fn new(workers: Option<usize>) -> Result<Self> {
        let mut builder = rayon::ThreadPoolBuilder::new()
            .thread_name(|i| format!("evaluate-{i}"));
        if let Some(workers) = workers {
            builder = builder.num_threads(workers.max(1));
        }

        let pool = builder
            .build()
            .map_err(|e| RetrievalError::ThreadPool(e.to_string()))?;

        Ok(Self {
            pool,
            denominator: Denominator::Queries,
            skip_failed: false,
        })
    }

    pub fn from_config(config: &RetrievalConfig) -> Result<Self> {
        Ok(Self::new(config.workers)?
            .with_denominator(config.denominator)
            .with_skip_failed(config.skip_failed))
    }

    pub fn with_denominator(mut self, denominator: Denominator) -> Self {
        self.denominator = denominator;
        self
    }

    pub fn with_skip_failed(mut self, skip: bool) -> Self {
        self.skip_failed = skip;
        self
    }

    pub fn workers(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Classifies every record of `database` against `database` and counts
    /// how often the prediction matches the record's own category.
    ///
    /// `queries` only contributes its length, as the [`Denominator::Queries`]
    /// divisor of the report.
    #[instrument(skip_all, fields(queries = queries.len(), database = database.len(), feature_type = %feature_type, k = k))]
    pub fn run(
        &self,
        queries: &[FeatureRecord],
        database: &[FeatureRecord],
        feature_type: FeatureType,
        k: usize,
    ) -> Result<EvaluationReport> {
        if database.is_empty() {
            return Err(RetrievalError::EmptyDatabase);
        }
        if k == 0 || k > database.len() {
            return Err(RetrievalError::InvalidK {
                k,
                available: database.len(),
            });
        }

        let report = self.run_with(queries.len(), database, |record| {
            let ranked = retrieve(record, database, feature_type)?;
            Ok(classify(&ranked, k)? == record.category)
        })?;

        info!(
            correct = report.tally.correct,
            evaluated = report.tally.evaluated,
            skipped = report.tally.skipped,
            workers = self.workers(),
            "{}",
            report
        );
        Ok(report)
    }

    pub(crate) fn run_with<F>(
        &self,
        queries_len: usize,
        database: &[FeatureRecord],
        judge: F,
    ) -> Result<EvaluationReport>
    where
        F: Fn(&FeatureRecord) -> Result<bool> + Sync,
    {
        let skip_failed = self.skip_failed;

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            self.pool.install(|| {
                database
                    .par_iter()
                    .map(|record| match judge(record) {
                        Ok(true) => Ok(Tally::hit()),
                        Ok(false) => Ok(Tally::miss()),
                        Err(e) if skip_failed => {
                            warn!(record = %record.name, "Skipping record: {}", e);
                            Ok(Tally::skip())
                        }
                        Err(e) => Err(e),
                    })
                    .try_reduce(Tally::default, |a, b| Ok(a + b))
            })
        }));

        let tally = match outcome {
            Ok(tally) => tally?,
            Err(payload) => return Err(RetrievalError::WorkerPanicked(panic_message(&*payload))),
        };

        debug!(?tally, "Evaluation reduced");

        Ok(EvaluationReport {
            tally,
            queries_len,
            database_len: database.len(),
            denominator: self.denominator,
        })
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Fraction of database records whose k-NN prediction matches their own
/// category, divided by the number of `queries`.
pub fn evaluate(
    queries: &[FeatureRecord],
    database: &[FeatureRecord],
    feature_type: FeatureType,
    k: usize,
) -> Result<f64> {
    if queries.is_empty() {
        return Err(RetrievalError::EmptyQueries);
    }

    Evaluator::new(None)?
        .run(queries, database, feature_type, k)?
        .correct_rate_over(Denominator::Queries)
}
