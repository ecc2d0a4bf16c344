//! Evaluation module
//!
//! Runs retrieval and classification for every database record on a worker
//! pool and reduces the outcomes into a correct rate.

mod evaluator;
pub mod types;

pub use evaluator::{Evaluator, evaluate};
pub use types::{EvaluationReport, Tally};
