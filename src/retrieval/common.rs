//! Common utilities module
//!
//! This module contains shared utilities used across the retrieval core.

pub mod error;

pub use error::{Result, RetrievalError};
