pub mod logger;
pub mod retrieval;
