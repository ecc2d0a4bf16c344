use thiserror::Error;

#[derive(Error, Debug)]
pub enum RetrievalError {
    #[error("No images given to feature extraction")]
    EmptyInput,

    #[error("Image dimensions differ: expected {expected:?}, found {found:?}")]
    DimensionMismatch {
        expected: (usize, usize),
        found: (usize, usize),
    },

    #[error("Invalid k={k}: must be between 1 and {available}")]
    InvalidK { k: usize, available: usize },

    #[error("Cannot rank against an empty database")]
    EmptyDatabase,

    #[error("Cannot compute a correct rate over zero queries")]
    EmptyQueries,

    #[error("Invalid image dimensions: width={0}, height={1}")]
    InvalidDimensions(usize, usize),

    #[error("Pixel buffer holds {found} pixels, expected {expected}")]
    PixelBufferMismatch { expected: usize, found: usize },

    #[error("Unknown feature type: {0}")]
    UnknownFeatureType(String),

    #[error("Unknown database: {0}")]
    UnknownDatabase(String),

    #[error("Unknown correct-rate denominator: {0}")]
    UnknownDenominator(String),

    #[error("Category name {0} is reserved for the category spanning every image")]
    ReservedCategory(String),

    #[error("No feature record named {0}")]
    UnknownRecord(String),

    #[error("Evaluation worker panicked: {0}")]
    WorkerPanicked(String),

    #[error("Failed to build worker pool: {0}")]
    ThreadPool(String),

    #[error("Failed to read input file: {0}")]
    InputReadError(String),

    #[error("Failed to write output file: {0}")]
    OutputWriteError(String),

    #[error("Failed to decode image: {0}")]
    DecodeError(String),

    #[error("Failed to encode TIFF image: {0}")]
    EncodeError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, RetrievalError>;
