use thiserror::Error;

pub type Result<T> = std::result::Result<T, VectorStoreError>;

#[derive(Error, Debug)]
pub enum VectorStoreError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Failed to decompress {what}: {source}")]
    Decompress {
        what: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid vector dimension: expected {expected}, got {actual}")]
    InvalidDimension { expected: usize, actual: usize },

    #[error("Matrix has {rows} rows but vocabulary has {words} words")]
    ShapeMismatch { rows: usize, words: usize },

    #[error("Vocabulary is empty")]
    EmptyVocabulary,

    #[error("Unsupported corpus: {0}")]
    Schema(String),

    #[error("Invalid quantization range: min={min}, max={max}")]
    InvalidRange { min: f64, max: f64 },

    #[error("Background task failed: {0}")]
    Join(String),
}
