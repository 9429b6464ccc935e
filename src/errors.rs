use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Error type for corpus loading and recommendation requests.
#[derive(Debug, Error)]
pub enum RecommenderError {
    #[error("recipe dataset not found, searched: {searched:?}")]
    CorpusNotFound { searched: Vec<PathBuf> },
    #[error("Column '{0}' not found")]
    MissingColumn(String),
    #[error("No valid recipes loaded from {0:?}")]
    EmptyCorpus(PathBuf),
    #[error("query vector has {got} dimensions, expected {expected}")]
    DimensionMismatch { expected: usize, got: usize },
    #[error("filter '{step}' removed every candidate: {message}")]
    FilterExhausted { step: String, message: String },
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = RecommenderError> = std::result::Result<T, E>;
