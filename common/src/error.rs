use std::path::PathBuf;

use thiserror::Error;

// Core internal errors
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Corpus source not found: {}", .0.display())]
    SourceNotFound(PathBuf),
    #[error("Missing required column: {0}")]
    MissingColumn(String),
    #[error("Corpus contains no usable rows")]
    EmptyCorpus,
    #[error("Empty input")]
    EmptyInput,
    #[error("Embedding backend error: {0}")]
    Embedding(String),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("IoError: {0}")]
    Io(#[from] std::io::Error),
}
