use thiserror::Error;

use housenet_core::MatrixError;
use housenet_data::FrameError;
use housenet_preprocessing::PreprocessError;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error(transparent)]
    Frame(#[from] FrameError),

    #[error(transparent)]
    Preprocess(#[from] PreprocessError),

    #[error(transparent)]
    Matrix(#[from] MatrixError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Column {name:?} must be {expected}")]
    ColumnType { name: String, expected: &'static str },

    #[error("Corrupt model file: {0}")]
    CorruptSnapshot(String),
}
