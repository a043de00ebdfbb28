use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PreprocessError {
    #[error("Box-Cox requires strictly positive values, got {value} in column {column}")]
    NonPositive { column: usize, value: f64 },

    #[error("Unknown category: {0:?}")]
    UnknownCategory(String),

    #[error("Empty input")]
    EmptyInput,
}
