use thiserror::Error;

/// Error type for all matrix operations.
#[derive(Debug, Error, Clone)]
pub enum MatrixError {
    #[error("Shape mismatch: expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        expected: (usize, usize),
        got: (usize, usize),
    },

    #[error("Row index {index} out of bounds for matrix with {rows} rows")]
    RowOutOfBounds { index: usize, rows: usize },

    #[error("Column index {index} out of bounds for matrix with {cols} columns")]
    ColOutOfBounds { index: usize, cols: usize },

    #[error("Inner dimensions must match for matmul: {left} vs {right}")]
    InnerDimMismatch { left: usize, right: usize },

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    #[error("Empty matrix")]
    EmptyMatrix,
}

pub type MatrixResult<T> = Result<T, MatrixError>;
