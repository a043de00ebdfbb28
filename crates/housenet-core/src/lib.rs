//! Core numeric types for housenet: the `Matrix` container, the `Float`
//! dtype trait and the shared error type.

pub mod dtype;
pub mod error;
pub mod matrix;

pub use dtype::Float;
pub use error::{MatrixError, MatrixResult};
pub use matrix::Matrix;
