//! Evaluation metrics for regression outputs.

pub mod regression;

pub use regression::{
    mean_absolute_error, mean_squared_error, r2_score, root_mean_squared_error,
};
