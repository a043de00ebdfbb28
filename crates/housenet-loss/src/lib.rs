//! Differentiable losses.

pub mod loss;

pub use loss::mse_loss;
