//! Optimizers. Only SGD with momentum is implemented; the training loop
//! constructs a fresh instance per epoch, so velocity resets at epoch
//! boundaries.

pub mod sgd;

pub use sgd::Sgd;
