//! Synthetic data generators used by the demos and tests.

pub mod builtin;

pub use builtin::synthetic_housing;
