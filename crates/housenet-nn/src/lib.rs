//! Feed-forward network building blocks: the `Layer` trait, `Linear`,
//! `ReLU` and the `Sequential` container.

pub mod layers;
pub mod sequential;

pub use layers::{Layer, Linear, ReLU};
pub use sequential::Sequential;
