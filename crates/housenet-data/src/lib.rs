//! Mixed-type tabular data: the `Frame` container and CSV loading.

pub mod frame;

pub use frame::{Column, Frame, FrameError};
