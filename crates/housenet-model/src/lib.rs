//! The house-value regression model: a column-grouped preprocessing
//! pipeline and a feed-forward regressor trained with minibatch SGD.

pub mod error;
pub mod preprocessor;
pub mod regressor;

pub use error::ModelError;
pub use preprocessor::{Preprocessor, TARGET_COLUMN};
pub use regressor::{Regressor, RegressorConfig};
