//! Umbrella crate re-exporting the housenet workspace.
//!
//! ```
//! use housenet::datasets::synthetic_housing;
//! use housenet::model::{Regressor, RegressorConfig, TARGET_COLUMN};
//!
//! let table = synthetic_housing(64, Some(0));
//! let (x, y) = table.split_target(TARGET_COLUMN).unwrap();
//! let mut model = Regressor::new(&x, RegressorConfig {
//!     epochs: 2,
//!     seed: Some(0),
//!     ..RegressorConfig::default()
//! }).unwrap();
//! model.fit(&x, &y, None).unwrap();
//! let rmse = model.score(&x, &y).unwrap();
//! assert!(rmse.is_finite());
//! ```

pub use housenet_autodiff as autodiff;
pub use housenet_core as core;
pub use housenet_data as data;
pub use housenet_datasets as datasets;
pub use housenet_loss as loss;
pub use housenet_metrics as metrics;
pub use housenet_model as model;
pub use housenet_nn as nn;
pub use housenet_optim as optim;
pub use housenet_preprocessing as preprocessing;

pub use housenet_core::{Float, Matrix, MatrixError};
pub use housenet_data::{Column, Frame};
pub use housenet_model::{ModelError, Preprocessor, Regressor, RegressorConfig};
