//! Feature preprocessing: standard scaling, Box-Cox power transformation
//! and one-hot encoding. All transformers keep their fitted state in
//! serializable form so a trained pipeline can be persisted.

pub mod encoder;
pub mod error;
pub mod power;
pub mod scaler;

pub use encoder::OneHotEncoder;
pub use error::PreprocessError;
pub use power::PowerTransformer;
pub use scaler::StandardScaler;
