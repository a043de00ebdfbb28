use serde::{Deserialize, Serialize};

use housenet_core::Matrix;
use housenet_data::{Column, Frame};
use housenet_preprocessing::{OneHotEncoder, PowerTransformer, StandardScaler};

use crate::error::ModelError;

/// Feature columns standardized as-is: the geographic coordinates.
pub const STANDARD_COLUMNS: [&str; 2] = ["longitude", "latitude"];

/// Skewed count and income columns, Gaussianized with Box-Cox.
pub const POWER_COLUMNS: [&str; 6] = [
    "housing_median_age",
    "total_rooms",
    "total_bedrooms",
    "population",
    "households",
    "median_income",
];

pub const ONE_HOT_COLUMN: &str = "ocean_proximity";
pub const TARGET_COLUMN: &str = "median_house_value";

/// Column-grouped preprocessing pipeline for the census housing table.
///
/// Routes each input column to its transformer: standard scaling for the
/// coordinates, Box-Cox for the skewed numeric columns, one-hot for the
/// ocean-proximity category. The target gets its own standard scaler so
/// predictions can be mapped back to dollars. Missing numeric values are
/// imputed with the column mean of whatever frame is being processed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Preprocessor {
    standard: StandardScaler,
    power: PowerTransformer,
    one_hot: OneHotEncoder,
    target: StandardScaler,
}

impl Preprocessor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_fitted(&self) -> bool {
        self.standard.is_fitted()
    }

    /// Width of the transformed feature matrix. Only valid after fitting.
    pub fn n_features(&self) -> usize {
        STANDARD_COLUMNS.len() + POWER_COLUMNS.len() + self.one_hot.n_features()
    }

    pub fn fit_input(&mut self, x: &Frame) -> Result<(), ModelError> {
        self.standard.fit(&numeric_group(x, &STANDARD_COLUMNS)?);
        self.power.fit(&numeric_group(x, &POWER_COLUMNS)?)?;
        self.one_hot.fit(&categorical_column(x, ONE_HOT_COLUMN)?);
        Ok(())
    }

    pub fn fit_target(&mut self, y: &Frame) -> Result<(), ModelError> {
        self.target.fit(&numeric_group(y, &[TARGET_COLUMN])?);
        Ok(())
    }

    pub fn transform_input(&self, x: &Frame) -> Result<Matrix<f64>, ModelError> {
        let standard = self.standard.transform(&numeric_group(x, &STANDARD_COLUMNS)?);
        let power = self.power.transform(&numeric_group(x, &POWER_COLUMNS)?)?;
        let one_hot = self
            .one_hot
            .transform(&categorical_column(x, ONE_HOT_COLUMN)?)?;
        Ok(Matrix::hstack(&[&standard, &power, &one_hot])?)
    }

    pub fn transform_target(&self, y: &Frame) -> Result<Matrix<f64>, ModelError> {
        Ok(self.target.transform(&numeric_group(y, &[TARGET_COLUMN])?))
    }

    pub fn inverse_transform_target(&self, z: &Matrix<f64>) -> Matrix<f64> {
        self.target.inverse_transform(z)
    }
}

/// Collects the named numeric columns into a matrix, imputing NaN entries
/// with the mean of the non-missing values in the same column.
fn numeric_group(frame: &Frame, names: &[&str]) -> Result<Matrix<f64>, ModelError> {
    let rows = frame.n_rows();
    let mut out = Matrix::zeros(rows, names.len());
    for (c, &name) in names.iter().enumerate() {
        match frame.column(name)? {
            Column::Numeric(values) => {
                let filled = fill_missing(values);
                for (r, v) in filled.into_iter().enumerate() {
                    out.set(r, c, v);
                }
            }
            Column::Categorical(_) => {
                return Err(ModelError::ColumnType {
                    name: name.to_string(),
                    expected: "numeric",
                })
            }
        }
    }
    Ok(out)
}

fn categorical_column(frame: &Frame, name: &str) -> Result<Vec<String>, ModelError> {
    match frame.column(name)? {
        Column::Categorical(values) => Ok(values.clone()),
        Column::Numeric(_) => Err(ModelError::ColumnType {
            name: name.to_string(),
            expected: "categorical",
        }),
    }
}

fn fill_missing(values: &[f64]) -> Vec<f64> {
    let present: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
    if present.len() == values.len() {
        return values.to_vec();
    }
    let mean = if present.is_empty() {
        0.0
    } else {
        present.iter().sum::<f64>() / present.len() as f64
    };
    values
        .iter()
        .map(|&v| if v.is_nan() { mean } else { v })
        .collect()
}
