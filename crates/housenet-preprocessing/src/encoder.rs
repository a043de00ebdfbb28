use housenet_core::Matrix;
use serde::{Deserialize, Serialize};

use crate::error::PreprocessError;

/// One-hot encodes a string column. Categories are the sorted distinct
/// values seen at fit time; a value unseen then is an error at transform
/// time rather than an all-zero row.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OneHotEncoder {
    categories: Option<Vec<String>>,
}

impl OneHotEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_fitted(&self) -> bool {
        self.categories.is_some()
    }

    pub fn categories(&self) -> Option<&[String]> {
        self.categories.as_deref()
    }

    pub fn fit(&mut self, values: &[String]) {
        let mut cats: Vec<String> = values.to_vec();
        cats.sort();
        cats.dedup();
        self.categories = Some(cats);
    }

    pub fn transform(&self, values: &[String]) -> Result<Matrix<f64>, PreprocessError> {
        let cats = self
            .categories
            .as_ref()
            .expect("fit() must be called before transform()");
        let mut out = Matrix::zeros(values.len(), cats.len());
        for (row, value) in values.iter().enumerate() {
            let col = cats
                .binary_search(value)
                .map_err(|_| PreprocessError::UnknownCategory(value.clone()))?;
            out.set(row, col, 1.0);
        }
        Ok(out)
    }

    pub fn fit_transform(&mut self, values: &[String]) -> Result<Matrix<f64>, PreprocessError> {
        self.fit(values);
        self.transform(values)
    }

    /// Output width after fitting.
    pub fn n_features(&self) -> usize {
        self.categories.as_ref().map_or(0, Vec::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strs(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn encodes_sorted_categories() {
        let mut enc = OneHotEncoder::new();
        let out = enc
            .fit_transform(&strs(&["INLAND", "NEAR BAY", "INLAND"]))
            .unwrap();
        assert_eq!(enc.categories().unwrap(), &strs(&["INLAND", "NEAR BAY"]));
        assert_eq!(out.shape(), (3, 2));
        assert_eq!(out.row(0).unwrap(), &[1.0, 0.0]);
        assert_eq!(out.row(1).unwrap(), &[0.0, 1.0]);
        assert_eq!(out.row(2).unwrap(), &[1.0, 0.0]);
    }

    #[test]
    fn unseen_category_is_an_error() {
        let mut enc = OneHotEncoder::new();
        enc.fit(&strs(&["A", "B"]));
        let err = enc.transform(&strs(&["C"])).unwrap_err();
        assert_eq!(err, PreprocessError::UnknownCategory("C".to_string()));
    }

    #[test]
    fn width_is_stable_across_transforms() {
        let mut enc = OneHotEncoder::new();
        enc.fit(&strs(&["A", "B", "C"]));
        let out = enc.transform(&strs(&["B"])).unwrap();
        assert_eq!(out.cols(), 3);
        assert_eq!(enc.n_features(), 3);
    }
}
