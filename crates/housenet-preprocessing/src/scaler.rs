use housenet_core::Matrix;
use serde::{Deserialize, Serialize};

/// Standardizes columns to zero mean and unit variance.
///
/// `transform` before `fit` is a usage error and panics. Columns with zero
/// variance get a divisor of 1 so constant features pass through centred.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StandardScaler {
    mean: Option<Matrix<f64>>,
    std: Option<Matrix<f64>>,
}

impl StandardScaler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_fitted(&self) -> bool {
        self.mean.is_some()
    }

    pub fn fit(&mut self, data: &Matrix<f64>) {
        let mean = data.mean_axis0();
        let std = data
            .std_axis0()
            .apply(|s| if s == 0.0 { 1.0 } else { s });
        self.mean = Some(mean);
        self.std = Some(std);
    }

    pub fn transform(&self, data: &Matrix<f64>) -> Matrix<f64> {
        let mean = self
            .mean
            .as_ref()
            .expect("fit() must be called before transform()");
        let std = self
            .std
            .as_ref()
            .expect("fit() must be called before transform()");
        data.sub(mean)
            .and_then(|d| d.div(std))
            .expect("fitted statistics match the data width")
    }

    pub fn fit_transform(&mut self, data: &Matrix<f64>) -> Matrix<f64> {
        self.fit(data);
        self.transform(data)
    }

    /// Maps standardized values back to the original scale.
    pub fn inverse_transform(&self, data: &Matrix<f64>) -> Matrix<f64> {
        let mean = self
            .mean
            .as_ref()
            .expect("fit() must be called before inverse_transform()");
        let std = self
            .std
            .as_ref()
            .expect("fit() must be called before inverse_transform()");
        data.mul(std)
            .and_then(|d| d.add(mean))
            .expect("fitted statistics match the data width")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn data() -> Matrix<f64> {
        Matrix::new(vec![1.0, 100.0, 2.0, 200.0, 3.0, 300.0], 3, 2).unwrap()
    }

    #[test]
    fn transform_centres_and_scales() {
        let mut scaler = StandardScaler::new();
        let z = scaler.fit_transform(&data());
        assert_relative_eq!(z.mean_axis0().get(0, 0), 0.0, epsilon = 1e-12);
        assert_relative_eq!(z.mean_axis0().get(0, 1), 0.0, epsilon = 1e-12);
        assert_relative_eq!(z.std_axis0().get(0, 0), 1.0, epsilon = 1e-12);
        assert_relative_eq!(z.std_axis0().get(0, 1), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn inverse_transform_round_trips() {
        let mut scaler = StandardScaler::new();
        let d = data();
        let z = scaler.fit_transform(&d);
        let back = scaler.inverse_transform(&z);
        for (a, b) in d.data().iter().zip(back.data()) {
            assert_relative_eq!(a, b, epsilon = 1e-9);
        }
    }

    #[test]
    fn constant_column_passes_through_centred() {
        let d = Matrix::new(vec![5.0, 5.0, 5.0], 3, 1).unwrap();
        let mut scaler = StandardScaler::new();
        let z = scaler.fit_transform(&d);
        assert!(z.data().iter().all(|&v| v == 0.0));
    }

    #[test]
    #[should_panic(expected = "fit() must be called before transform()")]
    fn transform_before_fit_panics() {
        StandardScaler::new().transform(&data());
    }
}
