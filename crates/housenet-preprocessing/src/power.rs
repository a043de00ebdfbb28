use housenet_core::Matrix;
use serde::{Deserialize, Serialize};

use crate::error::PreprocessError;
use crate::scaler::StandardScaler;

const LAMBDA_LO: f64 = -5.0;
const LAMBDA_HI: f64 = 5.0;
const GOLDEN: f64 = 0.618_033_988_749_894_8;

/// Box-Cox power transform with per-column maximum-likelihood λ, followed
/// by standardization of the transformed values.
///
/// Inputs must be strictly positive. λ is chosen per column by maximizing
/// the profile log-likelihood over `[-5, 5]` with a golden-section search.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PowerTransformer {
    lambdas: Option<Vec<f64>>,
    scaler: StandardScaler,
}

impl PowerTransformer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_fitted(&self) -> bool {
        self.lambdas.is_some()
    }

    pub fn lambdas(&self) -> Option<&[f64]> {
        self.lambdas.as_deref()
    }

    pub fn fit(&mut self, data: &Matrix<f64>) -> Result<(), PreprocessError> {
        if data.numel() == 0 {
            return Err(PreprocessError::EmptyInput);
        }
        let mut lambdas = Vec::with_capacity(data.cols());
        for c in 0..data.cols() {
            let column = data.column(c).expect("column index in range");
            check_positive(c, &column)?;
            lambdas.push(optimal_lambda(&column));
        }
        let transformed = apply_boxcox(data, &lambdas);
        self.scaler.fit(&transformed);
        self.lambdas = Some(lambdas);
        Ok(())
    }

    pub fn transform(&self, data: &Matrix<f64>) -> Result<Matrix<f64>, PreprocessError> {
        let lambdas = self
            .lambdas
            .as_ref()
            .expect("fit() must be called before transform()");
        for c in 0..data.cols() {
            let column = data.column(c).expect("column index in range");
            check_positive(c, &column)?;
        }
        Ok(self.scaler.transform(&apply_boxcox(data, lambdas)))
    }

    pub fn fit_transform(&mut self, data: &Matrix<f64>) -> Result<Matrix<f64>, PreprocessError> {
        self.fit(data)?;
        self.transform(data)
    }
}

fn check_positive(column: usize, values: &[f64]) -> Result<(), PreprocessError> {
    for &v in values {
        if v <= 0.0 || v.is_nan() {
            return Err(PreprocessError::NonPositive { column, value: v });
        }
    }
    Ok(())
}

#[inline]
fn boxcox(x: f64, lambda: f64) -> f64 {
    if lambda.abs() < 1e-12 {
        x.ln()
    } else {
        (x.powf(lambda) - 1.0) / lambda
    }
}

fn apply_boxcox(data: &Matrix<f64>, lambdas: &[f64]) -> Matrix<f64> {
    let mut out = Matrix::zeros(data.rows(), data.cols());
    for r in 0..data.rows() {
        for c in 0..data.cols() {
            out.set(r, c, boxcox(data.get(r, c), lambdas[c]));
        }
    }
    out
}

/// Profile log-likelihood of the Box-Cox parameter, up to a constant:
/// `(λ - 1) · Σ ln x - n/2 · ln var(y(λ))`.
fn log_likelihood(values: &[f64], lambda: f64) -> f64 {
    let n = values.len() as f64;
    let log_sum: f64 = values.iter().map(|x| x.ln()).sum();
    let y: Vec<f64> = values.iter().map(|&x| boxcox(x, lambda)).collect();
    let mean = y.iter().sum::<f64>() / n;
    let var = y.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n;
    if var <= 0.0 {
        return f64::NEG_INFINITY;
    }
    (lambda - 1.0) * log_sum - n / 2.0 * var.ln()
}

/// Golden-section search for the λ maximizing the profile log-likelihood.
fn optimal_lambda(values: &[f64]) -> f64 {
    let mut lo = LAMBDA_LO;
    let mut hi = LAMBDA_HI;
    let mut a = hi - GOLDEN * (hi - lo);
    let mut b = lo + GOLDEN * (hi - lo);
    let mut fa = log_likelihood(values, a);
    let mut fb = log_likelihood(values, b);
    while hi - lo > 1e-7 {
        if fa > fb {
            hi = b;
            b = a;
            fb = fa;
            a = hi - GOLDEN * (hi - lo);
            fa = log_likelihood(values, a);
        } else {
            lo = a;
            a = b;
            fa = fb;
            b = lo + GOLDEN * (hi - lo);
            fb = log_likelihood(values, b);
        }
    }
    (lo + hi) / 2.0
}
