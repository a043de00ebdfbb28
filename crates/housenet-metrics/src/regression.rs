use housenet_core::Matrix;

/// Mean squared error.
pub fn mean_squared_error(y_true: &Matrix<f64>, y_pred: &Matrix<f64>) -> f64 {
    debug_assert_eq!(y_true.shape(), y_pred.shape());
    let n = y_true.numel();
    if n == 0 {
        return 0.0;
    }
    y_true
        .data()
        .iter()
        .zip(y_pred.data())
        .map(|(&t, &p)| (t - p) * (t - p))
        .sum::<f64>()
        / n as f64
}

/// Root mean squared error.
pub fn root_mean_squared_error(y_true: &Matrix<f64>, y_pred: &Matrix<f64>) -> f64 {
    mean_squared_error(y_true, y_pred).sqrt()
}

/// Mean absolute error.
pub fn mean_absolute_error(y_true: &Matrix<f64>, y_pred: &Matrix<f64>) -> f64 {
    let n = y_true.numel();
    if n == 0 {
        return 0.0;
    }
    y_true
        .data()
        .iter()
        .zip(y_pred.data())
        .map(|(&t, &p)| (t - p).abs())
        .sum::<f64>()
        / n as f64
}

/// Coefficient of determination. Returns 0 when the target is constant.
pub fn r2_score(y_true: &Matrix<f64>, y_pred: &Matrix<f64>) -> f64 {
    let mean = y_true.mean();
    let ss_tot: f64 = y_true.data().iter().map(|&t| (t - mean) * (t - mean)).sum();
    if ss_tot == 0.0 {
        return 0.0;
    }
    let ss_res: f64 = y_true
        .data()
        .iter()
        .zip(y_pred.data())
        .map(|(&t, &p)| (t - p) * (t - p))
        .sum();
    1.0 - ss_res / ss_tot
}
