use housenet_autodiff::Variable;
use housenet_core::{Matrix, MatrixResult};
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

/// A layer of a feed-forward network.
///
/// `forward` runs on the autodiff tape: parameter matrices are registered
/// as fresh `Variable`s each pass and pushed into `params` so the caller
/// can match gradients back to the owning layer after `backward`.
/// `infer` is the tape-free path for prediction.
pub trait Layer {
    fn forward(&self, input: &Variable, params: &mut Vec<Variable>) -> Variable;
    fn infer(&self, input: &Matrix<f64>) -> MatrixResult<Matrix<f64>>;
    fn parameters(&self) -> Vec<&Matrix<f64>>;
    fn parameters_mut(&mut self) -> Vec<&mut Matrix<f64>>;
}

/// Fully-connected layer: `y = x @ W + b`, with `W: [in, out]`, `b: [1, out]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Linear {
    weight: Matrix<f64>,
    bias: Matrix<f64>,
}

impl Linear {
    /// Xavier-uniform initialization: U(-k, k) with k = sqrt(6 / (in + out)).
    pub fn new(in_features: usize, out_features: usize, rng: &mut StdRng) -> Self {
        let k = (6.0 / (in_features + out_features) as f64).sqrt();
        Linear {
            weight: Matrix::rand(in_features, out_features, -k, k, rng),
            bias: Matrix::zeros(1, out_features),
        }
    }

    pub fn from_parts(weight: Matrix<f64>, bias: Matrix<f64>) -> Self {
        Linear { weight, bias }
    }

    pub fn in_features(&self) -> usize {
        self.weight.rows()
    }

    pub fn out_features(&self) -> usize {
        self.weight.cols()
    }
}

impl Layer for Linear {
    fn forward(&self, input: &Variable, params: &mut Vec<Variable>) -> Variable {
        let w = Variable::param(self.weight.clone());
        let b = Variable::param(self.bias.clone());
        let out = input.matmul(&w).add(&b);
        params.push(w);
        params.push(b);
        out
    }

    fn infer(&self, input: &Matrix<f64>) -> MatrixResult<Matrix<f64>> {
        input.matmul(&self.weight)?.add(&self.bias)
    }

    fn parameters(&self) -> Vec<&Matrix<f64>> {
        vec![&self.weight, &self.bias]
    }

    fn parameters_mut(&mut self) -> Vec<&mut Matrix<f64>> {
        vec![&mut self.weight, &mut self.bias]
    }
}

/// Rectified linear activation. Stateless.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReLU;

impl Layer for ReLU {
    fn forward(&self, input: &Variable, _params: &mut Vec<Variable>) -> Variable {
        input.relu()
    }

    fn infer(&self, input: &Matrix<f64>) -> MatrixResult<Matrix<f64>> {
        Ok(input.apply(|x| x.max(0.0)))
    }

    fn parameters(&self) -> Vec<&Matrix<f64>> {
        Vec::new()
    }

    fn parameters_mut(&mut self) -> Vec<&mut Matrix<f64>> {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn linear_infer_applies_weights_and_bias() {
        let w = Matrix::new(vec![1.0, 2.0, 3.0, 4.0], 2, 2).unwrap();
        let b = Matrix::new(vec![0.5, -0.5], 1, 2).unwrap();
        let layer = Linear::from_parts(w, b);
        let x = Matrix::new(vec![1.0, 1.0], 1, 2).unwrap();
        let y = layer.infer(&x).unwrap();
        assert_eq!(y.data(), &[4.5, 5.5]);
    }

    #[test]
    fn xavier_init_stays_in_bound() {
        let mut rng = StdRng::seed_from_u64(0);
        let layer = Linear::new(8, 4, &mut rng);
        let k = (6.0 / 12.0f64).sqrt();
        assert!(layer.parameters()[0].data().iter().all(|v| v.abs() <= k));
        assert!(layer.parameters()[1].data().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn relu_infer_clamps_negatives() {
        let x = Matrix::new(vec![-1.0, 2.0, 0.0], 1, 3).unwrap();
        let y = ReLU.infer(&x).unwrap();
        assert_eq!(y.data(), &[0.0, 2.0, 0.0]);
    }
}
