use housenet_autodiff::Variable;
use housenet_core::{Matrix, MatrixResult};

use crate::layers::Layer;

/// An ordered stack of layers.
#[derive(Default)]
pub struct Sequential {
    layers: Vec<Box<dyn Layer>>,
}

impl Sequential {
    pub fn new() -> Self {
        Sequential { layers: Vec::new() }
    }

    /// Builder-style push.
    pub fn add<L: Layer + 'static>(mut self, layer: L) -> Self {
        self.layers.push(Box::new(layer));
        self
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Forward pass on the autodiff tape. Returns the output variable and
    /// the parameter variables registered during this pass, in layer order,
    /// for gradient lookup after `backward`.
    pub fn forward_train(&self, input: &Matrix<f64>) -> (Variable, Vec<Variable>) {
        let mut params = Vec::new();
        let mut out = Variable::input(input.clone());
        for layer in &self.layers {
            out = layer.forward(&out, &mut params);
        }
        (out, params)
    }

    /// Tape-free forward pass for prediction.
    pub fn infer(&self, input: &Matrix<f64>) -> MatrixResult<Matrix<f64>> {
        let mut out = input.clone();
        for layer in &self.layers {
            out = layer.infer(&out)?;
        }
        Ok(out)
    }

    /// All parameter matrices in layer order.
    pub fn parameters(&self) -> Vec<&Matrix<f64>> {
        self.layers.iter().flat_map(|l| l.parameters()).collect()
    }

    pub fn parameters_mut(&mut self) -> Vec<&mut Matrix<f64>> {
        self.layers
            .iter_mut()
            .flat_map(|l| l.parameters_mut())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::{Linear, ReLU};
    use approx::assert_relative_eq;
    use housenet_autodiff::{backward, reset_graph};

    fn tiny_net() -> Sequential {
        let w1 = Matrix::new(vec![1.0, -1.0], 1, 2).unwrap();
        let b1 = Matrix::new(vec![0.0, 0.0], 1, 2).unwrap();
        let w2 = Matrix::new(vec![1.0, 1.0], 2, 1).unwrap();
        let b2 = Matrix::new(vec![0.5], 1, 1).unwrap();
        Sequential::new()
            .add(Linear::from_parts(w1, b1))
            .add(ReLU)
            .add(Linear::from_parts(w2, b2))
    }

    #[test]
    fn infer_matches_hand_computation() {
        let net = tiny_net();
        let x = Matrix::new(vec![2.0], 1, 1).unwrap();
        // hidden = relu([2, -2]) = [2, 0]; out = 2 + 0 + 0.5
        let y = net.infer(&x).unwrap();
        assert_relative_eq!(y.get(0, 0), 2.5);
    }

    #[test]
    fn forward_train_agrees_with_infer() {
        reset_graph();
        let net = tiny_net();
        let x = Matrix::new(vec![2.0, -3.0], 2, 1).unwrap();
        let (out, params) = net.forward_train(&x);
        assert_eq!(params.len(), 4);
        assert_eq!(out.data, net.infer(&x).unwrap());
    }

    #[test]
    fn gradients_cover_every_parameter() {
        reset_graph();
        let net = tiny_net();
        let x = Matrix::new(vec![1.0], 1, 1).unwrap();
        let (out, params) = net.forward_train(&x);
        let grads = backward(&out.mean());
        for p in &params {
            assert!(grads.contains_key(&p.node_id));
        }
    }
}
