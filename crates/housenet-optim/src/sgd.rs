use std::collections::HashMap;

use housenet_autodiff::{NodeId, Variable};
use housenet_core::Matrix;

/// Stochastic gradient descent with classical momentum.
///
/// Update rule: `v = momentum * v - lr * grad; w += v`. Velocity buffers
/// are zero-initialized on the first step, so a freshly constructed
/// optimizer starts with no accumulated momentum.
pub struct Sgd {
    lr: f64,
    momentum: f64,
    velocities: Vec<Matrix<f64>>,
}

impl Sgd {
    pub fn new(lr: f64, momentum: f64) -> Self {
        Sgd {
            lr,
            momentum,
            velocities: Vec::new(),
        }
    }

    pub fn lr(&self) -> f64 {
        self.lr
    }

    /// Apply one update to the given weights.
    ///
    /// `param_vars` are the tape variables registered for the same weights
    /// during the forward pass, in the same order; gradients are looked up
    /// through their node ids. Parameters without a gradient are skipped.
    pub fn step(
        &mut self,
        weights: Vec<&mut Matrix<f64>>,
        param_vars: &[Variable],
        grads: &HashMap<NodeId, Matrix<f64>>,
    ) {
        if self.velocities.is_empty() {
            self.velocities = weights.iter().map(|w| Matrix::zeros(w.rows(), w.cols())).collect();
        }
        for ((weight, var), velocity) in
            weights.into_iter().zip(param_vars).zip(&mut self.velocities)
        {
            let grad = match grads.get(&var.node_id) {
                Some(g) => g,
                None => continue,
            };
            for (i, v) in velocity.data_mut().iter_mut().enumerate() {
                *v = self.momentum * *v - self.lr * grad.data()[i];
            }
            for (w, v) in weight.data_mut().iter_mut().zip(velocity.data()) {
                *w += *v;
            }
        }
    }
}
