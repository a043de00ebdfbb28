use housenet_core::Matrix;

use crate::graph::{with_graph, NodeId, Op};

/// A variable in the computation graph. Wraps a matrix with grad tracking.
#[derive(Debug, Clone)]
pub struct Variable {
    pub node_id: NodeId,
    pub data: Matrix<f64>,
}

impl Variable {
    /// Create a new leaf variable.
    pub fn new(data: Matrix<f64>, requires_grad: bool) -> Self {
        let node_id = with_graph(|g| g.add_node(Op::Leaf, data.clone(), requires_grad));
        Variable { node_id, data }
    }

    /// Create a parameter (requires grad).
    pub fn param(data: Matrix<f64>) -> Self {
        Self::new(data, true)
    }

    /// Create an input (no grad).
    pub fn input(data: Matrix<f64>) -> Self {
        Self::new(data, false)
    }

    pub fn shape(&self) -> (usize, usize) {
        self.data.shape()
    }

    pub fn numel(&self) -> usize {
        self.data.numel()
    }

    /// Element-wise addition. The right side may be a 1-row bias.
    pub fn add(&self, other: &Variable) -> Variable {
        let result = self.data.add(&other.data).expect("add: shape mismatch");
        let node_id = with_graph(|g| {
            g.add_node(Op::Add(self.node_id, other.node_id), result.clone(), true)
        });
        Variable {
            node_id,
            data: result,
        }
    }

    /// Element-wise subtraction.
    pub fn sub(&self, other: &Variable) -> Variable {
        let result = self.data.sub(&other.data).expect("sub: shape mismatch");
        let node_id = with_graph(|g| {
            g.add_node(Op::Sub(self.node_id, other.node_id), result.clone(), true)
        });
        Variable {
            node_id,
            data: result,
        }
    }

    /// Element-wise multiplication.
    pub fn mul(&self, other: &Variable) -> Variable {
        let result = self.data.mul(&other.data).expect("mul: shape mismatch");
        let node_id = with_graph(|g| {
            g.add_node(Op::Mul(self.node_id, other.node_id), result.clone(), true)
        });
        Variable {
            node_id,
            data: result,
        }
    }

    /// Matrix multiplication.
    pub fn matmul(&self, other: &Variable) -> Variable {
        let result = self
            .data
            .matmul(&other.data)
            .expect("matmul: inner dimension mismatch");
        let node_id = with_graph(|g| {
            g.add_node(Op::MatMul(self.node_id, other.node_id), result.clone(), true)
        });
        Variable {
            node_id,
            data: result,
        }
    }

    /// ReLU activation.
    pub fn relu(&self) -> Variable {
        let result = self.data.apply(|x| x.max(0.0));
        let node_id =
            with_graph(|g| g.add_node(Op::Relu(self.node_id), result.clone(), true));
        Variable {
            node_id,
            data: result,
        }
    }

    /// Multiply every element by a scalar.
    pub fn mul_scalar(&self, s: f64) -> Variable {
        let result = self.data.mul_scalar(s);
        let node_id =
            with_graph(|g| g.add_node(Op::MulScalar(self.node_id, s), result.clone(), true));
        Variable {
            node_id,
            data: result,
        }
    }

    /// Mean over all elements, yielding a 1x1 variable.
    pub fn mean(&self) -> Variable {
        let result = Matrix::full(1, 1, self.data.mean());
        let node_id =
            with_graph(|g| g.add_node(Op::MeanAll(self.node_id), result.clone(), true));
        Variable {
            node_id,
            data: result,
        }
    }

    /// Scalar value of a 1x1 variable.
    pub fn item(&self) -> f64 {
        self.data.get(0, 0)
    }
}
