use std::collections::HashMap;

use housenet_core::Matrix;

use crate::graph::{with_graph, NodeId, Op};
use crate::variable::Variable;

/// Compute gradients via reverse-mode automatic differentiation.
///
/// Returns a map from NodeId to gradient matrix for every node reached by
/// the sweep. Nodes are added in forward order, so walking the arena in
/// reverse is a valid reverse topological order.
pub fn backward(loss: &Variable) -> HashMap<NodeId, Matrix<f64>> {
    with_graph(|graph| {
        let n = graph.len();
        let mut grads: HashMap<NodeId, Matrix<f64>> = HashMap::new();

        // Seed: gradient of loss w.r.t. itself is 1
        let (rows, cols) = graph.get(loss.node_id).shape;
        grads.insert(loss.node_id, Matrix::full(rows, cols, 1.0));

        for idx in (0..n).rev() {
            let node_id = NodeId(idx);
            let grad = match grads.get(&node_id) {
                Some(g) => g.clone(),
                None => continue,
            };

            let op = graph.get(node_id).op.clone();

            match op {
                Op::Leaf => {
                    // Leaf nodes accumulate gradients — already stored
                }
                Op::Add(a, b) => {
                    accumulate(&mut grads, a, &grad, graph.get(a).shape);
                    accumulate(&mut grads, b, &grad, graph.get(b).shape);
                }
                Op::Sub(a, b) => {
                    accumulate(&mut grads, a, &grad, graph.get(a).shape);
                    let neg = grad.mul_scalar(-1.0);
                    accumulate(&mut grads, b, &neg, graph.get(b).shape);
                }
                Op::Mul(a, b) => {
                    let ga = grad.mul(&graph.get(b).value).expect("mul grad");
                    accumulate(&mut grads, a, &ga, graph.get(a).shape);
                    let gb = grad.mul(&graph.get(a).value).expect("mul grad");
                    accumulate(&mut grads, b, &gb, graph.get(b).shape);
                }
                Op::MatMul(a, b) => {
                    // d/dA (A @ B) = grad @ Bᵀ
                    let ga = grad.matmul(&graph.get(b).value.t()).expect("grad @ Bᵀ");
                    accumulate(&mut grads, a, &ga, graph.get(a).shape);
                    // d/dB (A @ B) = Aᵀ @ grad
                    let gb = graph.get(a).value.t().matmul(&grad).expect("Aᵀ @ grad");
                    accumulate(&mut grads, b, &gb, graph.get(b).shape);
                }
                Op::Relu(a) => {
                    // d/da relu(a) = (a > 0) * grad
                    let mask = graph.get(a).value.apply(|x| if x > 0.0 { 1.0 } else { 0.0 });
                    let ga = mask.mul(&grad).expect("relu grad");
                    accumulate(&mut grads, a, &ga, graph.get(a).shape);
                }
                Op::MulScalar(a, s) => {
                    let ga = grad.mul_scalar(s);
                    accumulate(&mut grads, a, &ga, graph.get(a).shape);
                }
                Op::MeanAll(a) => {
                    let (ar, ac) = graph.get(a).shape;
                    let g = grad.get(0, 0) / (ar * ac) as f64;
                    let ga = Matrix::full(ar, ac, g);
                    accumulate(&mut grads, a, &ga, graph.get(a).shape);
                }
            }
        }

        grads
    })
}

/// Add `grad` into the slot for `target`, reducing a row-broadcast gradient
/// back to the target's 1-row shape by summing over rows (the bias case).
fn accumulate(
    grads: &mut HashMap<NodeId, Matrix<f64>>,
    target: NodeId,
    grad: &Matrix<f64>,
    target_shape: (usize, usize),
) {
    let reduced = if grad.shape() == target_shape {
        grad.clone()
    } else if target_shape.0 == 1 && grad.cols() == target_shape.1 {
        grad.sum_axis0()
    } else {
        panic!(
            "gradient shape {:?} incompatible with node shape {:?}",
            grad.shape(),
            target_shape
        );
    };
    match grads.get_mut(&target) {
        Some(existing) => {
            *existing = existing.add(&reduced).expect("grad accumulate");
        }
        None => {
            grads.insert(target, reduced);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::reset_graph;
    use approx::assert_relative_eq;

    fn mat(data: &[f64], rows: usize, cols: usize) -> Matrix<f64> {
        Matrix::new(data.to_vec(), rows, cols).unwrap()
    }

    #[test]
    fn grad_of_mean_square() {
        reset_graph();
        // loss = mean((x)^2), dloss/dx = 2x / n
        let x = Variable::param(mat(&[1.0, -2.0, 3.0, 0.5], 2, 2));
        let loss = x.mul(&x).mean();
        let grads = backward(&loss);
        let gx = &grads[&x.node_id];
        assert_relative_eq!(gx.get(0, 0), 2.0 * 1.0 / 4.0);
        assert_relative_eq!(gx.get(0, 1), 2.0 * -2.0 / 4.0);
        assert_relative_eq!(gx.get(1, 0), 2.0 * 3.0 / 4.0);
    }

    #[test]
    fn matmul_grads_match_manual_derivation() {
        reset_graph();
        let a = Variable::param(mat(&[1.0, 2.0, 3.0, 4.0], 2, 2));
        let b = Variable::param(mat(&[5.0, 6.0, 7.0, 8.0], 2, 2));
        let loss = a.matmul(&b).mean();
        let grads = backward(&loss);
        // grad wrt a = (G @ Bᵀ) with G = 1/4 everywhere
        let ga = &grads[&a.node_id];
        assert_relative_eq!(ga.get(0, 0), (5.0 + 6.0) / 4.0);
        assert_relative_eq!(ga.get(0, 1), (7.0 + 8.0) / 4.0);
        let gb = &grads[&b.node_id];
        assert_relative_eq!(gb.get(0, 0), (1.0 + 3.0) / 4.0);
        assert_relative_eq!(gb.get(1, 1), (2.0 + 4.0) / 4.0);
    }

    #[test]
    fn bias_broadcast_gradient_sums_over_rows() {
        reset_graph();
        let x = Variable::input(mat(&[1.0, 2.0, 3.0, 4.0], 2, 2));
        let bias = Variable::param(mat(&[0.1, 0.2], 1, 2));
        let loss = x.add(&bias).mean();
        let grads = backward(&loss);
        let gb = &grads[&bias.node_id];
        assert_eq!(gb.shape(), (1, 2));
        // Each bias element feeds 2 rows; mean divides by 4.
        assert_relative_eq!(gb.get(0, 0), 2.0 / 4.0);
        assert_relative_eq!(gb.get(0, 1), 2.0 / 4.0);
    }

    #[test]
    fn relu_blocks_gradient_where_inactive() {
        reset_graph();
        let x = Variable::param(mat(&[-1.0, 2.0], 1, 2));
        let loss = x.relu().mean();
        let grads = backward(&loss);
        let gx = &grads[&x.node_id];
        assert_relative_eq!(gx.get(0, 0), 0.0);
        assert_relative_eq!(gx.get(0, 1), 0.5);
    }
}
