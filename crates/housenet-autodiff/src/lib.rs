//! Reverse-mode automatic differentiation over a thread-local tape.
//!
//! Each training step resets the tape with [`reset_graph`], builds the
//! forward pass through [`Variable`] ops and calls [`backward`] to get a
//! map of gradients keyed by node.

pub mod backward;
pub mod graph;
pub mod variable;

pub use backward::backward;
pub use graph::{reset_graph, with_graph, Graph, NodeId, Op};
pub use variable::Variable;
