use std::cell::RefCell;

use housenet_core::Matrix;

/// Unique identifier for a node in the computation graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub usize);

/// The operation that produced a node.
#[derive(Debug, Clone)]
pub enum Op {
    /// Leaf node (parameter or input).
    Leaf,
    /// Element-wise addition, possibly row-broadcast on the right.
    Add(NodeId, NodeId),
    /// Element-wise subtraction.
    Sub(NodeId, NodeId),
    /// Element-wise multiplication.
    Mul(NodeId, NodeId),
    /// Matrix multiplication.
    MatMul(NodeId, NodeId),
    /// ReLU.
    Relu(NodeId),
    /// Multiply by scalar.
    MulScalar(NodeId, f64),
    /// Mean over all elements, yielding a 1x1 matrix.
    MeanAll(NodeId),
}

/// A node in the computation graph.
#[derive(Debug, Clone)]
pub struct Node {
    pub id: NodeId,
    pub op: Op,
    pub shape: (usize, usize),
    pub value: Matrix<f64>,
    pub requires_grad: bool,
}

/// The computation graph, an arena of nodes in forward order.
#[derive(Debug, Default)]
pub struct Graph {
    pub nodes: Vec<Node>,
}

impl Graph {
    pub fn new() -> Self {
        Graph { nodes: Vec::new() }
    }

    /// Add a node and return its ID.
    pub fn add_node(&mut self, op: Op, value: Matrix<f64>, requires_grad: bool) -> NodeId {
        let id = NodeId(self.nodes.len());
        let shape = value.shape();
        self.nodes.push(Node {
            id,
            op,
            shape,
            value,
            requires_grad,
        });
        id
    }

    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

// Thread-local graph for convenient usage
thread_local! {
    static CURRENT_GRAPH: RefCell<Graph> = RefCell::new(Graph::new());
}

/// Execute a closure with the current thread-local graph.
pub fn with_graph<F, R>(f: F) -> R
where
    F: FnOnce(&mut Graph) -> R,
{
    CURRENT_GRAPH.with(|g| f(&mut g.borrow_mut()))
}

/// Reset the thread-local graph. Called at the start of each training step.
pub fn reset_graph() {
    CURRENT_GRAPH.with(|g| {
        *g.borrow_mut() = Graph::new();
    });
}
