//! Undirected weighted edge.

use serde::{Deserialize, Serialize};
use super::NodeId;

/// An undirected edge. `u < v` for every edge handed out by the graph.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub u: NodeId,
    pub v: NodeId,
    pub weight: f64,
}

impl Edge {
    /// Build an edge with its endpoints in canonical order.
    pub fn new(a: NodeId, b: NodeId, weight: f64) -> Self {
        let (u, v) = if a <= b { (a, b) } else { (b, a) };
        Self { u, v, weight }
    }

    /// The "other" end of the edge from the given node.
    pub fn other_node(&self, from: NodeId) -> Option<NodeId> {
        if from == self.u { Some(self.v) }
        else if from == self.v { Some(self.u) }
        else { None }
    }

    pub fn endpoints(&self) -> (NodeId, NodeId) {
        (self.u, self.v)
    }
}
