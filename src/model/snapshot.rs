//! Point-in-time copies of graph and walker state for external renderers.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{Edge, NodeId};

/// One node as seen at snapshot time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSnapshot {
    pub id: NodeId,
    pub activity: f64,
    pub birth_step: u64,
    pub degree: usize,
    /// Index into the size-ordered component list (0 = largest).
    pub component: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    pub time_step: u64,
    pub strategy: String,
    pub nodes: Vec<NodeSnapshot>,
    pub edges: Vec<Edge>,
    pub component_sizes: Vec<usize>,
}

impl GraphSnapshot {
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalkerSnapshot {
    pub current: Option<NodeId>,
    /// Oldest first.
    pub history: Vec<NodeId>,
    pub visit_counts: BTreeMap<NodeId, u64>,
}
