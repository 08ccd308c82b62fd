//! Node identity and per-node attributes.

use serde::{Deserialize, Serialize};

/// Opaque node identifier.
///
/// Allocated from a monotonically increasing counter and never reused,
/// even after the node is removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u64);

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for NodeId {
    fn from(raw: u64) -> Self {
        NodeId(raw)
    }
}

/// Attributes carried by every node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NodeData {
    /// Decaying relevance score. Never below the graph's activity floor.
    pub activity: f64,
    /// Time step at which the node was created.
    pub birth_step: u64,
}

impl NodeData {
    pub fn new(activity: f64, birth_step: u64) -> Self {
        Self { activity, birth_step }
    }

    /// Steps elapsed since birth, saturating at zero.
    pub fn age(&self, now: u64) -> u64 {
        now.saturating_sub(self.birth_step)
    }
}

impl Default for NodeData {
    fn default() -> Self {
        Self { activity: 1.0, birth_step: 0 }
    }
}
