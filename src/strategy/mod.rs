//! # Attachment Strategies
//!
//! A strategy decides which existing nodes a newborn node links to and how
//! triadic closures are proposed. The engine drives every strategy through
//! the same four hooks, in this order within one step:
//!
//! 1. `pre_attach(node)` then `attach(node)` when a node is born
//! 2. `add_triadic_edges()` when the triadic roll succeeds
//! 3. `post_update()` once at the end of the step
//!
//! | Strategy | Attach weight | Triadic seed edge |
//! |----------|---------------|-------------------|
//! | `random` | uniform | uniform |
//! | `preferential` | `degree^exponent`, ×1.5 outside the origin component | cross-component first |
//! | `aging` | `decay^age × (0.6 + 0.4 activity)` | highest `decay^age × mean activity` |

pub mod aging;
pub mod preferential;
pub mod random;

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::config::GraphConfig;
use crate::graph::DynamicGraph;
use crate::model::NodeId;
use crate::{Error, Result};

pub use aging::AgingStrategy;
pub use preferential::PreferentialStrategy;
pub use random::RandomStrategy;

/// Hard cap on edges created by a single `attach` call.
pub const MAX_NEW_EDGES: usize = 3;

/// Triadic closures realized per call.
pub const MAX_TRIADIC_EDGES: usize = 2;

/// Candidate closures around one seed edge.
pub type TriadicCandidates = SmallVec<[(NodeId, NodeId); 8]>;

// ============================================================================
// StrategyKind
// ============================================================================

/// Strategy name, as accepted in [`GraphConfig::strategy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    Random,
    Preferential,
    Aging,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 3] = [StrategyKind::Random, StrategyKind::Preferential, StrategyKind::Aging];

    pub fn name(&self) -> &'static str {
        match self {
            StrategyKind::Random => "random",
            StrategyKind::Preferential => "preferential",
            StrategyKind::Aging => "aging",
        }
    }
}

impl FromStr for StrategyKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        StrategyKind::ALL
            .into_iter()
            .find(|k| k.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::UnknownStrategy(s.to_string()))
    }
}

impl std::fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// AttachmentStrategy
// ============================================================================

/// The growth policy owned by a [`DynamicGraph`].
#[derive(Debug, Clone)]
pub enum AttachmentStrategy {
    Random(RandomStrategy),
    Preferential(PreferentialStrategy),
    Aging(AgingStrategy),
}

impl AttachmentStrategy {
    /// Look a strategy up by name. Unknown names are an error.
    pub fn from_name(name: &str, config: &GraphConfig) -> Result<Self> {
        Ok(Self::new(name.parse()?, config))
    }

    pub fn new(kind: StrategyKind, config: &GraphConfig) -> Self {
        match kind {
            StrategyKind::Random => AttachmentStrategy::Random(RandomStrategy::new(config)),
            StrategyKind::Preferential => AttachmentStrategy::Preferential(PreferentialStrategy::new(config)),
            StrategyKind::Aging => AttachmentStrategy::Aging(AgingStrategy::new(config)),
        }
    }

    pub fn kind(&self) -> StrategyKind {
        match self {
            AttachmentStrategy::Random(_) => StrategyKind::Random,
            AttachmentStrategy::Preferential(_) => StrategyKind::Preferential,
            AttachmentStrategy::Aging(_) => StrategyKind::Aging,
        }
    }

    /// Steps completed, as counted by `post_update`.
    pub fn step(&self) -> u64 {
        match self {
            AttachmentStrategy::Random(s) => s.step,
            AttachmentStrategy::Preferential(s) => s.step,
            AttachmentStrategy::Aging(s) => s.step,
        }
    }

    pub fn pre_attach(&mut self, graph: &mut DynamicGraph, node: NodeId) {
        match self {
            AttachmentStrategy::Random(_) => {}
            AttachmentStrategy::Preferential(s) => s.pre_attach(graph, node),
            AttachmentStrategy::Aging(s) => s.pre_attach(graph, node),
        }
    }

    /// Wire a newborn node into the graph. Returns the edges created.
    pub fn attach(&mut self, graph: &mut DynamicGraph, node: NodeId) -> usize {
        match self {
            AttachmentStrategy::Random(s) => s.attach(graph, node),
            AttachmentStrategy::Preferential(s) => s.attach(graph, node),
            AttachmentStrategy::Aging(s) => s.attach(graph, node),
        }
    }

    /// Close up to two open triangles. Returns the edges created.
    pub fn add_triadic_edges(&mut self, graph: &mut DynamicGraph) -> usize {
        match self {
            AttachmentStrategy::Random(s) => s.add_triadic_edges(graph),
            AttachmentStrategy::Preferential(s) => s.add_triadic_edges(graph),
            AttachmentStrategy::Aging(s) => s.add_triadic_edges(graph),
        }
    }

    pub fn post_update(&mut self, graph: &DynamicGraph) {
        match self {
            AttachmentStrategy::Random(s) => s.step += 1,
            AttachmentStrategy::Preferential(s) => {
                s.remember_partition(graph);
                s.step += 1;
            }
            AttachmentStrategy::Aging(s) => s.step += 1,
        }
    }
}

// ============================================================================
// Shared helpers
// ============================================================================

/// Nodes other than `exclude` with spare degree.
pub fn eligible_nodes(graph: &DynamicGraph, exclude: NodeId, max_degree: usize) -> Vec<NodeId> {
    graph
        .nodes()
        .map(|(id, _)| id)
        .filter(|&id| id != exclude && graph.degree(id) < max_degree)
        .collect()
}

/// Edge budget for the weighted strategies: one per ten nodes, 1..=3.
pub fn linear_budget(node_count: usize) -> usize {
    (node_count / 10).clamp(1, MAX_NEW_EDGES)
}

/// Open triangles around `(u, v)`.
///
/// `(v, w)` for each neighbor `w` of `u` not adjacent to `v`, then `(u, w)`
/// for each neighbor `w` of `v` not adjacent to `u`. Pairs touching a node
/// already at `max_degree` are left out.
pub fn triadic_candidates(graph: &DynamicGraph, u: NodeId, v: NodeId, max_degree: usize) -> TriadicCandidates {
    let mut out = TriadicCandidates::new();
    for (anchor, pivot) in [(v, u), (u, v)] {
        if graph.degree(anchor) >= max_degree {
            continue;
        }
        for w in graph.neighbors(pivot) {
            if w != anchor && !graph.has_edge(anchor, w) && graph.degree(w) < max_degree {
                out.push((anchor, w));
            }
        }
    }
    out
}

/// Realize candidate pairs, stopping after [`MAX_TRIADIC_EDGES`] successes.
pub fn close_triangles(graph: &mut DynamicGraph, pairs: impl IntoIterator<Item = (NodeId, NodeId)>) -> usize {
    let mut added = 0;
    for (a, b) in pairs {
        if added >= MAX_TRIADIC_EDGES {
            break;
        }
        if graph.add_edge(a, b, crate::graph::DEFAULT_EDGE_WEIGHT) {
            added += 1;
        }
    }
    added
}
