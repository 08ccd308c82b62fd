//! Age- and activity-weighted attachment.

use crate::config::GraphConfig;
use crate::graph::{DEFAULT_EDGE_WEIGHT, DynamicGraph};
use crate::model::NodeId;
use crate::sampling;

use super::{close_triangles, eligible_nodes, linear_budget, triadic_candidates};

/// Share of its weight a target keeps after being picked once.
pub const REPICK_DAMPING: f64 = 0.3;

/// Young, active nodes attract newcomers; old ones fade out.
#[derive(Debug, Clone)]
pub struct AgingStrategy {
    pub(crate) step: u64,
    max_degree: usize,
    decay_factor: f64,
}

impl AgingStrategy {
    pub fn new(config: &GraphConfig) -> Self {
        Self { step: 0, max_degree: config.max_degree, decay_factor: config.decay_factor }
    }

    /// Stamp the newborn with this strategy's clock.
    pub fn pre_attach(&mut self, graph: &mut DynamicGraph, node: NodeId) {
        graph.set_birth_step(node, self.step);
    }

    fn age_factor(&self, age: u64) -> f64 {
        self.decay_factor.powf(age as f64)
    }

    /// Weighted sampling where a hit keeps 30% of its weight, so repeats
    /// are possible but unlikely.
    pub fn attach(&mut self, graph: &mut DynamicGraph, node: NodeId) -> usize {
        let n = graph.node_count();
        if n <= 1 {
            return 0;
        }
        let candidates = eligible_nodes(graph, node, self.max_degree);
        if candidates.is_empty() {
            return 0;
        }
        let mut weights: Vec<f64> = candidates
            .iter()
            .map(|&c| {
                let data = graph.node(c).copied().unwrap_or_default();
                self.age_factor(data.age(self.step)) * (0.6 + 0.4 * data.activity)
            })
            .collect();

        let budget = linear_budget(n);
        let mut added = 0;
        for _ in 0..budget * 3 {
            if added >= budget {
                break;
            }
            let Some(idx) = sampling::weighted_index(graph.rng(), &weights) else { break };
            if graph.add_edge(node, candidates[idx], DEFAULT_EDGE_WEIGHT) {
                added += 1;
                weights[idx] *= REPICK_DAMPING;
            }
        }
        added
    }

    /// Seed on the edge with the best `decay^age × mean endpoint activity`,
    /// age taken from the older endpoint, and close its first two triangles.
    pub fn add_triadic_edges(&mut self, graph: &mut DynamicGraph) -> usize {
        let mut best: Option<((NodeId, NodeId), f64)> = None;
        for edge in graph.edges() {
            let (Some(a), Some(b)) = (graph.node(edge.u), graph.node(edge.v)) else { continue };
            let age = self.step.saturating_sub(a.birth_step.min(b.birth_step));
            let score = self.age_factor(age) * (a.activity + b.activity) / 2.0;
            if best.is_none_or(|(_, s)| score > s) {
                best = Some(((edge.u, edge.v), score));
            }
        }
        let Some(((u, v), _)) = best else { return 0 };
        let candidates = triadic_candidates(graph, u, v, self.max_degree);
        close_triangles(graph, candidates)
    }
}
