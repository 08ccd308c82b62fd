//! Preferential attachment with a cross-component bonus.

use hashbrown::{HashMap, HashSet};

use crate::config::GraphConfig;
use crate::graph::{DEFAULT_EDGE_WEIGHT, DynamicGraph};
use crate::model::{Edge, NodeId};
use crate::sampling;

use super::{MAX_TRIADIC_EDGES, close_triangles, eligible_nodes, linear_budget, triadic_candidates};

/// Weight multiplier for candidates outside the newborn's origin component.
pub const CROSS_COMPONENT_BONUS: f64 = 1.5;

/// Rich-get-richer growth: attach weight is `degree^exponent`.
#[derive(Debug, Clone)]
pub struct PreferentialStrategy {
    pub(crate) step: u64,
    max_degree: usize,
    exponent: f64,
    /// Component the pending newborn is considered to come from.
    origin: Option<HashSet<NodeId>>,
    /// Component labels as of the end of the previous step.
    last_partition: HashMap<NodeId, usize>,
}

impl PreferentialStrategy {
    pub fn new(config: &GraphConfig) -> Self {
        Self {
            step: 0,
            max_degree: config.max_degree,
            exponent: config.preferential_exponent,
            origin: None,
            last_partition: HashMap::new(),
        }
    }

    /// Fix the origin component: the one holding the oldest other node.
    pub fn pre_attach(&mut self, graph: &mut DynamicGraph, node: NodeId) {
        let partition = graph.components();
        let oldest = graph.nodes().map(|(id, _)| id).find(|&id| id != node);
        self.origin = oldest
            .and_then(|id| partition.members_of(id))
            .map(|members| members.iter().copied().collect());
    }

    /// Weighted sampling without replacement: a picked candidate's mass is
    /// zeroed and the rest renormalized before the next draw.
    pub fn attach(&mut self, graph: &mut DynamicGraph, node: NodeId) -> usize {
        let n = graph.node_count();
        let origin = self.origin.take().unwrap_or_default();
        if n < 2 {
            return 0;
        }
        let candidates = eligible_nodes(graph, node, self.max_degree);
        if candidates.is_empty() {
            return 0;
        }

        let mut weights: Vec<f64> = candidates
            .iter()
            .map(|&c| {
                let bonus = if origin.contains(&c) { 1.0 } else { CROSS_COMPONENT_BONUS };
                (graph.degree(c) as f64).powf(self.exponent) * bonus
            })
            .collect();
        let mut taken = vec![false; candidates.len()];

        let budget = linear_budget(n);
        let mut added = 0;
        for _ in 0..budget * 2 {
            if added >= budget {
                break;
            }
            let idx = if weights.iter().any(|&w| w > 0.0) {
                sampling::weighted_index(graph.rng(), &weights)
            } else {
                let open: Vec<usize> = (0..candidates.len()).filter(|&i| !taken[i]).collect();
                sampling::choose(graph.rng(), &open)
            };
            let Some(idx) = idx else { break };
            weights[idx] = 0.0;
            taken[idx] = true;
            if graph.add_edge(node, candidates[idx], DEFAULT_EDGE_WEIGHT) {
                added += 1;
            }
        }
        added
    }

    /// Seed on an edge that bridged two components last step if one exists.
    pub fn add_triadic_edges(&mut self, graph: &mut DynamicGraph) -> usize {
        let (cross, same): (Vec<Edge>, Vec<Edge>) = graph.edges().into_iter().partition(|e| self.is_cross(e));
        let pool = if cross.is_empty() { &same } else { &cross };
        let Some(seed) = sampling::choose(graph.rng(), pool) else { return 0 };
        let candidates = triadic_candidates(graph, seed.u, seed.v, self.max_degree);
        let picked = sampling::choose_many(graph.rng(), &candidates, MAX_TRIADIC_EDGES);
        close_triangles(graph, picked)
    }

    pub(crate) fn remember_partition(&mut self, graph: &DynamicGraph) {
        self.last_partition = graph.components().labels();
    }

    /// Endpoints in different remembered components; unseen nodes count as
    /// components of their own.
    fn is_cross(&self, edge: &Edge) -> bool {
        match (self.last_partition.get(&edge.u), self.last_partition.get(&edge.v)) {
            (Some(a), Some(b)) => a != b,
            _ => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph(nodes: usize) -> DynamicGraph {
        let cfg = GraphConfig { min_degree: 0, ..GraphConfig::default() }
            .with_strategy("preferential")
            .with_initial_nodes(nodes)
            .with_seed(21);
        DynamicGraph::new(cfg).unwrap()
    }

    #[test]
    fn test_hub_attracts_newborn() {
        let mut g = graph(6);
        for i in 1..5 {
            g.add_edge(NodeId(0), NodeId(i), 1.0);
        }
        // Node 5 is isolated (weight 0); only degree-bearing nodes can win,
        // and the hub carries 4 of the 8 units of mass.
        let new = g.add_node();
        let mut s = PreferentialStrategy::new(g.config());
        s.pre_attach(&mut g, new);
        assert_eq!(s.attach(&mut g, new), 1);
        assert!(!g.has_edge(new, NodeId(5)));
    }

    #[test]
    fn test_zero_mass_falls_back_to_uniform() {
        let mut g = graph(4);
        let new = g.add_node();
        let mut s = PreferentialStrategy::new(g.config());
        s.pre_attach(&mut g, new);
        assert_eq!(s.attach(&mut g, new), 1);
        assert_eq!(g.degree(new), 1);
    }

    #[test]
    fn test_cross_edges_are_preferred_for_closure() {
        let mut g = graph(5);
        g.add_edge(NodeId(0), NodeId(1), 1.0);
        g.add_edge(NodeId(2), NodeId(3), 1.0);
        let mut s = PreferentialStrategy::new(g.config());
        s.remember_partition(&g);
        // The new edge 1 - 2 joins two remembered components.
        g.add_edge(NodeId(1), NodeId(2), 1.0);
        assert!(s.is_cross(&Edge::new(NodeId(1), NodeId(2), 1.0)));
        assert!(!s.is_cross(&Edge::new(NodeId(0), NodeId(1), 1.0)));
        let added = s.add_triadic_edges(&mut g);
        assert_eq!(added, 2);
        assert!(g.has_edge(NodeId(0), NodeId(2)));
        assert!(g.has_edge(NodeId(1), NodeId(3)));
    }
}
