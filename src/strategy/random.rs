//! Uniform attachment.

use crate::config::GraphConfig;
use crate::graph::{DEFAULT_EDGE_WEIGHT, DynamicGraph};
use crate::model::NodeId;
use crate::sampling;

use super::{MAX_NEW_EDGES, MAX_TRIADIC_EDGES, close_triangles, eligible_nodes, triadic_candidates};

/// Links newborn nodes to a uniform sample of nodes with spare degree.
#[derive(Debug, Clone)]
pub struct RandomStrategy {
    pub(crate) step: u64,
    max_degree: usize,
}

impl RandomStrategy {
    pub fn new(config: &GraphConfig) -> Self {
        Self { step: 0, max_degree: config.max_degree }
    }

    /// Sample size grows with √n, capped at three.
    pub fn attach(&mut self, graph: &mut DynamicGraph, node: NodeId) -> usize {
        let n = graph.node_count();
        if n <= 1 {
            return 0;
        }
        let candidates = eligible_nodes(graph, node, self.max_degree);
        let budget = ((n as f64).sqrt() as usize).clamp(1, MAX_NEW_EDGES);
        let targets = sampling::choose_many(graph.rng(), &candidates, budget);
        targets
            .into_iter()
            .filter(|&t| graph.add_edge(node, t, DEFAULT_EDGE_WEIGHT))
            .count()
    }

    pub fn add_triadic_edges(&mut self, graph: &mut DynamicGraph) -> usize {
        let edges = graph.edges();
        let Some(seed) = sampling::choose(graph.rng(), &edges) else { return 0 };
        let candidates = triadic_candidates(graph, seed.u, seed.v, self.max_degree);
        let picked = sampling::choose_many(graph.rng(), &candidates, MAX_TRIADIC_EDGES);
        close_triangles(graph, picked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph(nodes: usize, max_degree: usize) -> DynamicGraph {
        let cfg = GraphConfig { max_degree, min_degree: 0, ..GraphConfig::default() }
            .with_initial_nodes(nodes)
            .with_seed(11);
        DynamicGraph::new(cfg).unwrap()
    }

    #[test]
    fn test_attach_respects_budget() {
        let mut g = graph(16, 15);
        let new = g.add_node();
        let mut s = RandomStrategy::new(g.config());
        // √17 → 4, capped at 3.
        assert_eq!(s.attach(&mut g, new), 3);
        assert_eq!(g.degree(new), 3);
    }

    #[test]
    fn test_attach_skips_saturated_nodes() {
        let mut g = graph(3, 1);
        g.add_edge(NodeId(0), NodeId(1), 1.0);
        let new = g.add_node();
        let mut s = RandomStrategy::new(g.config());
        assert_eq!(s.attach(&mut g, new), 1);
        assert!(g.has_edge(new, NodeId(2)));
    }

    #[test]
    fn test_attach_to_lonely_graph_is_noop() {
        let mut g = graph(0, 15);
        let new = g.add_node();
        let mut s = RandomStrategy::new(g.config());
        assert_eq!(s.attach(&mut g, new), 0);
    }

    #[test]
    fn test_triadic_closes_a_triangle() {
        let mut g = graph(3, 15);
        g.add_edge(NodeId(0), NodeId(1), 1.0);
        g.add_edge(NodeId(1), NodeId(2), 1.0);
        let mut s = RandomStrategy::new(g.config());
        assert_eq!(s.add_triadic_edges(&mut g), 1);
        assert!(g.has_edge(NodeId(0), NodeId(2)));
    }
}
