//! End-to-end tests for the attachment strategies.
//!
//! Drives each strategy's hooks directly against a graph and checks edge
//! budgets, degree caps, triadic closure and the strategy clock.

use dynamic_walker::{
    AttachmentStrategy, DynamicGraph, Error, GraphConfig, NodeId, StrategyKind, UpdateParams,
};
use pretty_assertions::assert_eq;

fn graph(kind: StrategyKind, nodes: usize, max_degree: usize) -> DynamicGraph {
    let cfg = GraphConfig { max_degree, min_degree: 0, ..GraphConfig::default() }
        .with_strategy(kind.name())
        .with_initial_nodes(nodes)
        .with_seed(77);
    DynamicGraph::new(cfg).unwrap()
}

/// Add a node and run the strategy's birth hooks on it.
fn birth(kind: StrategyKind, g: &mut DynamicGraph) -> (NodeId, usize) {
    let mut strategy = AttachmentStrategy::new(kind, g.config());
    let id = g.add_node();
    strategy.pre_attach(g, id);
    let added = strategy.attach(g, id);
    (id, added)
}

// ============================================================================
// 1. Name lookup
// ============================================================================

#[test]
fn test_strategy_lookup() {
    for kind in StrategyKind::ALL {
        let s = AttachmentStrategy::from_name(kind.name(), &GraphConfig::default()).unwrap();
        assert_eq!(s.kind(), kind);
    }
    let err = DynamicGraph::new(GraphConfig::default().with_strategy("small-world")).unwrap_err();
    assert!(matches!(err, Error::UnknownStrategy(_)));
    assert_eq!(err.to_string(), "Unknown attachment strategy: small-world");
}

// ============================================================================
// 2. Edge budgets per attach call
// ============================================================================

#[test]
fn test_attach_budgets() {
    // Random: ⌊√n⌋ capped at 3. n counts the newborn.
    assert_eq!(birth(StrategyKind::Random, &mut graph(StrategyKind::Random, 3, 15)).1, 2);
    assert_eq!(birth(StrategyKind::Random, &mut graph(StrategyKind::Random, 30, 15)).1, 3);
    // Weighted strategies: ⌊n/10⌋ in 1..=3.
    assert_eq!(birth(StrategyKind::Preferential, &mut graph(StrategyKind::Preferential, 4, 15)).1, 1);
    assert_eq!(birth(StrategyKind::Preferential, &mut graph(StrategyKind::Preferential, 24, 15)).1, 2);
    assert_eq!(birth(StrategyKind::Aging, &mut graph(StrategyKind::Aging, 59, 15)).1, 3);
}

#[test]
fn test_attach_on_lone_node_is_noop() {
    for kind in StrategyKind::ALL {
        let mut g = graph(kind, 0, 15);
        let (id, added) = birth(kind, &mut g);
        assert_eq!(added, 0);
        assert_eq!(g.degree(id), 0);
    }
}

// ============================================================================
// 3. Degree caps
// ============================================================================

#[test]
fn test_attach_skips_saturated_nodes() {
    for kind in StrategyKind::ALL {
        let mut g = graph(kind, 4, 1);
        g.add_edge(NodeId(0), NodeId(1), 1.0);
        g.add_edge(NodeId(2), NodeId(3), 1.0);
        let (id, added) = birth(kind, &mut g);
        assert_eq!(added, 0, "{kind} linked to a saturated node");
        assert_eq!(g.degree(id), 0);
    }
}

#[test]
fn test_preferential_favours_hub() {
    let mut hub_hits = 0;
    for seed in 0..50 {
        let cfg = GraphConfig { min_degree: 0, preferential_exponent: 3.0, ..GraphConfig::default() }
            .with_strategy("preferential")
            .with_initial_nodes(8)
            .with_seed(seed);
        let mut g = DynamicGraph::new(cfg).unwrap();
        for i in 1..5 {
            g.add_edge(NodeId(0), NodeId(i), 1.0);
        }
        g.add_edge(NodeId(5), NodeId(6), 1.0);
        let (id, _) = birth(StrategyKind::Preferential, &mut g);
        if g.has_edge(id, NodeId(0)) {
            hub_hits += 1;
        }
    }
    // Hub mass 64 against 4 × 1 + 2 × 1.5.
    assert!(hub_hits > 35, "hub chosen {hub_hits}/50 times");
}

// ============================================================================
// 4. Triadic closure
// ============================================================================

#[test]
fn test_every_strategy_closes_open_triangle() {
    for kind in StrategyKind::ALL {
        let mut g = graph(kind, 3, 15);
        g.add_edge(NodeId(0), NodeId(1), 1.0);
        g.add_edge(NodeId(1), NodeId(2), 1.0);
        let mut strategy = AttachmentStrategy::new(kind, g.config());
        assert_eq!(strategy.add_triadic_edges(&mut g), 1, "{kind}");
        assert!(g.has_edge(NodeId(0), NodeId(2)), "{kind}");
    }
}

#[test]
fn test_triadic_closure_adds_at_most_two() {
    for kind in StrategyKind::ALL {
        // Star: any seed edge opens three or more triangles.
        let mut g = graph(kind, 6, 15);
        for i in 1..6 {
            g.add_edge(NodeId(0), NodeId(i), 1.0);
        }
        let before = g.edge_count();
        let mut strategy = AttachmentStrategy::new(kind, g.config());
        assert_eq!(strategy.add_triadic_edges(&mut g), 2, "{kind}");
        assert_eq!(g.edge_count(), before + 2);
    }
}

#[test]
fn test_triadic_closure_on_edgeless_graph() {
    for kind in StrategyKind::ALL {
        let mut g = graph(kind, 4, 15);
        let mut strategy = AttachmentStrategy::new(kind, g.config());
        assert_eq!(strategy.add_triadic_edges(&mut g), 0);
    }
}

// ============================================================================
// 5. Strategy clock follows the graph
// ============================================================================

#[test]
fn test_aging_births_use_strategy_clock() {
    let mut g = graph(StrategyKind::Aging, 6, 15);
    let params = UpdateParams { node_add_prob: 1.0, ..UpdateParams::quiescent() };
    for _ in 0..12 {
        let report = g.update(&params);
        let born = report.node_added.expect("node_add_prob = 1.0");
        assert_eq!(g.node(born).map(|d| d.birth_step), Some(report.time_step));
    }
    assert_eq!(g.strategy().map(AttachmentStrategy::step), Some(12));
}
