//! Node weighting for walk and teleport decisions.

use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::graph::DynamicGraph;
use crate::model::NodeId;
use crate::{Error, Result};

/// What the base weight of a candidate node is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BiasType {
    /// Edge weight toward the candidate (mean incident weight for teleports).
    #[default]
    Weight,
    Degree,
    Activity,
    /// An injected [`CustomBias`]; constant 1.0 when none is set.
    Custom,
}

impl BiasType {
    pub const ALL: [BiasType; 4] = [BiasType::Weight, BiasType::Degree, BiasType::Activity, BiasType::Custom];

    pub fn name(&self) -> &'static str {
        match self {
            BiasType::Weight => "weight",
            BiasType::Degree => "degree",
            BiasType::Activity => "activity",
            BiasType::Custom => "custom",
        }
    }
}

impl FromStr for BiasType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        BiasType::ALL
            .into_iter()
            .find(|b| b.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::UnknownBiasType(s.to_string()))
    }
}

impl std::fmt::Display for BiasType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

pub type NodeBiasFn = dyn Fn(&DynamicGraph, NodeId) -> f64 + Send + Sync;
pub type EdgeBiasFn = dyn Fn(&DynamicGraph, NodeId, NodeId) -> f64 + Send + Sync;

/// User-supplied weighting used when `bias_type = custom`.
#[derive(Clone)]
pub enum CustomBias {
    /// Weight of the candidate alone.
    Node(Arc<NodeBiasFn>),
    /// Weight of the hop `(from, to)`; `from` is the walker's position.
    Edge(Arc<EdgeBiasFn>),
}

impl CustomBias {
    pub fn node(f: impl Fn(&DynamicGraph, NodeId) -> f64 + Send + Sync + 'static) -> Self {
        CustomBias::Node(Arc::new(f))
    }

    pub fn edge(f: impl Fn(&DynamicGraph, NodeId, NodeId) -> f64 + Send + Sync + 'static) -> Self {
        CustomBias::Edge(Arc::new(f))
    }

    pub fn evaluate(&self, graph: &DynamicGraph, from: NodeId, to: NodeId) -> f64 {
        match self {
            CustomBias::Node(f) => f(graph, to),
            CustomBias::Edge(f) => f(graph, from, to),
        }
    }
}

impl std::fmt::Debug for CustomBias {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CustomBias::Node(_) => f.write_str("CustomBias::Node(..)"),
            CustomBias::Edge(_) => f.write_str("CustomBias::Edge(..)"),
        }
    }
}

/// Base weight of moving from `from` to `to`, before decay and flooring.
///
/// `hop_weight` is the connecting edge weight on a neighbor walk and `None`
/// on a teleport. Missing data reads as 1.0.
pub(crate) fn base_weight(
    bias: BiasType,
    custom: Option<&CustomBias>,
    graph: &DynamicGraph,
    from: NodeId,
    to: NodeId,
    hop_weight: Option<f64>,
) -> f64 {
    match bias {
        BiasType::Weight => hop_weight.or_else(|| graph.mean_edge_weight(to)).unwrap_or(1.0),
        BiasType::Degree => graph.degree(to) as f64,
        BiasType::Activity => graph.activity(to).unwrap_or(1.0),
        BiasType::Custom => custom.map_or(1.0, |c| c.evaluate(graph, from, to)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GraphConfig;

    fn graph() -> DynamicGraph {
        let mut g = DynamicGraph::new(GraphConfig::default().with_initial_nodes(3).with_seed(1)).unwrap();
        g.add_edge(NodeId(0), NodeId(1), 0.4);
        g.add_edge(NodeId(1), NodeId(2), 0.8);
        g
    }

    #[test]
    fn test_bias_names_round_trip_through_from_str() {
        for b in BiasType::ALL {
            assert_eq!(b.name().parse::<BiasType>().unwrap(), b);
        }
        assert!(matches!("pagerank".parse::<BiasType>(), Err(Error::UnknownBiasType(_))));
    }

    #[test]
    fn test_weight_bias_uses_hop_then_mean() {
        let g = graph();
        let hop = base_weight(BiasType::Weight, None, &g, NodeId(0), NodeId(1), Some(0.4));
        assert_eq!(hop, 0.4);
        let teleport = base_weight(BiasType::Weight, None, &g, NodeId(0), NodeId(1), None);
        assert!((teleport - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_degree_and_activity_bias() {
        let g = graph();
        assert_eq!(base_weight(BiasType::Degree, None, &g, NodeId(0), NodeId(1), None), 2.0);
        assert_eq!(base_weight(BiasType::Activity, None, &g, NodeId(0), NodeId(2), None), 1.0);
    }

    #[test]
    fn test_missing_custom_bias_is_constant() {
        let g = graph();
        assert_eq!(base_weight(BiasType::Custom, None, &g, NodeId(0), NodeId(2), None), 1.0);
    }

    #[test]
    fn test_custom_edge_bias_sees_both_endpoints() {
        let g = graph();
        let bias = CustomBias::edge(|_, from, to| (from.0 * 10 + to.0) as f64);
        assert_eq!(base_weight(BiasType::Custom, Some(&bias), &g, NodeId(1), NodeId(2), None), 12.0);
    }
}
