//! Teleport candidate selection.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::graph::DynamicGraph;
use crate::model::NodeId;
use crate::{Error, Result};

/// Which nodes a teleport may land on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeleportStrategy {
    /// Every node, or every node within `max_teleport_distance` hops when set.
    #[default]
    Uniform,
    /// Nodes in the walker's own component.
    Component,
    /// Nodes outside the walker's component.
    Distant,
    /// Same as `Uniform`; kept as a separate name for configs that spell it out.
    #[serde(alias = "distance-limited")]
    DistanceLimited,
}

impl TeleportStrategy {
    pub const ALL: [TeleportStrategy; 4] = [
        TeleportStrategy::Uniform,
        TeleportStrategy::Component,
        TeleportStrategy::Distant,
        TeleportStrategy::DistanceLimited,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            TeleportStrategy::Uniform => "uniform",
            TeleportStrategy::Component => "component",
            TeleportStrategy::Distant => "distant",
            TeleportStrategy::DistanceLimited => "distance_limited",
        }
    }
}

impl FromStr for TeleportStrategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().replace('-', "_");
        TeleportStrategy::ALL
            .into_iter()
            .find(|t| t.name().eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| Error::UnknownTeleportStrategy(s.to_string()))
    }
}

impl std::fmt::Display for TeleportStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Teleport targets from `current`, never including `current` itself.
///
/// An empty pick (unreachable cutoff, single-component graph under
/// `Distant`, lone node under `Component`) widens to every other node.
/// Empty only when `current` is the sole node.
pub(crate) fn candidates(
    graph: &DynamicGraph,
    current: NodeId,
    strategy: TeleportStrategy,
    max_distance: usize,
) -> Vec<NodeId> {
    let picked: Vec<NodeId> = match strategy {
        TeleportStrategy::Uniform | TeleportStrategy::DistanceLimited if max_distance > 0 => graph
            .shortest_path_lengths(current, Some(max_distance))
            .into_keys()
            .filter(|&n| n != current)
            .collect(),
        TeleportStrategy::Uniform | TeleportStrategy::DistanceLimited => others(graph, current),
        TeleportStrategy::Component => graph
            .component_of(current)
            .unwrap_or_default()
            .into_iter()
            .filter(|&n| n != current)
            .collect(),
        TeleportStrategy::Distant => {
            let partition = graph.components();
            let home = partition.component_of(current);
            graph
                .nodes()
                .map(|(id, _)| id)
                .filter(|&n| partition.component_of(n) != home)
                .collect()
        }
    };
    if picked.is_empty() { others(graph, current) } else { picked }
}

fn others(graph: &DynamicGraph, current: NodeId) -> Vec<NodeId> {
    graph.nodes().map(|(id, _)| id).filter(|&n| n != current).collect()
}
