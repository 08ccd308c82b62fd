//! # Biased Walker
//!
//! A single stochastic agent moving over a [`SharedGraph`] it does not own.
//! Each [`BiasedWalker::step`] takes a read lock on the graph and resolves
//! exactly one transition, checked in this order:
//!
//! 1. empty graph: position becomes `None`
//! 2. stale position: jump to a uniform random live node
//! 3. teleport with `teleport_probability`
//! 4. stay with `stay_probability`
//! 5. weighted neighbor walk, or a forced teleport from an isolated node
//!
//! Candidate weights come from the configured [`BiasType`], are damped by
//! `decay_factor^visits` under `adaptive_bias`, and are floored at
//! `min_weight`. Neighbor weights are then raised to `exploration_factor`.

pub mod bias;
pub mod teleport;

use std::collections::{BTreeMap, VecDeque};
use std::str::FromStr;
use std::sync::Arc;

use hashbrown::HashMap;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

use crate::config::WalkerConfig;
use crate::graph::{DynamicGraph, SharedGraph};
use crate::model::NodeId;
use crate::sampling;
use crate::{Error, Result};

pub use bias::{BiasType, CustomBias};
pub use teleport::TeleportStrategy;

// ============================================================================
// StartHeuristic
// ============================================================================

/// How `reset` picks a start node when none is given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StartHeuristic {
    #[default]
    Random,
    /// Highest-degree node; lowest id among ties.
    MaxDegree,
}

impl StartHeuristic {
    pub fn name(&self) -> &'static str {
        match self {
            StartHeuristic::Random => "random",
            StartHeuristic::MaxDegree => "max_degree",
        }
    }
}

impl FromStr for StartHeuristic {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().replace('-', "_").to_ascii_lowercase().as_str() {
            "random" => Ok(StartHeuristic::Random),
            "max_degree" => Ok(StartHeuristic::MaxDegree),
            _ => Err(Error::UnknownStartHeuristic(s.to_string())),
        }
    }
}

impl std::fmt::Display for StartHeuristic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// Transition
// ============================================================================

/// Outcome of one [`BiasedWalker::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Transition {
    /// The graph is empty; the walker has no position.
    Vacant,
    /// The previous position was gone; landed on a random live node.
    Recovered { to: NodeId },
    /// Jumped away. `forced` marks the isolated-node fallback.
    Teleported { from: NodeId, to: NodeId, forced: bool },
    Stayed { at: NodeId },
    Walked { from: NodeId, to: NodeId },
    /// A teleport was due but `at` is the only node; counted as a stay.
    Stuck { at: NodeId },
}

impl Transition {
    /// Position after the transition.
    pub fn position(&self) -> Option<NodeId> {
        match *self {
            Transition::Vacant => None,
            Transition::Recovered { to }
            | Transition::Teleported { to, .. }
            | Transition::Walked { to, .. } => Some(to),
            Transition::Stayed { at } | Transition::Stuck { at } => Some(at),
        }
    }

    /// Whether the walker changed node.
    pub fn moved(&self) -> bool {
        matches!(
            self,
            Transition::Recovered { .. } | Transition::Teleported { .. } | Transition::Walked { .. }
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            Transition::Vacant => "vacant",
            Transition::Recovered { .. } => "recovered",
            Transition::Teleported { .. } => "teleported",
            Transition::Stayed { .. } => "stayed",
            Transition::Walked { .. } => "walked",
            Transition::Stuck { .. } => "stuck",
        }
    }
}

// ============================================================================
// BiasedWalker
// ============================================================================

pub struct BiasedWalker {
    graph: SharedGraph,
    config: WalkerConfig,
    custom_bias: Option<CustomBias>,
    current: Option<NodeId>,
    /// Recent positions, oldest first, at most `max_history` long.
    history: VecDeque<NodeId>,
    visits: HashMap<NodeId, u64>,
    rng: SmallRng,
}

impl BiasedWalker {
    /// Place a walker on `graph`, starting at `config.start_node` when that
    /// node exists and at the start heuristic's pick otherwise.
    pub fn new(graph: SharedGraph, config: WalkerConfig) -> Result<Self> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        let start = config.start_node;
        let mut walker = Self {
            graph,
            custom_bias: None,
            current: None,
            history: VecDeque::with_capacity(config.max_history),
            visits: HashMap::new(),
            rng,
            config,
        };
        walker.reset(start);
        Ok(walker)
    }

    pub fn config(&self) -> &WalkerConfig {
        &self.config
    }

    pub fn graph(&self) -> &SharedGraph {
        &self.graph
    }

    pub fn current(&self) -> Option<NodeId> {
        self.current
    }

    /// Recent positions, oldest first.
    pub fn history(&self) -> impl ExactSizeIterator<Item = NodeId> + '_ {
        self.history.iter().copied()
    }

    pub fn visit_count(&self, node: NodeId) -> u64 {
        self.visits.get(&node).copied().unwrap_or(0)
    }

    /// Raw visit counts in ascending node order.
    pub fn visit_counts(&self) -> BTreeMap<NodeId, u64> {
        self.visits.iter().map(|(&n, &c)| (n, c)).collect()
    }

    pub fn total_visits(&self) -> u64 {
        self.visits.values().sum()
    }

    pub fn set_custom_bias(&mut self, bias: CustomBias) {
        self.custom_bias = Some(bias);
    }

    pub fn clear_custom_bias(&mut self) {
        self.custom_bias = None;
    }

    /// Share of all visits per visited node. Empty before the first visit.
    pub fn get_visit_distribution(&self) -> BTreeMap<NodeId, f64> {
        let total = self.total_visits();
        if total == 0 {
            return BTreeMap::new();
        }
        self.visits.iter().map(|(&n, &c)| (n, c as f64 / total as f64)).collect()
    }

    /// Clear history and visit counts, then seed both with a start node.
    ///
    /// `start` is used when it exists in the graph; otherwise the start
    /// heuristic picks. On an empty graph the walker is left without a position.
    pub fn reset(&mut self, start: Option<NodeId>) {
        self.history.clear();
        self.visits.clear();
        let graph = Arc::clone(&self.graph);
        let g = graph.read();
        self.current = None;
        let start = match start.filter(|&n| g.contains_node(n)) {
            Some(node) => Some(node),
            None => self.pick_start(&g),
        };
        if let Some(node) = start {
            self.land(node);
        }
    }

    fn pick_start(&mut self, g: &DynamicGraph) -> Option<NodeId> {
        match self.config.start_heuristic {
            StartHeuristic::Random => sampling::choose(&mut self.rng, &g.node_ids()),
            StartHeuristic::MaxDegree => {
                // max_by_key keeps the last maximum; reverse so the lowest id wins.
                g.node_ids().into_iter().rev().max_by_key(|&id| g.degree(id))
            }
        }
    }

    /// Advance one transition against the graph's current state.
    pub fn step(&mut self) -> Transition {
        let graph = Arc::clone(&self.graph);
        let g = graph.read();
        let from = self.current;
        let transition = self.resolve(&g);
        trace!(
            from = ?from,
            to = ?transition.position(),
            transition = transition.name(),
            "walker step"
        );
        transition
    }

    fn resolve(&mut self, g: &DynamicGraph) -> Transition {
        if g.is_empty() {
            self.current = None;
            return Transition::Vacant;
        }

        let current = match self.current.filter(|&n| g.contains_node(n)) {
            Some(node) => node,
            None => {
                let Some(to) = sampling::choose(&mut self.rng, &g.node_ids()) else {
                    self.current = None;
                    return Transition::Vacant;
                };
                self.land(to);
                return Transition::Recovered { to };
            }
        };

        if sampling::chance(&mut self.rng, self.config.teleport_probability) {
            return self.teleport(g, current, false);
        }

        if sampling::chance(&mut self.rng, self.config.stay_probability) {
            *self.visits.entry(current).or_insert(0) += 1;
            return Transition::Stayed { at: current };
        }

        let neighbors: Vec<(NodeId, f64)> = g.neighbor_weights(current).collect();
        if neighbors.is_empty() {
            return self.teleport(g, current, true);
        }
        let weights: Vec<f64> = neighbors
            .iter()
            .map(|&(nb, w)| self.node_weight(g, current, nb, Some(w)).powf(self.config.exploration_factor))
            .collect();
        let Some(idx) = sampling::weighted_index(&mut self.rng, &weights) else {
            return Transition::Stayed { at: current };
        };
        let to = neighbors[idx].0;
        self.land(to);
        Transition::Walked { from: current, to }
    }

    fn teleport(&mut self, g: &DynamicGraph, from: NodeId, forced: bool) -> Transition {
        let candidates =
            teleport::candidates(g, from, self.config.teleport_strategy, self.config.max_teleport_distance);
        if candidates.is_empty() {
            *self.visits.entry(from).or_insert(0) += 1;
            return Transition::Stuck { at: from };
        }
        let weights: Vec<f64> = candidates.iter().map(|&c| self.node_weight(g, from, c, None)).collect();
        let Some(to) = sampling::weighted_choice(&mut self.rng, &candidates, &weights) else {
            *self.visits.entry(from).or_insert(0) += 1;
            return Transition::Stuck { at: from };
        };
        self.land(to);
        Transition::Teleported { from, to, forced }
    }

    /// Candidate weight: bias base, visit decay, `min_weight` floor.
    fn node_weight(&self, g: &DynamicGraph, from: NodeId, to: NodeId, hop: Option<f64>) -> f64 {
        let mut weight = bias::base_weight(self.config.bias_type, self.custom_bias.as_ref(), g, from, to, hop);
        if !weight.is_finite() {
            warn!(node = %to, weight, bias = %self.config.bias_type, "non-finite bias weight replaced by min_weight");
            return self.config.min_weight;
        }
        if self.config.adaptive_bias {
            weight *= self.config.decay_factor.powf(self.visit_count(to) as f64);
        }
        weight.max(self.config.min_weight)
    }

    fn land(&mut self, node: NodeId) {
        self.current = Some(node);
        if self.history.len() == self.config.max_history {
            self.history.pop_front();
        }
        self.history.push_back(node);
        *self.visits.entry(node).or_insert(0) += 1;
    }
}

impl std::fmt::Debug for BiasedWalker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BiasedWalker")
            .field("current", &self.current)
            .field("bias_type", &self.config.bias_type)
            .field("history", &self.history.len())
            .field("visited", &self.visits.len())
            .field("custom_bias", &self.custom_bias)
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
