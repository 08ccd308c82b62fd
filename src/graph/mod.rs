//! # Dynamic Graph Engine
//!
//! Owns the evolving undirected graph: nodes with activity and birth step,
//! weighted edges, the component cache and the activity index. One call to
//! [`DynamicGraph::update`] advances the simulation by one time step.
//!
//! ## Invariants
//!
//! - No self-loops, no parallel edges, no edge to a missing node.
//! - Node ids come from a monotonically increasing counter and are never reused.
//! - Activity never drops below `activity_floor`; edge weights are never negative.
//! - Every structural mutator marks the component cache dirty.
//!
//! ## Limitations
//!
//! - Not internally synchronized. Share through [`SharedGraph`] and take the
//!   write lock for `update`.
//! - Repairs are best effort: an unsatisfiable degree or component goal is
//!   left for a later step, never reported as an error.

pub mod activity;
pub mod centrality;
pub mod components;

use std::collections::{BTreeMap, VecDeque};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use rand::{Rng, SeedableRng};
use rand::rngs::SmallRng;
use tracing::debug;

use crate::config::{GraphConfig, UpdateParams};
use crate::model::{Edge, NodeData, NodeId};
use crate::sampling;
use crate::strategy::{AttachmentStrategy, StrategyKind};
use crate::Result;

pub use activity::ActivityIndex;
pub use components::Partition;
use components::ComponentCache;

/// A graph handle shared between a driver (writer) and walkers (readers).
pub type SharedGraph = Arc<RwLock<DynamicGraph>>;

/// Weight given to every edge created by the engine or a strategy.
pub const DEFAULT_EDGE_WEIGHT: f64 = 1.0;

/// Activity given to freshly created nodes.
pub const INITIAL_ACTIVITY: f64 = 1.0;

// ============================================================================
// DynamicGraph
// ============================================================================

/// Evolving graph with pluggable growth policy.
pub struct DynamicGraph {
    config: GraphConfig,
    nodes: BTreeMap<NodeId, NodeData>,
    /// node → (neighbor → edge weight); both directions stored.
    adjacency: BTreeMap<NodeId, BTreeMap<NodeId, f64>>,
    edge_count: usize,
    next_node_id: u64,
    time_step: u64,
    components: Mutex<ComponentCache>,
    activity: ActivityIndex,
    kind: StrategyKind,
    /// Taken out while one of its hooks runs against `self`.
    strategy: Option<AttachmentStrategy>,
    rng: SmallRng,
    edges_added: u64,
    edges_removed: u64,
}

impl DynamicGraph {
    /// Build a graph with `config.initial_nodes` isolated nodes.
    ///
    /// Fails fast on an unknown strategy name or an invalid config.
    pub fn new(config: GraphConfig) -> Result<Self> {
        config.validate()?;
        let strategy = AttachmentStrategy::from_name(&config.strategy, &config)?;
        let rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };

        let mut graph = Self {
            kind: strategy.kind(),
            strategy: Some(strategy),
            nodes: BTreeMap::new(),
            adjacency: BTreeMap::new(),
            edge_count: 0,
            next_node_id: 0,
            time_step: 0,
            components: Mutex::new(ComponentCache::new()),
            activity: ActivityIndex::new(),
            rng,
            edges_added: 0,
            edges_removed: 0,
            config,
        };
        for _ in 0..graph.config.initial_nodes {
            graph.add_node();
        }
        Ok(graph)
    }

    /// Wrap in the lock used to share the graph with walkers.
    pub fn into_shared(self) -> SharedGraph {
        Arc::new(RwLock::new(self))
    }

    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    pub fn strategy_kind(&self) -> StrategyKind {
        self.kind
    }

    pub fn strategy(&self) -> Option<&AttachmentStrategy> {
        self.strategy.as_ref()
    }

    pub fn time_step(&self) -> u64 {
        self.time_step
    }

    pub(crate) fn rng(&mut self) -> &mut SmallRng {
        &mut self.rng
    }

    // ========================================================================
    // Read API
    // ========================================================================

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains_node(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn node(&self, id: NodeId) -> Option<&NodeData> {
        self.nodes.get(&id)
    }

    /// Nodes in ascending id order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &NodeData)> + '_ {
        self.nodes.iter().map(|(&id, data)| (id, data))
    }

    pub fn node_ids(&self) -> Vec<NodeId> {
        self.nodes.keys().copied().collect()
    }

    /// Every edge once, `u < v`, in ascending `(u, v)` order.
    pub fn edges(&self) -> Vec<Edge> {
        self.adjacency
            .iter()
            .flat_map(|(&u, nbrs)| {
                nbrs.range(u..)
                    .filter(move |&(&v, _)| v != u)
                    .map(move |(&v, &w)| Edge { u, v, weight: w })
            })
            .collect()
    }

    pub fn has_edge(&self, u: NodeId, v: NodeId) -> bool {
        self.adjacency.get(&u).is_some_and(|nbrs| nbrs.contains_key(&v))
    }

    pub fn edge_weight(&self, u: NodeId, v: NodeId) -> Option<f64> {
        self.adjacency.get(&u).and_then(|nbrs| nbrs.get(&v).copied())
    }

    /// Neighbors in ascending id order. Empty for unknown nodes.
    pub fn neighbors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.adjacency.get(&id).into_iter().flat_map(|nbrs| nbrs.keys().copied())
    }

    /// Neighbors paired with the weight of the connecting edge.
    pub fn neighbor_weights(&self, id: NodeId) -> impl Iterator<Item = (NodeId, f64)> + '_ {
        self.adjacency.get(&id).into_iter().flat_map(|nbrs| nbrs.iter().map(|(&n, &w)| (n, w)))
    }

    pub fn degree(&self, id: NodeId) -> usize {
        self.adjacency.get(&id).map_or(0, BTreeMap::len)
    }

    pub fn activity(&self, id: NodeId) -> Option<f64> {
        self.nodes.get(&id).map(|d| d.activity)
    }

    /// Mean weight of the node's incident edges; `None` when isolated or unknown.
    pub fn mean_edge_weight(&self, id: NodeId) -> Option<f64> {
        let nbrs = self.adjacency.get(&id)?;
        if nbrs.is_empty() {
            return None;
        }
        Some(nbrs.values().sum::<f64>() / nbrs.len() as f64)
    }

    /// Current connected components.
    ///
    /// Returns the cached partition when no structural change happened since
    /// the last call; the same `Arc` is handed out until then.
    pub fn components(&self) -> Arc<Partition> {
        self.components.lock().get(&self.adjacency)
    }

    /// How many times the partition has been recomputed.
    pub fn component_recomputations(&self) -> u64 {
        self.components.lock().recomputations()
    }

    /// Members of the component containing `id`.
    pub fn component_of(&self, id: NodeId) -> Option<Vec<NodeId>> {
        self.components().members_of(id).map(<[NodeId]>::to_vec)
    }

    /// Hop distances from `source`, optionally cut off at `max_hops`.
    ///
    /// Includes `source` itself at distance 0. Empty if `source` is unknown.
    pub fn shortest_path_lengths(&self, source: NodeId, max_hops: Option<usize>) -> BTreeMap<NodeId, usize> {
        let mut dist = BTreeMap::new();
        if !self.contains_node(source) {
            return dist;
        }
        dist.insert(source, 0);
        let mut queue = VecDeque::from([source]);
        while let Some(node) = queue.pop_front() {
            let d = dist[&node];
            if max_hops.is_some_and(|cap| d >= cap) {
                continue;
            }
            for next in self.neighbors(node) {
                if !dist.contains_key(&next) {
                    dist.insert(next, d + 1);
                    queue.push_back(next);
                }
            }
        }
        dist
    }

    pub fn is_reachable(&self, from: NodeId, to: NodeId) -> bool {
        self.shortest_path_lengths(from, None).contains_key(&to)
    }

    /// The live node with the lowest activity (ties: activity-index push order).
    pub fn least_active(&mut self) -> Option<NodeId> {
        self.activity.least_active()
    }

    // ========================================================================
    // Structural primitives
    // ========================================================================

    /// Create an isolated node with initial activity, born now.
    pub fn add_node(&mut self) -> NodeId {
        self.add_node_with(NodeData::new(INITIAL_ACTIVITY, self.time_step))
    }

    pub fn add_node_with(&mut self, mut data: NodeData) -> NodeId {
        let id = NodeId(self.next_node_id);
        self.next_node_id += 1;
        data.activity = data.activity.max(self.config.activity_floor);
        self.nodes.insert(id, data);
        self.adjacency.insert(id, BTreeMap::new());
        self.activity.push(id, data.activity);
        self.components.get_mut().invalidate();
        id
    }

    /// Remove a node and every edge touching it.
    pub fn remove_node(&mut self, id: NodeId) -> bool {
        if self.nodes.remove(&id).is_none() {
            return false;
        }
        if let Some(nbrs) = self.adjacency.remove(&id) {
            for nb in nbrs.keys() {
                if let Some(back) = self.adjacency.get_mut(nb) {
                    back.remove(&id);
                }
            }
            self.edge_count -= nbrs.len();
            self.edges_removed += nbrs.len() as u64;
        }
        self.activity.remove(id);
        self.components.get_mut().invalidate();
        true
    }

    /// Add an undirected edge. Rejects self-loops, duplicates, missing
    /// endpoints and negative or non-finite weights.
    pub fn add_edge(&mut self, u: NodeId, v: NodeId, weight: f64) -> bool {
        if u == v || !weight.is_finite() || weight < 0.0 {
            return false;
        }
        if !self.contains_node(u) || !self.contains_node(v) || self.has_edge(u, v) {
            return false;
        }
        self.adjacency.entry(u).or_default().insert(v, weight);
        self.adjacency.entry(v).or_default().insert(u, weight);
        self.edge_count += 1;
        self.edges_added += 1;
        self.components.get_mut().invalidate();
        true
    }

    pub fn remove_edge(&mut self, u: NodeId, v: NodeId) -> bool {
        let removed = self.adjacency.get_mut(&u).and_then(|nbrs| nbrs.remove(&v)).is_some();
        if !removed {
            return false;
        }
        if let Some(nbrs) = self.adjacency.get_mut(&v) {
            nbrs.remove(&u);
        }
        self.edge_count -= 1;
        self.edges_removed += 1;
        self.components.get_mut().invalidate();
        true
    }

    /// Overwrite an existing edge's weight. Not structural: the cache stays valid.
    pub fn set_edge_weight(&mut self, u: NodeId, v: NodeId, weight: f64) -> bool {
        if !weight.is_finite() || weight < 0.0 || !self.has_edge(u, v) {
            return false;
        }
        for (a, b) in [(u, v), (v, u)] {
            if let Some(w) = self.adjacency.get_mut(&a).and_then(|nbrs| nbrs.get_mut(&b)) {
                *w = weight;
            }
        }
        true
    }

    /// Set a node's activity (clamped to the floor) and re-index it.
    pub fn set_activity(&mut self, id: NodeId, activity: f64) -> bool {
        if !activity.is_finite() {
            return false;
        }
        let floor = self.config.activity_floor;
        let Some(data) = self.nodes.get_mut(&id) else { return false };
        data.activity = activity.max(floor);
        self.activity.push(id, data.activity);
        true
    }

    pub(crate) fn set_birth_step(&mut self, id: NodeId, step: u64) {
        if let Some(data) = self.nodes.get_mut(&id) {
            data.birth_step = step;
        }
    }

    // ========================================================================
    // Evolution
    // ========================================================================

    /// Advance one time step.
    ///
    /// Order: aging, node birth, least-active removal, triadic closure and
    /// weak-edge pruning, degree repair, component shaping, strategy tick.
    pub fn update(&mut self, params: &UpdateParams) -> UpdateReport {
        let (added_before, removed_before) = (self.edges_added, self.edges_removed);
        let mut report = UpdateReport { time_step: self.time_step, ..Default::default() };

        self.apply_aging();

        if sampling::chance(&mut self.rng, params.node_add_prob) {
            let id = self.add_node();
            let wired = self.with_strategy(|s, g| {
                s.pre_attach(g, id);
                s.attach(g, id)
            });
            debug!(node = %id, edges = wired.unwrap_or(0), "node added");
            report.node_added = Some(id);
        }

        if self.node_count() > 3 && sampling::chance(&mut self.rng, params.node_remove_prob) {
            if let Some(victim) = self.least_active() {
                let activity = self.activity(victim).unwrap_or_default();
                self.remove_node(victim);
                debug!(node = %victim, activity, "least active node removed");
                report.node_removed = Some(victim);
            }
        }

        if self.edge_count > 0 {
            if sampling::chance(&mut self.rng, params.triadic_prob) {
                self.with_strategy(|s, g| s.add_triadic_edges(g));
            }
            if sampling::chance(&mut self.rng, params.edge_remove_prob) {
                self.prune_weak_edges();
            }
        }

        self.enforce_degree_limits();
        self.enforce_component_rules();

        self.with_strategy(|s, g| s.post_update(g));
        self.time_step += 1;

        report.edges_added = (self.edges_added - added_before) as usize;
        report.edges_removed = (self.edges_removed - removed_before) as usize;
        report.components = self.components().len();
        report
    }

    /// Multiply activities and edge weights by their aging factors.
    pub fn apply_aging(&mut self) {
        let node_factor = self.config.node_aging_factor;
        let edge_factor = self.config.edge_aging_factor;
        let floor = self.config.activity_floor;

        // Ascending id order, so post-aging ties resolve by id.
        for (&id, data) in self.nodes.iter_mut() {
            data.activity = (data.activity * node_factor).max(floor);
            self.activity.push(id, data.activity);
        }
        for nbrs in self.adjacency.values_mut() {
            for weight in nbrs.values_mut() {
                *weight = (*weight * edge_factor).max(0.0);
            }
        }
    }

    /// Remove every edge lighter than `min_edge_weight`.
    pub fn prune_weak_edges(&mut self) -> usize {
        let threshold = self.config.min_edge_weight;
        let weak: Vec<Edge> = self.edges().into_iter().filter(|e| e.weight < threshold).collect();
        let pruned = weak.iter().filter(|e| self.remove_edge(e.u, e.v)).count();
        if pruned > 0 {
            debug!(pruned, threshold, "weak edges pruned");
        }
        pruned
    }

    /// Lift nodes up to `min_degree` and trim nodes down to `max_degree`.
    ///
    /// Under-connected nodes link to the best-scoring non-neighbors, where
    /// `score = activity × (1.5 if in another component else 1.0)`; partners
    /// already at `max_degree` are skipped. Over-connected nodes drop the
    /// neighbors with the highest `0.4 (1 − weight) + 0.6 (1 − activity)`.
    ///
    /// The component bonus is scored against the partition as of the node
    /// being repaired: a link that joins two components refreshes it.
    pub fn enforce_degree_limits(&mut self) -> DegreeRepair {
        let min_degree = self.config.min_degree;
        let max_degree = self.config.max_degree;
        let mut repair = DegreeRepair::default();
        let mut partition = self.components();
        let ids = self.node_ids();

        for &node in &ids {
            let degree = self.degree(node);
            if degree >= min_degree {
                continue;
            }
            let home = partition.component_of(node);
            let mut candidates: Vec<(f64, NodeId)> = ids
                .iter()
                .copied()
                .filter(|&c| c != node && !self.has_edge(node, c) && self.degree(c) < max_degree)
                .map(|c| {
                    let bonus = if partition.component_of(c) != home { 1.5 } else { 1.0 };
                    (bonus * self.activity(c).unwrap_or(0.0), c)
                })
                .collect();
            candidates.sort_by(|a, b| b.0.total_cmp(&a.0));
            let mut joined = false;
            for (_, partner) in candidates.into_iter().take(min_degree - degree) {
                if self.add_edge(node, partner, DEFAULT_EDGE_WEIGHT) {
                    repair.added += 1;
                    joined |= !partition.same_component(node, partner);
                }
            }
            if joined {
                partition = self.components();
            }
        }

        for &node in &ids {
            let degree = self.degree(node);
            if degree <= max_degree {
                continue;
            }
            let mut scored: Vec<(f64, NodeId)> = self
                .neighbor_weights(node)
                .map(|(nb, w)| {
                    let activity = self.activity(nb).unwrap_or(0.0);
                    (0.4 * (1.0 - w) + 0.6 * (1.0 - activity), nb)
                })
                .collect();
            scored.sort_by(|a, b| b.0.total_cmp(&a.0));
            for (_, nb) in scored.into_iter().take(degree - max_degree) {
                if self.remove_edge(node, nb) {
                    repair.removed += 1;
                }
            }
        }

        if repair.added + repair.removed > 0 {
            debug!(added = repair.added, removed = repair.removed, "degree limits enforced");
        }
        repair
    }

    /// Steer the component count toward `target_components` and lift
    /// components below `min_component_size`.
    pub fn enforce_component_rules(&mut self) -> ComponentRepair {
        let mut repair = ComponentRepair::default();
        let partition = self.components();
        let target = self.config.target_components;
        let count = partition.len();
        if count == 0 {
            return repair;
        }

        if count > target {
            self.merge_excess(&partition, target, &mut repair);
        } else if count < target {
            self.split_largest(&partition, target - count, &mut repair);
        }
        self.attach_undersized(&mut repair);

        if repair != ComponentRepair::default() {
            debug!(
                count,
                target,
                merged = repair.merged,
                split = repair.split,
                attached = repair.attached,
                "component rules enforced"
            );
        }
        repair
    }

    fn merge_excess(&mut self, partition: &Partition, target: usize, repair: &mut ComponentRepair) {
        let max_degree = self.config.max_degree;
        let comps = partition.components();
        for excess in &comps[target..] {
            let sources = self.below_degree(excess, max_degree);
            let Some(source) = sampling::choose(&mut self.rng, &sources) else { continue };
            let kept = self.rng_index(target);
            let targets = self.below_degree(&comps[kept], max_degree);
            let Some(dest) = sampling::choose(&mut self.rng, &targets) else { continue };
            if self.add_edge(source, dest, DEFAULT_EDGE_WEIGHT) {
                repair.merged += 1;
            }
        }
    }

    fn split_largest(&mut self, partition: &Partition, mut deficit: usize, repair: &mut ComponentRepair) {
        let threshold = 2 * self.config.min_component_size;
        for comp in partition.components() {
            if deficit == 0 {
                break;
            }
            if comp.len() < threshold {
                continue;
            }
            let pivots = if comp.len() <= centrality::EXACT_LIMIT {
                comp.clone()
            } else {
                sampling::choose_many(&mut self.rng, comp, centrality::SAMPLE_PIVOTS)
            };
            let this: &DynamicGraph = self;
            let scores = centrality::betweenness(comp, &pivots, |n| this.neighbors(n).collect::<Vec<_>>());
            let edges = comp
                .iter()
                .flat_map(|&u| this.neighbors(u).filter(move |&v| u < v).map(move |v| (u, v)));
            let Some((u, v)) = centrality::most_central_edge(edges, &scores) else { continue };
            self.remove_edge(u, v);
            if !self.is_reachable(u, v) {
                deficit -= 1;
                repair.split += 1;
            }
        }
    }

    fn attach_undersized(&mut self, repair: &mut ComponentRepair) {
        let min_size = self.config.min_component_size;
        let max_degree = self.config.max_degree;
        let partition = self.components();
        let Some(largest) = partition.largest() else { return };

        for small in &partition.components()[1..] {
            if small.len() >= min_size {
                continue;
            }
            let sources = self.below_degree(small, max_degree);
            let Some(source) = sampling::choose(&mut self.rng, &sources) else { continue };
            // Earlier attachments may have filled an anchor up to max_degree.
            let anchors = self.below_degree(largest, max_degree);
            let Some(anchor) = sampling::choose(&mut self.rng, &anchors) else { return };
            if self.add_edge(source, anchor, DEFAULT_EDGE_WEIGHT) {
                repair.attached += 1;
            }
        }
    }

    fn below_degree(&self, members: &[NodeId], max_degree: usize) -> Vec<NodeId> {
        members.iter().copied().filter(|&n| self.degree(n) < max_degree).collect()
    }

    fn rng_index(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }

    /// Run a strategy hook with mutable access to the graph.
    fn with_strategy<T>(&mut self, f: impl FnOnce(&mut AttachmentStrategy, &mut DynamicGraph) -> T) -> Option<T> {
        let mut strategy = self.strategy.take()?;
        let out = f(&mut strategy, self);
        self.strategy = Some(strategy);
        Some(out)
    }
}

impl std::fmt::Debug for DynamicGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DynamicGraph")
            .field("strategy", &self.kind)
            .field("time_step", &self.time_step)
            .field("nodes", &self.nodes.len())
            .field("edges", &self.edge_count)
            .finish()
    }
}

// ============================================================================
// Reports
// ============================================================================

/// What one [`DynamicGraph::update`] call changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct UpdateReport {
    /// Time step the update ran at (before advancing).
    pub time_step: u64,
    pub node_added: Option<NodeId>,
    pub node_removed: Option<NodeId>,
    pub edges_added: usize,
    pub edges_removed: usize,
    /// Component count after the update.
    pub components: usize,
}

impl std::fmt::Display for UpdateReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "UpdateReport {{ step: {}, +node: {}, -node: {}, +edges: {}, -edges: {}, components: {} }}",
            self.time_step,
            self.node_added.map_or_else(|| "-".to_string(), |n| n.to_string()),
            self.node_removed.map_or_else(|| "-".to_string(), |n| n.to_string()),
            self.edges_added,
            self.edges_removed,
            self.components,
        )
    }
}

/// Edges touched by [`DynamicGraph::enforce_degree_limits`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DegreeRepair {
    pub added: usize,
    pub removed: usize,
}

/// Edges touched by [`DynamicGraph::enforce_component_rules`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ComponentRepair {
    pub merged: usize,
    pub split: usize,
    pub attached: usize,
}

// ============================================================================
// Tests
// ============================================================================
