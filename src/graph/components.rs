//! Connected-component partition and its lazily refreshed cache.

use std::collections::{BTreeMap, VecDeque};
use std::sync::Arc;

use hashbrown::{HashMap, HashSet};

use crate::model::NodeId;

/// A snapshot of the connected components of the graph.
///
/// Components are ordered largest first; equal sizes are ordered by their
/// smallest node id. Node ids inside a component are ascending.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Partition {
    components: Vec<Vec<NodeId>>,
    membership: HashMap<NodeId, usize>,
}

impl Partition {
    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn components(&self) -> &[Vec<NodeId>] {
        &self.components
    }

    pub fn get(&self, index: usize) -> Option<&[NodeId]> {
        self.components.get(index).map(Vec::as_slice)
    }

    pub fn largest(&self) -> Option<&[NodeId]> {
        self.get(0)
    }

    /// Index of the component containing `node`.
    pub fn component_of(&self, node: NodeId) -> Option<usize> {
        self.membership.get(&node).copied()
    }

    /// Members of the component containing `node`.
    pub fn members_of(&self, node: NodeId) -> Option<&[NodeId]> {
        self.component_of(node).and_then(|i| self.get(i))
    }

    pub fn same_component(&self, a: NodeId, b: NodeId) -> bool {
        matches!((self.component_of(a), self.component_of(b)), (Some(x), Some(y)) if x == y)
    }

    pub fn sizes(&self) -> Vec<usize> {
        self.components.iter().map(Vec::len).collect()
    }

    /// Node → component index, for callers that want to keep a copy.
    pub fn labels(&self) -> HashMap<NodeId, usize> {
        self.membership.clone()
    }

    /// Breadth-first labelling over an ordered adjacency map.
    pub(crate) fn compute(adjacency: &BTreeMap<NodeId, BTreeMap<NodeId, f64>>) -> Self {
        let mut seen: HashSet<NodeId> = HashSet::with_capacity(adjacency.len());
        let mut components: Vec<Vec<NodeId>> = Vec::new();
        let mut queue = VecDeque::new();

        for &root in adjacency.keys() {
            if !seen.insert(root) {
                continue;
            }
            let mut members = vec![root];
            queue.push_back(root);
            while let Some(node) = queue.pop_front() {
                let Some(nbrs) = adjacency.get(&node) else { continue };
                for &next in nbrs.keys() {
                    if seen.insert(next) {
                        members.push(next);
                        queue.push_back(next);
                    }
                }
            }
            members.sort_unstable();
            components.push(members);
        }

        // Stable sort: roots were visited in ascending id order.
        components.sort_by(|a, b| b.len().cmp(&a.len()));

        let mut membership = HashMap::with_capacity(adjacency.len());
        for (i, members) in components.iter().enumerate() {
            for &node in members {
                membership.insert(node, i);
            }
        }

        Self { components, membership }
    }
}

/// Cached partition plus a dirty flag. Every structural mutation of the
/// graph calls [`ComponentCache::invalidate`]; reads recompute at most once.
#[derive(Debug)]
pub(crate) struct ComponentCache {
    dirty: bool,
    partition: Arc<Partition>,
    recomputations: u64,
}

impl ComponentCache {
    pub(crate) fn new() -> Self {
        Self { dirty: true, partition: Arc::default(), recomputations: 0 }
    }

    pub(crate) fn invalidate(&mut self) {
        self.dirty = true;
    }

    #[cfg(test)]
    pub(crate) fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub(crate) fn recomputations(&self) -> u64 {
        self.recomputations
    }

    pub(crate) fn get(&mut self, adjacency: &BTreeMap<NodeId, BTreeMap<NodeId, f64>>) -> Arc<Partition> {
        if self.dirty {
            self.partition = Arc::new(Partition::compute(adjacency));
            self.dirty = false;
            self.recomputations += 1;
        }
        Arc::clone(&self.partition)
    }
}
