//! Least-active node retrieval.
//!
//! A binary min-heap of `(activity, seq, node)` entries plus a side table of
//! each live node's authoritative activity. Updates push a fresh entry and
//! leave the old one in place; removals only touch the side table. Entries
//! that disagree with the side table are dropped when they surface.
//!
//! `seq` increases on every push, so equal activities resolve in push order.
//! Pushing a node's unchanged activity is a no-op, and compaction keeps one
//! entry per live node, so the heap stays within a constant factor of the
//! live node count.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use hashbrown::HashMap;
use ordered_float::OrderedFloat;

use crate::model::NodeId;

type Entry = Reverse<(OrderedFloat<f64>, u64, NodeId)>;

/// Min-priority index over node activity with lazy deletion.
#[derive(Debug, Default, Clone)]
pub struct ActivityIndex {
    heap: BinaryHeap<Entry>,
    current: HashMap<NodeId, f64>,
    next_seq: u64,
}

impl ActivityIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `activity` as the node's authoritative value.
    pub fn push(&mut self, node: NodeId, activity: f64) {
        if self.current.insert(node, activity) == Some(activity) {
            return;
        }
        self.heap.push(Reverse((OrderedFloat(activity), self.next_seq, node)));
        self.next_seq += 1;
        self.maybe_compact();
    }

    /// Forget a node. Its heap entries become stale and are skipped later.
    pub fn remove(&mut self, node: NodeId) -> bool {
        self.current.remove(&node).is_some()
    }

    /// Authoritative activity for a live node.
    pub fn activity(&self, node: NodeId) -> Option<f64> {
        self.current.get(&node).copied()
    }

    /// Number of live nodes tracked.
    pub fn len(&self) -> usize {
        self.current.len()
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_empty()
    }

    /// Physical heap size, stale entries included.
    pub fn heap_len(&self) -> usize {
        self.heap.len()
    }

    /// The live node with the lowest activity.
    ///
    /// Stale entries popped on the way are discarded. The valid entry is put
    /// back unchanged (same sequence number), so repeated calls agree.
    pub fn least_active(&mut self) -> Option<NodeId> {
        while let Some(entry) = self.heap.pop() {
            let Reverse((activity, _, node)) = entry;
            match self.current.get(&node) {
                Some(&live) if live == activity.into_inner() => {
                    self.heap.push(entry);
                    return Some(node);
                }
                _ => continue,
            }
        }
        None
    }

    /// Pop the least active node and stop tracking it.
    pub fn pop_least(&mut self) -> Option<(NodeId, f64)> {
        let node = self.least_active()?;
        let activity = self.current.remove(&node)?;
        Some((node, activity))
    }

    fn maybe_compact(&mut self) {
        if self.heap.len() <= 4 * self.current.len() + 64 {
            return;
        }
        // Earliest valid entry per node wins, preserving push-order ties.
        let mut live: HashMap<NodeId, Entry> = HashMap::with_capacity(self.current.len());
        for entry in std::mem::take(&mut self.heap).into_vec() {
            let Reverse((activity, seq, node)) = entry;
            if self.current.get(&node) != Some(&activity.into_inner()) {
                continue;
            }
            live.entry(node)
                .and_modify(|kept| {
                    if seq < (kept.0).1 {
                        *kept = entry;
                    }
                })
                .or_insert(entry);
        }
        self.heap = live.into_values().collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_least_active_orders_by_activity() {
        let mut idx = ActivityIndex::new();
        idx.push(NodeId(0), 0.8);
        idx.push(NodeId(1), 0.3);
        idx.push(NodeId(2), 0.5);
        assert_eq!(idx.least_active(), Some(NodeId(1)));
        // Peek semantics: asking again gives the same answer.
        assert_eq!(idx.least_active(), Some(NodeId(1)));
    }

    #[test]
    fn test_ties_break_by_push_order() {
        let mut idx = ActivityIndex::new();
        idx.push(NodeId(4), 0.2);
        idx.push(NodeId(1), 0.2);
        assert_eq!(idx.least_active(), Some(NodeId(4)));
    }

    #[test]
    fn test_stale_entries_are_skipped() {
        let mut idx = ActivityIndex::new();
        idx.push(NodeId(0), 0.1);
        idx.push(NodeId(1), 0.5);
        // Raise node 0; its old 0.1 entry is now stale.
        idx.push(NodeId(0), 0.9);
        assert_eq!(idx.least_active(), Some(NodeId(1)));
        assert_eq!(idx.activity(NodeId(0)), Some(0.9));
    }

    #[test]
    fn test_removed_nodes_are_never_returned() {
        let mut idx = ActivityIndex::new();
        idx.push(NodeId(0), 0.1);
        idx.push(NodeId(1), 0.5);
        assert!(idx.remove(NodeId(0)));
        assert_eq!(idx.least_active(), Some(NodeId(1)));
        assert!(!idx.remove(NodeId(0)));
    }

    #[test]
    fn test_pop_least_drains_in_order() {
        let mut idx = ActivityIndex::new();
        idx.push(NodeId(0), 0.7);
        idx.push(NodeId(1), 0.2);
        idx.push(NodeId(2), 0.4);
        assert_eq!(idx.pop_least(), Some((NodeId(1), 0.2)));
        assert_eq!(idx.pop_least(), Some((NodeId(2), 0.4)));
        assert_eq!(idx.pop_least(), Some((NodeId(0), 0.7)));
        assert_eq!(idx.pop_least(), None);
        assert!(idx.is_empty());
    }

    #[test]
    fn test_compaction_keeps_live_entries() {
        let mut idx = ActivityIndex::new();
        idx.push(NodeId(0), 1.0);
        idx.push(NodeId(1), 2.0);
        for i in 0..500 {
            idx.push(NodeId(0), 1.0 + i as f64);
        }
        assert!(idx.heap_len() < 500);
        assert_eq!(idx.least_active(), Some(NodeId(1)));
    }

    #[test]
    fn test_repeated_value_does_not_grow_heap() {
        let mut idx = ActivityIndex::new();
        for _ in 0..1000 {
            for n in 0..20 {
                idx.push(NodeId(n), 0.1);
            }
        }
        assert_eq!(idx.len(), 20);
        assert_eq!(idx.heap_len(), 20);
        // First push still wins the tie.
        assert_eq!(idx.least_active(), Some(NodeId(0)));
    }

    #[test]
    fn test_oscillating_values_stay_bounded() {
        let mut idx = ActivityIndex::new();
        for round in 0..2000 {
            let value = if round % 2 == 0 { 0.5 } else { 0.7 };
            for n in 0..10 {
                idx.push(NodeId(n), value);
            }
            assert!(idx.heap_len() <= 4 * idx.len() + 64);
        }
        let least = idx.least_active().unwrap();
        assert_eq!(idx.activity(least), Some(0.7));
    }
}
