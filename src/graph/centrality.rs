//! Betweenness centrality for bridge selection.
//!
//! Brandes' accumulation over unweighted shortest paths, restricted to one
//! component. Small components run from every source; large ones run from
//! a random pivot sample and scale the result by `n / k`.

use std::collections::VecDeque;

use hashbrown::HashMap;

use crate::model::NodeId;

/// Components up to this size get exact centrality.
pub const EXACT_LIMIT: usize = 100;

/// Pivot count for the sampled approximation.
pub const SAMPLE_PIVOTS: usize = 100;

/// Betweenness of every member, computed from the given source pivots.
///
/// `neighbors` must only yield nodes inside `members`; anything else is
/// ignored. Pass `pivots == members` for the exact value.
pub fn betweenness<F, I>(members: &[NodeId], pivots: &[NodeId], neighbors: F) -> HashMap<NodeId, f64>
where
    F: Fn(NodeId) -> I,
    I: IntoIterator<Item = NodeId>,
{
    let n = members.len();
    let index: HashMap<NodeId, usize> = members.iter().enumerate().map(|(i, &id)| (id, i)).collect();
    let adj: Vec<Vec<usize>> = members
        .iter()
        .map(|&id| neighbors(id).into_iter().filter_map(|nb| index.get(&nb).copied()).collect())
        .collect();

    let mut centrality = vec![0.0f64; n];
    let mut sigma = vec![0.0f64; n];
    let mut dist = vec![usize::MAX; n];
    let mut delta = vec![0.0f64; n];
    let mut preds: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut order = Vec::with_capacity(n);
    let mut queue = VecDeque::with_capacity(n);

    let mut used = 0usize;
    for pivot in pivots {
        let Some(&s) = index.get(pivot) else { continue };
        used += 1;

        sigma.iter_mut().for_each(|x| *x = 0.0);
        dist.iter_mut().for_each(|x| *x = usize::MAX);
        delta.iter_mut().for_each(|x| *x = 0.0);
        preds.iter_mut().for_each(Vec::clear);
        order.clear();

        sigma[s] = 1.0;
        dist[s] = 0;
        queue.push_back(s);
        while let Some(v) = queue.pop_front() {
            order.push(v);
            for &w in &adj[v] {
                if dist[w] == usize::MAX {
                    dist[w] = dist[v] + 1;
                    queue.push_back(w);
                }
                if dist[w] == dist[v] + 1 {
                    sigma[w] += sigma[v];
                    preds[w].push(v);
                }
            }
        }

        while let Some(w) = order.pop() {
            for &v in &preds[w] {
                delta[v] += sigma[v] / sigma[w] * (1.0 + delta[w]);
            }
            if w != s {
                centrality[w] += delta[w];
            }
        }
    }

    // Undirected: every pair was counted from both ends.
    let scale = if used == 0 { 0.0 } else { n as f64 / used as f64 / 2.0 };
    members
        .iter()
        .zip(centrality)
        .map(|(&id, c)| (id, c * scale))
        .collect()
}

/// The edge whose endpoints have the highest mean centrality.
///
/// `edges` is scanned in order; the first maximum wins.
pub fn most_central_edge(
    edges: impl IntoIterator<Item = (NodeId, NodeId)>,
    scores: &HashMap<NodeId, f64>,
) -> Option<(NodeId, NodeId)> {
    let mut best: Option<((NodeId, NodeId), f64)> = None;
    for (u, v) in edges {
        let su = scores.get(&u).copied().unwrap_or(0.0);
        let sv = scores.get(&v).copied().unwrap_or(0.0);
        let score = (su + sv) / 2.0;
        if best.is_none_or(|(_, b)| score > b) {
            best = Some(((u, v), score));
        }
    }
    best.map(|(edge, _)| edge)
}
