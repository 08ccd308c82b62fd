//! Sampling helpers shared by the attachment strategies and the walker.
//!
//! Every helper has a defined result for degenerate input: an empty slice
//! yields `None`, and a weight vector with no usable mass degrades to a
//! uniform draw instead of failing.

use rand::Rng;
use rand::distributions::{Distribution, WeightedIndex};
use rand::seq::SliceRandom;

/// Draw an index with probability proportional to `weights[i]`.
///
/// Negative and non-finite weights count as zero. Falls back to a uniform
/// index when the total usable weight is zero.
pub fn weighted_index<R: Rng + ?Sized>(rng: &mut R, weights: &[f64]) -> Option<usize> {
    if weights.is_empty() {
        return None;
    }
    let cleaned = weights.iter().map(|&w| if w.is_finite() && w > 0.0 { w } else { 0.0 });
    match WeightedIndex::new(cleaned) {
        Ok(dist) => Some(dist.sample(rng)),
        Err(_) => Some(rng.gen_range(0..weights.len())),
    }
}

/// Weighted pick from parallel `items` / `weights` slices.
pub fn weighted_choice<R: Rng + ?Sized, T: Copy>(
    rng: &mut R,
    items: &[T],
    weights: &[f64],
) -> Option<T> {
    debug_assert_eq!(items.len(), weights.len());
    weighted_index(rng, weights).map(|i| items[i])
}

/// Uniform pick.
pub fn choose<R: Rng + ?Sized, T: Copy>(rng: &mut R, items: &[T]) -> Option<T> {
    items.choose(rng).copied()
}

/// Up to `k` distinct items drawn uniformly without replacement.
pub fn choose_many<R: Rng + ?Sized, T: Copy>(rng: &mut R, items: &[T], k: usize) -> Vec<T> {
    items.choose_multiple(rng, k.min(items.len())).copied().collect()
}

/// Roll a biased coin. Probabilities outside `[0, 1]` are clamped.
pub fn chance<R: Rng + ?Sized>(rng: &mut R, p: f64) -> bool {
    if p <= 0.0 || p.is_nan() {
        false
    } else if p >= 1.0 {
        true
    } else {
        rng.gen_bool(p)
    }
}
