//! Parent and elite selection.
//!
//! Parents are drawn with softmax (Boltzmann) selection:
//!
//! ```text
//! p(i) = exp((f_i - f_max) / T) / Σ_j exp((f_j - f_max) / T)
//! ```
//!
//! Shifting by the maximum keeps every exponent ≤ 0, so no term overflows
//! and the best schedule always has weight 1.
//!
//! # Reference
//! - de la Maza & Tidor (1993), "An analysis of selection procedures with
//!   particular attention paid to proportional and Boltzmann selection"

use rand::distr::weighted::WeightedIndex;
use rand::distr::Distribution;
use rand::Rng;

use crate::error::Result;

/// Softmax selection probabilities for `fitness` at `temperature`.
///
/// Returns an empty vector for an empty slice. `temperature` must be
/// positive.
pub fn softmax_probabilities(fitness: &[f64], temperature: f64) -> Vec<f64> {
    let max = fitness.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let weights: Vec<f64> = fitness
        .iter()
        .map(|&f| ((f - max) / temperature).exp())
        .collect();
    let sum: f64 = weights.iter().sum();
    weights.into_iter().map(|w| w / sum).collect()
}

/// Draws `count` parent index pairs, independently and with replacement.
///
/// A pair may name the same schedule twice.
///
/// # Errors
/// [`Error::Sampling`](crate::Error::Sampling) if the weights are empty,
/// negative, or all zero.
pub fn select_parent_pairs<R: Rng>(
    probabilities: &[f64],
    count: usize,
    rng: &mut R,
) -> Result<Vec<(usize, usize)>> {
    if count == 0 {
        return Ok(Vec::new());
    }
    let dist = WeightedIndex::new(probabilities)?;
    Ok((0..count)
        .map(|_| (dist.sample(rng), dist.sample(rng)))
        .collect())
}

/// Indices of the `k` fittest schedules, best first.
///
/// Ties keep population order.
pub fn select_elites(fitness: &[f64], k: usize) -> Vec<usize> {
    let mut order: Vec<usize> = (0..fitness.len()).collect();
    order.sort_by(|&a, &b| fitness[b].total_cmp(&fitness[a]));
    order.truncate(k);
    order
}
