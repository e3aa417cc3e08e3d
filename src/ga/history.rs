//! Per-generation run statistics.

use serde::{Deserialize, Serialize};

/// Statistics of one evaluated generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationStats {
    /// Generation index; 0 is the initial population.
    pub generation: usize,
    /// Best fitness in the generation.
    pub best: f64,
    /// Mean fitness in the generation.
    pub mean: f64,
    /// Worst fitness in the generation.
    pub worst: f64,
    /// Relative mean improvement over the previous generation.
    ///
    /// `None` for generation 0, and when the previous mean was zero but
    /// this one is not.
    pub improvement: Option<f64>,
    /// Mutation rate used to produce this generation.
    pub mutation_rate: f64,
}

/// Append-only record of a run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunHistory {
    generations: Vec<GenerationStats>,
}

/// Relative change `(current - previous) / |previous|`.
///
/// A zero previous mean yields `Some(0.0)` if the current mean is also
/// zero, and `None` otherwise: the change is unbounded, so it never counts
/// as stagnation.
pub fn improvement_ratio(previous: f64, current: f64) -> Option<f64> {
    if previous == 0.0 {
        if current == 0.0 {
            Some(0.0)
        } else {
            None
        }
    } else {
        Some((current - previous) / previous.abs())
    }
}

impl RunHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a generation.
    pub fn push(&mut self, stats: GenerationStats) {
        self.generations.push(stats);
    }

    /// All recorded generations, oldest first.
    pub fn generations(&self) -> &[GenerationStats] {
        &self.generations
    }

    pub fn len(&self) -> usize {
        self.generations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.generations.is_empty()
    }

    /// Most recent generation.
    pub fn last(&self) -> Option<&GenerationStats> {
        self.generations.last()
    }

    /// Best fitness seen in any generation.
    pub fn best_fitness(&self) -> Option<f64> {
        self.generations
            .iter()
            .map(|g| g.best)
            .reduce(f64::max)
    }

    /// Relative mean improvement between the latest generation and the
    /// one `window` generations earlier.
    ///
    /// `None` while fewer than `window + 1` generations are recorded.
    pub fn windowed_improvement(&self, window: usize) -> Option<f64> {
        let n = self.generations.len();
        if window == 0 || n <= window {
            return None;
        }
        improvement_ratio(self.generations[n - 1 - window].mean, self.generations[n - 1].mean)
    }

    pub fn iter(&self) -> impl Iterator<Item = &GenerationStats> {
        self.generations.iter()
    }
}
