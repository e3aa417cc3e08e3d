//! Mutation rate feedback.
//!
//! The rate shrinks while the population mean improves quickly and grows
//! when it stalls, so the search exploits progress and escapes plateaus.
//!
//! # Reference
//! - Eiben, Hinterding & Michalewicz (1999), "Parameter control in
//!   evolutionary algorithms"

use super::config::AdaptiveMutation;
use super::history::RunHistory;

impl AdaptiveMutation {
    /// Mutation rate for the next generation.
    ///
    /// Reads only `history`; with adaptation disabled, or before `window + 1`
    /// generations exist, `current` is returned unchanged. A zero previous
    /// mean with a nonzero current mean counts as strong progress.
    pub fn next_rate(&self, current: f64, history: &RunHistory) -> f64 {
        if !self.enabled || history.len() <= self.window {
            return current;
        }

        let next = match history.windowed_improvement(self.window) {
            Some(ratio) if ratio <= self.stall_improvement => current * self.increase_factor,
            Some(ratio) if ratio > self.strong_improvement => current * self.decrease_factor,
            Some(_) => current,
            None => current * self.decrease_factor,
        };
        next.clamp(self.min_rate, self.max_rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ga::history::GenerationStats;

    fn history(means: &[f64]) -> RunHistory {
        let mut h = RunHistory::new();
        for (generation, &mean) in means.iter().enumerate() {
            h.push(GenerationStats {
                generation,
                best: mean,
                mean,
                worst: mean,
                improvement: None,
                mutation_rate: 0.01,
            });
        }
        h
    }

    fn adaptive() -> AdaptiveMutation {
        AdaptiveMutation::default().with_window(2)
    }

    #[test]
    fn test_short_history_keeps_rate() {
        let h = history(&[1.0, 2.0]);
        assert_eq!(adaptive().next_rate(0.05, &h), 0.05);
    }

    #[test]
    fn test_disabled_keeps_rate() {
        let h = history(&[1.0, 1.0, 1.0, 1.0]);
        assert_eq!(AdaptiveMutation::disabled().next_rate(0.05, &h), 0.05);
    }

    #[test]
    fn test_stall_increases_rate() {
        let a = adaptive();
        let h = history(&[2.0, 2.0, 2.0]);
        let next = a.next_rate(0.05, &h);
        assert!((next - 0.05 * a.increase_factor).abs() < 1e-12);
    }

    #[test]
    fn test_strong_progress_decreases_rate() {
        let a = adaptive();
        let h = history(&[1.0, 1.5, 2.0]);
        let next = a.next_rate(0.05, &h);
        assert!((next - 0.05 * a.decrease_factor).abs() < 1e-12);
    }

    #[test]
    fn test_moderate_progress_keeps_rate() {
        let h = history(&[100.0, 100.2, 100.5]);
        assert_eq!(adaptive().next_rate(0.05, &h), 0.05);
    }

    #[test]
    fn test_rate_is_clamped() {
        let a = adaptive().with_bounds(0.01, 0.1);
        let stalled = history(&[1.0, 1.0, 1.0]);
        assert_eq!(a.next_rate(0.1, &stalled), 0.1);

        let improving = history(&[1.0, 2.0, 4.0]);
        assert_eq!(a.next_rate(0.01, &improving), 0.01);
    }

    #[test]
    fn test_zero_previous_mean_is_progress() {
        let a = adaptive();
        let h = history(&[0.0, 0.5, 1.0]);
        let next = a.next_rate(0.05, &h);
        assert!(next < 0.05);
    }

    #[test]
    fn test_decline_counts_as_stall() {
        let a = adaptive();
        let h = history(&[2.0, 1.5, 1.0]);
        assert!(a.next_rate(0.05, &h) > 0.05);
    }
}
