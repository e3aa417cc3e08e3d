//! GA run configuration.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Smallest population a run accepts.
pub const MIN_POPULATION_SIZE: usize = 10;

/// Crossover strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrossoverMethod {
    /// One cut point; children swap tails.
    #[default]
    SinglePoint,
    /// Per-gene coin flip; children are complementary.
    Uniform,
}

/// Feedback rule for the mutation rate.
///
/// Each generation the relative mean-fitness improvement over the last
/// `window` generations is compared against two thresholds:
/// - above `strong_improvement`: rate × `decrease_factor`
/// - below `stall_improvement`: rate × `increase_factor`
///
/// The result is clamped to `[min_rate, max_rate]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdaptiveMutation {
    /// Whether the rate adapts at all.
    pub enabled: bool,
    pub min_rate: f64,
    pub max_rate: f64,
    /// Generations looked back when measuring improvement.
    pub window: usize,
    /// Relative improvement counted as strong progress.
    pub strong_improvement: f64,
    /// Relative improvement at or below which the search has stalled.
    pub stall_improvement: f64,
    pub decrease_factor: f64,
    pub increase_factor: f64,
}

/// Configuration for a GA run.
///
/// # Examples
///
/// ```
/// use u_timetable::ga::{CrossoverMethod, GaConfig};
///
/// let config = GaConfig::default()
///     .with_population_size(300)
///     .with_generations(50, 200)
///     .with_crossover(CrossoverMethod::Uniform)
///     .with_seed(7);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GaConfig {
    /// Schedules per generation.
    pub population_size: usize,
    /// Generations that always run before convergence may stop the run.
    pub min_generations: usize,
    /// Hard ceiling on generations.
    pub max_generations: usize,
    /// Initial per-gene mutation probability, in (0, 1].
    pub mutation_rate: f64,
    /// Mutation rate feedback.
    pub adaptive: AdaptiveMutation,
    pub crossover: CrossoverMethod,
    /// Best schedules carried unchanged into the next generation.
    pub elite_count: usize,
    /// Softmax temperature; larger values flatten selection pressure.
    pub temperature: f64,
    /// Relative mean-fitness improvement below which the run has converged.
    pub improvement_threshold: f64,
    /// Whether to evaluate and reproduce in parallel using rayon.
    pub parallel: bool,
    /// Random seed for reproducibility.
    pub seed: Option<u64>,
}

impl Default for AdaptiveMutation {
    fn default() -> Self {
        Self {
            enabled: true,
            min_rate: 0.001,
            max_rate: 0.2,
            window: 10,
            strong_improvement: 0.01,
            stall_improvement: 0.001,
            decrease_factor: 0.8,
            increase_factor: 1.25,
        }
    }
}

impl AdaptiveMutation {
    /// A fixed mutation rate.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    pub fn with_bounds(mut self, min_rate: f64, max_rate: f64) -> Self {
        self.min_rate = min_rate;
        self.max_rate = max_rate;
        self
    }

    pub fn with_window(mut self, window: usize) -> Self {
        self.window = window;
        self
    }
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population_size: 250,
            min_generations: 100,
            max_generations: 500,
            mutation_rate: 0.01,
            adaptive: AdaptiveMutation::default(),
            crossover: CrossoverMethod::SinglePoint,
            elite_count: 1,
            temperature: 1.0,
            improvement_threshold: 0.01,
            parallel: true,
            seed: None,
        }
    }
}

impl GaConfig {
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the minimum and maximum generation counts.
    pub fn with_generations(mut self, min: usize, max: usize) -> Self {
        self.min_generations = min;
        self.max_generations = max;
        self
    }

    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate;
        self
    }

    pub fn with_adaptive(mut self, adaptive: AdaptiveMutation) -> Self {
        self.adaptive = adaptive;
        self
    }

    pub fn with_crossover(mut self, method: CrossoverMethod) -> Self {
        self.crossover = method;
        self
    }

    pub fn with_elite_count(mut self, n: usize) -> Self {
        self.elite_count = n;
        self
    }

    pub fn with_temperature(mut self, t: f64) -> Self {
        self.temperature = t;
        self
    }

    pub fn with_improvement_threshold(mut self, threshold: f64) -> Self {
        self.improvement_threshold = threshold;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration. Nothing is clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.population_size < MIN_POPULATION_SIZE {
            return Err(ConfigError::PopulationTooSmall {
                size: self.population_size,
                min: MIN_POPULATION_SIZE,
            });
        }
        if self.elite_count > self.population_size {
            return Err(ConfigError::TooManyElites {
                elite: self.elite_count,
                population: self.population_size,
            });
        }
        if self.max_generations == 0 {
            return Err(ConfigError::ZeroMaxGenerations);
        }
        if self.min_generations > self.max_generations {
            return Err(ConfigError::GenerationBounds {
                min: self.min_generations,
                max: self.max_generations,
            });
        }
        if !(self.mutation_rate > 0.0 && self.mutation_rate <= 1.0) {
            return Err(ConfigError::MutationRate(self.mutation_rate));
        }
        if self.adaptive.enabled {
            let a = &self.adaptive;
            let ordered = a.min_rate > 0.0 && a.min_rate <= a.max_rate && a.max_rate <= 1.0;
            if !ordered || self.mutation_rate < a.min_rate || self.mutation_rate > a.max_rate {
                return Err(ConfigError::MutationBounds {
                    min: a.min_rate,
                    max: a.max_rate,
                    rate: self.mutation_rate,
                });
            }
            if a.window == 0 {
                return Err(ConfigError::ZeroAdaptiveWindow);
            }
        }
        if !(self.temperature.is_finite() && self.temperature > 0.0) {
            return Err(ConfigError::Temperature(self.temperature));
        }
        if !(self.improvement_threshold.is_finite() && self.improvement_threshold >= 0.0) {
            return Err(ConfigError::ImprovementThreshold(self.improvement_threshold));
        }
        Ok(())
    }
}
