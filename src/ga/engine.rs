//! Generational GA loop.
//!
//! # Algorithm
//!
//! 1. **Initializing**: random population, evaluate, record generation 0.
//! 2. **Evolving**, once per generation:
//!    elites → softmax parent pairs → crossover + mutation → evaluate →
//!    record statistics → adapt mutation rate → check termination.
//! 3. **Terminated**: return the best schedule seen in any generation.
//!
//! Termination fires at `max_generations`, or once `min_generations`
//! have run and the mean fitness improved by less than
//! `improvement_threshold` over the previous generation.
//!
//! Offspring pairs are produced from seeds drawn sequentially from the
//! run's generator, so a seeded run gives the same result with or without
//! parallelism.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::{debug, info, warn};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::config::GaConfig;
use super::history::{improvement_ratio, GenerationStats, RunHistory};
use super::operators::GeneticOperators;
use super::population::{create_initial_population, Population, PopulationStats};
use super::selection::{select_elites, select_parent_pairs, softmax_probabilities};
use crate::error::{Error, Result};
use crate::fitness::{FitnessEvaluator, FitnessReport, FitnessRules, RuleKind};
use crate::models::{Catalog, Schedule};

/// Engine state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnginePhase {
    Initializing,
    Evolving,
    Terminated,
}

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StopReason {
    /// Mean improvement fell below the threshold after the minimum generations.
    Converged,
    /// The generation ceiling was reached.
    MaxGenerations,
    /// The cancel handle was set between generations.
    Cancelled,
}

/// Outcome of a run.
#[derive(Debug, Clone)]
pub struct GaResult {
    /// Best schedule seen in any generation.
    pub best: Arc<Schedule>,
    /// Fitness report of `best`.
    pub best_report: FitnessReport,
    /// Statistics for generation 0 through the last one run.
    pub history: RunHistory,
    /// Generations evolved after the initial population.
    pub generations: usize,
    /// Mutation rate the next generation would have used.
    pub final_mutation_rate: f64,
    pub stop_reason: StopReason,
    /// Seed the run used; pass it back in to reproduce the run.
    pub seed: u64,
}

impl GaResult {
    pub fn best_fitness(&self) -> f64 {
        self.best_report.total
    }

    /// Penalty counts of the best schedule, by rule.
    pub fn violations(&self) -> std::collections::BTreeMap<RuleKind, usize> {
        self.best_report.violations()
    }
}

/// Runs the GA over one catalog.
///
/// # Example
///
/// ```
/// use u_timetable::ga::{GaConfig, GaRunner};
/// use u_timetable::models::Catalog;
///
/// let catalog = Catalog::sla();
/// let config = GaConfig::default()
///     .with_population_size(20)
///     .with_generations(2, 2)
///     .with_seed(42);
/// let mut runner = GaRunner::new(&catalog, config).unwrap();
/// let result = runner.run().unwrap();
/// assert_eq!(result.generations, 2);
/// assert_eq!(result.best.len(), catalog.activity_count());
/// ```
#[derive(Debug)]
pub struct GaRunner<'a> {
    catalog: &'a Catalog,
    evaluator: FitnessEvaluator<'a>,
    config: GaConfig,
    operators: GeneticOperators,
    phase: EnginePhase,
    cancelled: Arc<AtomicBool>,
}

impl<'a> GaRunner<'a> {
    /// Creates a runner with the default rule table.
    ///
    /// # Errors
    /// [`Error::Config`](crate::Error::Config) if `config` is invalid.
    pub fn new(catalog: &'a Catalog, config: GaConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            catalog,
            evaluator: FitnessEvaluator::new(catalog, FitnessRules::default()),
            operators: GeneticOperators::new(config.crossover),
            config,
            phase: EnginePhase::Initializing,
            cancelled: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Replaces the rule table.
    pub fn with_rules(mut self, rules: FitnessRules) -> Self {
        self.evaluator = FitnessEvaluator::new(self.catalog, rules);
        self
    }

    pub fn config(&self) -> &GaConfig {
        &self.config
    }

    pub fn phase(&self) -> EnginePhase {
        self.phase
    }

    /// Setting the flag stops the run before its next generation.
    pub fn cancel_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancelled)
    }

    /// Runs to termination.
    pub fn run(&mut self) -> Result<GaResult> {
        self.run_with_callback(|_| {})
    }

    /// Runs to termination, calling `on_generation` after every recorded
    /// generation, including generation 0.
    pub fn run_with_callback<F>(&mut self, mut on_generation: F) -> Result<GaResult>
    where
        F: FnMut(&GenerationStats),
    {
        let config = &self.config;
        let seed = config.seed.unwrap_or_else(rand::random);
        let mut rng = SmallRng::seed_from_u64(seed);
        info!(
            "GA run: seed={seed}, population={}, generations={}..={}, crossover={:?}, elites={}",
            config.population_size,
            config.min_generations,
            config.max_generations,
            config.crossover,
            config.elite_count
        );

        self.phase = EnginePhase::Initializing;
        let mut population =
            create_initial_population(self.catalog, config.population_size, &mut rng)?;
        let mut fitness = self.evaluator.score_all(population.members(), config.parallel)?;

        let mut rate = config.mutation_rate;
        let mut history = RunHistory::new();
        let stats = summarize(&fitness)?;
        let initial = GenerationStats {
            generation: 0,
            best: stats.best,
            mean: stats.mean,
            worst: stats.worst,
            improvement: None,
            mutation_rate: rate,
        };
        debug!("generation 0: best={:.3}, mean={:.3}", initial.best, initial.mean);
        on_generation(&initial);
        history.push(initial);

        let (mut best, mut best_fitness) = fittest(&population, &fitness)?;
        let mut generation = 0;
        self.phase = EnginePhase::Evolving;

        let stop_reason = loop {
            if self.cancelled.load(Ordering::Relaxed) {
                warn!("GA run cancelled after {generation} generation(s)");
                break StopReason::Cancelled;
            }

            generation += 1;
            population = self.next_generation(&population, &fitness, rate, &mut rng)?;
            fitness = self.evaluator.score_all(population.members(), config.parallel)?;

            let stats = summarize(&fitness)?;
            let previous_mean = history.last().map_or(stats.mean, |g| g.mean);
            let current = GenerationStats {
                generation,
                best: stats.best,
                mean: stats.mean,
                worst: stats.worst,
                improvement: improvement_ratio(previous_mean, stats.mean),
                mutation_rate: rate,
            };
            debug!(
                "generation {generation}: best={:.3}, mean={:.3}, worst={:.3}, improvement={:?}, rate={:.4}",
                current.best, current.mean, current.worst, current.improvement, rate
            );

            if current.best > best_fitness {
                (best, best_fitness) = fittest(&population, &fitness)?;
            }
            let improvement = current.improvement;
            on_generation(&current);
            history.push(current);

            let next_rate = config.adaptive.next_rate(rate, &history);
            if next_rate != rate {
                debug!("mutation rate {rate:.4} -> {next_rate:.4}");
                rate = next_rate;
            }

            if generation >= config.max_generations {
                break StopReason::MaxGenerations;
            }
            if generation >= config.min_generations
                && improvement.is_some_and(|r| r < config.improvement_threshold)
            {
                break StopReason::Converged;
            }
        };

        self.phase = EnginePhase::Terminated;
        let best_report = match best.report() {
            Some(report) => report.clone(),
            None => self.evaluator.evaluate(&best)?,
        };
        info!(
            "GA run finished: {stop_reason:?} after {generation} generation(s), best fitness {:.3}",
            best_report.total
        );

        Ok(GaResult {
            best,
            best_report,
            history,
            generations: generation,
            final_mutation_rate: rate,
            stop_reason,
            seed,
        })
    }

    /// Elites first, then mutated offspring of softmax-selected parents,
    /// trimmed to the population size.
    fn next_generation(
        &self,
        population: &Population,
        fitness: &[f64],
        rate: f64,
        rng: &mut SmallRng,
    ) -> Result<Population> {
        let size = self.config.population_size;
        let members = population.members();

        let elites = select_elites(fitness, self.config.elite_count);
        let pair_count = (size - elites.len()).div_ceil(2);
        let probabilities = softmax_probabilities(fitness, self.config.temperature);
        let pairs = select_parent_pairs(&probabilities, pair_count, rng)?;
        let jobs: Vec<((usize, usize), u64)> =
            pairs.into_iter().map(|pair| (pair, rng.random())).collect();

        let produce = |&((i, j), seed): &((usize, usize), u64)| {
            let mut pair_rng = SmallRng::seed_from_u64(seed);
            self.operators
                .reproduce(self.catalog, &members[i], &members[j], rate, &mut pair_rng)
        };
        let offspring = if self.config.parallel {
            jobs.par_iter().map(produce).collect::<Result<Vec<_>>>()?
        } else {
            jobs.iter().map(produce).collect::<Result<Vec<_>>>()?
        };

        let mut next: Vec<Arc<Schedule>> = Vec::with_capacity(size + 1);
        next.extend(elites.iter().map(|&i| Arc::clone(&members[i])));
        for (a, b) in offspring {
            next.push(Arc::new(a));
            next.push(Arc::new(b));
        }
        next.truncate(size);
        Ok(Population::new(next))
    }
}

/// Runs the GA with the default rule table.
pub fn run(catalog: &Catalog, config: GaConfig) -> Result<GaResult> {
    GaRunner::new(catalog, config)?.run()
}

fn summarize(fitness: &[f64]) -> Result<PopulationStats> {
    PopulationStats::from_fitness(fitness).ok_or(Error::EmptyPopulation)
}

/// Fittest member, earliest on ties.
fn fittest(population: &Population, fitness: &[f64]) -> Result<(Arc<Schedule>, f64)> {
    select_elites(fitness, 1)
        .first()
        .and_then(|&i| population.get(i).map(|s| (Arc::clone(s), fitness[i])))
        .ok_or(Error::EmptyPopulation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;
    use crate::ga::config::{AdaptiveMutation, CrossoverMethod};
    use proptest::prelude::*;

    fn small_config() -> GaConfig {
        GaConfig::default()
            .with_population_size(50)
            .with_generations(5, 5)
            .with_seed(42)
    }

    #[test]
    fn test_empty_population_is_internal_error() {
        assert!(matches!(summarize(&[]), Err(Error::EmptyPopulation)));
        assert!(matches!(
            fittest(&Population::new(Vec::new()), &[]),
            Err(Error::EmptyPopulation)
        ));
    }

    #[test]
    fn test_runs_exactly_max_generations() {
        let catalog = Catalog::sla();
        let mut runner = GaRunner::new(&catalog, small_config()).unwrap();
        assert_eq!(runner.phase(), EnginePhase::Initializing);

        let result = runner.run().unwrap();
        assert_eq!(runner.phase(), EnginePhase::Terminated);
        assert_eq!(result.generations, 5);
        assert_eq!(result.stop_reason, StopReason::MaxGenerations);
        assert_eq!(result.history.len(), 6);
        assert_eq!(result.seed, 42);
        assert_eq!(result.best.len(), catalog.activity_count());

        let evaluator = FitnessEvaluator::new(&catalog, FitnessRules::default());
        assert_eq!(evaluator.evaluate(&result.best).unwrap(), result.best_report);
        assert_eq!(result.best.fitness(), Some(result.best_fitness()));
    }

    #[test]
    fn test_best_is_running_best() {
        let catalog = Catalog::sla();
        let config = small_config().with_elite_count(0).with_generations(8, 8);
        let result = run(&catalog, config).unwrap();
        let best_seen = result.history.best_fitness().unwrap();
        assert_eq!(result.best_fitness(), best_seen);
        assert!(result.history.iter().all(|g| g.best <= result.best_fitness()));
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let catalog = Catalog::sla();
        for method in [CrossoverMethod::SinglePoint, CrossoverMethod::Uniform] {
            let config = small_config().with_crossover(method);
            let par = run(&catalog, config.clone().with_parallel(true)).unwrap();
            let seq = run(&catalog, config.with_parallel(false)).unwrap();
            assert_eq!(par.history, seq.history);
            assert_eq!(par.best.assignments(), seq.best.assignments());
        }
    }

    #[test]
    fn test_reported_seed_reproduces_run() {
        let catalog = Catalog::sla();
        let mut config = small_config();
        config.seed = None;
        let first = run(&catalog, config.clone()).unwrap();
        let again = run(&catalog, config.with_seed(first.seed)).unwrap();
        assert_eq!(first.history, again.history);
    }

    #[test]
    fn test_elites_carried_unmodified() {
        let catalog = Catalog::sla();
        let config = small_config().with_population_size(20).with_elite_count(3);
        let runner = GaRunner::new(&catalog, config).unwrap();
        let mut rng = SmallRng::seed_from_u64(42);

        let mut population = create_initial_population(&catalog, 20, &mut rng).unwrap();
        let mut fitness = runner.evaluator.score_all(population.members(), false).unwrap();
        for _ in 0..5 {
            let elites = select_elites(&fitness, 3);
            let next = runner.next_generation(&population, &fitness, 0.2, &mut rng).unwrap();
            assert_eq!(next.len(), 20);
            for &e in &elites {
                let elite = &population.members()[e];
                let carried = next
                    .iter()
                    .find(|s| Arc::ptr_eq(s, elite))
                    .expect("elite missing from next generation");
                assert_eq!(carried.report(), elite.report());
                assert_eq!(carried.assignments(), elite.assignments());
            }
            population = next;
            fitness = runner.evaluator.score_all(population.members(), false).unwrap();
        }
    }

    #[test]
    fn test_elitism_keeps_best_monotone() {
        let catalog = Catalog::sla();
        let result = run(&catalog, small_config().with_generations(10, 10)).unwrap();
        let bests: Vec<f64> = result.history.iter().map(|g| g.best).collect();
        assert!(bests.windows(2).all(|w| w[1] >= w[0]));
    }

    #[test]
    fn test_odd_offspring_count_is_trimmed() {
        let catalog = Catalog::sla();
        let config = small_config().with_population_size(11).with_elite_count(2);
        let runner = GaRunner::new(&catalog, config).unwrap();
        let mut rng = SmallRng::seed_from_u64(1);
        let population = create_initial_population(&catalog, 11, &mut rng).unwrap();
        let fitness = runner.evaluator.score_all(population.members(), false).unwrap();
        let next = runner.next_generation(&population, &fitness, 0.05, &mut rng).unwrap();
        assert_eq!(next.len(), 11);

        let all_elite = GaRunner::new(
            &catalog,
            small_config().with_population_size(11).with_elite_count(11),
        )
        .unwrap();
        let next = all_elite.next_generation(&population, &fitness, 0.05, &mut rng).unwrap();
        assert_eq!(next.len(), 11);
        assert!(next
            .iter()
            .all(|s| population.iter().any(|p| Arc::ptr_eq(s, p))));
    }

    #[test]
    fn test_converges_after_min_generations() {
        let catalog = Catalog::sla();
        let config = small_config()
            .with_generations(2, 50)
            .with_improvement_threshold(f64::MAX);
        let result = run(&catalog, config).unwrap();
        assert_eq!(result.stop_reason, StopReason::Converged);
        assert_eq!(result.generations, 2);
    }

    #[test]
    fn test_cancel_returns_best_so_far() {
        let catalog = Catalog::sla();
        let mut runner =
            GaRunner::new(&catalog, small_config().with_generations(5, 100)).unwrap();
        let cancel = runner.cancel_handle();
        cancel.store(true, Ordering::Relaxed);

        let result = runner.run().unwrap();
        assert_eq!(result.stop_reason, StopReason::Cancelled);
        assert_eq!(result.generations, 0);
        assert_eq!(result.history.len(), 1);
        assert_eq!(result.best.len(), catalog.activity_count());
    }

    #[test]
    fn test_cancel_from_callback() {
        let catalog = Catalog::sla();
        let mut runner =
            GaRunner::new(&catalog, small_config().with_generations(50, 100)).unwrap();
        let cancel = runner.cancel_handle();
        let result = runner
            .run_with_callback(|stats| {
                if stats.generation == 3 {
                    cancel.store(true, Ordering::Relaxed);
                }
            })
            .unwrap();
        assert_eq!(result.stop_reason, StopReason::Cancelled);
        assert_eq!(result.generations, 3);
    }

    #[test]
    fn test_callback_sees_every_generation() {
        let catalog = Catalog::sla();
        let mut seen = Vec::new();
        let mut runner = GaRunner::new(&catalog, small_config()).unwrap();
        let result = runner
            .run_with_callback(|stats| seen.push((stats.generation, stats.mutation_rate)))
            .unwrap();
        assert_eq!(seen.len(), result.history.len());
        assert!(seen.iter().enumerate().all(|(i, &(g, _))| g == i));
    }

    #[test]
    fn test_fixed_rate_without_adaptation() {
        let catalog = Catalog::sla();
        let config = small_config()
            .with_mutation_rate(0.05)
            .with_adaptive(AdaptiveMutation::disabled());
        let result = run(&catalog, config).unwrap();
        assert!(result.history.iter().all(|g| g.mutation_rate == 0.05));
        assert_eq!(result.final_mutation_rate, 0.05);
    }

    #[test]
    fn test_invalid_config_fails_fast() {
        let catalog = Catalog::sla();
        let err = GaRunner::new(&catalog, small_config().with_generations(9, 3)).unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::GenerationBounds { min: 9, max: 3 })
        ));
        assert!(run(&catalog, small_config().with_population_size(2)).is_err());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(12))]

        #[test]
        fn prop_run_halts_within_max_generations(
            seed in any::<u64>(),
            max in 1usize..6,
            rate in 0.001f64..0.2,
            threshold in 0.0f64..0.5,
        ) {
            let catalog = Catalog::sla();
            let config = GaConfig::default()
                .with_population_size(10)
                .with_generations(0, max)
                .with_mutation_rate(rate)
                .with_improvement_threshold(threshold)
                .with_parallel(false)
                .with_seed(seed);
            let result = run(&catalog, config).unwrap();
            prop_assert!(result.generations <= max);
            prop_assert!(result.history.len() <= max + 1);
            prop_assert_eq!(result.history.len(), result.generations + 1);
        }
    }
}
