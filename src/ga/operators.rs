//! Crossover and mutation for timetable schedules.
//!
//! Genes are positional (gene `i` is activity `i`), so any splice of two
//! parents covers every activity exactly once. Offspring are new
//! schedules; parents are never modified.
//!
//! # Usage
//!
//! ```
//! use u_timetable::ga::{CrossoverMethod, GeneticOperators};
//!
//! let ops = GeneticOperators::default();
//! assert_eq!(ops.crossover, CrossoverMethod::SinglePoint);
//! ```

use rand::Rng;

use super::config::CrossoverMethod;
use super::population::random_assignment;
use crate::error::{ConfigError, Result};
use crate::models::{Assignment, Catalog, Schedule};

/// Runtime-selectable genetic operators.
///
/// # Example
///
/// ```
/// use u_timetable::ga::{CrossoverMethod, GeneticOperators};
///
/// let ops = GeneticOperators::new(CrossoverMethod::Uniform);
/// ```
#[derive(Debug, Clone, Default)]
pub struct GeneticOperators {
    /// Crossover strategy.
    pub crossover: CrossoverMethod,
}

impl GeneticOperators {
    pub fn new(crossover: CrossoverMethod) -> Self {
        Self { crossover }
    }

    /// Performs crossover using the configured strategy.
    pub fn crossover<R: Rng>(
        &self,
        catalog: &Catalog,
        p1: &Schedule,
        p2: &Schedule,
        rng: &mut R,
    ) -> Result<(Schedule, Schedule)> {
        match self.crossover {
            CrossoverMethod::SinglePoint => single_point_crossover(catalog, p1, p2, rng),
            CrossoverMethod::Uniform => uniform_crossover(catalog, p1, p2, rng),
        }
    }

    /// Crossover followed by independent mutation of both children.
    pub fn reproduce<R: Rng>(
        &self,
        catalog: &Catalog,
        p1: &Schedule,
        p2: &Schedule,
        mutation_rate: f64,
        rng: &mut R,
    ) -> Result<(Schedule, Schedule)> {
        check_rate(mutation_rate)?;
        let (mut a, mut b) = match self.crossover {
            CrossoverMethod::SinglePoint => single_point_genes(p1, p2, rng),
            CrossoverMethod::Uniform => uniform_genes(p1, p2, rng),
        };
        mutate_genes(catalog, &mut a, mutation_rate, rng);
        mutate_genes(catalog, &mut b, mutation_rate, rng);
        Ok((Schedule::new(catalog, a)?, Schedule::new(catalog, b)?))
    }
}

/// One cut in `[1, N-1]`: the first child takes `p1` before the cut and
/// `p2` after it, the second child the reverse.
///
/// With fewer than two activities no cut exists and the children are
/// copies of the parents.
pub fn single_point_crossover<R: Rng>(
    catalog: &Catalog,
    p1: &Schedule,
    p2: &Schedule,
    rng: &mut R,
) -> Result<(Schedule, Schedule)> {
    let (a, b) = single_point_genes(p1, p2, rng);
    Ok((Schedule::new(catalog, a)?, Schedule::new(catalog, b)?))
}

/// Per-activity coin flip. The second child takes exactly the genes the
/// first one did not.
pub fn uniform_crossover<R: Rng>(
    catalog: &Catalog,
    p1: &Schedule,
    p2: &Schedule,
    rng: &mut R,
) -> Result<(Schedule, Schedule)> {
    let (a, b) = uniform_genes(p1, p2, rng);
    Ok((Schedule::new(catalog, a)?, Schedule::new(catalog, b)?))
}

/// Re-randomizes each gene with probability `rate`.
///
/// A mutated gene gets a fresh room, time slot, and facilitator together.
/// Fails with [`ConfigError::MutationRate`] unless `rate` lies in `[0, 1]`.
pub fn mutate<R: Rng>(
    catalog: &Catalog,
    schedule: &Schedule,
    rate: f64,
    rng: &mut R,
) -> Result<Schedule> {
    check_rate(rate)?;
    let mut genes = schedule.assignments().to_vec();
    mutate_genes(catalog, &mut genes, rate, rng);
    Schedule::new(catalog, genes)
}

fn check_rate(rate: f64) -> Result<()> {
    if (0.0..=1.0).contains(&rate) {
        Ok(())
    } else {
        Err(ConfigError::MutationRate(rate).into())
    }
}

fn single_point_genes<R: Rng>(
    p1: &Schedule,
    p2: &Schedule,
    rng: &mut R,
) -> (Vec<Assignment>, Vec<Assignment>) {
    let (g1, g2) = (p1.assignments(), p2.assignments());
    let n = g1.len().min(g2.len());
    if n < 2 {
        return (g1.to_vec(), g2.to_vec());
    }
    let cut = rng.random_range(1..n);

    let mut a = Vec::with_capacity(n);
    a.extend_from_slice(&g1[..cut]);
    a.extend_from_slice(&g2[cut..]);

    let mut b = Vec::with_capacity(n);
    b.extend_from_slice(&g2[..cut]);
    b.extend_from_slice(&g1[cut..]);
    (a, b)
}

fn uniform_genes<R: Rng>(
    p1: &Schedule,
    p2: &Schedule,
    rng: &mut R,
) -> (Vec<Assignment>, Vec<Assignment>) {
    p1.assignments()
        .iter()
        .zip(p2.assignments())
        .map(|(&x, &y)| if rng.random_bool(0.5) { (x, y) } else { (y, x) })
        .unzip()
}

fn mutate_genes<R: Rng>(catalog: &Catalog, genes: &mut [Assignment], rate: f64, rng: &mut R) {
    for gene in genes.iter_mut() {
        if rng.random_bool(rate) {
            *gene = random_assignment(catalog, gene.activity, rng);
        }
    }
}
