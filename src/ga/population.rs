//! Population creation and statistics.
//!
//! Initial schedules assign every activity a uniformly random room, time
//! slot, and facilitator. Constraints are only scored, never enforced.

use std::sync::Arc;

use rand::Rng;

use super::config::MIN_POPULATION_SIZE;
use crate::error::{ConfigError, Result};
use crate::models::{Assignment, Catalog, Schedule};

/// An ordered generation of schedules.
///
/// Members are shared so that elites can move into the next generation
/// together with their cached fitness.
#[derive(Debug, Clone, Default)]
pub struct Population {
    members: Vec<Arc<Schedule>>,
}

/// Fitness summary of an evaluated population.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PopulationStats {
    pub best: f64,
    pub mean: f64,
    pub worst: f64,
}

impl Population {
    pub fn new(members: Vec<Arc<Schedule>>) -> Self {
        Self { members }
    }

    pub fn members(&self) -> &[Arc<Schedule>] {
        &self.members
    }

    pub fn get(&self, idx: usize) -> Option<&Arc<Schedule>> {
        self.members.get(idx)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Schedule>> {
        self.members.iter()
    }

    pub fn into_members(self) -> Vec<Arc<Schedule>> {
        self.members
    }
}

impl PopulationStats {
    /// Summarizes fitness values. `None` for an empty slice.
    pub fn from_fitness(fitness: &[f64]) -> Option<Self> {
        if fitness.is_empty() {
            return None;
        }
        let (mut best, mut worst, mut sum) = (f64::NEG_INFINITY, f64::INFINITY, 0.0);
        for &f in fitness {
            best = best.max(f);
            worst = worst.min(f);
            sum += f;
        }
        Some(Self {
            best,
            mean: sum / fitness.len() as f64,
            worst,
        })
    }
}

/// A uniformly random room, slot, and facilitator for `activity`.
pub fn random_assignment<R: Rng>(catalog: &Catalog, activity: usize, rng: &mut R) -> Assignment {
    Assignment::new(
        activity,
        rng.random_range(0..catalog.rooms().len()),
        rng.random_range(0..catalog.time_slots().len()),
        rng.random_range(0..catalog.facilitators().len()),
    )
}

/// A schedule with every activity randomly placed.
pub fn random_schedule<R: Rng>(catalog: &Catalog, rng: &mut R) -> Result<Schedule> {
    let genes = (0..catalog.activity_count())
        .map(|a| random_assignment(catalog, a, rng))
        .collect();
    Schedule::new(catalog, genes)
}

/// Creates `size` independent random schedules.
///
/// # Errors
/// [`ConfigError::PopulationTooSmall`] if `size < MIN_POPULATION_SIZE`.
pub fn create_initial_population<R: Rng>(
    catalog: &Catalog,
    size: usize,
    rng: &mut R,
) -> Result<Population> {
    if size < MIN_POPULATION_SIZE {
        return Err(ConfigError::PopulationTooSmall {
            size,
            min: MIN_POPULATION_SIZE,
        }
        .into());
    }
    let members = (0..size)
        .map(|_| random_schedule(catalog, rng).map(Arc::new))
        .collect::<Result<Vec<_>>>()?;
    Ok(Population::new(members))
}
