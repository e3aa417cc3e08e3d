//! GA-based timetable optimization.
//!
//! # Encoding
//!
//! A chromosome is a [`Schedule`](crate::models::Schedule): gene `i` holds
//! the room, time slot, and facilitator of activity `i`. Every operator
//! preserves the one-gene-per-activity invariant.
//!
//! # Submodules
//!
//! - [`config`]: run options and their validation
//! - [`population`]: random schedules and population statistics
//! - [`selection`]: softmax parent selection and elites
//! - [`operators`]: crossover and mutation
//! - [`history`]: per-generation statistics
//! - [`engine`]: the generational loop
//!
//! # Reference
//! - Goldberg (1989), "Genetic Algorithms in Search, Optimization and
//!   Machine Learning"
//! - Burke & Petrovic (2002), "Recent research directions in automated
//!   timetabling"

mod adaptive;
pub mod config;
pub mod engine;
pub mod history;
pub mod operators;
pub mod population;
pub mod selection;

pub use config::{AdaptiveMutation, CrossoverMethod, GaConfig, MIN_POPULATION_SIZE};
pub use engine::{run, EnginePhase, GaResult, GaRunner, StopReason};
pub use history::{improvement_ratio, GenerationStats, RunHistory};
pub use operators::{mutate, single_point_crossover, uniform_crossover, GeneticOperators};
pub use population::{
    create_initial_population, random_assignment, random_schedule, Population, PopulationStats,
};
pub use selection::{select_elites, select_parent_pairs, softmax_probabilities};
