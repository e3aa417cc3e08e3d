//! Course timetabling by genetic algorithm.
//!
//! Assigns every activity of a catalog a room, a time slot, and a
//! facilitator, maximizing a rule-table fitness score.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Activity`, `Room`, `Facilitator`,
//!   `TimeSlot`, `Catalog`, `Assignment`, `Schedule`
//! - **`validation`**: Catalog integrity checks (duplicate IDs, dangling references)
//! - **`fitness`**: Rule table, evaluator, and itemized reports
//! - **`ga`**: Population, selection, operators, adaptive mutation, and the run loop
//! - **`export`**: Flat rows for CSV output
//!
//! # Example
//!
//! ```
//! use u_timetable::ga::{self, GaConfig};
//! use u_timetable::models::Catalog;
//!
//! let catalog = Catalog::sla();
//! let config = GaConfig::default()
//!     .with_population_size(30)
//!     .with_generations(3, 3)
//!     .with_seed(1);
//! let result = ga::run(&catalog, config).unwrap();
//! assert_eq!(result.history.len(), 4);
//! ```
//!
//! # References
//!
//! - Schaerf (1999), "A Survey of Automated Timetabling"
//! - Goldberg (1989), "Genetic Algorithms in Search, Optimization and Machine Learning"

pub mod error;
pub mod export;
pub mod fitness;
pub mod ga;
pub mod models;
pub mod validation;

pub use error::{ConfigError, Error, Result};
