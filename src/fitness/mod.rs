//! Schedule fitness.
//!
//! A schedule's fitness is the signed sum of independent rule terms:
//! room fit, room conflicts, facilitator preference, facilitator time
//! conflicts, facilitator load, section spacing, and cross-section
//! interaction. Higher is better.
//!
//! # Submodules
//!
//! - [`FitnessRules`]: the configurable rule table
//! - [`FitnessEvaluator`]: pure schedule → report function
//! - [`FitnessReport`]: itemized terms and their total

mod evaluator;
mod report;
mod rules;

pub use evaluator::FitnessEvaluator;
pub use report::{FitnessReport, FitnessTerm, RuleCategory, RuleKind};
pub use rules::FitnessRules;
