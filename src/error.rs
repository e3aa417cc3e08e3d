//! Error types.
//!
//! Configuration problems are reported as [`ConfigError`] before any
//! population exists. Everything else surfacing as [`Error`] aborts a run.

use crate::validation::ValidationError;

/// Crate-wide error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A run option was rejected before the run started.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// The catalog failed validation.
    #[error("invalid catalog: {} problem(s), first: {}", .errors.len(), first_message(.errors))]
    InvalidCatalog { errors: Vec<ValidationError> },

    /// A schedule does not cover every activity exactly once, or refers
    /// to catalog entries that do not exist.
    #[error("malformed schedule: {0}")]
    MalformedSchedule(String),

    /// A generation ended up with no members to summarize.
    #[error("population has no members")]
    EmptyPopulation,

    /// Parent sampling could not build a distribution.
    #[error("selection failed: {0}")]
    Sampling(#[from] rand::distr::weighted::Error),

    /// Writing exported rows failed.
    #[error("export failed: {0}")]
    Csv(#[from] csv::Error),
}

/// Rejected run options.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("population size {size} is below the minimum of {min}")]
    PopulationTooSmall { size: usize, min: usize },
    #[error("elite count {elite} exceeds population size {population}")]
    TooManyElites { elite: usize, population: usize },
    #[error("minimum generations ({min}) exceeds maximum generations ({max})")]
    GenerationBounds { min: usize, max: usize },
    #[error("maximum generations must be at least 1")]
    ZeroMaxGenerations,
    #[error("mutation rate {0} is outside (0, 1]")]
    MutationRate(f64),
    #[error("adaptive mutation bounds [{min}, {max}] are invalid or exclude the initial rate {rate}")]
    MutationBounds { min: f64, max: f64, rate: f64 },
    #[error("adaptive mutation window must be at least 1")]
    ZeroAdaptiveWindow,
    #[error("softmax temperature must be positive and finite, got {0}")]
    Temperature(f64),
    #[error("improvement threshold must be non-negative and finite, got {0}")]
    ImprovementThreshold(f64),
}

/// Crate result alias.
pub type Result<T> = std::result::Result<T, Error>;

fn first_message(errors: &[ValidationError]) -> &str {
    errors.first().map(|e| e.message.as_str()).unwrap_or("none")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ValidationErrorKind;

    #[test]
    fn test_config_error_wraps() {
        let err: Error = ConfigError::GenerationBounds { min: 10, max: 5 }.into();
        assert!(matches!(err, Error::Config(_)));
        assert_eq!(
            err.to_string(),
            "invalid configuration: minimum generations (10) exceeds maximum generations (5)"
        );
    }

    #[test]
    fn test_catalog_error_message() {
        let err = Error::InvalidCatalog {
            errors: vec![ValidationError {
                kind: ValidationErrorKind::DuplicateId,
                message: "Duplicate room ID: R1".into(),
            }],
        };
        assert_eq!(
            err.to_string(),
            "invalid catalog: 1 problem(s), first: Duplicate room ID: R1"
        );
    }
}
