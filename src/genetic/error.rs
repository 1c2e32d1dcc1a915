use thiserror::Error;

use crate::graph::GraphError;
use crate::timeline::TimelineError;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum OptimizerError {
    #[error("Parallel backend needs at least one worker, got {0}")]
    InvalidParallelism(usize),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Illegal state: {0}")]
    IllegalState(String),

    #[error("Strategy produced an empty population")]
    EmptyPopulation,

    #[error("Chromosome does not fit the scheduling context: {0}")]
    MalformedChromosome(String),

    #[error("Failed to start thread pool: {0}")]
    ThreadPool(String),

    #[error(transparent)]
    Timeline(#[from] TimelineError),

    #[error(transparent)]
    Graph(#[from] GraphError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        assert_eq!(
            OptimizerError::InvalidParallelism(0).to_string(),
            "Parallel backend needs at least one worker, got 0"
        );
        assert_eq!(
            OptimizerError::InvalidConfig("population_size must be positive".into()).to_string(),
            "Invalid configuration: population_size must be positive"
        );
        assert_eq!(
            OptimizerError::EmptyPopulation.to_string(),
            "Strategy produced an empty population"
        );
    }

    #[test]
    fn wraps_timeline_errors_transparently() {
        let inner = TimelineError::UnknownContractor("ghost".into());
        let err: OptimizerError = inner.clone().into();
        assert_eq!(err.to_string(), inner.to_string());
    }
}
