//! Population improvement strategies.
//!
//! A strategy takes a population and returns a new one. The hybrid
//! scheduler seeds with one strategy and then cycles through the others.

use std::fmt::Debug;

use super::backend::Evaluator;
use super::chromosome::Individual;
use super::context::ScheduleContext;
use super::error::OptimizerError;

mod evolution;
mod local_search;
mod random;

pub use evolution::{GeneticConfig, GeneticStrategy};
pub use local_search::{LocalSearch, LocalSearchConfig};
pub use random::RandomPopulation;

pub trait PopulationScheduler: Debug {
    fn name(&self) -> &str;

    /// Produces the next population. A starting strategy receives an empty
    /// one.
    fn schedule(
        &mut self,
        population: Vec<Individual>,
        ctx: &ScheduleContext,
        evaluator: &Evaluator,
    ) -> Result<Vec<Individual>, OptimizerError>;
}

fn check_rate(name: &str, rate: f64) -> Result<(), OptimizerError> {
    if (0.0..=1.0).contains(&rate) {
        Ok(())
    } else {
        Err(OptimizerError::InvalidConfig(format!(
            "{name} must lie in [0, 1], got {rate}"
        )))
    }
}

fn check_positive(name: &str, value: usize) -> Result<(), OptimizerError> {
    if value > 0 {
        Ok(())
    } else {
        Err(OptimizerError::InvalidConfig(format!("{name} must be positive")))
    }
}
