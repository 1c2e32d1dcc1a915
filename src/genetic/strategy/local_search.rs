use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use super::{check_positive, PopulationScheduler};
use crate::genetic::backend::Evaluator;
use crate::genetic::chromosome::{sort_by_fitness, Individual};
use crate::genetic::context::ScheduleContext;
use crate::genetic::error::OptimizerError;
use crate::genetic::operators::mutate_order;

#[derive(Debug, Clone, PartialEq)]
pub struct LocalSearchConfig {
    /// How many of the fittest individuals are improved.
    pub candidates: usize,
    /// Neighbours evaluated per step.
    pub neighbours: usize,
    /// Steps per candidate; a step without improvement ends the climb.
    pub steps: usize,
    pub seed: u64,
}

impl Default for LocalSearchConfig {
    fn default() -> Self {
        Self {
            candidates: 2,
            neighbours: 8,
            steps: 5,
            seed: 7,
        }
    }
}

impl LocalSearchConfig {
    pub fn validate(&self) -> Result<(), OptimizerError> {
        check_positive("candidates", self.candidates)?;
        check_positive("neighbours", self.neighbours)
    }
}

/// Hill climbing on the fittest individuals.
///
/// A neighbour differs by one order mutation or by the reassignment of one
/// head. Improved individuals replace their originals in place.
#[derive(Debug)]
pub struct LocalSearch {
    config: LocalSearchConfig,
    rng: StdRng,
}

impl LocalSearch {
    pub fn new(config: LocalSearchConfig) -> Result<Self, OptimizerError> {
        config.validate()?;
        let rng = StdRng::seed_from_u64(config.seed);
        Ok(Self { config, rng })
    }

    fn climb(
        &mut self,
        mut current: Individual,
        ctx: &ScheduleContext,
        evaluator: &Evaluator,
    ) -> Individual {
        let heads = ctx.head_count();
        for _ in 0..self.config.steps {
            let neighbours = (0..self.config.neighbours)
                .map(|_| {
                    let mut c = current.chromosome.clone();
                    if heads > 0 && self.rng.gen_bool(0.5) {
                        let head = self.rng.gen_range(0..heads);
                        c.reassign(ctx, head, &mut self.rng);
                    } else {
                        mutate_order(&mut c, &mut self.rng);
                    }
                    c
                })
                .collect();
            let mut scored = evaluator.evaluate(neighbours);
            sort_by_fitness(&mut scored);
            match scored.into_iter().next() {
                Some(best) if best.fitness < current.fitness => current = best,
                _ => break,
            }
        }
        current
    }
}

impl PopulationScheduler for LocalSearch {
    fn name(&self) -> &str {
        "local_search"
    }

    fn schedule(
        &mut self,
        population: Vec<Individual>,
        ctx: &ScheduleContext,
        evaluator: &Evaluator,
    ) -> Result<Vec<Individual>, OptimizerError> {
        if population.is_empty() {
            return Err(OptimizerError::EmptyPopulation);
        }
        let mut population = population;
        sort_by_fitness(&mut population);
        let count = self.config.candidates.min(population.len());
        for i in 0..count {
            let before = population[i].fitness.primary();
            population[i] = self.climb(population[i].clone(), ctx, evaluator);
            debug!(
                candidate = i,
                before,
                after = population[i].fitness.primary(),
                "Local search"
            );
        }
        sort_by_fitness(&mut population);
        Ok(population)
    }
}
