use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use super::{check_positive, check_rate, PopulationScheduler};
use crate::genetic::backend::Evaluator;
use crate::genetic::chromosome::{sort_by_fitness, Individual};
use crate::genetic::context::ScheduleContext;
use crate::genetic::error::OptimizerError;
use crate::genetic::operators::{mutate_order, pox_crossover, resource_mutation, tournament};

/// Parameters of [`GeneticStrategy`].
#[derive(Debug, Clone, PartialEq)]
pub struct GeneticConfig {
    pub population_size: usize,
    /// Generations run per call.
    pub generations: usize,
    pub crossover_rate: f64,
    /// Probability of one order mutation per child.
    pub mutation_rate: f64,
    /// Per head probability of a resource reassignment.
    pub resource_mutation_rate: f64,
    pub tournament_size: usize,
    /// Fittest individuals copied unchanged into the next generation.
    pub elite_count: usize,
    pub seed: u64,
}

impl Default for GeneticConfig {
    fn default() -> Self {
        Self {
            population_size: 20,
            generations: 10,
            crossover_rate: 0.9,
            mutation_rate: 0.3,
            resource_mutation_rate: 0.05,
            tournament_size: 3,
            elite_count: 2,
            seed: 42,
        }
    }
}

impl GeneticConfig {
    pub fn validate(&self) -> Result<(), OptimizerError> {
        check_positive("population_size", self.population_size)?;
        check_positive("tournament_size", self.tournament_size)?;
        check_rate("crossover_rate", self.crossover_rate)?;
        check_rate("mutation_rate", self.mutation_rate)?;
        check_rate("resource_mutation_rate", self.resource_mutation_rate)?;
        if self.elite_count > self.population_size {
            return Err(OptimizerError::InvalidConfig(format!(
                "elite_count {} exceeds population_size {}",
                self.elite_count, self.population_size
            )));
        }
        Ok(())
    }
}

/// Generational genetic algorithm with elitism.
#[derive(Debug)]
pub struct GeneticStrategy {
    config: GeneticConfig,
    rng: StdRng,
}

impl GeneticStrategy {
    pub fn new(config: GeneticConfig) -> Result<Self, OptimizerError> {
        config.validate()?;
        let rng = StdRng::seed_from_u64(config.seed);
        Ok(Self { config, rng })
    }

    pub fn config(&self) -> &GeneticConfig {
        &self.config
    }
}

impl PopulationScheduler for GeneticStrategy {
    fn name(&self) -> &str {
        "genetic"
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
        let cfg = &self.config;
        let mut population = population;
        sort_by_fitness(&mut population);

        for generation in 0..cfg.generations {
            let elite = cfg.elite_count.min(population.len());
            let mut offspring = Vec::with_capacity(cfg.population_size.saturating_sub(elite));
            while elite + offspring.len() < cfg.population_size {
                let p1 = tournament(&population, cfg.tournament_size, &mut self.rng);
                let mut child = if self.rng.gen_bool(cfg.crossover_rate) {
                    let p2 = tournament(&population, cfg.tournament_size, &mut self.rng);
                    pox_crossover(&p1.chromosome, &p2.chromosome, &mut self.rng)
                } else {
                    p1.chromosome.clone()
                };
                if self.rng.gen_bool(cfg.mutation_rate) {
                    mutate_order(&mut child, &mut self.rng);
                }
                resource_mutation(&mut child, ctx, cfg.resource_mutation_rate, &mut self.rng);
                offspring.push(child);
            }

            let mut next: Vec<Individual> = population.drain(..elite).collect();
            next.extend(evaluator.evaluate(offspring));
            sort_by_fitness(&mut next);
            population = next;
            debug!(
                generation,
                best = population.first().map(|i| i.fitness.primary()),
                "Genetic generation"
            );
        }
        Ok(population)
    }
}
