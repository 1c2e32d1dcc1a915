use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::debug;

use super::{check_positive, PopulationScheduler};
use crate::genetic::backend::Evaluator;
use crate::genetic::chromosome::{sort_by_fitness, Chromosome, Individual};
use crate::genetic::context::ScheduleContext;
use crate::genetic::error::OptimizerError;

/// Random chromosomes merged into the population, fittest `size` kept.
///
/// The first batch also carries the baseline chromosome, so a seeded run
/// always contains one topological, fully staffed candidate.
#[derive(Debug)]
pub struct RandomPopulation {
    size: usize,
    rng: StdRng,
}

impl RandomPopulation {
    pub fn new(size: usize, seed: u64) -> Result<Self, OptimizerError> {
        check_positive("size", size)?;
        Ok(Self {
            size,
            rng: StdRng::seed_from_u64(seed),
        })
    }
}

impl PopulationScheduler for RandomPopulation {
    fn name(&self) -> &str {
        "random"
    }

    fn schedule(
        &mut self,
        population: Vec<Individual>,
        ctx: &ScheduleContext,
        evaluator: &Evaluator,
    ) -> Result<Vec<Individual>, OptimizerError> {
        let mut fresh = Vec::with_capacity(self.size);
        if population.is_empty() {
            fresh.push(Chromosome::baseline(ctx));
        }
        while fresh.len() < self.size {
            fresh.push(Chromosome::random(ctx, &mut self.rng));
        }

        let mut next = population;
        next.extend(evaluator.evaluate(fresh));
        sort_by_fitness(&mut next);
        next.truncate(self.size);
        debug!(
            size = next.len(),
            best = next.first().map(|i| i.fitness.primary()),
            "Random population"
        );
        Ok(next)
    }
}
