//! Cyclic hybrid optimization.
//!
//! A starting strategy seeds the population; every cycle then applies each
//! cycle strategy in order. The run stops once the population's best fitness
//! has repeated for `max_plateau_size` consecutive cycles.

use std::sync::Arc;

use tracing::{info, warn};

use crate::genetic::{
    best_of, Evaluator, Fitness, Individual, OptimizerError, PopulationScheduler,
    ScheduleContext, SerialDecoder,
};
use crate::schedule::Schedule;


/// Stopping rule of [`CycleHybridScheduler`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HybridConfig {
    /// Consecutive cycles with an unchanged best fitness before stopping.
    pub max_plateau_size: usize,
    /// Hard ceiling on cycles; `None` relies on the plateau alone.
    pub max_cycles: Option<usize>,
}

impl Default for HybridConfig {
    fn default() -> Self {
        Self {
            max_plateau_size: 2,
            max_cycles: None,
        }
    }
}

impl HybridConfig {
    pub fn validate(&self) -> Result<(), OptimizerError> {
        if self.max_plateau_size == 0 {
            return Err(OptimizerError::InvalidConfig(
                "max_plateau_size must be positive".into(),
            ));
        }
        Ok(())
    }
}

/// Best individual of a run and how the run went.
#[derive(Debug, Clone)]
pub struct HybridOutcome {
    pub best: Individual,
    pub cycles: usize,
}

#[derive(Debug)]
pub struct CycleHybridScheduler {
    context: Arc<ScheduleContext>,
    starting: Box<dyn PopulationScheduler>,
    cycle: Vec<Box<dyn PopulationScheduler>>,
    evaluator: Evaluator,
    config: HybridConfig,
}

impl CycleHybridScheduler {
    pub fn builder(context: Arc<ScheduleContext>) -> CycleHybridSchedulerBuilder {
        CycleHybridSchedulerBuilder {
            context,
            starting: None,
            cycle: Vec::new(),
            evaluator: None,
            config: HybridConfig::default(),
        }
    }

    pub fn config(&self) -> &HybridConfig {
        &self.config
    }

    pub fn evaluator(&self) -> &Evaluator {
        &self.evaluator
    }

    /// Runs the cycle and returns the best individual ever seen.
    pub fn run(&mut self) -> Result<Individual, OptimizerError> {
        Ok(self.run_with_outcome()?.best)
    }

    pub fn run_with_outcome(&mut self) -> Result<HybridOutcome, OptimizerError> {
        let ctx = Arc::clone(&self.context);
        let mut population = self
            .starting
            .schedule(Vec::new(), &ctx, &self.evaluator)?;
        let mut best = best_of(&population)
            .cloned()
            .ok_or(OptimizerError::EmptyPopulation)?;
        info!(
            strategy = self.starting.name(),
            size = population.len(),
            best = best.fitness.primary(),
            "Seeded population"
        );

        let mut current: Option<Fitness> = None;
        let mut plateau = 0;
        let mut cycles = 0;
        loop {
            let pop_best = best_of(&population).ok_or(OptimizerError::EmptyPopulation)?;
            if pop_best.fitness < best.fitness {
                best = pop_best.clone();
            }
            if current.as_ref() == Some(&pop_best.fitness) {
                plateau += 1;
                if plateau >= self.config.max_plateau_size {
                    break;
                }
            } else {
                plateau = 0;
                current = Some(pop_best.fitness.clone());
            }
            if self.config.max_cycles.is_some_and(|max| cycles >= max) {
                warn!(cycles, plateau, "Cycle ceiling reached before a plateau");
                break;
            }

            for strategy in &mut self.cycle {
                population = strategy.schedule(population, &ctx, &self.evaluator)?;
                if population.is_empty() {
                    return Err(OptimizerError::EmptyPopulation);
                }
            }
            cycles += 1;
            info!(
                cycle = cycles,
                plateau,
                best = best_of(&population).map(|i| i.fitness.primary()),
                "Hybrid cycle finished"
            );
        }

        info!(cycles, best = best.fitness.primary(), "Hybrid run finished");
        Ok(HybridOutcome { best, cycles })
    }

    /// Runs the cycle and decodes the best individual.
    pub fn schedule(&mut self) -> Result<(Individual, Schedule), OptimizerError> {
        let best = self.run()?;
        let schedule = self.evaluator.decode(&best.chromosome)?;
        Ok((best, schedule))
    }
}

pub struct CycleHybridSchedulerBuilder {
    context: Arc<ScheduleContext>,
    starting: Option<Box<dyn PopulationScheduler>>,
    cycle: Vec<Box<dyn PopulationScheduler>>,
    evaluator: Option<Evaluator>,
    config: HybridConfig,
}

impl CycleHybridSchedulerBuilder {
    pub fn starting(mut self, strategy: impl PopulationScheduler + 'static) -> Self {
        self.starting = Some(Box::new(strategy));
        self
    }

    /// Appends a strategy to the cycle.
    pub fn then(mut self, strategy: impl PopulationScheduler + 'static) -> Self {
        self.cycle.push(Box::new(strategy));
        self
    }

    /// Defaults to completion-time fitness over a [`SerialDecoder`] on the
    /// builder's context, evaluated sequentially.
    pub fn evaluator(mut self, evaluator: Evaluator) -> Self {
        self.evaluator = Some(evaluator);
        self
    }

    pub fn config(mut self, config: HybridConfig) -> Self {
        self.config = config;
        self
    }

    pub fn max_plateau_size(mut self, size: usize) -> Self {
        self.config.max_plateau_size = size;
        self
    }

    /// # Errors
    ///
    /// - `IllegalState` without a starting strategy
    /// - `InvalidConfig` for a zero plateau size
    pub fn build(self) -> Result<CycleHybridScheduler, OptimizerError> {
        let starting = self.starting.ok_or_else(|| {
            OptimizerError::IllegalState("hybrid scheduler needs a starting strategy".into())
        })?;
        self.config.validate()?;
        let evaluator = self.evaluator.unwrap_or_else(|| {
            Evaluator::new(Arc::new(SerialDecoder::new(Arc::clone(&self.context))))
        });
        Ok(CycleHybridScheduler {
            context: self.context,
            starting,
            cycle: self.cycle,
            evaluator,
            config: self.config,
        })
    }
}
