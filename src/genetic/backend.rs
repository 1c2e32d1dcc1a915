use std::fmt::Debug;
use std::sync::Arc;

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use super::chromosome::{Chromosome, Fitness, Individual};
use super::decoder::Decoder;
use super::error::OptimizerError;
use super::fitness::{FitnessFunction, TimeFitness};
use crate::schedule::Schedule;

/// Runs fitness evaluation over a batch of chromosomes.
///
/// Results come back in input order whatever order they complete in.
pub trait ComputeBackend: Send + Sync + Debug {
    fn compute(
        &self,
        fitness: &dyn FitnessFunction,
        decoder: &dyn Decoder,
        chromosomes: &[Chromosome],
    ) -> Vec<Fitness>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SequentialBackend;

impl ComputeBackend for SequentialBackend {
    fn compute(
        &self,
        fitness: &dyn FitnessFunction,
        decoder: &dyn Decoder,
        chromosomes: &[Chromosome],
    ) -> Vec<Fitness> {
        chromosomes
            .iter()
            .map(|c| fitness.evaluate(c, decoder))
            .collect()
    }
}

/// Evaluates on a dedicated rayon pool.
#[derive(Debug)]
pub struct ParallelBackend {
    pool: ThreadPool,
    workers: usize,
}

impl ParallelBackend {
    /// # Errors
    ///
    /// - `InvalidParallelism` if `workers` is zero
    /// - `ThreadPool` if the pool cannot be started
    pub fn new(workers: usize) -> Result<Self, OptimizerError> {
        if workers == 0 {
            return Err(OptimizerError::InvalidParallelism(workers));
        }
        let pool = ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("worksched-eval-{i}"))
            .build()
            .map_err(|e| OptimizerError::ThreadPool(e.to_string()))?;
        Ok(Self { pool, workers })
    }

    pub fn workers(&self) -> usize {
        self.workers
    }
}

impl ComputeBackend for ParallelBackend {
    fn compute(
        &self,
        fitness: &dyn FitnessFunction,
        decoder: &dyn Decoder,
        chromosomes: &[Chromosome],
    ) -> Vec<Fitness> {
        self.pool.install(|| {
            chromosomes
                .par_iter()
                .map(|c| fitness.evaluate(c, decoder))
                .collect()
        })
    }
}

/// Fitness function, decoder and backend bundled for the strategies.
#[derive(Debug, Clone)]
pub struct Evaluator {
    fitness: Arc<dyn FitnessFunction>,
    decoder: Arc<dyn Decoder>,
    backend: Arc<dyn ComputeBackend>,
}

impl Evaluator {
    /// Completion-time fitness evaluated sequentially.
    pub fn new(decoder: Arc<dyn Decoder>) -> Self {
        Self {
            fitness: Arc::new(TimeFitness),
            decoder,
            backend: Arc::new(SequentialBackend),
        }
    }

    pub fn with_fitness(mut self, fitness: Arc<dyn FitnessFunction>) -> Self {
        self.fitness = fitness;
        self
    }

    pub fn with_backend(mut self, backend: Arc<dyn ComputeBackend>) -> Self {
        self.backend = backend;
        self
    }

    pub fn decoder(&self) -> &dyn Decoder {
        self.decoder.as_ref()
    }

    pub fn evaluate(&self, chromosomes: Vec<Chromosome>) -> Vec<Individual> {
        let scores = self
            .backend
            .compute(self.fitness.as_ref(), self.decoder.as_ref(), &chromosomes);
        chromosomes
            .into_iter()
            .zip(scores)
            .map(|(c, f)| Individual::new(c, f))
            .collect()
    }

    pub fn decode(&self, chromosome: &Chromosome) -> Result<Schedule, OptimizerError> {
        self.decoder.decode(chromosome)
    }
}
