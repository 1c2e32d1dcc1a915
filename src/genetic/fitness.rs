use std::fmt::Debug;

use tracing::debug;

use super::chromosome::{Chromosome, Fitness};
use super::decoder::Decoder;

/// Scores a chromosome by decoding it. Lower is better.
pub trait FitnessFunction: Send + Sync + Debug {
    fn evaluate(&self, chromosome: &Chromosome, decoder: &dyn Decoder) -> Fitness;
}

/// Project completion time.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeFitness;

impl FitnessFunction for TimeFitness {
    fn evaluate(&self, chromosome: &Chromosome, decoder: &dyn Decoder) -> Fitness {
        match decoder.decode(chromosome) {
            Ok(schedule) => Fitness::new(vec![schedule.execution_time().value()]),
            Err(error) => {
                debug!(%error, "Chromosome is not schedulable");
                Fitness::infeasible()
            }
        }
    }
}
