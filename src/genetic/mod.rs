//! Chromosome encoding, decoding and population strategies.
//!
//! A [`Chromosome`] fixes everything the timeline leaves open: the order in
//! which ready chains are committed, the contractor and team of every chain,
//! and the status each chain leaves its zones in. [`SerialDecoder`] turns it
//! into a [`Schedule`](crate::schedule::Schedule) through a private timeline;
//! a [`FitnessFunction`] scores the result; a [`ComputeBackend`] runs whole
//! batches, sequentially or on a rayon pool.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use worksched::genetic::{Chromosome, Evaluator, ScheduleContext, SerialDecoder};
//! use worksched::graph::work_graph_from_edges;
//! use worksched::resource::Contractor;
//! use worksched::work::{WorkUnit, WorkerReq};
//!
//! let dig = WorkUnit::new("dig", "Dig")
//!     .with_requirement(WorkerReq::new("digger", 6.0, 1, 3).unwrap());
//! let graph = work_graph_from_edges([dig], &[]).unwrap();
//! let crew = Contractor::new("c", "Crew").with_workers("digger", 3);
//! let ctx = Arc::new(ScheduleContext::new(graph, vec![crew]).unwrap());
//!
//! let evaluator = Evaluator::new(Arc::new(SerialDecoder::new(ctx.clone())));
//! let best = evaluator.evaluate(vec![Chromosome::baseline(&ctx)]);
//! assert_eq!(best[0].fitness.primary(), 2.0);
//! ```

mod backend;
mod chromosome;
mod context;
mod decoder;
mod error;
mod fitness;
pub mod operators;
pub mod strategy;


pub use backend::{ComputeBackend, Evaluator, ParallelBackend, SequentialBackend};
pub use chromosome::{best_of, sort_by_fitness, Chromosome, Fitness, Individual};
pub use context::{CountBounds, HeadInfo, ScheduleContext};
pub use decoder::{Decoder, SerialDecoder};
pub use error::OptimizerError;
pub use fitness::{FitnessFunction, TimeFitness};
pub use strategy::{
    GeneticConfig, GeneticStrategy, LocalSearch, LocalSearchConfig, PopulationScheduler,
    RandomPopulation,
};
