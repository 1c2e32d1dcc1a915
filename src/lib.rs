//! worksched - work-graph scheduling core
//!
//! Computes feasible, optimized schedules for projects modelled as a DAG of
//! work units under worker, equipment and zone capacity, precedence edges
//! with lags, and inseparable chains.
//!
//! - [`graph`] and [`editor`]: the work graph and its copy/edit operations
//! - [`timeline`]: resource reservation that turns a team and an order into
//!   start and finish times
//! - [`genetic`] and [`hybrid`]: the population-based search over encodings
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use worksched::genetic::{GeneticConfig, GeneticStrategy, RandomPopulation, ScheduleContext};
//! use worksched::graph::work_graph_from_edges;
//! use worksched::hybrid::CycleHybridScheduler;
//! use worksched::resource::Contractor;
//! use worksched::work::{WorkUnit, WorkerReq};
//!
//! let walls = WorkUnit::new("walls", "Walls")
//!     .with_requirement(WorkerReq::new("mason", 8.0, 1, 4).unwrap());
//! let roof = WorkUnit::new("roof", "Roof")
//!     .with_requirement(WorkerReq::new("roofer", 3.0, 1, 2).unwrap());
//! let graph = work_graph_from_edges([walls, roof], &[("walls", "roof")]).unwrap();
//! let crew = Contractor::new("crew", "Crew")
//!     .with_workers("mason", 4)
//!     .with_workers("roofer", 2);
//! let ctx = Arc::new(ScheduleContext::new(graph, vec![crew]).unwrap());
//!
//! let (best, schedule) = CycleHybridScheduler::builder(ctx)
//!     .starting(RandomPopulation::new(8, 1).unwrap())
//!     .then(GeneticStrategy::new(GeneticConfig::default()).unwrap())
//!     .build()
//!     .unwrap()
//!     .schedule()
//!     .unwrap();
//! assert_eq!(best.fitness.primary(), schedule.execution_time().value());
//! let (walls, roof) = (schedule.get("walls").unwrap(), schedule.get("roof").unwrap());
//! assert!(roof.start().value() >= walls.finish().value());
//! ```

pub mod editor;
pub mod event_log;
pub mod genetic;
pub mod graph;
pub mod hybrid;
pub mod interval;
pub mod landscape;
pub mod resource;
pub mod schedule;
pub mod timeline;
pub mod units;
pub mod work;

// Re-export unit conversion traits for ergonomic use
pub use units::{convert, SameDim, Time};

/// Identifier type used for works, contractors, and scheduling artifacts.
pub type Id = String;

/// Generates a new unique identifier (UUID v4).
pub fn generate_id() -> Id {
    uuid::Uuid::new_v4().to_string()
}
