use thiserror::Error;

use crate::graph::GraphError;
use crate::landscape::ZoneError;
use crate::schedule::ScheduleError;
use crate::Id;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum TimelineError {
    /// The pool can never hold the requested team, however long we wait.
    #[error("Work '{work}' needs {required} of {resource} but only {available} exist")]
    NoSufficientAgents {
        work: Id,
        resource: String,
        required: usize,
        available: usize,
    },

    #[error("Unknown contractor: {0}")]
    UnknownContractor(Id),

    #[error("Work '{work}' scheduled before its predecessor '{predecessor}'")]
    UnscheduledPredecessor { work: Id, predecessor: Id },

    #[error("No feasible window found for work '{0}'")]
    NoFeasibleWindow(Id),

    #[error(transparent)]
    Zone(#[from] ZoneError),

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Schedule(#[from] ScheduleError),
}
