use thiserror::Error;

use crate::work::RequirementError;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum GraphError {
    #[error("Work not found in graph: {0}")]
    NodeNotFound(String),

    #[error("Work ID already exists: {0}")]
    DuplicateId(String),

    #[error("Adding dependency {from} -> {to} would create a cycle in the work graph")]
    CycleDetected { from: String, to: String },

    #[error("Invalid inseparable chain at {0}: a work may have at most one inseparable parent and one inseparable child")]
    InvalidChain(String),

    #[error("Sentinel {0} cannot be removed or rewired")]
    SentinelViolation(String),

    #[error("Work {0} is not connected between start and finish")]
    Unreachable(String),

    #[error("Cannot compute topological order: graph contains a cycle")]
    GraphContainsCycle,

    #[error(transparent)]
    Requirement(#[from] RequirementError),
}
