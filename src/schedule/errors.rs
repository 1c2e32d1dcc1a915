use thiserror::Error;

use crate::Id;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ScheduleError {
    /// Work id is already present in the schedule
    #[error("Work '{0}' already exists in schedule")]
    DuplicateWork(Id),

    /// A time value was NaN, which is not allowed
    #[error("Time value cannot be NaN")]
    NaNTime,

    /// Work id was not found in the schedule
    #[error("Work '{0}' not found in schedule")]
    WorkNotFound(Id),
}
