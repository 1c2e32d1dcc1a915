//! Work units and their typed requirements.

pub mod error;
pub mod requirement;
mod unit;

pub use error::RequirementError;
pub use requirement::{
    ConstructionObjectReq, Demand, EquipmentReq, MaterialReq, Materialized, Requirement,
    WorkerReq, ZoneReq, DEFAULT_MAX_COUNT,
};
pub use unit::WorkUnit;
