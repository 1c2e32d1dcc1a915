//! Contractors and the resource pools they own.
//!
//! A [`Contractor`] owns per-kind pools of fungible [`Worker`]s and
//! [`Equipment`]. Pools are only ever drawn down by a timeline commit; the
//! registry itself is read-only once scheduling starts.

mod contractor;
mod key;
mod worker;

pub use contractor::{worker_contractor_pool, Contractor, WorkerContractorPool};
pub use key::{ResourceKey, ResourceKind};
pub use worker::{Equipment, Material, Worker};
