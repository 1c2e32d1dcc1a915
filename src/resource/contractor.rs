use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::worker::{Equipment, Worker};
use crate::Id;

/// Owner of a fixed resource pool.
///
/// Pools are keyed by kind; ordered maps keep iteration deterministic.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Contractor {
    pub id: Id,
    pub name: String,
    pub workers: BTreeMap<String, Worker>,
    pub equipments: BTreeMap<String, Equipment>,
}

impl Contractor {
    pub fn new(id: impl Into<Id>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            workers: BTreeMap::new(),
            equipments: BTreeMap::new(),
        }
    }

    /// Adds (or replaces) the pool of `kind` workers.
    pub fn with_workers(mut self, kind: impl Into<String>, count: usize) -> Self {
        let kind = kind.into();
        let worker = Worker::new(crate::generate_id(), kind.clone(), count, self.id.clone());
        self.workers.insert(kind, worker);
        self
    }

    pub fn with_equipment(mut self, kind: impl Into<String>, count: usize) -> Self {
        let kind = kind.into();
        let equipment = Equipment::new(crate::generate_id(), kind.clone(), count, self.id.clone());
        self.equipments.insert(kind, equipment);
        self
    }

    pub fn worker_count(&self, kind: &str) -> usize {
        self.workers.get(kind).map_or(0, |w| w.count)
    }

    pub fn equipment_count(&self, kind: &str) -> usize {
        self.equipments.get(kind).map_or(0, |e| e.count)
    }
}

/// Worker kind → contractor id → that contractor's pool of the kind.
pub type WorkerContractorPool = BTreeMap<String, BTreeMap<Id, Worker>>;

/// Indexes every contractor's workers by kind.
pub fn worker_contractor_pool<'a, I>(contractors: I) -> WorkerContractorPool
where
    I: IntoIterator<Item = &'a Contractor>,
{
    let mut pool = WorkerContractorPool::new();
    for contractor in contractors {
        for (kind, worker) in &contractor.workers {
            pool.entry(kind.clone())
                .or_default()
                .insert(contractor.id.clone(), worker.clone());
        }
    }
    pool
}
