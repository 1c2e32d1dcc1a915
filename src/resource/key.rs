use std::fmt::Display;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::contractor::Contractor;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ResourceKind {
    Worker,
    Equipment,
}

/// Names one pool of a contractor: a worker kind or an equipment kind.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ResourceKey {
    pub kind: ResourceKind,
    pub name: String,
}

impl ResourceKey {
    pub fn worker(name: impl Into<String>) -> Self {
        Self {
            kind: ResourceKind::Worker,
            name: name.into(),
        }
    }

    pub fn equipment(name: impl Into<String>) -> Self {
        Self {
            kind: ResourceKind::Equipment,
            name: name.into(),
        }
    }
}

impl Display for ResourceKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            ResourceKind::Worker => write!(f, "worker:{}", self.name),
            ResourceKind::Equipment => write!(f, "equipment:{}", self.name),
        }
    }
}

impl Contractor {
    /// Size of the pool named by `key`, zero when the contractor has none.
    pub fn capacity(&self, key: &ResourceKey) -> usize {
        match key.kind {
            ResourceKind::Worker => self.worker_count(&key.name),
            ResourceKind::Equipment => self.equipment_count(&key.name),
        }
    }

    /// Every pool this contractor owns.
    pub fn pools(&self) -> impl Iterator<Item = (ResourceKey, usize)> + '_ {
        let workers = self
            .workers
            .iter()
            .map(|(kind, w)| (ResourceKey::worker(kind.clone()), w.count));
        let equipment = self
            .equipments
            .iter()
            .map(|(kind, e)| (ResourceKey::equipment(kind.clone()), e.count));
        workers.chain(equipment)
    }
}
