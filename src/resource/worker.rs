#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::Id;

/// A pool of interchangeable workers of one kind owned by a contractor.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Worker {
    pub id: Id,
    /// Worker kind, e.g. `"driver"`.
    pub name: String,
    pub count: usize,
    pub contractor_id: Id,
}

impl Worker {
    pub fn new(
        id: impl Into<Id>,
        name: impl Into<String>,
        count: usize,
        contractor_id: impl Into<Id>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            count,
            contractor_id: contractor_id.into(),
        }
    }

    /// Same pool, different head count.
    pub fn with_count(&self, count: usize) -> Self {
        Self {
            count,
            ..self.clone()
        }
    }
}

/// A pool of identical machines owned by a contractor.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Equipment {
    pub id: Id,
    pub name: String,
    pub count: usize,
    pub contractor_id: Id,
}

impl Equipment {
    pub fn new(
        id: impl Into<Id>,
        name: impl Into<String>,
        count: usize,
        contractor_id: impl Into<Id>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            count,
            contractor_id: contractor_id.into(),
        }
    }
}

/// A quantity of consumable material.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Material {
    pub id: Id,
    pub name: String,
    pub count: usize,
}

impl Material {
    pub fn new(id: impl Into<Id>, name: impl Into<String>, count: usize) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            count,
        }
    }
}
