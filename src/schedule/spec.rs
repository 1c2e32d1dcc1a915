use std::collections::{BTreeMap, HashMap};

use qtty::Quantity;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::units::{time, to_axis, Axis, SameDim, Time};
use crate::Id;

/// Caller overrides for a single work.
///
/// - `assigned_workers` fixes the team size per worker kind instead of
///   letting the optimizer choose it
/// - `assigned_time` fixes the duration instead of asking the estimator
/// - `is_independent` lets each worker kind start as soon as it is free
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WorkSpec {
    assigned_workers: BTreeMap<String, usize>,
    /// Axis units.
    assigned_time: Option<f64>,
    is_independent: bool,
}

impl WorkSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_workers(mut self, kind: impl Into<String>, count: usize) -> Self {
        self.assigned_workers.insert(kind.into(), count);
        self
    }

    /// Fixes the work duration, in any unit of the time dimension.
    pub fn with_time<U: SameDim<Axis>>(mut self, duration: Quantity<U>) -> Self {
        self.assigned_time = Some(to_axis(duration).value());
        self
    }

    pub fn independent(mut self, is_independent: bool) -> Self {
        self.is_independent = is_independent;
        self
    }

    pub fn assigned_workers(&self) -> &BTreeMap<String, usize> {
        &self.assigned_workers
    }

    pub fn assigned_count(&self, kind: &str) -> Option<usize> {
        self.assigned_workers.get(kind).copied()
    }

    pub fn assigned_time(&self) -> Option<Time> {
        self.assigned_time.map(time)
    }

    pub fn is_independent(&self) -> bool {
        self.is_independent
    }
}

/// Per-work overrides keyed by work id.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScheduleSpec {
    work2spec: HashMap<Id, WorkSpec>,
}

static DEFAULT_SPEC: WorkSpec = WorkSpec {
    assigned_workers: BTreeMap::new(),
    assigned_time: None,
    is_independent: false,
};

impl ScheduleSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, id: impl Into<Id>, spec: WorkSpec) {
        self.work2spec.insert(id.into(), spec);
    }

    pub fn with(mut self, id: impl Into<Id>, spec: WorkSpec) -> Self {
        self.set(id, spec);
        self
    }

    /// Spec for `id`, or the empty spec.
    pub fn get(&self, id: &str) -> &WorkSpec {
        self.work2spec.get(id).unwrap_or(&DEFAULT_SPEC)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.work2spec.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.work2spec.len()
    }

    pub fn is_empty(&self) -> bool {
        self.work2spec.is_empty()
    }
}
