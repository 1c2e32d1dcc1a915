use std::collections::{BTreeSet, HashMap};

use crate::units::{time, Time};
use crate::Id;

pub mod entry_key;
pub mod errors;
mod spec;
mod work;

pub use entry_key::F64Key;
pub use errors::ScheduleError;
pub use spec::{ScheduleSpec, WorkSpec};
pub use work::{ReservedWindow, ScheduledWork};

#[cfg(test)]
mod tests;

/// Committed works indexed by id and ordered by start time.
///
/// Unlike a single-machine plan, works may overlap freely here; capacity is
/// enforced upstream by the timeline.
///
/// # Internal Structure
/// - `works`: `HashMap` from work id to its [`ScheduledWork`]
/// - `by_start`: ordered set of `(start, id)` for chronological iteration
///
/// # Complexity
/// - `insert`: O(log n)
/// - `remove`: O(log n)
/// - `get`: O(1)
/// - `active_at`: O(k) over works starting before the query
///
/// # Examples
///
/// ```
/// use worksched::interval::Interval;
/// use worksched::schedule::{Schedule, ScheduledWork};
///
/// let mut schedule = Schedule::new();
/// schedule.insert(ScheduledWork::new("a", "dig", Interval::from_f64(0.0, 3.0))).unwrap();
/// schedule.insert(ScheduledWork::new("b", "pour", Interval::from_f64(3.0, 5.0))).unwrap();
///
/// assert_eq!(schedule.len(), 2);
/// assert_eq!(schedule.execution_time().value(), 5.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Schedule {
    works: HashMap<Id, ScheduledWork>,
    by_start: BTreeSet<(F64Key, Id)>,
}

impl Schedule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.works.len()
    }

    pub fn is_empty(&self) -> bool {
        self.works.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.works.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&ScheduledWork> {
        self.works.get(id)
    }

    /// Like [`get`](Self::get) but failing with `WorkNotFound`.
    pub fn require(&self, id: &str) -> Result<&ScheduledWork, ScheduleError> {
        self.works
            .get(id)
            .ok_or_else(|| ScheduleError::WorkNotFound(id.to_string()))
    }

    /// Commits a work.
    ///
    /// Requires:
    /// - `id` not already present
    /// - interval times not NaN
    pub fn insert(&mut self, work: ScheduledWork) -> Result<(), ScheduleError> {
        if self.works.contains_key(&work.id) {
            return Err(ScheduleError::DuplicateWork(work.id));
        }
        let start = F64Key::new(work.start().value())?;
        F64Key::new(work.finish().value())?;
        self.by_start.insert((start, work.id.clone()));
        self.works.insert(work.id.clone(), work);
        Ok(())
    }

    pub fn remove(&mut self, id: &str) -> Option<ScheduledWork> {
        let work = self.works.remove(id)?;
        if let Ok(start) = F64Key::new(work.start().value()) {
            self.by_start.remove(&(start, work.id.clone()));
        }
        Some(work)
    }

    /// Works in start time order, ties broken by id.
    pub fn iter(&self) -> impl Iterator<Item = &ScheduledWork> + '_ {
        self.by_start
            .iter()
            .filter_map(move |(_, id)| self.works.get(id))
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.by_start.iter().map(|(_, id)| id.as_str())
    }

    /// Works running at `t`.
    pub fn active_at(&self, t: Time) -> Result<Vec<&ScheduledWork>, ScheduleError> {
        let key = F64Key::new(t.value())?;
        Ok(self
            .by_start
            .iter()
            .take_while(|(start, _)| *start <= key)
            .filter_map(|(_, id)| self.works.get(id))
            .filter(|w| w.interval.contains(t))
            .collect())
    }

    /// Finish of the last work, zero for an empty schedule.
    pub fn execution_time(&self) -> Time {
        time(
            self.works
                .values()
                .map(|w| w.finish().value())
                .fold(0.0, f64::max),
        )
    }

    pub fn earliest_start(&self) -> Option<Time> {
        self.iter().next().map(ScheduledWork::start)
    }

    /// Time from the earliest start to the last finish, if any works exist.
    pub fn span(&self) -> Option<Time> {
        self.earliest_start()
            .map(|start| self.execution_time() - start)
    }

    pub fn clear(&mut self) {
        self.works.clear();
        self.by_start.clear();
    }
}

// =============================================================================
// Schedule Serde Support
// =============================================================================

#[cfg(feature = "serde")]
mod serde_impl {
    use super::*;
    use serde::de::{self, SeqAccess, Visitor};
    use serde::ser::SerializeSeq;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    impl Serialize for Schedule {
        fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            let mut seq = serializer.serialize_seq(Some(self.len()))?;
            for work in self.iter() {
                seq.serialize_element(work)?;
            }
            seq.end()
        }
    }

    impl<'de> Deserialize<'de> for Schedule {
        fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
        where
            D: Deserializer<'de>,
        {
            struct ScheduleVisitor;

            impl<'de> Visitor<'de> for ScheduleVisitor {
                type Value = Schedule;

                fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                    formatter.write_str("a sequence of scheduled works")
                }

                fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
                where
                    A: SeqAccess<'de>,
                {
                    let mut schedule = Schedule::new();
                    while let Some(work) = seq.next_element::<ScheduledWork>()? {
                        schedule.insert(work).map_err(de::Error::custom)?;
                    }
                    Ok(schedule)
                }
            }

            deserializer.deserialize_seq(ScheduleVisitor)
        }
    }
}
