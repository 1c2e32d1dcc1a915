use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::interval::Interval;
use crate::landscape::ZoneTransition;
use crate::resource::ResourceKey;
use crate::units::Time;
use crate::Id;

/// `count` units of one pool held over `interval`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ReservedWindow {
    pub resource: ResourceKey,
    pub count: usize,
    pub interval: Interval,
}

/// A work committed to the timeline.
///
/// `zones_pre` holds the status changes that had to happen right before the
/// work could start, `zones_post` the ones requested right after it ends.
/// For an inseparable chain the pre brackets and the reserved windows sit on
/// the head and the post brackets on the last member.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScheduledWork {
    pub id: Id,
    pub name: String,
    pub interval: Interval,
    pub contractor_id: Option<Id>,
    pub workers: BTreeMap<String, usize>,
    pub equipment: BTreeMap<String, usize>,
    pub zones_pre: Vec<ZoneTransition>,
    pub zones_post: Vec<ZoneTransition>,
    pub windows: Vec<ReservedWindow>,
    pub is_service: bool,
}

impl ScheduledWork {
    pub fn new(id: impl Into<Id>, name: impl Into<String>, interval: Interval) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            interval,
            contractor_id: None,
            workers: BTreeMap::new(),
            equipment: BTreeMap::new(),
            zones_pre: Vec::new(),
            zones_post: Vec::new(),
            windows: Vec::new(),
            is_service: false,
        }
    }

    pub fn start(&self) -> Time {
        self.interval.start()
    }

    pub fn finish(&self) -> Time {
        self.interval.end()
    }

    pub fn duration(&self) -> Time {
        self.interval.duration()
    }

    /// Total number of assigned workers across kinds.
    pub fn team_size(&self) -> usize {
        self.workers.values().sum()
    }
}
