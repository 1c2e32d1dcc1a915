//! Resource reservation timelines.
//!
//! A timeline turns "schedule this work with this team" into a committed
//! interval. It keeps, per contractor pool, an event-ordered log of
//! reservations and, per zone, a status history with transition costs.
//!
//! Scheduling a work always lays out its whole inseparable chain:
//!
//! 1. build a [`WorkPlan`]: member offsets and durations, pool demands, zone
//!    demands
//! 2. derive the earliest start allowed by every external incoming edge
//! 3. alternate the policy's pool placement with the zone check until both
//!    accept the same start
//! 4. book the pools and zones and write one [`ScheduledWork`] per member
//!
//! The two policies differ only in step 3. [`MomentumTimeline`] holds the
//! whole team for the whole chain; [`JustInTimeTimeline`] releases each kind
//! as soon as the members using it are done.
//!
//! Timelines are single-threaded state machines. Create one per scheduling
//! attempt and never share it between concurrent decodes.
//!
//! [`ScheduledWork`]: crate::schedule::ScheduledWork

use std::collections::BTreeMap;
use std::fmt::Debug;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::trace;

mod engine;
mod error;
mod estimator;
mod just_in_time;
mod momentum;
mod plan;
mod resource_log;
mod zones;


pub use engine::{Slot, TimelineCore};
pub use error::TimelineError;
pub use estimator::{DefaultWorkTimeEstimator, Team, WorkTimeEstimator};
pub use just_in_time::JustInTimeTimeline;
pub use momentum::MomentumTimeline;
pub use plan::{ChainMember, ResourceDemand, WorkPlan, ZoneDemand};
pub use resource_log::{EventKind, ResourceLog, ScheduleEvent};
pub use zones::ZoneTimeline;

use crate::graph::WorkGraph;
use crate::interval::Interval;
use crate::landscape::ZoneConfiguration;
use crate::resource::Contractor;
use crate::schedule::{ReservedWindow, Schedule, ScheduleError, ScheduleSpec};
use crate::units::Time;

/// Where a policy would put a chain, before anything is booked.
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    pub start: f64,
    pub finish: f64,
    pub windows: Vec<ReservedWindow>,
}

/// What [`Timeline::schedule`] booked for a chain.
#[derive(Debug, Clone, PartialEq)]
pub struct Reservation {
    pub interval: Interval,
    pub windows: Vec<ReservedWindow>,
}

/// One scheduling request.
#[derive(Debug, Clone, Copy)]
pub struct WorkRequest<'a> {
    /// Any member of the chain to schedule.
    pub node: &'a str,
    pub team: &'a Team,
    pub spec: &'a ScheduleSpec,
    /// Zone → status to leave it in once the chain is done.
    pub zone_posts: &'a BTreeMap<String, usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TimelinePolicy {
    #[default]
    Momentum,
    JustInTime,
}

impl TimelinePolicy {
    /// A fresh timeline of this policy over the given pools and zones.
    pub fn build(
        self,
        contractors: &[Contractor],
        zones: ZoneConfiguration,
        estimator: Arc<dyn WorkTimeEstimator>,
        parent_time: Time,
    ) -> Box<dyn Timeline> {
        let core = TimelineCore::new(contractors, zones, estimator, parent_time);
        match self {
            TimelinePolicy::Momentum => Box::new(MomentumTimeline::new(core)),
            TimelinePolicy::JustInTime => Box::new(JustInTimeTimeline::new(core)),
        }
    }
}

pub trait Timeline: Debug {
    fn core(&self) -> &TimelineCore;

    fn core_mut(&mut self) -> &mut TimelineCore;

    fn policy(&self) -> TimelinePolicy;

    /// Earliest pool placement of `plan` starting no earlier than `from`.
    fn place(
        &self,
        plan: &WorkPlan,
        contractor: Option<&str>,
        from: f64,
    ) -> Result<Placement, TimelineError>;

    /// Schedules the chain containing `request.node` and commits it into
    /// `schedule`.
    ///
    /// # Errors
    ///
    /// - `NoSufficientAgents` if a pool can never hold the requested count
    /// - `UnscheduledPredecessor` if an external parent is not in `schedule`
    /// - `Schedule(DuplicateWork)` if a member is already scheduled
    /// - `Zone` for unknown zones or statuses
    fn schedule(
        &mut self,
        graph: &WorkGraph,
        request: &WorkRequest<'_>,
        schedule: &mut Schedule,
    ) -> Result<Reservation, TimelineError> {
        let head = graph.chain_head(request.node)?;
        let plan = WorkPlan::build(
            graph,
            head,
            request.team,
            request.spec,
            self.core().estimator(),
            request.zone_posts,
        )?;
        if let Some(member) = plan.members.iter().find(|m| schedule.contains(&m.id)) {
            return Err(ScheduleError::DuplicateWork(member.id.clone()).into());
        }
        self.core().check_capacity(&plan, request.team)?;

        let contractor = request.team.contractor_id.as_deref();
        let mut from = self.core().lower_bound(graph, &plan, schedule)?;
        let placement = loop {
            let placement = self.place(&plan, contractor, from)?;
            let ready = self.core().zones_ready(&plan, placement.start)?;
            if ready <= placement.start {
                break placement;
            }
            trace!(work = head, from, ready, "Zone pushed placement");
            from = ready;
        };

        self.core_mut()
            .commit(graph, &plan, request.team, placement, schedule)
    }
}
