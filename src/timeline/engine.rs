use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::trace;

use super::error::TimelineError;
use super::estimator::{Team, WorkTimeEstimator};
use super::plan::WorkPlan;
use super::resource_log::ResourceLog;
use super::zones::ZoneTimeline;
use super::{Placement, Reservation};
use crate::graph::{EdgeType, GraphError, WorkGraph};
use crate::interval::Interval;
use crate::landscape::ZoneConfiguration;
use crate::resource::{Contractor, ResourceKey};
use crate::schedule::{ReservedWindow, Schedule, ScheduledWork};
use crate::units::Time;
use crate::Id;

/// `count` units of `key` wanted over `[S + offset, S + offset + length)`
/// for a chain start `S`.
#[derive(Debug, Clone, Copy)]
pub struct Slot<'a> {
    pub key: &'a ResourceKey,
    pub count: usize,
    pub offset: f64,
    pub length: f64,
}

impl Slot<'_> {
    pub fn window(&self, start: f64) -> ReservedWindow {
        let from = start + self.offset;
        ReservedWindow {
            resource: self.key.clone(),
            count: self.count,
            interval: Interval::from_f64(from, from + self.length),
        }
    }
}

/// State shared by every timeline policy: pool logs per contractor, zone
/// history, the duration estimator and the context start time.
#[derive(Debug, Clone)]
pub struct TimelineCore {
    pools: HashMap<Id, HashMap<ResourceKey, ResourceLog>>,
    zones: ZoneTimeline,
    estimator: Arc<dyn WorkTimeEstimator>,
    parent_time: f64,
}

impl TimelineCore {
    /// Fresh logs for every pool of every contractor. The axis starts at
    /// zero, so a negative `parent_time` is treated as zero.
    pub fn new(
        contractors: &[Contractor],
        zones: ZoneConfiguration,
        estimator: Arc<dyn WorkTimeEstimator>,
        parent_time: Time,
    ) -> Self {
        let pools = contractors
            .iter()
            .map(|c| {
                let logs = c
                    .pools()
                    .map(|(key, count)| (key, ResourceLog::new(count)))
                    .collect();
                (c.id.clone(), logs)
            })
            .collect();
        Self {
            pools,
            zones: ZoneTimeline::new(zones),
            estimator,
            parent_time: parent_time.value().max(0.0),
        }
    }

    pub fn estimator(&self) -> &dyn WorkTimeEstimator {
        self.estimator.as_ref()
    }

    pub fn parent_time(&self) -> f64 {
        self.parent_time
    }

    pub fn zones(&self) -> &ZoneTimeline {
        &self.zones
    }

    pub fn log(&self, contractor: &str, key: &ResourceKey) -> Option<&ResourceLog> {
        self.pools.get(contractor)?.get(key)
    }

    /// Fails when some demand exceeds what its pool could ever offer.
    pub fn check_capacity(&self, plan: &WorkPlan, team: &Team) -> Result<(), TimelineError> {
        let Some(first) = plan.demands.iter().find(|d| d.count > 0) else {
            return Ok(());
        };
        let Some(contractor) = team.contractor_id.as_deref() else {
            return Err(TimelineError::NoSufficientAgents {
                work: plan.head().to_string(),
                resource: first.key.to_string(),
                required: first.count,
                available: 0,
            });
        };
        let pools = self
            .pools
            .get(contractor)
            .ok_or_else(|| TimelineError::UnknownContractor(contractor.to_string()))?;
        for demand in plan.demands.iter().filter(|d| d.count > 0) {
            let available = pools.get(&demand.key).map_or(0, ResourceLog::capacity);
            if available < demand.count {
                return Err(TimelineError::NoSufficientAgents {
                    work: plan.head().to_string(),
                    resource: demand.key.to_string(),
                    required: demand.count,
                    available,
                });
            }
        }
        Ok(())
    }

    /// Earliest chain start allowed by every external incoming edge and by
    /// the context start time.
    pub fn lower_bound(
        &self,
        graph: &WorkGraph,
        plan: &WorkPlan,
        schedule: &Schedule,
    ) -> Result<f64, TimelineError> {
        let chain: HashSet<&str> = plan.members.iter().map(|m| m.id.as_str()).collect();
        let mut bound = self.parent_time;
        for member in &plan.members {
            for (parent, edge) in graph.parents(&member.id)? {
                if chain.contains(parent) {
                    continue;
                }
                let done = schedule.get(parent).ok_or_else(|| {
                    TimelineError::UnscheduledPredecessor {
                        work: member.id.clone(),
                        predecessor: parent.to_string(),
                    }
                })?;
                let (s, f) = (done.start().value(), done.finish().value());
                let start_at = member.offset;
                let finish_at = member.offset + member.duration;
                let b = match edge.kind {
                    EdgeType::FinishStart
                    | EdgeType::LagFinishStart
                    | EdgeType::InseparableFinishStart => f + edge.lag - start_at,
                    EdgeType::StartStart => s + edge.lag - start_at,
                    EdgeType::FinishFinish => f + edge.lag - finish_at,
                    EdgeType::StartFinish => s + edge.lag - finish_at,
                };
                bound = bound.max(b);
            }
        }
        Ok(bound)
    }

    /// Earliest `S >= from` at which every slot fits, or `None` when no
    /// candidate works.
    ///
    /// Candidates are `from` and every pool change point shifted by the slot
    /// offset; the level only rises at those points.
    pub fn earliest_joint(
        &self,
        contractor: Option<&str>,
        slots: &[Slot<'_>],
        from: f64,
    ) -> Result<Option<f64>, TimelineError> {
        if slots.is_empty() {
            return Ok(Some(from));
        }
        let Some(contractor) = contractor else {
            return Ok(None);
        };
        let mut logs = Vec::with_capacity(slots.len());
        for slot in slots {
            match self.log(contractor, slot.key) {
                Some(log) => logs.push(log),
                None => return Ok(None),
            }
        }

        let mut candidates = vec![from];
        for (slot, log) in slots.iter().zip(&logs) {
            candidates.extend(
                log.change_points()
                    .map(|t| t - slot.offset)
                    .filter(|c| *c > from),
            );
        }
        candidates.sort_by(f64::total_cmp);
        candidates.dedup();

        'candidates: for start in candidates {
            for (slot, log) in slots.iter().zip(&logs) {
                let lo = start + slot.offset;
                if log.min_available(lo, lo + slot.length)? < slot.count as i64 {
                    continue 'candidates;
                }
            }
            return Ok(Some(start));
        }
        Ok(None)
    }

    /// Earliest start not before `from` that every zone demand accepts.
    pub fn zones_ready(&self, plan: &WorkPlan, from: f64) -> Result<f64, TimelineError> {
        let mut ready = from;
        for z in &plan.zones {
            ready = ready.max(self.zones.earliest(&z.zone, z.status, from)?);
        }
        Ok(ready)
    }

    /// Books the placement and writes one scheduled work per chain member.
    pub fn commit(
        &mut self,
        graph: &WorkGraph,
        plan: &WorkPlan,
        team: &Team,
        placement: Placement,
        schedule: &mut Schedule,
    ) -> Result<Reservation, TimelineError> {
        if let Some(contractor) = team.contractor_id.as_deref() {
            for window in &placement.windows {
                let log = self
                    .pools
                    .get_mut(contractor)
                    .and_then(|pools| pools.get_mut(&window.resource))
                    .ok_or_else(|| TimelineError::UnknownContractor(contractor.to_string()))?;
                log.reserve(
                    window.count,
                    window.interval.start().value(),
                    window.interval.end().value(),
                )?;
            }
        }

        let mut zones_pre = Vec::new();
        let mut zones_post = Vec::new();
        for z in &plan.zones {
            let (pre, post) =
                self.zones
                    .occupy(&z.zone, z.status, z.post, placement.start, placement.finish)?;
            zones_pre.extend(pre);
            zones_post.extend(post);
        }

        let last = plan.members.len().saturating_sub(1);
        for (i, member) in plan.members.iter().enumerate() {
            let unit = graph
                .unit(&member.id)
                .ok_or_else(|| GraphError::NodeNotFound(member.id.clone()))?;
            let interval = if plan.independent {
                Interval::from_f64(placement.start, placement.finish)
            } else {
                let start = placement.start + member.offset;
                Interval::from_f64(start, start + member.duration)
            };

            let mut work = ScheduledWork::new(member.id.clone(), unit.name(), interval);
            work.is_service = unit.is_service_unit();
            if !work.is_service {
                work.contractor_id = team.contractor_id.clone();
                for req in unit.worker_reqs() {
                    let count = team.count(req.kind());
                    if count > 0 {
                        work.workers.insert(req.kind().to_string(), count);
                    }
                }
                for req in unit.equipment_reqs() {
                    if req.count > 0 {
                        work.equipment.insert(req.kind.clone(), req.count);
                    }
                }
            }
            if i == 0 {
                work.zones_pre = std::mem::take(&mut zones_pre);
                work.windows = placement.windows.clone();
            }
            if i == last {
                work.zones_post = std::mem::take(&mut zones_post);
            }
            schedule.insert(work)?;
        }

        trace!(
            work = plan.head(),
            start = placement.start,
            finish = placement.finish,
            windows = placement.windows.len(),
            "Committed chain"
        );
        Ok(Reservation {
            interval: Interval::from_f64(placement.start, placement.finish),
            windows: placement.windows,
        })
    }
}
