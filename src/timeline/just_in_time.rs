use super::engine::{Slot, TimelineCore};
use super::error::TimelineError;
use super::plan::WorkPlan;
use super::{Placement, Timeline, TimelinePolicy};

/// Holds each pool only while the chain members that use it run.
///
/// A kind used by the first member only is released when that member ends.
/// For an independent single work every kind is placed on its own and may
/// start as soon as it is free; the work spans from the first kind's start
/// to the last kind's end.
#[derive(Debug, Clone)]
pub struct JustInTimeTimeline {
    core: TimelineCore,
}

impl JustInTimeTimeline {
    pub fn new(core: TimelineCore) -> Self {
        Self { core }
    }

    fn place_independent(
        &self,
        plan: &WorkPlan,
        contractor: Option<&str>,
        from: f64,
    ) -> Result<Placement, TimelineError> {
        let mut windows = Vec::new();
        for demand in plan.demands.iter().filter(|d| d.count > 0 && d.length > 0.0) {
            let slot = Slot {
                key: &demand.key,
                count: demand.count,
                offset: 0.0,
                length: demand.length,
            };
            let start = self
                .core
                .earliest_joint(contractor, &[slot], from)?
                .ok_or_else(|| TimelineError::NoFeasibleWindow(plan.head().to_string()))?;
            windows.push(slot.window(start));
        }

        let start = windows
            .iter()
            .map(|w| w.interval.start().value())
            .reduce(f64::min)
            .unwrap_or(from);
        let finish = windows
            .iter()
            .map(|w| w.interval.end().value())
            .fold(start + plan.total, f64::max);
        Ok(Placement {
            start,
            finish,
            windows,
        })
    }
}

impl Timeline for JustInTimeTimeline {
    fn core(&self) -> &TimelineCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut TimelineCore {
        &mut self.core
    }

    fn policy(&self) -> TimelinePolicy {
        TimelinePolicy::JustInTime
    }

    fn place(
        &self,
        plan: &WorkPlan,
        contractor: Option<&str>,
        from: f64,
    ) -> Result<Placement, TimelineError> {
        if plan.independent {
            return self.place_independent(plan, contractor, from);
        }
        let slots: Vec<Slot<'_>> = plan
            .demands
            .iter()
            .filter(|d| d.count > 0 && d.length > 0.0)
            .map(|d| Slot {
                key: &d.key,
                count: d.count,
                offset: d.offset,
                length: d.length,
            })
            .collect();
        let start = self
            .core
            .earliest_joint(contractor, &slots, from)?
            .ok_or_else(|| TimelineError::NoFeasibleWindow(plan.head().to_string()))?;
        Ok(Placement {
            start,
            finish: start + plan.total,
            windows: slots.iter().map(|s| s.window(start)).collect(),
        })
    }
}
