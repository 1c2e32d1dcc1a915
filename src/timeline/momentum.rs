use super::engine::{Slot, TimelineCore};
use super::error::TimelineError;
use super::plan::WorkPlan;
use super::{Placement, Timeline, TimelinePolicy};

/// Reserves the whole team for the whole chain as one synchronized block.
///
/// Nobody is released before the chain finishes, so every window is
/// `[start, start + total)` and `is_independent` has no effect.
#[derive(Debug, Clone)]
pub struct MomentumTimeline {
    core: TimelineCore,
}

impl MomentumTimeline {
    pub fn new(core: TimelineCore) -> Self {
        Self { core }
    }
}

impl Timeline for MomentumTimeline {
    fn core(&self) -> &TimelineCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut TimelineCore {
        &mut self.core
    }

    fn policy(&self) -> TimelinePolicy {
        TimelinePolicy::Momentum
    }

    fn place(
        &self,
        plan: &WorkPlan,
        contractor: Option<&str>,
        from: f64,
    ) -> Result<Placement, TimelineError> {
        let slots: Vec<Slot<'_>> = if plan.total > 0.0 {
            plan.demands
                .iter()
                .filter(|d| d.count > 0)
                .map(|d| Slot {
                    key: &d.key,
                    count: d.count,
                    offset: 0.0,
                    length: plan.total,
                })
                .collect()
        } else {
            Vec::new()
        };
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
