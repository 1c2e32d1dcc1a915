use std::collections::BTreeMap;
use std::fmt::Debug;

use crate::work::WorkUnit;
use crate::Id;

/// Workers and contractor assigned to one work (or chain).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Team {
    pub contractor_id: Option<Id>,
    /// Worker kind → head count.
    pub workers: BTreeMap<String, usize>,
}

impl Team {
    pub fn new(contractor_id: impl Into<Id>) -> Self {
        Self {
            contractor_id: Some(contractor_id.into()),
            workers: BTreeMap::new(),
        }
    }

    pub fn with(mut self, kind: impl Into<String>, count: usize) -> Self {
        self.workers.insert(kind.into(), count);
        self
    }

    pub fn count(&self, kind: &str) -> usize {
        self.workers.get(kind).copied().unwrap_or(0)
    }
}

/// Turns a work and a team into durations on the axis.
pub trait WorkTimeEstimator: Send + Sync + Debug {
    /// Time each worker kind needs to do its share of `unit`.
    ///
    /// Kinds that take no time (or have nobody assigned) are left out.
    fn estimate_by_kind(
        &self,
        unit: &WorkUnit,
        workers: &BTreeMap<String, usize>,
    ) -> BTreeMap<String, f64>;

    /// Duration of the whole work: the slowest kind.
    fn estimate(&self, unit: &WorkUnit, workers: &BTreeMap<String, usize>) -> f64 {
        self.estimate_by_kind(unit, workers)
            .into_values()
            .fold(0.0, f64::max)
    }
}

/// One unit of volume per worker per axis unit, rounded up to whole units.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultWorkTimeEstimator;

impl WorkTimeEstimator for DefaultWorkTimeEstimator {
    fn estimate_by_kind(
        &self,
        unit: &WorkUnit,
        workers: &BTreeMap<String, usize>,
    ) -> BTreeMap<String, f64> {
        let mut out = BTreeMap::new();
        if unit.is_service_unit() {
            return out;
        }
        for req in unit.worker_reqs() {
            let count = workers.get(req.kind()).copied().unwrap_or(0);
            if count == 0 || req.volume() <= 0.0 {
                continue;
            }
            let time = (req.volume() / count as f64).ceil();
            let slot = out.entry(req.kind().to_string()).or_insert(0.0);
            *slot = f64::max(*slot, time);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::work::WorkerReq;

    fn unit() -> WorkUnit {
        WorkUnit::new("w", "masonry")
            .with_requirement(WorkerReq::new("mason", 10.0, 1, 5).unwrap())
            .with_requirement(WorkerReq::new("driver", 3.0, 1, 2).unwrap())
    }

    #[test]
    fn slowest_kind_wins() {
        let team = Team::new("c").with("mason", 4).with("driver", 1);
        let by_kind = DefaultWorkTimeEstimator.estimate_by_kind(&unit(), &team.workers);
        assert_eq!(by_kind["mason"], 3.0);
        assert_eq!(by_kind["driver"], 3.0);
        assert_eq!(DefaultWorkTimeEstimator.estimate(&unit(), &team.workers), 3.0);
    }

    #[test]
    fn missing_kinds_are_skipped() {
        let team = Team::new("c").with("mason", 10);
        let by_kind = DefaultWorkTimeEstimator.estimate_by_kind(&unit(), &team.workers);
        assert_eq!(by_kind.len(), 1);
        assert_eq!(by_kind["mason"], 1.0);
    }

    #[test]
    fn service_units_take_no_time() {
        let team = Team::new("c").with("mason", 1);
        let svc = WorkUnit::service("s", "milestone");
        assert_eq!(DefaultWorkTimeEstimator.estimate(&svc, &team.workers), 0.0);
        let empty = WorkUnit::new("e", "empty");
        assert_eq!(DefaultWorkTimeEstimator.estimate(&empty, &team.workers), 0.0);
    }
}
