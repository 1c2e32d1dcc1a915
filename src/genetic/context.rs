use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

use super::error::OptimizerError;
use crate::graph::{HeadNodes, WorkGraph};
use crate::landscape::ZoneConfiguration;
use crate::resource::Contractor;
use crate::schedule::ScheduleSpec;
use crate::timeline::{DefaultWorkTimeEstimator, Timeline, TimelinePolicy, WorkTimeEstimator};
use crate::units::{time, Time};
use crate::Id;

/// Team size bounds of one worker kind over a whole chain.
///
/// One team staffs every member of a chain, so member bounds intersect:
/// the largest `min` and the smallest `max`. When members disagree outright
/// the largest `min` wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountBounds {
    pub min: usize,
    pub max: usize,
}

impl CountBounds {
    /// Upper bound once a pool of `capacity` is known. Never below `min`, so
    /// an undersized pool surfaces as a timeline error instead of a panic.
    pub fn upper(&self, capacity: usize) -> usize {
        self.max.min(capacity).max(self.min)
    }

    pub fn clamp(&self, count: usize, capacity: usize) -> usize {
        count.clamp(self.min, self.upper(capacity))
    }
}

/// Per chain data derived once from the graph.
#[derive(Debug, Clone, PartialEq)]
pub struct HeadInfo {
    pub id: Id,
    pub members: Vec<Id>,
    pub parents: Vec<usize>,
    pub children: Vec<usize>,
    /// Worker kind → team bounds; only kinds the chain needs.
    pub bounds: BTreeMap<String, CountBounds>,
    /// Zone → status the chain requires there.
    pub zones: BTreeMap<String, usize>,
    pub is_service: bool,
}

/// Everything a decode needs, built once per optimization run and shared by
/// every chromosome.
///
/// Heads are addressed by their index in the topological head order.
#[derive(Debug, Clone)]
pub struct ScheduleContext {
    graph: WorkGraph,
    contractors: Vec<Contractor>,
    spec: ScheduleSpec,
    zones: ZoneConfiguration,
    parent_time: Time,
    policy: TimelinePolicy,
    estimator: Arc<dyn WorkTimeEstimator>,
    heads: Vec<HeadInfo>,
    worker_kinds: Vec<String>,
}

impl ScheduleContext {
    pub fn new(graph: WorkGraph, contractors: Vec<Contractor>) -> Result<Self, OptimizerError> {
        let HeadNodes {
            order,
            parents,
            children,
            chains,
        } = graph.head_nodes_with_connections()?;
        let index: HashMap<&str, usize> = order
            .iter()
            .enumerate()
            .map(|(i, id)| (id.as_str(), i))
            .collect();
        let to_indices = |links: Option<&BTreeSet<Id>>| -> Vec<usize> {
            links
                .into_iter()
                .flatten()
                .filter_map(|id| index.get(id.as_str()).copied())
                .collect()
        };

        let mut kinds = BTreeSet::new();
        let mut heads = Vec::with_capacity(order.len());
        for id in &order {
            let members = chains.get(id).cloned().unwrap_or_else(|| vec![id.clone()]);
            let mut bounds: BTreeMap<String, CountBounds> = BTreeMap::new();
            let mut zones = BTreeMap::new();
            let mut is_service = true;
            for member in &members {
                let Some(unit) = graph.unit(member) else {
                    continue;
                };
                is_service &= unit.is_service_unit();
                for req in unit.worker_reqs() {
                    kinds.insert(req.kind().to_string());
                    bounds
                        .entry(req.kind().to_string())
                        .and_modify(|b| {
                            b.min = b.min.max(req.min_count());
                            b.max = b.max.min(req.max_count()).max(b.min);
                        })
                        .or_insert(CountBounds {
                            min: req.min_count(),
                            max: req.max_count(),
                        });
                }
                for req in unit.zone_reqs() {
                    zones.entry(req.kind.clone()).or_insert(req.required_status);
                }
            }
            heads.push(HeadInfo {
                id: id.clone(),
                members,
                parents: to_indices(parents.get(id)),
                children: to_indices(children.get(id)),
                bounds,
                zones,
                is_service,
            });
        }

        Ok(Self {
            graph,
            contractors,
            spec: ScheduleSpec::new(),
            zones: ZoneConfiguration::default(),
            parent_time: time(0.0),
            policy: TimelinePolicy::default(),
            estimator: Arc::new(DefaultWorkTimeEstimator),
            heads,
            worker_kinds: kinds.into_iter().collect(),
        })
    }

    pub fn with_spec(mut self, spec: ScheduleSpec) -> Self {
        self.spec = spec;
        self
    }

    pub fn with_zones(mut self, zones: ZoneConfiguration) -> Self {
        self.zones = zones;
        self
    }

    pub fn with_parent_time(mut self, parent_time: Time) -> Self {
        self.parent_time = parent_time;
        self
    }

    pub fn with_policy(mut self, policy: TimelinePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_estimator(mut self, estimator: Arc<dyn WorkTimeEstimator>) -> Self {
        self.estimator = estimator;
        self
    }

    pub fn graph(&self) -> &WorkGraph {
        &self.graph
    }

    pub fn contractors(&self) -> &[Contractor] {
        &self.contractors
    }

    pub fn spec(&self) -> &ScheduleSpec {
        &self.spec
    }

    pub fn zones(&self) -> &ZoneConfiguration {
        &self.zones
    }

    pub fn parent_time(&self) -> Time {
        self.parent_time
    }

    pub fn policy(&self) -> TimelinePolicy {
        self.policy
    }

    pub fn heads(&self) -> &[HeadInfo] {
        &self.heads
    }

    pub fn head_count(&self) -> usize {
        self.heads.len()
    }

    /// Every worker kind some work needs, sorted. Team genes follow this
    /// order.
    pub fn worker_kinds(&self) -> &[String] {
        &self.worker_kinds
    }

    /// Contractors whose pools can hold the minimal team of `head`.
    pub fn eligible_contractors(&self, head: usize) -> Vec<usize> {
        let Some(info) = self.heads.get(head) else {
            return Vec::new();
        };
        self.contractors
            .iter()
            .enumerate()
            .filter(|(_, c)| {
                info.bounds
                    .iter()
                    .all(|(kind, b)| c.worker_count(kind) >= b.min)
            })
            .map(|(i, _)| i)
            .collect()
    }

    /// A fresh timeline over the context's pools and zones.
    pub fn timeline(&self) -> Box<dyn Timeline> {
        self.policy.build(
            &self.contractors,
            self.zones.clone(),
            Arc::clone(&self.estimator),
            self.parent_time,
        )
    }
}
