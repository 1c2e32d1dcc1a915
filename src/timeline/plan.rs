use std::collections::BTreeMap;

use super::estimator::{Team, WorkTimeEstimator};
use crate::graph::{GraphError, WorkGraph};
use crate::resource::ResourceKey;
use crate::schedule::ScheduleSpec;
use crate::Id;

/// One chain member, relative to the chain start.
#[derive(Debug, Clone, PartialEq)]
pub struct ChainMember {
    pub id: Id,
    pub offset: f64,
    pub duration: f64,
}

/// `count` units of one pool, needed over `[offset, offset + length)`
/// relative to the chain start.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceDemand {
    pub key: ResourceKey,
    pub count: usize,
    pub offset: f64,
    pub length: f64,
}

impl ResourceDemand {
    pub fn end(&self) -> f64 {
        self.offset + self.length
    }
}

/// A zone the chain occupies in `status`, left in `post` afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneDemand {
    pub zone: String,
    pub status: usize,
    pub post: usize,
}

/// Everything a timeline needs to place a chain: member layout, pool
/// demands and zone demands.
///
/// For an independent single work each demand's `length` is the time its own
/// kind needs rather than the whole work duration.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkPlan {
    pub members: Vec<ChainMember>,
    pub demands: Vec<ResourceDemand>,
    pub zones: Vec<ZoneDemand>,
    pub total: f64,
    pub independent: bool,
}

#[derive(Debug, Clone, Copy)]
struct Usage {
    count: usize,
    first: f64,
    last_end: f64,
    own: f64,
}

impl Usage {
    fn widen(&mut self, other: Usage) {
        self.count = self.count.max(other.count);
        self.first = self.first.min(other.first);
        self.last_end = self.last_end.max(other.last_end);
        self.own = self.own.max(other.own);
    }
}

fn record(usage: &mut BTreeMap<ResourceKey, Usage>, key: ResourceKey, u: Usage) {
    usage.entry(key).and_modify(|old| old.widen(u)).or_insert(u);
}

impl WorkPlan {
    /// Lays out the chain that `head` starts.
    pub fn build(
        graph: &WorkGraph,
        head: &str,
        team: &Team,
        spec: &ScheduleSpec,
        estimator: &dyn WorkTimeEstimator,
        zone_posts: &BTreeMap<String, usize>,
    ) -> Result<Self, GraphError> {
        let chain = graph.chain(head)?;
        let mut members = Vec::with_capacity(chain.len());
        let mut usage: BTreeMap<ResourceKey, Usage> = BTreeMap::new();
        let mut zones: Vec<ZoneDemand> = Vec::new();
        let mut offset = 0.0;

        for id in &chain {
            let unit = graph
                .unit(id)
                .ok_or_else(|| GraphError::NodeNotFound(id.to_string()))?;
            let ws = spec.get(id);
            let by_kind = estimator.estimate_by_kind(unit, &team.workers);
            let duration = match ws.assigned_time() {
                Some(t) => t.value(),
                None => estimator.estimate(unit, &team.workers),
            };
            let end = offset + duration;

            if duration > 0.0 {
                for req in unit.worker_reqs() {
                    let count = team.count(req.kind());
                    let own = match ws.assigned_time() {
                        Some(_) => duration,
                        None => by_kind.get(req.kind()).copied().unwrap_or(0.0),
                    };
                    if count == 0 || own <= 0.0 {
                        continue;
                    }
                    let u = Usage {
                        count,
                        first: offset,
                        last_end: end,
                        own,
                    };
                    record(&mut usage, ResourceKey::worker(req.kind()), u);
                }
                for req in unit.equipment_reqs() {
                    if req.count == 0 {
                        continue;
                    }
                    let u = Usage {
                        count: req.count,
                        first: offset,
                        last_end: end,
                        own: duration,
                    };
                    record(&mut usage, ResourceKey::equipment(req.kind.clone()), u);
                }
            }

            for req in unit.zone_reqs() {
                if zones.iter().any(|z| z.zone == req.kind) {
                    continue;
                }
                zones.push(ZoneDemand {
                    zone: req.kind.clone(),
                    status: req.required_status,
                    post: zone_posts
                        .get(&req.kind)
                        .copied()
                        .unwrap_or(req.required_status),
                });
            }

            members.push(ChainMember {
                id: id.to_string(),
                offset,
                duration,
            });
            offset = end;
        }

        let independent = chain.len() == 1 && spec.get(head).is_independent();
        let demands = usage
            .into_iter()
            .map(|(key, u)| {
                let (offset, length) = if independent {
                    (0.0, u.own)
                } else {
                    (u.first, u.last_end - u.first)
                };
                ResourceDemand {
                    key,
                    count: u.count,
                    offset,
                    length,
                }
            })
            .collect();

        Ok(Self {
            members,
            demands,
            zones,
            total: offset,
            independent,
        })
    }

    pub fn head(&self) -> &str {
        self.members.first().map_or("", |m| m.id.as_str())
    }
}
