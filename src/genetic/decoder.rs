use std::collections::BTreeSet;
use std::fmt::Debug;
use std::sync::Arc;

use super::chromosome::Chromosome;
use super::context::ScheduleContext;
use super::error::OptimizerError;
use crate::schedule::Schedule;
use crate::timeline::{Team, WorkRequest};

/// Turns a chromosome into a schedule.
pub trait Decoder: Send + Sync + Debug {
    fn decode(&self, chromosome: &Chromosome) -> Result<Schedule, OptimizerError>;
}

/// Serial schedule generation: heads are committed one at a time, always
/// picking the ready head that comes first in the chromosome order.
///
/// Every decode builds its own timeline, so decodes of different
/// chromosomes never share state and may run on any thread.
#[derive(Debug, Clone)]
pub struct SerialDecoder {
    context: Arc<ScheduleContext>,
}

impl SerialDecoder {
    pub fn new(context: Arc<ScheduleContext>) -> Self {
        Self { context }
    }

    pub fn context(&self) -> &ScheduleContext {
        &self.context
    }

    /// Team of `head`: spec overrides first, otherwise the scaled gene
    /// clamped into the chain bounds and the contractor's pool.
    pub fn team(&self, chromosome: &Chromosome, head: usize) -> Result<Team, OptimizerError> {
        let ctx = &self.context;
        let info = &ctx.heads()[head];
        if info.is_service {
            return Ok(Team::default());
        }
        let index = chromosome.contractors[head];
        let contractor = ctx.contractors().get(index).ok_or_else(|| {
            OptimizerError::MalformedChromosome(format!("no contractor at index {index}"))
        })?;

        let mut team = Team::new(contractor.id.clone());
        let scale = chromosome.scales[head];
        for (kind, gene) in ctx.worker_kinds().iter().zip(&chromosome.teams[head]) {
            let Some(bounds) = info.bounds.get(kind) else {
                continue;
            };
            let assigned = info
                .members
                .iter()
                .find_map(|m| chromosome.spec.get(m).assigned_count(kind));
            let count = match assigned {
                Some(count) => count,
                None => {
                    let scaled = (*gene as f64 * scale).round() as usize;
                    bounds.clamp(scaled, contractor.worker_count(kind))
                }
            };
            team = team.with(kind.clone(), count);
        }
        Ok(team)
    }
}

impl Decoder for SerialDecoder {
    fn decode(&self, chromosome: &Chromosome) -> Result<Schedule, OptimizerError> {
        let ctx = &self.context;
        chromosome.check(ctx)?;
        let heads = ctx.heads();

        let mut position = vec![0; heads.len()];
        for (p, &h) in chromosome.order.iter().enumerate() {
            position[h] = p;
        }
        let mut pending: Vec<usize> = heads.iter().map(|h| h.parents.len()).collect();
        let mut ready: BTreeSet<(usize, usize)> = pending
            .iter()
            .enumerate()
            .filter(|(_, &n)| n == 0)
            .map(|(h, _)| (position[h], h))
            .collect();

        let mut timeline = ctx.timeline();
        let mut schedule = Schedule::new();
        let mut done = 0;
        while let Some((_, h)) = ready.pop_first() {
            let team = self.team(chromosome, h)?;
            let request = WorkRequest {
                node: &heads[h].id,
                team: &team,
                spec: &chromosome.spec,
                zone_posts: &chromosome.zone_posts[h],
            };
            timeline.schedule(ctx.graph(), &request, &mut schedule)?;
            done += 1;
            for &child in &heads[h].children {
                pending[child] -= 1;
                if pending[child] == 0 {
                    ready.insert((position[child], child));
                }
            }
        }

        if done != heads.len() {
            return Err(OptimizerError::IllegalState(format!(
                "decoded {done} of {} chains",
                heads.len()
            )));
        }
        Ok(schedule)
    }
}
