use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};

use rand::seq::SliceRandom;
use rand::Rng;

use super::context::{CountBounds, ScheduleContext};
use super::error::OptimizerError;
use crate::schedule::ScheduleSpec;

/// Encoded candidate schedule.
///
/// Every vector except `order` is indexed by head index. `order` is a
/// permutation of head indices: among the heads whose predecessors are done,
/// the one appearing first is scheduled next, so any permutation decodes.
#[derive(Debug, Clone, PartialEq)]
pub struct Chromosome {
    pub order: Vec<usize>,
    /// Index into the context's contractors.
    pub contractors: Vec<usize>,
    /// Worker count genes, one per context worker kind.
    pub teams: Vec<Vec<usize>>,
    /// Multiplier applied to the team genes when decoding.
    pub scales: Vec<f64>,
    pub spec: ScheduleSpec,
    /// Zone → status each chain leaves behind.
    pub zone_posts: Vec<BTreeMap<String, usize>>,
}

impl Chromosome {
    /// Topological order, first eligible contractor, largest teams.
    pub fn baseline(ctx: &ScheduleContext) -> Self {
        let n = ctx.head_count();
        let contractors: Vec<usize> = (0..n)
            .map(|h| ctx.eligible_contractors(h).first().copied().unwrap_or(0))
            .collect();
        let teams = (0..n)
            .map(|h| team_genes(ctx, h, contractors[h], |b, cap| b.upper(cap)))
            .collect();
        Self {
            order: (0..n).collect(),
            contractors,
            teams,
            scales: vec![1.0; n],
            spec: ctx.spec().clone(),
            zone_posts: required_zones(ctx),
        }
    }

    pub fn random<R: Rng>(ctx: &ScheduleContext, rng: &mut R) -> Self {
        let n = ctx.head_count();
        let mut order: Vec<usize> = (0..n).collect();
        order.shuffle(rng);
        let contractors: Vec<usize> = (0..n)
            .map(|h| ctx.eligible_contractors(h).choose(rng).copied().unwrap_or(0))
            .collect();
        let teams = (0..n)
            .map(|h| {
                team_genes(ctx, h, contractors[h], |b, cap| {
                    rng.gen_range(b.min..=b.upper(cap))
                })
            })
            .collect();
        Self {
            order,
            contractors,
            teams,
            scales: vec![1.0; n],
            spec: ctx.spec().clone(),
            zone_posts: required_zones(ctx),
        }
    }

    /// Redraws the contractor and team of one head.
    pub fn reassign<R: Rng>(&mut self, ctx: &ScheduleContext, head: usize, rng: &mut R) {
        if let Some(&c) = ctx.eligible_contractors(head).choose(rng) {
            self.contractors[head] = c;
        }
        let contractor = self.contractors[head];
        self.teams[head] = team_genes(ctx, head, contractor, |b, cap| {
            rng.gen_range(b.min..=b.upper(cap))
        });
    }

    /// Checks that the genes address the context's heads, contractors and
    /// worker kinds.
    pub fn check(&self, ctx: &ScheduleContext) -> Result<(), OptimizerError> {
        let n = ctx.head_count();
        let fail = |what: &str| Err(OptimizerError::MalformedChromosome(what.to_string()));
        if self.order.len() != n
            || self.contractors.len() != n
            || self.teams.len() != n
            || self.scales.len() != n
            || self.zone_posts.len() != n
        {
            return fail("gene lengths differ from the head count");
        }
        let mut seen = HashSet::with_capacity(n);
        if !self.order.iter().all(|&h| h < n && seen.insert(h)) {
            return fail("order is not a permutation of the heads");
        }
        if self
            .teams
            .iter()
            .any(|genes| genes.len() != ctx.worker_kinds().len())
        {
            return fail("team genes differ from the worker kinds");
        }
        if self.scales.iter().any(|s| !s.is_finite() || *s < 0.0) {
            return fail("scales must be finite and non-negative");
        }
        Ok(())
    }
}

fn team_genes<F>(ctx: &ScheduleContext, head: usize, contractor: usize, mut pick: F) -> Vec<usize>
where
    F: FnMut(&CountBounds, usize) -> usize,
{
    let info = &ctx.heads()[head];
    let pool = ctx.contractors().get(contractor);
    ctx.worker_kinds()
        .iter()
        .map(|kind| match info.bounds.get(kind) {
            Some(b) => pick(b, pool.map_or(0, |c| c.worker_count(kind))),
            None => 0,
        })
        .collect()
}

fn required_zones(ctx: &ScheduleContext) -> Vec<BTreeMap<String, usize>> {
    ctx.heads().iter().map(|h| h.zones.clone()).collect()
}

/// Objective tuple, lower is better, compared lexicographically.
///
/// Undecodable chromosomes get [`Fitness::infeasible`], which sorts after
/// every finite fitness.
#[derive(Debug, Clone)]
pub struct Fitness(Vec<f64>);

impl Fitness {
    pub fn new(values: Vec<f64>) -> Self {
        Self(values)
    }

    pub fn infeasible() -> Self {
        Self(vec![f64::INFINITY])
    }

    pub fn is_feasible(&self) -> bool {
        self.0.iter().all(|v| v.is_finite())
    }

    pub fn values(&self) -> &[f64] {
        &self.0
    }

    /// First component, the primary objective.
    pub fn primary(&self) -> f64 {
        self.0.first().copied().unwrap_or(f64::INFINITY)
    }
}

impl PartialEq for Fitness {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Fitness {}

impl PartialOrd for Fitness {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Fitness {
    fn cmp(&self, other: &Self) -> Ordering {
        for (a, b) in self.0.iter().zip(&other.0) {
            match a.total_cmp(b) {
                Ordering::Equal => continue,
                ord => return ord,
            }
        }
        self.0.len().cmp(&other.0.len())
    }
}

/// A chromosome with its evaluated fitness.
#[derive(Debug, Clone, PartialEq)]
pub struct Individual {
    pub chromosome: Chromosome,
    pub fitness: Fitness,
}

impl Individual {
    pub fn new(chromosome: Chromosome, fitness: Fitness) -> Self {
        Self {
            chromosome,
            fitness,
        }
    }
}

/// Fittest individual; the first one wins ties.
pub fn best_of(population: &[Individual]) -> Option<&Individual> {
    population
        .iter()
        .reduce(|best, ind| if ind.fitness < best.fitness { ind } else { best })
}

/// Sorts fittest first, keeping the incoming order among equals.
pub fn sort_by_fitness(population: &mut [Individual]) {
    population.sort_by(|a, b| a.fitness.cmp(&b.fitness));
}
