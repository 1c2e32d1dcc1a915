//! Variation operators over [`Chromosome`]s.
//!
//! Order operators keep `order` a permutation of the head indices. Resource
//! genes travel per head: a child takes a head's contractor, team, scale and
//! zone posts together from one parent.

use rand::Rng;

use super::chromosome::{Chromosome, Individual};
use super::context::ScheduleContext;

/// Precedence operation crossover on the order, uniform per-head crossover
/// on the resource genes.
///
/// A random subset of heads keeps its positions from `p1`; the remaining
/// positions are filled with the other heads in `p2` order.
pub fn pox_crossover<R: Rng>(p1: &Chromosome, p2: &Chromosome, rng: &mut R) -> Chromosome {
    let n = p1.order.len();
    let keep: Vec<bool> = (0..n).map(|_| rng.gen_bool(0.5)).collect();

    let mut fill = p2.order.iter().copied().filter(|&h| !keep[h]);
    let order = p1
        .order
        .iter()
        .map(|&h| {
            if keep[h] {
                h
            } else {
                // same count of non-kept heads on both sides
                fill.next().unwrap_or(h)
            }
        })
        .collect();

    let mut child = Chromosome {
        order,
        ..p1.clone()
    };
    for head in 0..n {
        if rng.gen_bool(0.5) {
            child.contractors[head] = p2.contractors[head];
            child.teams[head] = p2.teams[head].clone();
            child.scales[head] = p2.scales[head];
            child.zone_posts[head] = p2.zone_posts[head].clone();
        }
    }
    child
}

/// Swaps two random positions of the order.
pub fn swap_mutation<R: Rng>(chromosome: &mut Chromosome, rng: &mut R) {
    let n = chromosome.order.len();
    if n < 2 {
        return;
    }
    let i = rng.gen_range(0..n);
    let j = rng.gen_range(0..n);
    chromosome.order.swap(i, j);
}

/// Moves one head to another position of the order.
pub fn insert_mutation<R: Rng>(chromosome: &mut Chromosome, rng: &mut R) {
    let n = chromosome.order.len();
    if n < 2 {
        return;
    }
    let from = rng.gen_range(0..n);
    let to = rng.gen_range(0..n);
    let head = chromosome.order.remove(from);
    chromosome.order.insert(to, head);
}

/// Reverses a random segment of the order.
pub fn invert_mutation<R: Rng>(chromosome: &mut Chromosome, rng: &mut R) {
    let n = chromosome.order.len();
    if n < 2 {
        return;
    }
    let a = rng.gen_range(0..n);
    let b = rng.gen_range(0..n);
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    chromosome.order[lo..=hi].reverse();
}

/// Applies one of the order mutations, chosen uniformly.
pub fn mutate_order<R: Rng>(chromosome: &mut Chromosome, rng: &mut R) {
    match rng.gen_range(0..3) {
        0 => swap_mutation(chromosome, rng),
        1 => insert_mutation(chromosome, rng),
        _ => invert_mutation(chromosome, rng),
    }
}

/// Reassigns each head with probability `rate`: contractor, team and scale
/// are redrawn. Zone posts move to a random status with the same
/// probability.
pub fn resource_mutation<R: Rng>(
    chromosome: &mut Chromosome,
    ctx: &ScheduleContext,
    rate: f64,
    rng: &mut R,
) {
    let statuses = ctx.zones().statuses();
    for head in 0..chromosome.order.len() {
        if ctx.heads()[head].is_service {
            continue;
        }
        if rng.gen_bool(rate) {
            chromosome.reassign(ctx, head, rng);
            chromosome.scales[head] = rng.gen_range(0.5..=1.5);
        }
        if statuses > 0 {
            for post in chromosome.zone_posts[head].values_mut() {
                if rng.gen_bool(rate) {
                    *post = rng.gen_range(0..statuses);
                }
            }
        }
    }
}

/// Best of `size` individuals drawn with replacement.
///
/// `population` must not be empty.
pub fn tournament<'a, R: Rng>(
    population: &'a [Individual],
    size: usize,
    rng: &mut R,
) -> &'a Individual {
    let mut best = &population[rng.gen_range(0..population.len())];
    for _ in 1..size {
        let other = &population[rng.gen_range(0..population.len())];
        if other.fitness < best.fitness {
            best = other;
        }
    }
    best
}
