use std::collections::{HashMap, HashSet};

use crate::graph::{GraphEdge, GraphError, WorkGraph, WorkGraphBuilder};
use crate::Id;

/// How copied works are renamed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdStrategy {
    /// Fresh UUID per work.
    #[default]
    Fresh,
    /// Sequential integers `offset, offset + 1, ...` in graph order.
    Simplified { offset: usize },
    /// Keep the original ids.
    Keep,
}

/// A copied graph together with the id remapping used to build it.
#[derive(Debug, Clone)]
pub struct GraphCopy {
    pub graph: WorkGraph,
    pub old_to_new: HashMap<Id, Id>,
}

/// Copied works and the edges among them, not yet wrapped in sentinels.
pub(super) struct CopiedParts {
    pub builder: WorkGraphBuilder,
    pub old_to_new: HashMap<Id, Id>,
}

impl CopiedParts {
    pub fn mapped<'a>(&'a self, old: &str) -> Result<&'a str, GraphError> {
        self.old_to_new
            .get(old)
            .map(String::as_str)
            .ok_or_else(|| GraphError::NodeNotFound(old.to_string()))
    }
}

pub(super) fn new_id(strategy: IdStrategy, index: usize, old: &str) -> Id {
    match strategy {
        IdStrategy::Fresh => crate::generate_id(),
        IdStrategy::Simplified { offset } => (offset + index).to_string(),
        IdStrategy::Keep => old.to_string(),
    }
}

/// Copies every work of `wg` not in `excluded` and restores the edges
/// between retained works.
pub(super) fn copy_parts(
    wg: &WorkGraph,
    excluded: &HashSet<&str>,
    ids: IdStrategy,
) -> Result<CopiedParts, GraphError> {
    let mut builder = WorkGraphBuilder::new();
    let mut old_to_new = HashMap::new();

    for (index, unit) in wg.units().enumerate() {
        if excluded.contains(unit.id()) {
            continue;
        }
        let id = new_id(ids, index, unit.id());
        old_to_new.insert(unit.id().to_string(), id.clone());
        builder.add_unit(unit.clone().with_id(id))?;
    }

    for (from, to, edge) in wg.edges() {
        if let (Some(a), Some(b)) = (old_to_new.get(from), old_to_new.get(to)) {
            builder.add_edge(a, b, edge)?;
        }
    }

    Ok(CopiedParts {
        builder,
        old_to_new,
    })
}

/// Full copy of `wg` without the works in `excluded`.
///
/// Removed works are not bridged; use [`delete_node`](super::delete_node) to
/// keep precedence across a removal.
///
/// # Errors
///
/// - `NodeNotFound` if an excluded id is not in the graph
/// - `SentinelViolation` if a sentinel is excluded
pub fn prepare_copy(
    wg: &WorkGraph,
    excluded: &[&str],
    ids: IdStrategy,
) -> Result<GraphCopy, GraphError> {
    for id in excluded {
        if !wg.contains(id) {
            return Err(GraphError::NodeNotFound(id.to_string()));
        }
        if wg.is_sentinel(id) {
            return Err(GraphError::SentinelViolation(id.to_string()));
        }
    }
    let excluded: HashSet<&str> = excluded.iter().copied().collect();
    let parts = copy_parts(wg, &excluded, ids)?;
    finish_copy(wg, parts, &[])
}

/// Adds `extra` edges (in new ids) and rebuilds around the copied sentinels.
pub(super) fn finish_copy(
    wg: &WorkGraph,
    parts: CopiedParts,
    extra: &[(Id, Id, GraphEdge)],
) -> Result<GraphCopy, GraphError> {
    let start = parts.mapped(wg.start_id())?.to_string();
    let finish = parts.mapped(wg.finish_id())?.to_string();
    let CopiedParts {
        mut builder,
        old_to_new,
    } = parts;
    for (from, to, edge) in extra {
        builder.add_edge(from, to, *edge)?;
    }
    let graph = builder.build_with_sentinels(&start, &finish)?;
    Ok(GraphCopy { graph, old_to_new })
}
