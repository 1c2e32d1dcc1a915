use std::collections::{HashMap, HashSet};

use tracing::debug;

use super::copy::{copy_parts, finish_copy, new_id, prepare_copy, GraphCopy, IdStrategy};
use crate::graph::{Dependency, GraphEdge, GraphError, WorkGraph};
use crate::work::WorkUnit;
use crate::Id;

/// Removes the work `id` together with its whole inseparable chain.
///
/// Every external parent of the removed chain becomes a direct finish-start
/// parent of every external child, so no precedence between surviving works
/// is gained or lost.
///
/// # Errors
///
/// - `NodeNotFound` if `id` is not in the graph
/// - `SentinelViolation` if `id` is the start or finish sentinel
pub fn delete_node(wg: &WorkGraph, id: &str, ids: IdStrategy) -> Result<GraphCopy, GraphError> {
    if !wg.contains(id) {
        return Err(GraphError::NodeNotFound(id.to_string()));
    }
    if wg.is_sentinel(id) {
        return Err(GraphError::SentinelViolation(id.to_string()));
    }

    let chain = wg.chain(id)?;
    let removed: HashSet<&str> = chain.iter().copied().collect();

    let mut parents: Vec<&str> = Vec::new();
    let mut children: Vec<&str> = Vec::new();
    for member in &chain {
        for (p, _) in wg.parents(member)? {
            if !removed.contains(p) && !parents.contains(&p) {
                parents.push(p);
            }
        }
        for (c, _) in wg.children(member)? {
            if !removed.contains(c) && !children.contains(&c) {
                children.push(c);
            }
        }
    }
    debug!(
        work = id,
        chain_len = chain.len(),
        parents = parents.len(),
        children = children.len(),
        "Deleting work chain"
    );

    let parts = copy_parts(wg, &removed, ids)?;
    let mut bridges = Vec::with_capacity(parents.len() * children.len());
    for p in &parents {
        for c in &children {
            bridges.push((
                parts.mapped(p)?.to_string(),
                parts.mapped(c)?.to_string(),
                GraphEdge::finish_start(),
            ));
        }
    }
    finish_copy(wg, parts, &bridges)
}

/// Inserts `unit` between the given parents and children.
///
/// The inserted unit keeps its own id; a unit without parents hangs under
/// start and one without children under finish.
///
/// # Errors
///
/// - `DuplicateId` if the unit id is already taken
/// - `NodeNotFound` if a parent or child id is unknown
/// - `SentinelViolation` for a child edge into start or a parent edge out of finish
pub fn insert_work_unit(
    wg: &WorkGraph,
    unit: WorkUnit,
    parents: &[Dependency],
    children: &[Dependency],
    ids: IdStrategy,
) -> Result<GraphCopy, GraphError> {
    if wg.contains(unit.id()) {
        return Err(GraphError::DuplicateId(unit.id().to_string()));
    }
    for dep in parents.iter().chain(children) {
        if !wg.contains(&dep.id) {
            return Err(GraphError::NodeNotFound(dep.id.clone()));
        }
    }
    if let Some(dep) = parents.iter().find(|d| d.id == wg.finish_id()) {
        return Err(GraphError::SentinelViolation(dep.id.clone()));
    }
    if let Some(dep) = children.iter().find(|d| d.id == wg.start_id()) {
        return Err(GraphError::SentinelViolation(dep.id.clone()));
    }

    let mut parts = copy_parts(wg, &HashSet::new(), ids)?;
    let unit_id = unit.id().to_string();
    parts.builder.add_unit(unit)?;

    let mut extra = Vec::with_capacity(parents.len() + children.len());
    for dep in parents {
        extra.push((parts.mapped(&dep.id)?.to_string(), unit_id.clone(), dep.edge));
    }
    for dep in children {
        extra.push((unit_id.clone(), parts.mapped(&dep.id)?.to_string(), dep.edge));
    }
    let mut copy = finish_copy(wg, parts, &extra)?;
    copy.old_to_new.insert(unit_id.clone(), unit_id);
    Ok(copy)
}

/// Result of [`insert_graph`].
#[derive(Debug, Clone)]
pub struct InsertedGraph {
    pub graph: WorkGraph,
    pub master_ids: HashMap<Id, Id>,
    pub slave_ids: HashMap<Id, Id>,
}

/// Merges `slave` into `master`.
///
/// The works the slave start led to become children of `master_start`, and
/// the works that led to the slave finish become parents of
/// `master_finish`. The slave sentinels themselves are dropped.
///
/// # Errors
///
/// - `NodeNotFound` if `master_start` or `master_finish` is unknown
/// - `DuplicateId` if kept ids collide between the two graphs
/// - `CycleDetected` if `master_finish` precedes `master_start`
pub fn insert_graph(
    master: &WorkGraph,
    master_start: &str,
    master_finish: &str,
    slave: &WorkGraph,
    ids: IdStrategy,
) -> Result<InsertedGraph, GraphError> {
    for id in [master_start, master_finish] {
        if !master.contains(id) {
            return Err(GraphError::NodeNotFound(id.to_string()));
        }
    }

    let mut parts = copy_parts(master, &HashSet::new(), ids)?;

    // Slave ids continue after the master's when simplifying.
    let slave_strategy = match ids {
        IdStrategy::Simplified { offset } => IdStrategy::Simplified {
            offset: offset + master.len(),
        },
        other => other,
    };
    let mut slave_ids: HashMap<Id, Id> = HashMap::new();
    for (index, unit) in slave.units().enumerate() {
        if slave.is_sentinel(unit.id()) {
            continue;
        }
        let id = new_id(slave_strategy, index, unit.id());
        slave_ids.insert(unit.id().to_string(), id.clone());
        parts.builder.add_unit(unit.clone().with_id(id))?;
    }

    let mut extra: Vec<(Id, Id, GraphEdge)> = Vec::new();
    for (from, to, edge) in slave.edges() {
        if let (Some(a), Some(b)) = (slave_ids.get(from), slave_ids.get(to)) {
            extra.push((a.clone(), b.clone(), edge));
        }
    }
    let new_master_start = parts.mapped(master_start)?.to_string();
    let new_master_finish = parts.mapped(master_finish)?.to_string();
    for (child, _) in slave.children(slave.start_id())? {
        if let Some(c) = slave_ids.get(child) {
            extra.push((new_master_start.clone(), c.clone(), GraphEdge::finish_start()));
        }
    }
    for (parent, _) in slave.parents(slave.finish_id())? {
        if let Some(p) = slave_ids.get(parent) {
            extra.push((p.clone(), new_master_finish.clone(), GraphEdge::finish_start()));
        }
    }

    debug!(
        inserted = slave_ids.len(),
        master = master.len(),
        "Inserting graph into master"
    );
    let GraphCopy { graph, old_to_new } = finish_copy(master, parts, &extra)?;
    Ok(InsertedGraph {
        graph,
        master_ids: old_to_new,
        slave_ids,
    })
}

/// Copy of `wg` with ids replaced by `offset, offset + 1, ...`.
pub fn simplify_ids(wg: &WorkGraph, offset: usize) -> Result<GraphCopy, GraphError> {
    prepare_copy(wg, &[], IdStrategy::Simplified { offset })
}
