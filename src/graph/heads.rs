use std::collections::{BTreeSet, HashMap};

use super::error::GraphError;
use super::work_graph::WorkGraph;
use crate::Id;

/// Chain-collapsed view of a [`WorkGraph`].
///
/// Each inseparable chain is represented by its head. A head's parents and
/// children are the union of those of every chain member, mapped to their
/// own heads, without self references.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HeadNodes {
    /// Heads in topological order, ties broken by id.
    pub order: Vec<Id>,
    pub parents: HashMap<Id, BTreeSet<Id>>,
    pub children: HashMap<Id, BTreeSet<Id>>,
    /// Head → chain members, head first.
    pub chains: HashMap<Id, Vec<Id>>,
}

impl HeadNodes {
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn position(&self, head: &str) -> Option<usize> {
        self.order.iter().position(|h| h == head)
    }

    pub fn chain(&self, head: &str) -> &[Id] {
        self.chains.get(head).map_or(&[], Vec::as_slice)
    }
}

impl WorkGraph {
    /// Collapses inseparable chains onto their heads.
    pub fn head_nodes_with_connections(&self) -> Result<HeadNodes, GraphError> {
        let mut head_of: HashMap<&str, &str> = HashMap::new();
        let mut chains: HashMap<Id, Vec<Id>> = HashMap::new();
        for id in self.ids() {
            if self.is_inseparable_son(id) {
                continue;
            }
            let chain = self.chain(id)?;
            for &member in &chain {
                head_of.insert(member, id);
            }
            chains.insert(id.to_string(), chain.into_iter().map(str::to_string).collect());
        }

        let mut parents: HashMap<Id, BTreeSet<Id>> = HashMap::new();
        let mut children: HashMap<Id, BTreeSet<Id>> = HashMap::new();
        for (head, members) in &chains {
            let mut ps = BTreeSet::new();
            let mut cs = BTreeSet::new();
            for member in members {
                for (p, _) in self.parents(member)? {
                    ps.insert(head_of[p].to_string());
                }
                for (c, _) in self.children(member)? {
                    cs.insert(head_of[c].to_string());
                }
            }
            ps.remove(head);
            cs.remove(head);
            parents.insert(head.clone(), ps);
            children.insert(head.clone(), cs);
        }

        let order = level_sorted_toposort(&parents)?;
        Ok(HeadNodes {
            order,
            parents,
            children,
            chains,
        })
    }
}

/// Kahn's algorithm one level at a time; each level is sorted by id so the
/// order only depends on the graph structure.
fn level_sorted_toposort(parents: &HashMap<Id, BTreeSet<Id>>) -> Result<Vec<Id>, GraphError> {
    let mut remaining: HashMap<&str, BTreeSet<&str>> = parents
        .iter()
        .map(|(k, v)| (k.as_str(), v.iter().map(String::as_str).collect()))
        .collect();
    let mut order = Vec::with_capacity(remaining.len());

    while !remaining.is_empty() {
        let mut level: Vec<&str> = remaining
            .iter()
            .filter(|(_, ps)| ps.is_empty())
            .map(|(k, _)| *k)
            .collect();
        if level.is_empty() {
            return Err(GraphError::GraphContainsCycle);
        }
        level.sort_unstable();
        for id in &level {
            remaining.remove(id);
        }
        for ps in remaining.values_mut() {
            for id in &level {
                ps.remove(id);
            }
        }
        order.extend(level.into_iter().map(str::to_string));
    }
    Ok(order)
}
