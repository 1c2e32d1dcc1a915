use std::collections::HashMap;
use std::fmt::Display;

use petgraph::algo::toposort;
use petgraph::graph::NodeIndex;
use petgraph::stable_graph::StableGraph;
use petgraph::visit::EdgeRef;
use petgraph::Direction;

use super::edge::GraphEdge;
use super::error::GraphError;
use crate::work::WorkUnit;
use crate::Id;

/// Project DAG of [`WorkUnit`]s between a synthetic start and finish.
///
/// Nodes live in a petgraph arena and are addressed by stable ids, so a
/// chain-parent link is simply the source of an inseparable edge and graph
/// copies are id remaps.
///
/// # Invariants
///
/// - The graph is acyclic
/// - `start` is the only node without parents and `finish` the only node
///   without children, so every work is reachable from start and reaches
///   finish
/// - A work has at most one inseparable parent and one inseparable child
///
/// Graphs are only produced by [`WorkGraphBuilder`](super::WorkGraphBuilder)
/// and never change afterwards; the [`editor`](crate::editor) returns new
/// graphs.
#[derive(Debug, Clone)]
pub struct WorkGraph {
    pub(super) graph: StableGraph<WorkUnit, GraphEdge>,
    pub(super) id_by_node: HashMap<NodeIndex, Id>,
    pub(super) node_by_id: HashMap<Id, NodeIndex>,
    pub(super) start: NodeIndex,
    pub(super) finish: NodeIndex,
}

impl WorkGraph {
    pub fn start(&self) -> &WorkUnit {
        &self.graph[self.start]
    }

    pub fn finish(&self) -> &WorkUnit {
        &self.graph[self.finish]
    }

    pub fn start_id(&self) -> &str {
        self.start().id()
    }

    pub fn finish_id(&self) -> &str {
        self.finish().id()
    }

    pub fn is_sentinel(&self, id: &str) -> bool {
        id == self.start_id() || id == self.finish_id()
    }

    /// Number of works, sentinels included.
    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.node_by_id.contains_key(id)
    }

    /// Returns the node index for a work id, if it exists.
    pub fn node_of(&self, id: &str) -> Option<NodeIndex> {
        self.node_by_id.get(id).copied()
    }

    pub fn id_of(&self, node: NodeIndex) -> Option<&str> {
        self.id_by_node.get(&node).map(|s| s.as_str())
    }

    fn require(&self, id: &str) -> Result<NodeIndex, GraphError> {
        self.node_of(id)
            .ok_or_else(|| GraphError::NodeNotFound(id.to_string()))
    }

    pub fn unit(&self, id: &str) -> Option<&WorkUnit> {
        self.node_of(id).and_then(|n| self.graph.node_weight(n))
    }

    /// Works in insertion order.
    pub fn units(&self) -> impl Iterator<Item = &WorkUnit> + '_ {
        self.graph.node_indices().map(move |n| &self.graph[n])
    }

    /// Ids in insertion order.
    pub fn ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.units().map(|u| u.id())
    }

    fn neighbours(
        &self,
        id: &str,
        direction: Direction,
    ) -> Result<Vec<(&str, GraphEdge)>, GraphError> {
        let node = self.require(id)?;
        let mut out: Vec<(NodeIndex, GraphEdge)> = self
            .graph
            .edges_directed(node, direction)
            .map(|e| {
                let other = match direction {
                    Direction::Incoming => e.source(),
                    Direction::Outgoing => e.target(),
                };
                (other, *e.weight())
            })
            .collect();
        out.sort_by_key(|(n, _)| n.index());
        Ok(out
            .into_iter()
            .map(|(n, edge)| (self.graph[n].id(), edge))
            .collect())
    }

    /// Direct predecessors with the connecting edge.
    pub fn parents(&self, id: &str) -> Result<Vec<(&str, GraphEdge)>, GraphError> {
        self.neighbours(id, Direction::Incoming)
    }

    /// Direct successors with the connecting edge.
    pub fn children(&self, id: &str) -> Result<Vec<(&str, GraphEdge)>, GraphError> {
        self.neighbours(id, Direction::Outgoing)
    }

    pub fn edge(&self, from: &str, to: &str) -> Option<GraphEdge> {
        let (a, b) = (self.node_of(from)?, self.node_of(to)?);
        self.graph
            .find_edge(a, b)
            .and_then(|e| self.graph.edge_weight(e))
            .copied()
    }

    pub fn has_edge(&self, from: &str, to: &str) -> bool {
        self.edge(from, to).is_some()
    }

    /// All `(from, to, edge)` triples in a stable order.
    pub fn edges(&self) -> Vec<(&str, &str, GraphEdge)> {
        let mut out: Vec<_> = self
            .graph
            .edge_references()
            .map(|e| (e.source(), e.target(), *e.weight()))
            .collect();
        out.sort_by_key(|(s, t, _)| (s.index(), t.index()));
        out.into_iter()
            .map(|(s, t, w)| (self.graph[s].id(), self.graph[t].id(), w))
            .collect()
    }

    fn inseparable_neighbour(&self, id: &str, direction: Direction) -> Option<&str> {
        let node = self.node_of(id)?;
        self.graph
            .edges_directed(node, direction)
            .find(|e| e.weight().kind.is_inseparable())
            .map(|e| match direction {
                Direction::Incoming => self.graph[e.source()].id(),
                Direction::Outgoing => self.graph[e.target()].id(),
            })
    }

    pub fn inseparable_parent(&self, id: &str) -> Option<&str> {
        self.inseparable_neighbour(id, Direction::Incoming)
    }

    pub fn inseparable_child(&self, id: &str) -> Option<&str> {
        self.inseparable_neighbour(id, Direction::Outgoing)
    }

    /// True for works inside a chain that are not its head.
    pub fn is_inseparable_son(&self, id: &str) -> bool {
        self.inseparable_parent(id).is_some()
    }

    /// Head of the chain `id` belongs to (itself when not chained).
    pub fn chain_head(&self, id: &str) -> Result<&str, GraphError> {
        let node = self.require(id)?;
        let mut head = self.graph[node].id();
        while let Some(parent) = self.inseparable_parent(head) {
            head = parent;
        }
        Ok(head)
    }

    /// Whole inseparable chain containing `id`, head first.
    pub fn chain(&self, id: &str) -> Result<Vec<&str>, GraphError> {
        let mut current = self.chain_head(id)?;
        let mut members = vec![current];
        while let Some(child) = self.inseparable_child(current) {
            members.push(child);
            current = child;
        }
        Ok(members)
    }

    /// Work ids in topological order.
    pub fn topo_order(&self) -> Result<Vec<&str>, GraphError> {
        let order = toposort(&self.graph, None).map_err(|_| GraphError::GraphContainsCycle)?;
        Ok(order.into_iter().map(|n| self.graph[n].id()).collect())
    }

    /// Re-checks every structural invariant.
    pub fn validate(&self) -> Result<(), GraphError> {
        self.topo_order()?;
        for node in self.graph.node_indices() {
            let id = self.graph[node].id();
            let incoming = self.graph.edges_directed(node, Direction::Incoming);
            let outgoing = self.graph.edges_directed(node, Direction::Outgoing);

            let mut parents = 0;
            let mut inseparable_in = 0;
            for e in incoming {
                parents += 1;
                inseparable_in += usize::from(e.weight().kind.is_inseparable());
            }
            let mut children = 0;
            let mut inseparable_out = 0;
            for e in outgoing {
                children += 1;
                inseparable_out += usize::from(e.weight().kind.is_inseparable());
            }

            if inseparable_in > 1 || inseparable_out > 1 {
                return Err(GraphError::InvalidChain(id.to_string()));
            }
            if (node == self.start && parents > 0) || (node == self.finish && children > 0) {
                return Err(GraphError::SentinelViolation(id.to_string()));
            }
            if (node != self.start && parents == 0) || (node != self.finish && children == 0) {
                return Err(GraphError::Unreachable(id.to_string()));
            }
        }
        Ok(())
    }

    /// Reference to the underlying arena.
    pub fn graph(&self) -> &StableGraph<WorkUnit, GraphEdge> {
        &self.graph
    }
}

impl Display for WorkGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "WorkGraph {{")?;
        writeln!(f, "  Works: {}", self.graph.node_count())?;
        writeln!(f, "  Dependencies: {}", self.graph.edge_count())?;
        for node in self.graph.node_indices() {
            let unit = &self.graph[node];
            writeln!(
                f,
                "    [{}] {} (volume: {}, priority: {})",
                unit.id(),
                unit.name(),
                unit.volume(),
                unit.priority()
            )?;
        }
        write!(f, "}}")
    }
}
