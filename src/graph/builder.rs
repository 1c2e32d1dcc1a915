use std::collections::HashMap;

use petgraph::algo::has_path_connecting;
use petgraph::graph::NodeIndex;
use petgraph::stable_graph::StableGraph;
use petgraph::Direction;
use tracing::trace;

use super::edge::{EdgeType, GraphEdge};
use super::error::GraphError;
use super::work_graph::WorkGraph;
use crate::work::WorkUnit;
use crate::Id;

/// Incremental constructor for [`WorkGraph`].
///
/// Works and dependencies are validated as they are added, so a cycle or a
/// duplicate id is reported at the offending call. [`build`](Self::build)
/// wraps the result between fresh start/finish sentinels and hangs every
/// parentless work under start and every childless work under finish.
///
/// # Example
///
/// ```ignore
/// let mut builder = WorkGraphBuilder::new();
/// builder.add_unit(WorkUnit::new("dig", "Excavation"))?;
/// builder.add_unit(WorkUnit::new("pour", "Foundation"))?;
/// builder.add_edge("dig", "pour", GraphEdge::finish_start())?;
/// let graph = builder.build()?;
/// ```
#[derive(Debug, Default)]
pub struct WorkGraphBuilder {
    graph: StableGraph<WorkUnit, GraphEdge>,
    id_by_node: HashMap<NodeIndex, Id>,
    node_by_id: HashMap<Id, NodeIndex>,
}

impl WorkGraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.node_by_id.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// # Errors
    ///
    /// `DuplicateId` if a work with the same id was already added.
    pub fn add_unit(&mut self, unit: WorkUnit) -> Result<&mut Self, GraphError> {
        if self.contains(unit.id()) {
            return Err(GraphError::DuplicateId(unit.id().to_string()));
        }
        let id = unit.id().to_string();
        let node = self.graph.add_node(unit);
        self.id_by_node.insert(node, id.clone());
        self.node_by_id.insert(id, node);
        Ok(self)
    }

    fn require(&self, id: &str) -> Result<NodeIndex, GraphError> {
        self.node_by_id
            .get(id)
            .copied()
            .ok_or_else(|| GraphError::NodeNotFound(id.to_string()))
    }

    /// Adds dependency edge `from` → `to`. An edge that already exists is
    /// kept as is.
    ///
    /// # Errors
    ///
    /// - `NodeNotFound` if either id is unknown
    /// - `CycleDetected` if the edge would close a cycle
    pub fn add_edge(
        &mut self,
        from: &str,
        to: &str,
        edge: GraphEdge,
    ) -> Result<&mut Self, GraphError> {
        let a = self.require(from)?;
        let b = self.require(to)?;

        if self.graph.find_edge(a, b).is_some() {
            trace!(from, to, "Skipping duplicate dependency");
            return Ok(self);
        }
        // Edge a→b creates a cycle if a path b→a already exists
        if a == b || has_path_connecting(&self.graph, b, a, None) {
            return Err(GraphError::CycleDetected {
                from: from.to_string(),
                to: to.to_string(),
            });
        }

        self.graph.add_edge(a, b, edge);
        Ok(self)
    }

    /// Finish-start dependency with zero lag.
    pub fn add_dependency(&mut self, from: &str, to: &str) -> Result<&mut Self, GraphError> {
        self.add_edge(from, to, GraphEdge::finish_start())
    }

    /// Links `ids` into one inseparable chain, in the given order.
    pub fn add_chain(&mut self, ids: &[&str]) -> Result<&mut Self, GraphError> {
        for pair in ids.windows(2) {
            self.add_edge(pair[0], pair[1], GraphEdge::inseparable())?;
        }
        Ok(self)
    }

    /// Builds the graph between freshly generated sentinels.
    pub fn build(mut self) -> Result<WorkGraph, GraphError> {
        let start = WorkUnit::service(crate::generate_id(), "start");
        let finish = WorkUnit::service(crate::generate_id(), "finish");
        let (start_id, finish_id) = (start.id().to_string(), finish.id().to_string());
        self.add_unit(start)?;
        self.add_unit(finish)?;
        self.build_with_sentinels(&start_id, &finish_id)
    }

    /// Builds the graph using two already added works as sentinels.
    ///
    /// # Errors
    ///
    /// - `NodeNotFound` if a sentinel id is unknown
    /// - `SentinelViolation` if start has parents or finish has children
    /// - `InvalidChain` if a work has two inseparable parents or children
    pub fn build_with_sentinels(
        mut self,
        start_id: &str,
        finish_id: &str,
    ) -> Result<WorkGraph, GraphError> {
        let start = self.require(start_id)?;
        let finish = self.require(finish_id)?;
        if start == finish {
            return Err(GraphError::SentinelViolation(start_id.to_string()));
        }
        if self
            .graph
            .neighbors_directed(start, Direction::Incoming)
            .next()
            .is_some()
        {
            return Err(GraphError::SentinelViolation(start_id.to_string()));
        }
        if self
            .graph
            .neighbors_directed(finish, Direction::Outgoing)
            .next()
            .is_some()
        {
            return Err(GraphError::SentinelViolation(finish_id.to_string()));
        }

        let nodes: Vec<NodeIndex> = self.graph.node_indices().collect();
        for &node in &nodes {
            if node != start
                && self
                    .graph
                    .neighbors_directed(node, Direction::Incoming)
                    .next()
                    .is_none()
            {
                self.graph.add_edge(start, node, GraphEdge::finish_start());
            }
        }
        for &node in &nodes {
            if node != finish
                && self
                    .graph
                    .neighbors_directed(node, Direction::Outgoing)
                    .next()
                    .is_none()
            {
                self.graph.add_edge(node, finish, GraphEdge::finish_start());
            }
        }

        let graph = WorkGraph {
            graph: self.graph,
            id_by_node: self.id_by_node,
            node_by_id: self.node_by_id,
            start,
            finish,
        };
        graph.validate()?;
        Ok(graph)
    }
}

/// Convenience for callers that only need plain finish-start links.
pub fn work_graph_from_edges(
    units: impl IntoIterator<Item = WorkUnit>,
    edges: &[(&str, &str)],
) -> Result<WorkGraph, GraphError> {
    let mut builder = WorkGraphBuilder::new();
    for unit in units {
        builder.add_unit(unit)?;
    }
    for (from, to) in edges {
        builder.add_edge(from, to, GraphEdge::new(0.0, EdgeType::FinishStart))?;
    }
    builder.build()
}
