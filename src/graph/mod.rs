//! Work graph model: a DAG of work units between synthetic sentinels.

mod builder;
mod edge;
pub mod error;
mod heads;
mod work_graph;

#[cfg(test)]
mod tests;

pub use builder::{work_graph_from_edges, WorkGraphBuilder};
pub use edge::{Dependency, EdgeType, GraphEdge};
pub use error::GraphError;
pub use heads::HeadNodes;
pub use work_graph::WorkGraph;
