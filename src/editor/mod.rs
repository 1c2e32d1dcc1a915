//! Structural edits over work graphs.
//!
//! Every operation reads an existing [`WorkGraph`] and returns a brand-new
//! one. The shared recipe is:
//!
//! 1. copy every retained work under a new id, recording the old → new map
//! 2. rewire the copies strictly through that map, skipping removed ids
//! 3. rebuild, which recomputes the sentinels and re-validates the DAG
//!
//! The input graph is never touched, so edits on distinct graphs can run
//! concurrently.

mod copy;
mod ops;
mod restructure;

#[cfg(test)]
mod tests;

pub use copy::{prepare_copy, GraphCopy, IdStrategy};
pub use ops::{delete_node, insert_graph, insert_work_unit, simplify_ids, InsertedGraph};
pub use restructure::{restructure, stage_id, STAGE_SEP};
