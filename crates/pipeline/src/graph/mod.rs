//! Graph plumbing for pipelines.
//! Petgraph doesn't do parallel edges well, so we keep our own.

mod finalized;
#[allow(clippy::module_inception)]
mod graph;

pub(crate) use finalized::FinalizedGraph;
pub(crate) use graph::{Graph, GraphNodeIdx};
