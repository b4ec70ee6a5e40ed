//! Processors the engine provides itself.
//!
//! Inputs inject user-supplied values into the graph; leaves are synthesized
//! pass-throughs that pin every terminal variable to an outgoing edge.

mod input;
mod leaf;

pub use input::PipelineInput;
pub use leaf::Leaf;
