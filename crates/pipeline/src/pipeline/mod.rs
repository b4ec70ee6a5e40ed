//! Pipeline structure and declaration parsing

#[allow(clippy::module_inception)]
pub mod pipeline;
pub mod syntax;
