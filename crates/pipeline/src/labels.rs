//! Helpful types

use serde::{Deserialize, Serialize};
use smartstring::{LazyCompact, SmartString};
use std::fmt::Display;

/// The name of a variable flowing through a pipeline
#[derive(Debug, Hash, PartialEq, Eq, Clone, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(transparent)]
pub struct PipelineVarID {
	x: SmartString<LazyCompact>,
}

impl PipelineVarID {
	/// Make a new variable id
	pub fn new(id: &str) -> Self {
		Self { x: id.into() }
	}

	/// Get the id
	pub fn id(&self) -> &SmartString<LazyCompact> {
		&self.x
	}

	/// Is this variable name empty?
	pub fn is_empty(&self) -> bool {
		self.x.is_empty()
	}
}

impl Display for PipelineVarID {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		self.x.fmt(f)
	}
}

impl From<String> for PipelineVarID {
	fn from(value: String) -> Self {
		Self::new(&value)
	}
}

impl From<&str> for PipelineVarID {
	fn from(value: &str) -> Self {
		Self::new(value)
	}
}

/// A pipeline node's id
#[derive(Debug, Hash, PartialEq, Eq, Clone, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(transparent)]
pub struct PipelineNodeID {
	x: SmartString<LazyCompact>,
}

impl PipelineNodeID {
	/// Make a new pipeline node id
	pub fn new(id: &str) -> Self {
		Self { x: id.into() }
	}

	/// Get the id
	pub fn id(&self) -> &SmartString<LazyCompact> {
		&self.x
	}
}

impl Display for PipelineNodeID {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		self.x.fmt(f)
	}
}

impl From<String> for PipelineNodeID {
	fn from(value: String) -> Self {
		Self::new(&value)
	}
}

impl From<&str> for PipelineNodeID {
	fn from(value: &str) -> Self {
		Self::new(value)
	}
}

/// A pipeline's name
#[derive(Debug, Hash, PartialEq, Eq, Clone, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(transparent)]
pub struct PipelineName {
	x: SmartString<LazyCompact>,
}

impl PipelineName {
	/// Make a new pipeline name
	pub fn new(name: &str) -> Self {
		Self { x: name.into() }
	}

	/// Get the name
	pub fn name(&self) -> &SmartString<LazyCompact> {
		&self.x
	}
}

impl Display for PipelineName {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		self.x.fmt(f)
	}
}

impl From<String> for PipelineName {
	fn from(value: String) -> Self {
		Self::new(&value)
	}
}

impl From<&str> for PipelineName {
	fn from(value: &str) -> Self {
		Self::new(value)
	}
}
