//! A user-provided pipeline declaration

use serde::{Deserialize, Serialize};
use smartstring::{LazyCompact, SmartString};
use std::sync::Arc;

use super::errors::{InvalidDeclarationReason, PipelinePrepareError};
use crate::{
	api::{InputSlot, PipelineData, Processor},
	labels::PipelineVarID,
};

/// The processor half of one declaration entry.
#[derive(Debug, Clone)]
pub enum PipelineNodeStub<DataType: PipelineData> {
	/// A pipeline input with its binding slot.
	/// Must define exactly one output variable and take no upstream
	/// variables.
	Input {
		/// How run arguments bind to this input
		slot: InputSlot,
	},

	/// A user processor. A processor with no inputs is a zero-input
	/// producer; anything else consumes the entry's upstream variables.
	User(Arc<dyn Processor<DataType>>),
}

impl<DataType: PipelineData> PipelineNodeStub<DataType> {
	/// The display name of the processor this stub describes
	pub fn name(&self) -> &str {
		match self {
			Self::Input { .. } => "Input",
			Self::User(p) => p.name(),
		}
	}
}

/// One entry of a [`PipelineSpec`]: the variables on the left-hand side,
/// what produces them, and the upstream variables it consumes, in
/// argument order.
#[derive(Debug, Clone)]
pub struct PipelineNodeSpec<DataType: PipelineData> {
	/// The variables this entry defines
	pub outputs: Vec<PipelineVarID>,

	/// What produces them
	pub node: PipelineNodeStub<DataType>,

	/// The upstream variables fed to the processor, in argument order
	pub inputs: Vec<PipelineVarID>,
}

/// A declarative description of a data processing pipeline.
///
/// Entries are kept in insertion order; node numbering and execution
/// tie-breaks follow it, which makes builds deterministic.
#[derive(Debug, Clone)]
pub struct PipelineSpec<DataType: PipelineData> {
	pub(crate) nodes: Vec<PipelineNodeSpec<DataType>>,
}

impl<DataType: PipelineData> PipelineSpec<DataType> {
	/// Make an empty declaration
	pub fn new() -> Self {
		Self { nodes: Vec::new() }
	}

	/// Declare a pipeline input producing the variable `var`.
	pub fn add_input(&mut self, var: &str, slot: InputSlot) -> &mut Self {
		self.nodes.push(PipelineNodeSpec {
			outputs: vec![var.into()],
			node: PipelineNodeStub::Input { slot },
			inputs: Vec::new(),
		});
		self
	}

	/// Declare a processor producing `outputs` from `inputs`.
	pub fn add_node(
		&mut self,
		outputs: &[&str],
		processor: Arc<dyn Processor<DataType>>,
		inputs: &[&str],
	) -> &mut Self {
		self.nodes.push(PipelineNodeSpec {
			outputs: outputs.iter().map(|v| (*v).into()).collect(),
			node: PipelineNodeStub::User(processor),
			inputs: inputs.iter().map(|v| (*v).into()).collect(),
		});
		self
	}

	/// Add a fully-specified entry.
	pub fn add_node_spec(&mut self, spec: PipelineNodeSpec<DataType>) -> &mut Self {
		self.nodes.push(spec);
		self
	}

	/// Iterate over this declaration's entries, in insertion order
	pub fn iter_nodes(&self) -> impl Iterator<Item = &PipelineNodeSpec<DataType>> {
		self.nodes.iter()
	}

	/// Strip this declaration down to its serializable skeleton.
	/// Processor objects are replaced by their display names.
	pub fn to_static(&self) -> StaticSpec {
		StaticSpec {
			nodes: self
				.nodes
				.iter()
				.map(|n| StaticNodeSpec {
					outputs: n.outputs.clone(),
					stub: match &n.node {
						PipelineNodeStub::Input { slot } => StaticNodeStub::Input(*slot),
						PipelineNodeStub::User(p) => StaticNodeStub::User(p.name().into()),
					},
					inputs: n.inputs.clone(),
				})
				.collect(),
		}
	}

	/// Rebuild a full declaration from a [`StaticSpec`], resolving each
	/// stored processor name through `resolve`.
	///
	/// Fails with an invalid-declaration error if `resolve` doesn't know
	/// one of the names.
	pub fn from_static(
		spec: &StaticSpec,
		mut resolve: impl FnMut(&str) -> Option<Arc<dyn Processor<DataType>>>,
	) -> Result<Self, PipelinePrepareError> {
		let mut out = Self::new();
		for node in &spec.nodes {
			let stub = match &node.stub {
				StaticNodeStub::Input(slot) => PipelineNodeStub::Input { slot: *slot },
				StaticNodeStub::User(name) => PipelineNodeStub::User(
					resolve(name).ok_or_else(|| PipelinePrepareError::InvalidDeclaration {
						node: node.outputs.clone(),
						reason: InvalidDeclarationReason::UnknownProcessor(name.clone()),
					})?,
				),
			};
			out.add_node_spec(PipelineNodeSpec {
				outputs: node.outputs.clone(),
				node: stub,
				inputs: node.inputs.clone(),
			});
		}
		Ok(out)
	}
}

/// The serializable skeleton of a [`StaticNodeSpec`]'s processor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StaticNodeStub {
	/// A pipeline input and its binding slot
	#[serde(rename = "slot")]
	Input(InputSlot),

	/// A user processor, stored by display name
	#[serde(rename = "processor")]
	User(SmartString<LazyCompact>),
}

/// One entry of a [`StaticSpec`]
// No `deny_unknown_fields` here; serde can't combine it with `flatten`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticNodeSpec {
	/// The variables this entry defines
	#[serde(rename = "output")]
	pub outputs: Vec<PipelineVarID>,

	/// What produces them
	#[serde(flatten)]
	pub stub: StaticNodeStub,

	/// The upstream variables, in argument order
	#[serde(default)]
	#[serde(rename = "input")]
	pub inputs: Vec<PipelineVarID>,
}

/// A serializable skeleton of a pipeline declaration, shaped like the
/// declaration itself with leaves omitted.
///
/// Processors are stored by name only; pair this with a resolver
/// (see [`PipelineSpec::from_static`]) to get a buildable declaration
/// back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticSpec {
	/// One entry per declaration entry, in declaration order
	#[serde(rename = "node")]
	pub nodes: Vec<StaticNodeSpec>,
}

impl StaticSpec {
	/// Serialize this skeleton as a TOML document
	pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
		toml::to_string(self)
	}

	/// Parse a skeleton from a TOML document
	pub fn from_toml_str(s: &str) -> Result<Self, toml::de::Error> {
		toml::from_str(s)
	}
}
