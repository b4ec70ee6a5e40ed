//! Core pipeline structs

use std::{
	collections::{BTreeSet, HashMap},
	sync::Arc,
};
use uuid::Uuid;

use super::syntax::{
	builder::PipelineBuilder,
	errors::PipelinePrepareError,
	spec::{PipelineNodeSpec, PipelineNodeStub, PipelineSpec},
};
use crate::{
	api::{InputSlot, PipelineData, Processor},
	errors::PipelineError,
	graph::{FinalizedGraph, GraphNodeIdx},
	labels::{PipelineName, PipelineNodeID, PipelineVarID},
	nodes::Leaf,
	runner::{PipelineArgs, PipelineJob},
};

/// How many trailing uuid hex chars go into a pipeline's diagnostic id
const UUID_ORDER: usize = 6;

/// What kind of processor a pipeline node hosts.
#[derive(Debug, Clone)]
pub(crate) enum PipelineNodeKind<DataType: PipelineData> {
	/// A slot for one user-supplied runtime value
	Input(InputSlot),

	/// A synthesized pass-through that pins a terminal variable
	/// to an outgoing edge
	Leaf(Leaf),

	/// A user processor
	User(Arc<dyn Processor<DataType>>),
}

/// A node in a built pipeline
#[derive(Debug, Clone)]
pub(crate) struct PipelineNodeData<DataType: PipelineData> {
	/// This node's id, for logs and errors
	pub node_id: PipelineNodeID,

	/// The processor this node hosts
	pub kind: PipelineNodeKind<DataType>,

	/// The upstream variables this node consumes, in argument order.
	/// Empty for inputs.
	pub inputs: Vec<PipelineVarID>,

	/// The variables this node produces, in output order
	pub outputs: Vec<PipelineVarID>,
}

/// An edge in a pipeline. Each edge carries exactly one variable;
/// two nodes may be joined by many parallel edges, one per variable.
#[derive(Debug, Clone)]
pub(crate) struct PipelineEdge {
	/// The variable this edge carries
	pub var: PipelineVarID,

	/// Position of [`PipelineEdge::var`] in the source node's outputs
	pub source_port: usize,

	/// Position of [`PipelineEdge::var`] in the target node's inputs
	pub target_port: usize,
}

/// Everything the pipeline knows about one variable
#[derive(Debug, Clone)]
pub(crate) struct PipelineVarInfo {
	/// The node that produces this variable
	pub producer: GraphNodeIdx,

	/// Every variable this one depends on, transitively
	pub depends_on: BTreeSet<PipelineVarID>,
}

/// A fully built data processing pipeline.
///
/// The structure is immutable once built; run state (edge data, input
/// values) lives in a per-run [`PipelineJob`], so every run starts from
/// cleared edges and unloaded inputs.
#[derive(Debug)]
pub struct Pipeline<DataType: PipelineData> {
	/// This pipeline's name
	pub(crate) name: PipelineName,

	/// A process-unique id, assigned at build time
	pub(crate) uuid: Uuid,

	/// This pipeline's node graph
	pub(crate) graph: FinalizedGraph<PipelineNodeData<DataType>, PipelineEdge>,

	/// Everything we know about each variable
	pub(crate) vars: HashMap<PipelineVarID, PipelineVarInfo>,

	/// The node index of each input, by the variable it produces
	pub(crate) inputs: HashMap<PipelineVarID, GraphNodeIdx>,

	/// Indexed input variables, sorted by slot index
	pub(crate) indexed_inputs: Vec<PipelineVarID>,

	/// Keyword-only input variables, sorted alphabetically
	pub(crate) kwonly_inputs: Vec<PipelineVarID>,
}

impl<DataType: PipelineData> Pipeline<DataType> {
	/// Build a pipeline from a declaration.
	///
	/// This validates the whole declaration: variable uniqueness and
	/// completeness, arities, input slots, and acyclicity. On error,
	/// nothing of the pipeline is observable.
	pub fn build(
		name: &str,
		spec: &PipelineSpec<DataType>,
	) -> Result<Self, PipelinePrepareError> {
		PipelineBuilder::build(name, spec)
	}

	/// Run this pipeline to completion on the calling thread.
	///
	/// Positional arguments bind to indexed inputs by ascending slot;
	/// named arguments bind by variable name. Returns the value of
	/// *every* declared variable.
	pub fn run(
		&self,
		args: impl Into<PipelineArgs<DataType>>,
	) -> Result<HashMap<PipelineVarID, DataType>, PipelineError> {
		PipelineJob::new(self).run(args.into())
	}

	/// Get this pipeline's name
	pub fn name(&self) -> &PipelineName {
		&self.name
	}

	/// Get this pipeline's uuid.
	/// Unique per build; two identical declarations build
	/// pipelines with different uuids.
	pub fn uuid(&self) -> Uuid {
		self.uuid
	}

	/// A short diagnostic id: the pipeline's name plus the tail
	/// of its uuid.
	pub fn id(&self) -> String {
		let hex = self.uuid.simple().to_string();
		format!("{}.{}", self.name, &hex[hex.len() - UUID_ORDER..])
	}

	/// The number of nodes in this pipeline, leaves included
	pub fn n_nodes(&self) -> usize {
		self.graph.len_nodes()
	}

	/// The number of edges in this pipeline
	pub fn n_edges(&self) -> usize {
		self.graph.len_edges()
	}

	/// Iterate over all node ids in this pipeline, in insertion order
	pub fn iter_node_ids(&self) -> impl Iterator<Item = &PipelineNodeID> {
		self.graph.iter_nodes().map(|n| &n.node_id)
	}

	/// Iterate over all declared variables, in arbitrary order
	pub fn iter_vars(&self) -> impl Iterator<Item = &PipelineVarID> {
		self.vars.keys()
	}

	/// Every input variable this pipeline takes: indexed inputs in slot
	/// order, then keyword-only inputs alphabetically.
	pub fn input_names(&self) -> impl Iterator<Item = &PipelineVarID> {
		self.indexed_inputs.iter().chain(self.kwonly_inputs.iter())
	}

	/// Everything `var` depends on, transitively.
	/// Returns `None` if there is no such variable.
	pub fn var_dependencies(&self, var: &str) -> Option<&BTreeSet<PipelineVarID>> {
		self.vars
			.get(&PipelineVarID::new(var))
			.map(|info| &info.depends_on)
	}

	/// The id of the node that produces `var`.
	/// Returns `None` if there is no such variable.
	pub fn producer_of(&self, var: &str) -> Option<&PipelineNodeID> {
		self.vars
			.get(&PipelineVarID::new(var))
			.map(|info| &self.graph.get_node(info.producer).node_id)
	}

	/// Recover a declaration shaped like the one this pipeline was built
	/// from, leaves omitted. Building it again makes an equivalent
	/// pipeline (with a fresh uuid); processors are shared, not cloned.
	pub fn static_spec(&self) -> PipelineSpec<DataType> {
		let mut spec = PipelineSpec::new();
		for node in self.graph.iter_nodes() {
			let stub = match &node.kind {
				PipelineNodeKind::Leaf(_) => continue,
				PipelineNodeKind::Input(slot) => PipelineNodeStub::Input { slot: *slot },
				PipelineNodeKind::User(p) => PipelineNodeStub::User(p.clone()),
			};
			spec.add_node_spec(PipelineNodeSpec {
				outputs: node.outputs.clone(),
				node: stub,
				inputs: node.inputs.clone(),
			});
		}
		spec
	}
}
