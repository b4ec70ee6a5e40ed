//! An instance of a single running pipeline

use std::collections::HashMap;
use tracing::debug;

use super::{
	util::{EdgeValue, NodeRunState},
	PipelineArgs,
};
use crate::{
	api::{PipelineData, Processor},
	errors::PipelineError,
	graph::GraphNodeIdx,
	labels::PipelineVarID,
	nodes::PipelineInput,
	pipeline::pipeline::{Pipeline, PipelineNodeData, PipelineNodeKind},
};

/// One run of a pipeline.
///
/// A job owns all of the run's mutable state: fresh input slots and the
/// value on every edge. The pipeline itself is only read, so dropping a
/// job midway leaves nothing to clean up.
pub struct PipelineJob<'a, DataType: PipelineData> {
	/// The pipeline we're running
	pipeline: &'a Pipeline<DataType>,

	/// This run's input slots, by input node
	inputs: HashMap<GraphNodeIdx, PipelineInput<DataType>>,

	/// The value each edge carries, by edge index
	edge_values: Vec<EdgeValue<DataType>>,

	/// Which nodes have been invoked, by node index
	node_states: Vec<NodeRunState>,
}

impl<'a, DataType: PipelineData> PipelineJob<'a, DataType> {
	/// Make a new job for one run of `pipeline`.
	/// Every edge starts unset and every input starts unloaded.
	pub fn new(pipeline: &'a Pipeline<DataType>) -> Self {
		let inputs = pipeline
			.inputs
			.values()
			.map(|node_idx| {
				let slot = match &pipeline.graph.get_node(*node_idx).kind {
					PipelineNodeKind::Input(slot) => *slot,
					_ => unreachable!("the input table only points at input nodes"),
				};
				(*node_idx, PipelineInput::new(slot))
			})
			.collect();

		Self {
			pipeline,
			inputs,
			edge_values: (0..pipeline.graph.len_edges())
				.map(|_| EdgeValue::Unset)
				.collect(),
			node_states: vec![NodeRunState::NotStarted; pipeline.graph.len_nodes()],
		}
	}

	/// Bind `args`, walk the graph, and return the value of every
	/// declared variable.
	pub fn run(
		mut self,
		args: PipelineArgs<DataType>,
	) -> Result<HashMap<PipelineVarID, DataType>, PipelineError> {
		debug!(
			source = "runner",
			summary = "Running pipeline",
			pipeline = self.pipeline.id(),
		);

		self.load_args(args)?;
		self.process_edges()?;
		Ok(self.collect())
	}

	/// Load run arguments into this job's input slots.
	fn load_args(&mut self, args: PipelineArgs<DataType>) -> Result<(), PipelineError> {
		let pipeline = self.pipeline;

		// Positional arguments bind to indexed inputs by ascending slot.
		// Extra arguments have nowhere to go; missing ones are caught
		// below, so they can still arrive by name.
		if args.positional.len() > pipeline.indexed_inputs.len() {
			return Err(PipelineError::ArityMismatch {
				expected: pipeline.indexed_inputs.len(),
				got: args.positional.len(),
			});
		}
		for (i, data) in args.positional.into_iter().enumerate() {
			let var = pipeline.indexed_inputs[i].clone();
			self.load_input(&var, data)?;
		}

		// Named arguments bind any input by its variable name.
		for (var, data) in args.named {
			if !pipeline.inputs.contains_key(&var) {
				return Err(PipelineError::UnknownInput { var });
			}
			self.load_input(&var, data)?;
		}

		// Every input must have a value before we start.
		let missing: Vec<PipelineVarID> = pipeline
			.input_names()
			.filter(|var| {
				let node_idx = pipeline.inputs.get(*var).unwrap();
				!self.inputs.get(node_idx).unwrap().is_loaded()
			})
			.cloned()
			.collect();
		if !missing.is_empty() {
			return Err(PipelineError::MissingInput { vars: missing });
		}

		Ok(())
	}

	/// Load one value into the input producing `var`.
	fn load_input(&mut self, var: &PipelineVarID, data: DataType) -> Result<(), PipelineError> {
		let node_idx = self.pipeline.inputs.get(var).unwrap();
		let input = self.inputs.get_mut(node_idx).unwrap();
		if input.is_loaded() {
			return Err(PipelineError::DoubleLoad { var: var.clone() });
		}
		input.load(data);
		Ok(())
	}

	/// Visit every edge in dependency order, invoking nodes as their
	/// inputs complete.
	///
	/// When an edge `(a, b)` is visited, every edge entering `a` has
	/// already been visited, so `a` can always run on the spot; `b` runs
	/// once its last incoming edge is populated.
	fn process_edges(&mut self) -> Result<(), PipelineError> {
		let pipeline = self.pipeline;

		for edge_idx in pipeline.graph.topo_order_edges() {
			let (a_idx, b_idx) = {
				let (a, b, _) = pipeline.graph.get_edge(edge_idx);
				(*a, *b)
			};

			// A source node with no incoming edges runs as soon as one
			// of its edges comes up.
			if pipeline.graph.in_degree(a_idx) == 0
				&& self.node_states[a_idx.as_usize()].is_notstarted()
			{
				self.run_node(a_idx)?;
			}

			// Run the target once all of its in-edges carry data.
			if self.node_states[b_idx.as_usize()].is_notstarted()
				&& pipeline
					.graph
					.edges_ending_at(b_idx)
					.iter()
					.all(|e| self.edge_values[e.as_usize()].is_set())
			{
				self.run_node(b_idx)?;
			}
		}

		Ok(())
	}

	/// Invoke one node and distribute its outputs across its outgoing
	/// edges in a single step.
	fn run_node(&mut self, node_idx: GraphNodeIdx) -> Result<(), PipelineError> {
		let pipeline = self.pipeline;
		let node = pipeline.graph.get_node(node_idx);

		// Gather this node's inputs by ascending input position.
		let mut gathered: Vec<(usize, DataType)> = pipeline
			.graph
			.edges_ending_at(node_idx)
			.iter()
			.map(|edge_idx| {
				let (_, _, edge) = pipeline.graph.get_edge(*edge_idx);
				let data = self.edge_values[edge_idx.as_usize()]
					.data()
					.unwrap()
					.clone();
				(edge.target_port, data)
			})
			.collect();
		gathered.sort_by_key(|(port, _)| *port);
		let input: Vec<DataType> = gathered.into_iter().map(|(_, data)| data).collect();

		debug!(
			source = "runner",
			summary = "Running node",
			node = node.node_id.to_string(),
		);

		let output = match &node.kind {
			PipelineNodeKind::Input(_) => match self.inputs.get(&node_idx).unwrap().read() {
				Some(data) => vec![data.clone()],
				None => {
					return Err(PipelineError::MissingInput {
						vars: node.outputs.clone(),
					})
				}
			},
			PipelineNodeKind::Leaf(leaf) => self.call_processor(node, leaf, input)?,
			PipelineNodeKind::User(processor) => {
				self.call_processor(node, processor.as_ref(), input)?
			}
		};

		// Either every outgoing edge gets its value, or none do.
		if output.len() != node.outputs.len() {
			return Err(PipelineError::OutputArityMismatch {
				node: node.node_id.clone(),
				expected: node.outputs.len(),
				got: output.len(),
			});
		}
		for edge_idx in pipeline.graph.edges_starting_at(node_idx) {
			let (_, _, edge) = pipeline.graph.get_edge(*edge_idx);
			self.edge_values[edge_idx.as_usize()] =
				EdgeValue::Data(output[edge.source_port].clone());
		}

		self.node_states[node_idx.as_usize()] = NodeRunState::Done;
		Ok(())
	}

	/// Invoke a processor, wrapping any failure with the node's identity.
	fn call_processor(
		&self,
		node: &PipelineNodeData<DataType>,
		processor: &dyn Processor<DataType>,
		input: Vec<DataType>,
	) -> Result<Vec<DataType>, PipelineError> {
		processor
			.process(input)
			.map_err(|source| PipelineError::ProcessorFailure {
				node: node.node_id.clone(),
				vars: node.outputs.clone(),
				source,
			})
	}

	/// Read every edge's value into the result map.
	/// Each variable appears on at least one edge thanks to leaves.
	fn collect(self) -> HashMap<PipelineVarID, DataType> {
		let pipeline = self.pipeline;
		pipeline
			.graph
			.iter_edges_idx()
			.zip(self.edge_values)
			.map(|((_, (_, _, edge)), value)| (edge.var.clone(), value.unwrap()))
			.collect()
	}
}
