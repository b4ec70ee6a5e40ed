//! Builds a pipeline from a user-provided declaration

use itertools::Itertools;
use std::collections::{BTreeSet, HashMap};
use tracing::debug;
use uuid::Uuid;

use super::{
	errors::{InvalidDeclarationReason, PipelinePrepareError},
	spec::{PipelineNodeStub, PipelineSpec},
};
use crate::{
	api::{InputSlot, PipelineData},
	graph::{Graph, GraphNodeIdx},
	labels::{PipelineName, PipelineNodeID, PipelineVarID},
	nodes::Leaf,
	pipeline::pipeline::{
		Pipeline, PipelineEdge, PipelineNodeData, PipelineNodeKind, PipelineVarInfo,
	},
};

/// Builds a [`Pipeline`] from a [`PipelineSpec`], in four phases:
/// register every variable, create nodes, draw edges, attach leaves.
/// All variables must be known before any edge is drawn.
pub(in super::super) struct PipelineBuilder<DataType: PipelineData> {
	/// The name of the pipeline we're building
	name: PipelineName,

	/// The pipeline graph we're building
	graph: Graph<PipelineNodeData<DataType>, PipelineEdge>,

	/// The node that produces each declared variable.
	/// `None` until phase two reaches the producing entry.
	producers: HashMap<PipelineVarID, Option<GraphNodeIdx>>,

	/// The node index of each input, by the variable it produces
	inputs: HashMap<PipelineVarID, GraphNodeIdx>,

	/// Indexed input variables, in declaration order until `finish`
	indexed_inputs: Vec<PipelineVarID>,

	/// Keyword-only input variables, in declaration order until `finish`
	kwonly_inputs: Vec<PipelineVarID>,
}

impl<DataType: PipelineData> PipelineBuilder<DataType> {
	pub fn build(
		name: &str,
		spec: &PipelineSpec<DataType>,
	) -> Result<Pipeline<DataType>, PipelinePrepareError> {
		debug!(source = "syntax", summary = "Building pipeline", name = name);

		let mut builder = Self {
			name: name.into(),
			graph: Graph::new(),
			producers: HashMap::new(),
			inputs: HashMap::new(),
			indexed_inputs: Vec::new(),
			kwonly_inputs: Vec::new(),
		};

		builder.register_vars(spec)?;
		builder.make_nodes(spec)?;
		builder.make_edges()?;
		builder.attach_leaves();
		builder.finish()
	}

	/// Phase one: register every variable on a left-hand side.
	/// After this, every name an edge could reference is known.
	fn register_vars(&mut self, spec: &PipelineSpec<DataType>) -> Result<(), PipelinePrepareError> {
		for entry in spec.iter_nodes() {
			if entry.outputs.is_empty() {
				return Err(PipelinePrepareError::InvalidDeclaration {
					node: Vec::new(),
					reason: InvalidDeclarationReason::NoOutputs,
				});
			}

			for var in &entry.outputs {
				if var.is_empty() {
					return Err(PipelinePrepareError::InvalidDeclaration {
						node: entry.outputs.clone(),
						reason: InvalidDeclarationReason::EmptyVarName,
					});
				}
				if self.producers.insert(var.clone(), None).is_some() {
					return Err(PipelinePrepareError::DuplicateVariable { var: var.clone() });
				}
			}
		}

		Ok(())
	}

	/// Phase two: create a graph node for every entry and record which
	/// node produces each variable.
	fn make_nodes(&mut self, spec: &PipelineSpec<DataType>) -> Result<(), PipelinePrepareError> {
		for entry in spec.iter_nodes() {
			let node_idx = match &entry.node {
				PipelineNodeStub::Input { slot } => {
					if entry.outputs.len() != 1 {
						return Err(PipelinePrepareError::InvalidDeclaration {
							node: entry.outputs.clone(),
							reason: InvalidDeclarationReason::OutputArity {
								expected: 1,
								got: entry.outputs.len(),
							},
						});
					}
					if !entry.inputs.is_empty() {
						return Err(PipelinePrepareError::InputWithInputs {
							var: entry.outputs[0].clone(),
						});
					}

					let var = entry.outputs[0].clone();
					let base = match slot {
						InputSlot::Index(i) => format!("Input{i}"),
						InputSlot::Keyword => "Input".into(),
					};
					let node_id = self.next_node_id(&base);
					let idx = self.graph.add_node(PipelineNodeData {
						node_id,
						kind: PipelineNodeKind::Input(*slot),
						inputs: Vec::new(),
						outputs: entry.outputs.clone(),
					});

					self.inputs.insert(var.clone(), idx);
					match slot {
						InputSlot::Index(_) => self.indexed_inputs.push(var),
						InputSlot::Keyword => self.kwonly_inputs.push(var),
					}

					idx
				}

				PipelineNodeStub::User(processor) => {
					if entry.outputs.len() != processor.n_outputs() {
						return Err(PipelinePrepareError::InvalidDeclaration {
							node: entry.outputs.clone(),
							reason: InvalidDeclarationReason::OutputArity {
								expected: processor.n_outputs(),
								got: entry.outputs.len(),
							},
						});
					}
					if entry.inputs.len() != processor.n_inputs() {
						return Err(PipelinePrepareError::InvalidDeclaration {
							node: entry.outputs.clone(),
							reason: InvalidDeclarationReason::InputArity {
								expected: processor.n_inputs(),
								got: entry.inputs.len(),
							},
						});
					}

					let node_id = self.next_node_id(processor.name());
					self.graph.add_node(PipelineNodeData {
						node_id,
						kind: PipelineNodeKind::User(processor.clone()),
						inputs: entry.inputs.clone(),
						outputs: entry.outputs.clone(),
					})
				}
			};

			for out in &entry.outputs {
				*self.producers.get_mut(out).unwrap() = Some(node_idx);
			}
		}

		Ok(())
	}

	/// Phase three: draw one edge per consumed variable, from its
	/// producer to its consumer.
	fn make_edges(&mut self) -> Result<(), PipelinePrepareError> {
		let mut planned = Vec::new();
		for (b_idx, node) in self.graph.iter_nodes_idx() {
			for (target_port, var) in node.inputs.iter().enumerate() {
				let a_idx = match self.producers.get(var) {
					Some(Some(idx)) => *idx,
					_ => {
						return Err(PipelinePrepareError::UndefinedReference {
							var: var.clone(),
							node: node.node_id.clone(),
						})
					}
				};

				// The producer always lists `var` in its outputs.
				let source_port = self
					.graph
					.get_node(a_idx)
					.outputs
					.iter()
					.position(|o| o == var)
					.unwrap();

				planned.push((
					a_idx,
					b_idx,
					PipelineEdge {
						var: var.clone(),
						source_port,
						target_port,
					},
				));
			}
		}

		for (a_idx, b_idx, edge) in planned {
			self.graph.add_edge(a_idx, b_idx, edge);
		}

		Ok(())
	}

	/// Phase four: give every terminal node one leaf per output, so each
	/// produced value sits on an outgoing edge.
	fn attach_leaves(&mut self) {
		// Snapshot terminal nodes first; adding leaves changes the graph.
		let end_nodes: Vec<GraphNodeIdx> = self
			.graph
			.iter_nodes_idx()
			.filter(|(idx, _)| self.graph.out_degree(*idx) == 0)
			.map(|(idx, _)| idx)
			.collect();

		for a_idx in end_nodes {
			let outputs = self.graph.get_node(a_idx).outputs.clone();
			for (source_port, var) in outputs.iter().enumerate() {
				let node_id = self.next_node_id(var.id());
				let leaf_idx = self.graph.add_node(PipelineNodeData {
					node_id,
					kind: PipelineNodeKind::Leaf(Leaf::new(var.clone())),
					inputs: vec![var.clone()],
					outputs: vec![var.clone()],
				});
				self.graph.add_edge(
					a_idx,
					leaf_idx,
					PipelineEdge {
						var: var.clone(),
						source_port,
						target_port: 0,
					},
				);
			}
		}
	}

	/// Sort and check the input tables, reject cycles, compute variable
	/// dependencies, and freeze the graph.
	fn finish(mut self) -> Result<Pipeline<DataType>, PipelinePrepareError> {
		// Sort positional inputs by slot index, then make sure
		// no index is claimed twice.
		let mut indexed_inputs = std::mem::take(&mut self.indexed_inputs);
		indexed_inputs.sort_by_key(|var| self.slot_index(var));
		for (first, second) in indexed_inputs.iter().tuple_windows() {
			if self.slot_index(first) == self.slot_index(second) {
				return Err(PipelinePrepareError::DuplicateInputIndex {
					index: self.slot_index(first),
					first: first.clone(),
					second: second.clone(),
				});
			}
		}

		// Keyword-only inputs bind by name; sort alphabetically.
		self.kwonly_inputs.sort();

		// Leaves cannot introduce cycles, so checking here covers
		// the whole build.
		if self.graph.has_cycle() {
			return Err(PipelinePrepareError::HasCycle);
		}

		let graph = self.graph.finalize();

		// Walk edges in dependency order, accumulating each variable's
		// transitive dependency set. When an edge into a node is visited,
		// the carried variable's own set is already complete.
		let mut deps: HashMap<PipelineVarID, BTreeSet<PipelineVarID>> = self
			.producers
			.keys()
			.map(|var| (var.clone(), BTreeSet::new()))
			.collect();
		for edge_idx in graph.topo_order_edges() {
			let (_, b_idx, edge) = graph.get_edge(edge_idx);
			let node = graph.get_node(*b_idx);
			if matches!(node.kind, PipelineNodeKind::Leaf(_)) {
				continue;
			}

			let mut carried = deps.get(&edge.var).unwrap().clone();
			carried.insert(edge.var.clone());
			for out in &node.outputs {
				deps.get_mut(out).unwrap().extend(carried.iter().cloned());
			}
		}

		let vars: HashMap<PipelineVarID, PipelineVarInfo> = self
			.producers
			.iter()
			.map(|(var, producer)| {
				(
					var.clone(),
					PipelineVarInfo {
						producer: producer.unwrap(),
						depends_on: deps.remove(var).unwrap(),
					},
				)
			})
			.collect();

		let input_names = indexed_inputs
			.iter()
			.chain(self.kwonly_inputs.iter())
			.join(", ");
		debug!(
			source = "syntax",
			summary = "Pipeline defined",
			name = self.name.to_string(),
			inputs = input_names,
		);

		Ok(Pipeline {
			name: self.name,
			uuid: Uuid::new_v4(),
			graph,
			vars,
			inputs: self.inputs,
			indexed_inputs,
			kwonly_inputs: self.kwonly_inputs,
		})
	}

	/// Make a node id from a base name and the next node number
	fn next_node_id(&self, base: &str) -> PipelineNodeID {
		PipelineNodeID::new(&format!("{}-node{}", base, self.graph.len_nodes()))
	}

	/// The slot index of an indexed input, by variable
	fn slot_index(&self, var: &PipelineVarID) -> usize {
		let node = self.graph.get_node(*self.inputs.get(var).unwrap());
		match &node.kind {
			PipelineNodeKind::Input(InputSlot::Index(i)) => *i,
			_ => unreachable!("indexed input list only contains indexed inputs"),
		}
	}
}
