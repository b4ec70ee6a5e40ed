use crate::{
	api::{PipelineData, Processor, ProcessorError},
	labels::PipelineVarID,
};

/// A pass-through processor attached to every terminal pipeline variable.
///
/// Leaves exist so that every produced value ends up on an *outgoing*
/// edge of some node, which keeps result collection uniform.
#[derive(Debug, Clone)]
pub struct Leaf {
	var: PipelineVarID,
}

impl Leaf {
	/// Make a leaf for the given terminal variable
	pub fn new(var: PipelineVarID) -> Self {
		Self { var }
	}

	/// The variable this leaf pins down
	pub fn var(&self) -> &PipelineVarID {
		&self.var
	}
}

impl<DataType: PipelineData> Processor<DataType> for Leaf {
	fn name(&self) -> &str {
		self.var.id()
	}

	fn n_inputs(&self) -> usize {
		1
	}

	fn n_outputs(&self) -> usize {
		1
	}

	fn process(&self, input: Vec<DataType>) -> Result<Vec<DataType>, ProcessorError> {
		Ok(input)
	}
}
