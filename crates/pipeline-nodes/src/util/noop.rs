use weir_pipeline::api::{PipelineData, Processor, ProcessorError};

/// A processor that passes its inputs through unchanged.
///
/// Useful for renaming variables or fanning a tuple of values
/// through one declaration entry.
#[derive(Debug, Clone)]
pub struct Noop {
	n_ports: usize,
}

impl Noop {
	/// Make a pass-through with `n_ports` inputs and outputs
	pub fn new(n_ports: usize) -> Self {
		Self { n_ports }
	}
}

impl<DataType: PipelineData> Processor<DataType> for Noop {
	fn name(&self) -> &str {
		"Noop"
	}

	fn n_inputs(&self) -> usize {
		self.n_ports
	}

	fn n_outputs(&self) -> usize {
		self.n_ports
	}

	fn process(&self, input: Vec<DataType>) -> Result<Vec<DataType>, ProcessorError> {
		Ok(input)
	}
}
