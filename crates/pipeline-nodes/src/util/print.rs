use tracing::debug;
use weir_pipeline::api::{PipelineData, Processor, ProcessorError};

/// A unary pass-through that logs the value it sees.
#[derive(Debug, Clone)]
pub struct Print;

impl Print {
	/// Make a new print node
	pub fn new() -> Self {
		Self
	}
}

impl<DataType: PipelineData> Processor<DataType> for Print {
	fn name(&self) -> &str {
		"Print"
	}

	fn n_inputs(&self) -> usize {
		1
	}

	fn n_outputs(&self) -> usize {
		1
	}

	fn process(&self, input: Vec<DataType>) -> Result<Vec<DataType>, ProcessorError> {
		debug!(source = "node", summary = "Print", value = ?input[0]);
		Ok(input)
	}
}
