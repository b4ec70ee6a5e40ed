use weir_pipeline::api::{PipelineData, Processor, ProcessorError};

/// A zero-input processor that produces one fixed value.
#[derive(Debug, Clone)]
pub struct Constant<DataType: PipelineData> {
	value: DataType,
}

impl<DataType: PipelineData> Constant<DataType> {
	/// Make a processor that always produces `value`
	pub fn new(value: DataType) -> Self {
		Self { value }
	}
}

impl<DataType: PipelineData> Processor<DataType> for Constant<DataType> {
	fn name(&self) -> &str {
		"Constant"
	}

	fn n_inputs(&self) -> usize {
		0
	}

	fn n_outputs(&self) -> usize {
		1
	}

	fn process(&self, _input: Vec<DataType>) -> Result<Vec<DataType>, ProcessorError> {
		Ok(vec![self.value.clone()])
	}
}
