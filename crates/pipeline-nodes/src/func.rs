//! Wrap a plain closure as a pipeline processor.

use smartstring::{LazyCompact, SmartString};
use std::fmt::Debug;
use weir_pipeline::api::{PipelineData, Processor, ProcessorError};

/// The closure type a [`Func`] wraps
type BoxedFunc<DataType> =
	Box<dyn Fn(Vec<DataType>) -> Result<Vec<DataType>, ProcessorError> + Send + Sync>;

/// A processor backed by an arbitrary closure.
///
/// The closure receives its inputs in argument order and must return
/// exactly the declared number of outputs. Handy for one-off transforms
/// that don't deserve a named type.
pub struct Func<DataType: PipelineData> {
	name: SmartString<LazyCompact>,
	n_inputs: usize,
	n_outputs: usize,
	func: BoxedFunc<DataType>,
}

impl<DataType: PipelineData> Func<DataType> {
	/// Wrap `func` as a processor with the given name and arities.
	pub fn new(
		name: &str,
		n_inputs: usize,
		n_outputs: usize,
		func: impl Fn(Vec<DataType>) -> Result<Vec<DataType>, ProcessorError> + Send + Sync + 'static,
	) -> Self {
		Self {
			name: name.into(),
			n_inputs,
			n_outputs,
			func: Box::new(func),
		}
	}
}

impl<DataType: PipelineData> Debug for Func<DataType> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Func")
			.field("name", &self.name)
			.field("n_inputs", &self.n_inputs)
			.field("n_outputs", &self.n_outputs)
			.finish_non_exhaustive()
	}
}

impl<DataType: PipelineData> Processor<DataType> for Func<DataType> {
	fn name(&self) -> &str {
		&self.name
	}

	fn n_inputs(&self) -> usize {
		self.n_inputs
	}

	fn n_outputs(&self) -> usize {
		self.n_outputs
	}

	fn process(&self, input: Vec<DataType>) -> Result<Vec<DataType>, ProcessorError> {
		(self.func)(input)
	}
}
