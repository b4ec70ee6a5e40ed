use crate::api::{InputSlot, PipelineData};

/// The runtime slot of one pipeline input.
///
/// A fresh instance is made for every run, so a run always starts with
/// nothing loaded. Double-load and missing-value checks are done by the
/// runner, which knows the variable names involved.
#[derive(Debug, Clone)]
pub struct PipelineInput<DataType: PipelineData> {
	slot: InputSlot,
	data: Option<DataType>,
}

impl<DataType: PipelineData> PipelineInput<DataType> {
	/// Make a new, unloaded input
	pub fn new(slot: InputSlot) -> Self {
		Self { slot, data: None }
	}

	/// Where this input's value comes from
	pub fn slot(&self) -> InputSlot {
		self.slot
	}

	/// Has this input been given a value?
	pub fn is_loaded(&self) -> bool {
		self.data.is_some()
	}

	/// Store a value in this input
	pub fn load(&mut self, data: DataType) {
		self.data = Some(data);
	}

	/// Clear this input's value
	pub fn unload(&mut self) {
		self.data = None;
	}

	/// Get the loaded value, or `None` if nothing is loaded
	pub fn read(&self) -> Option<&DataType> {
		self.data.as_ref()
	}
}
