//! Traits that allow external code to define pipeline processors

use serde::{Deserialize, Serialize};
use std::{error::Error, fmt::Debug};

/// The error a [`Processor`] may return from [`Processor::process`].
///
/// The engine never inspects this; it is wrapped into
/// [`PipelineError::ProcessorFailure`](crate::errors::PipelineError::ProcessorFailure)
/// together with the variables the failing node produces.
pub type ProcessorError = Box<dyn Error + Send + Sync + 'static>;

/// A bit of data flowing along a pipeline edge.
///
/// Any variable may carry any value of this type; the engine never looks
/// inside. These should be easy to clone. [`PipelineData`]s that carry
/// something big probably wrap it in an [`std::sync::Arc`].
pub trait PipelineData
where
	Self: Debug + Clone + Send + Sync + 'static,
{
}

/// A unit of computation hosted by a pipeline node.
///
/// Processors are opaque to the engine. It reads the declared arities when
/// the pipeline is built, calls [`Processor::process`] exactly once per run,
/// and makes no other assumptions. Processors are shared by reference
/// (`Arc<dyn Processor<_>>`) and are only ever invoked sequentially.
pub trait Processor<DataType: PipelineData>
where
	Self: Debug + Send + Sync,
{
	/// This processor's display name, used in logs and errors.
	fn name(&self) -> &str;

	/// How many values does this processor consume?
	fn n_inputs(&self) -> usize;

	/// How many values does this processor produce?
	/// Must be at least one.
	fn n_outputs(&self) -> usize;

	/// Transform `input` into exactly [`Processor::n_outputs`] values.
	///
	/// `input.len()` always equals [`Processor::n_inputs`]; values arrive
	/// in declared argument order. Returning the wrong number of outputs
	/// fails the run with an output arity error.
	fn process(&self, input: Vec<DataType>) -> Result<Vec<DataType>, ProcessorError>;
}

/// Where a pipeline input takes its runtime value from.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputSlot {
	/// Bound to the positional run argument with this index.
	Index(usize),

	/// Bound by variable name only.
	Keyword,
}

impl InputSlot {
	/// Get this slot's positional index, if it has one.
	pub fn index(&self) -> Option<usize> {
		match self {
			Self::Index(i) => Some(*i),
			Self::Keyword => None,
		}
	}

	/// Is this a keyword-only slot?
	pub fn is_keyword(&self) -> bool {
		matches!(self, Self::Keyword)
	}
}
