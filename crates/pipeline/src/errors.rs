//! Errors we may encounter when running a pipeline

use itertools::Itertools;
use std::{error::Error, fmt::Display};

use crate::{
	api::ProcessorError,
	labels::{PipelineNodeID, PipelineVarID},
};

/// An error we encounter while running a built pipeline.
///
/// All of these are fatal to the current run. The pipeline's structure is
/// untouched; the next run starts from cleared edges and unloaded inputs.
#[derive(Debug)]
pub enum PipelineError {
	/// The caller supplied more positional arguments than this pipeline
	/// has indexed inputs.
	ArityMismatch {
		/// How many indexed inputs this pipeline has
		expected: usize,
		/// How many positional arguments the caller gave
		got: usize,
	},

	/// A named argument doesn't match any input variable.
	UnknownInput {
		/// The name that matched nothing
		var: PipelineVarID,
	},

	/// A single input was given two values in one run.
	DoubleLoad {
		/// The input that was loaded twice
		var: PipelineVarID,
	},

	/// After binding all arguments, some inputs still had no value.
	MissingInput {
		/// Every input variable left unbound
		vars: Vec<PipelineVarID>,
	},

	/// A processor returned the wrong number of outputs.
	/// None of its outputs are distributed when this happens.
	OutputArityMismatch {
		/// The node whose processor misbehaved
		node: PipelineNodeID,
		/// How many outputs the node declares
		expected: usize,
		/// How many values the processor returned
		got: usize,
	},

	/// A processor failed while running.
	ProcessorFailure {
		/// The node whose processor failed
		node: PipelineNodeID,
		/// The variables that node produces
		vars: Vec<PipelineVarID>,
		/// The error the processor returned
		source: ProcessorError,
	},
}

impl Display for PipelineError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::ArityMismatch { expected, got } => {
				writeln!(
					f,
					"PipelineError: expected at most {expected} positional arguments, got {got}"
				)
			}
			Self::UnknownInput { var } => {
				writeln!(f, "PipelineError: no input named `{var}`")
			}
			Self::DoubleLoad { var } => {
				writeln!(f, "PipelineError: input `{var}` was given two values")
			}
			Self::MissingInput { vars } => {
				writeln!(
					f,
					"PipelineError: data must be provided for [{}]",
					vars.iter().join(", ")
				)
			}
			Self::OutputArityMismatch {
				node,
				expected,
				got,
			} => {
				writeln!(
					f,
					"PipelineError: node `{node}` produced {got} outputs, expected {expected}"
				)
			}
			Self::ProcessorFailure { node, vars, source } => {
				writeln!(
					f,
					"PipelineError: node `{node}` (producing [{}]) failed: {source}",
					vars.iter().join(", ")
				)
			}
		}
	}
}

impl Error for PipelineError {
	fn source(&self) -> Option<&(dyn Error + 'static)> {
		match self {
			Self::ProcessorFailure { source, .. } => {
				let source: &(dyn Error + 'static) = source.as_ref();
				Some(source)
			}
			_ => None,
		}
	}
}
