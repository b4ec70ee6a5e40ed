//! A ready-made data container for pipelines.
//!
//! The engine is generic over the data flowing through it; this is the
//! tagged union most users will want. Pipelines with richer needs can
//! define their own and implement
//! [`PipelineData`](weir_pipeline::api::PipelineData) on it.

use smartstring::{LazyCompact, SmartString};
use std::sync::Arc;
use weir_pipeline::api::PipelineData;

/// A bit of data flowing through a pipeline.
///
/// Cheap to clone: binary payloads are reference-counted.
#[derive(Debug, Clone)]
pub enum WeirData {
	/// An integer
	Integer(i64),

	/// A float
	Float(f64),

	/// A block of text
	Text(SmartString<LazyCompact>),

	/// A binary blob
	Binary(Arc<Vec<u8>>),
}

impl PipelineData for WeirData {}

impl WeirData {
	/// Get this value as an integer, if it is one
	pub fn as_integer(&self) -> Option<i64> {
		match self {
			Self::Integer(x) => Some(*x),
			_ => None,
		}
	}

	/// Get this value as a float, if it is one
	pub fn as_float(&self) -> Option<f64> {
		match self {
			Self::Float(x) => Some(*x),
			_ => None,
		}
	}

	/// Get this value as text, if it is text
	pub fn as_text(&self) -> Option<&str> {
		match self {
			Self::Text(x) => Some(x),
			_ => None,
		}
	}
}

impl From<i64> for WeirData {
	fn from(value: i64) -> Self {
		Self::Integer(value)
	}
}

impl From<f64> for WeirData {
	fn from(value: f64) -> Self {
		Self::Float(value)
	}
}

impl From<&str> for WeirData {
	fn from(value: &str) -> Self {
		Self::Text(value.into())
	}
}

impl From<Vec<u8>> for WeirData {
	fn from(value: Vec<u8>) -> Self {
		Self::Binary(Arc::new(value))
	}
}
