//! Configuration error types.
//!
//! Errors raised while reading, parsing or validating the monitor configuration.
//! They are fatal at construction time and are logged once by the binary.

use crate::utils::logging::error::{ErrorContext, ErrorSource, TraceableError};
use std::collections::HashMap;
use thiserror::Error as ThisError;
use uuid::Uuid;

/// Represents errors that can occur during configuration operations
#[derive(ThisError, Debug)]
pub enum ConfigError {
	/// A field holds a value the monitor cannot run with
	#[error("Validation error: {0}")]
	ValidationError(ErrorContext),

	/// The file is not valid JSON or does not match the expected shape
	#[error("Parse error: {0}")]
	ParseError(ErrorContext),

	/// The file could not be opened or read
	#[error("File error: {0}")]
	FileError(ErrorContext),

	/// Other errors that don't fit into the categories above
	#[error(transparent)]
	Other(#[from] anyhow::Error),
}

impl ConfigError {
	pub fn validation_error(
		msg: impl Into<String>,
		source: Option<ErrorSource>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::ValidationError(ErrorContext::new(msg, source, metadata))
	}

	pub fn parse_error(
		msg: impl Into<String>,
		source: Option<ErrorSource>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::ParseError(ErrorContext::new(msg, source, metadata))
	}

	pub fn file_error(
		msg: impl Into<String>,
		source: Option<ErrorSource>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::FileError(ErrorContext::new(msg, source, metadata))
	}

	/// Context of the error; `None` for errors converted from `anyhow`
	pub fn context(&self) -> Option<&ErrorContext> {
		match self {
			Self::ValidationError(ctx) | Self::ParseError(ctx) | Self::FileError(ctx) => Some(ctx),
			Self::Other(_) => None,
		}
	}
}

impl TraceableError for ConfigError {
	fn trace_id(&self) -> String {
		self.context()
			.map(|ctx| ctx.trace_id.clone())
			.unwrap_or_else(|| Uuid::new_v4().to_string())
	}
}

impl From<std::io::Error> for ConfigError {
	fn from(err: std::io::Error) -> Self {
		Self::file_error(err.to_string(), None, None)
	}
}

impl From<serde_json::Error> for ConfigError {
	fn from(err: serde_json::Error) -> Self {
		Self::parse_error(err.to_string(), None, None)
	}
}
