//! Block watcher error types and handling.
//!
//! Separates failures that end a session (lost subscriptions) from failures that only
//! cost a single block (fetch and parse problems) and from misuse of the monitor
//! lifecycle.

use crate::utils::logging::error::{ErrorContext, ErrorSource, TraceableError};
use std::collections::HashMap;
use thiserror::Error as ThisError;
use uuid::Uuid;

/// Represents possible errors that can occur while watching blocks
#[derive(ThisError, Debug)]
pub enum BlockWatcherError {
	/// The head subscription was lost or the endpoint is unreachable
	#[error("Transport error: {0}")]
	TransportError(ErrorContext),

	/// A single block could not be retrieved, or the retrieval timed out
	#[error("Fetch error: {0}")]
	FetchError(ErrorContext),

	/// Block data returned by the node is malformed
	#[error("Parse error: {0}")]
	ParseError(ErrorContext),

	/// A lifecycle operation is not valid in the current monitor state
	#[error("State error: {0}")]
	StateError(ErrorContext),

	/// Other errors that don't fit into the categories above
	#[error(transparent)]
	Other(#[from] anyhow::Error),
}

impl BlockWatcherError {
	// Transport error; always surfaced to the lifecycle controller, so logged here
	pub fn transport_error(
		msg: impl Into<String>,
		source: Option<ErrorSource>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::TransportError(ErrorContext::new_with_log(msg, source, metadata))
	}

	// Fetch error
	pub fn fetch_error(
		msg: impl Into<String>,
		source: Option<ErrorSource>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::FetchError(ErrorContext::new(msg, source, metadata))
	}

	// Parse error
	pub fn parse_error(
		msg: impl Into<String>,
		source: Option<ErrorSource>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::ParseError(ErrorContext::new(msg, source, metadata))
	}

	// State error
	pub fn state_error(
		msg: impl Into<String>,
		source: Option<ErrorSource>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::StateError(ErrorContext::new(msg, source, metadata))
	}

	/// Whether the error only affects a single block
	pub fn is_recoverable(&self) -> bool {
		matches!(self, Self::FetchError(_) | Self::ParseError(_))
	}

	/// Context of the error; `None` for errors converted from `anyhow`
	pub fn context(&self) -> Option<&ErrorContext> {
		match self {
			Self::TransportError(ctx)
			| Self::FetchError(ctx)
			| Self::ParseError(ctx)
			| Self::StateError(ctx) => Some(ctx),
			Self::Other(_) => None,
		}
	}
}

impl TraceableError for BlockWatcherError {
	fn trace_id(&self) -> String {
		self.context()
			.map(|ctx| ctx.trace_id.clone())
			.unwrap_or_else(|| Uuid::new_v4().to_string())
	}
}
