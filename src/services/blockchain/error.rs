//! Blockchain service error types and handling.
//!
//! Errors raised by the ledger client. They are not logged on construction:
//! the ingestion pipeline decides whether a failure is transient (one log line,
//! block skipped) or escalates it to the lifecycle controller.

use crate::utils::logging::error::{ErrorContext, ErrorSource, TraceableError};
use std::collections::HashMap;
use thiserror::Error as ThisError;
use uuid::Uuid;

/// Represents possible errors that can occur during blockchain operations
#[derive(ThisError, Debug)]
pub enum BlockChainError {
	/// The node or its WebSocket endpoint could not be reached
	#[error("Connection error: {0}")]
	ConnectionError(ErrorContext),

	/// A JSON-RPC request failed or returned an error
	#[error("Request error: {0}")]
	RequestError(ErrorContext),

	/// When a requested block cannot be found on the blockchain
	#[error("Block not found: {0}")]
	BlockNotFound(ErrorContext),

	/// The node answered with data that does not match the expected shape
	#[error("Parse error: {0}")]
	ParseError(ErrorContext),

	/// Other errors that don't fit into the categories above
	#[error(transparent)]
	Other(#[from] anyhow::Error),
}

impl BlockChainError {
	pub fn connection_error(
		msg: impl Into<String>,
		source: Option<ErrorSource>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::ConnectionError(ErrorContext::new(msg, source, metadata))
	}

	pub fn request_error(
		msg: impl Into<String>,
		source: Option<ErrorSource>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::RequestError(ErrorContext::new(msg, source, metadata))
	}

	pub fn block_not_found(
		msg: impl Into<String>,
		source: Option<ErrorSource>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::BlockNotFound(ErrorContext::new(msg, source, metadata))
	}

	pub fn parse_error(
		msg: impl Into<String>,
		source: Option<ErrorSource>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::ParseError(ErrorContext::new(msg, source, metadata))
	}

	/// Context of the error; `None` for errors converted from `anyhow`
	pub fn context(&self) -> Option<&ErrorContext> {
		match self {
			Self::ConnectionError(ctx)
			| Self::RequestError(ctx)
			| Self::BlockNotFound(ctx)
			| Self::ParseError(ctx) => Some(ctx),
			Self::Other(_) => None,
		}
	}
}

impl TraceableError for BlockChainError {
	fn trace_id(&self) -> String {
		self.context()
			.map(|ctx| ctx.trace_id.clone())
			.unwrap_or_else(|| Uuid::new_v4().to_string())
	}
}
