//! Errors of the JSON-RPC HTTP transport.
//!
//! The HTTP status and body are kept on [`TransportError::Http`] so the ledger client
//! can tell a missing block from a rate limit or a node failure.

use crate::utils::logging::error::{ErrorContext, ErrorSource, TraceableError};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransportError {
	/// Non-success HTTP status
	#[error("HTTP error: status {status_code} for URL {url}")]
	Http {
		status_code: reqwest::StatusCode,
		url: String,
		body: String,
		context: ErrorContext,
	},

	/// The request never produced a response
	#[error("Network error: {0}")]
	Network(ErrorContext),

	/// The body is not a JSON-RPC response
	#[error("Failed to parse JSON response: {0}")]
	ResponseParse(ErrorContext),

	/// The request parameters could not be encoded
	#[error("Failed to serialize request JSON: {0}")]
	RequestSerialization(ErrorContext),
}

impl TransportError {
	pub fn http(
		status_code: reqwest::StatusCode,
		url: String,
		body: String,
		source: Option<ErrorSource>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		let msg = format!("HTTP error: status {} for URL {}", status_code, url);

		Self::Http {
			status_code,
			url,
			body,
			context: ErrorContext::new(msg, source, metadata),
		}
	}

	pub fn network(
		msg: impl Into<String>,
		source: Option<ErrorSource>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::Network(ErrorContext::new(msg, source, metadata))
	}

	pub fn response_parse(
		msg: impl Into<String>,
		source: Option<ErrorSource>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::ResponseParse(ErrorContext::new(msg, source, metadata))
	}

	pub fn request_serialization(
		msg: impl Into<String>,
		source: Option<ErrorSource>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::RequestSerialization(ErrorContext::new(msg, source, metadata))
	}

	pub fn context(&self) -> &ErrorContext {
		match self {
			Self::Http { context, .. } => context,
			Self::Network(ctx) | Self::ResponseParse(ctx) | Self::RequestSerialization(ctx) => ctx,
		}
	}

	/// Whether a JSON-RPC request that failed this way is worth retrying
	pub fn is_transient(&self) -> bool {
		match self {
			Self::Http { status_code, .. } => {
				status_code.is_server_error()
					|| *status_code == reqwest::StatusCode::TOO_MANY_REQUESTS
			}
			Self::Network(_) => true,
			Self::ResponseParse(_) | Self::RequestSerialization(_) => false,
		}
	}
}

impl TraceableError for TransportError {
	fn trace_id(&self) -> String {
		self.context().trace_id.clone()
	}
}
