//! Contextual errors with trace ids.
//!
//! Every error type in the monitor wraps an [`ErrorContext`]. The context carries a
//! message, an optional source, key/value metadata, a creation time and a trace id. When
//! a context wraps another traceable error the trace id is inherited, so a skipped block
//! can be followed from the JSON-RPC failure up to the ingestion log line.

use chrono::{DateTime, Utc};
use std::{collections::HashMap, error::Error as StdError, fmt};
use uuid::Uuid;

/// Boxed source error accepted by every error constructor
pub type ErrorSource = Box<dyn StdError + Send + Sync + 'static>;

/// Source chain depth searched for an existing trace id
const TRACE_SEARCH_DEPTH: usize = 4;

/// Message, source and metadata of a failure, tagged with a trace id
#[derive(Debug)]
pub struct ErrorContext {
	pub message: String,
	pub source: Option<ErrorSource>,
	pub metadata: Option<HashMap<String, String>>,
	pub timestamp: DateTime<Utc>,
	/// Inherited from the source chain when one of the sources is traceable
	pub trace_id: String,
}

impl ErrorContext {
	pub fn new(
		message: impl Into<String>,
		source: Option<ErrorSource>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		let trace_id = source
			.as_deref()
			.and_then(|source| inherited_trace_id(source))
			.unwrap_or_else(|| Uuid::new_v4().to_string());

		Self {
			message: message.into(),
			source,
			metadata,
			timestamp: Utc::now(),
			trace_id,
		}
	}

	/// Same as [`ErrorContext::new`], and emits one `error` event for the context.
	pub fn new_with_log(
		message: impl Into<String>,
		source: Option<ErrorSource>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		let context = Self::new(message, source, metadata);
		context.log();
		context
	}

	pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.metadata
			.get_or_insert_with(HashMap::new)
			.insert(key.into(), value.into());
		self
	}

	/// `message [k1=v1, k2=v2]`, keys in ascending order
	pub fn format_with_metadata(&self) -> String {
		let Some(metadata) = self.metadata.as_ref().filter(|m| !m.is_empty()) else {
			return self.message.clone();
		};

		let mut pairs: Vec<_> = metadata.iter().collect();
		pairs.sort_unstable_by(|a, b| a.0.cmp(b.0));
		let rendered = pairs
			.into_iter()
			.map(|(key, value)| format!("{key}={value}"))
			.collect::<Vec<_>>()
			.join(", ");

		format!("{} [{}]", self.message, rendered)
	}

	fn log(&self) {
		match self.source.as_deref() {
			Some(source) => tracing::error!(
				trace_id = %self.trace_id,
				timestamp = %self.timestamp.to_rfc3339(),
				error.chain = %error_chain(source),
				"{}",
				self.format_with_metadata()
			),
			None => tracing::error!(
				trace_id = %self.trace_id,
				timestamp = %self.timestamp.to_rfc3339(),
				"{}",
				self.format_with_metadata()
			),
		}
	}
}

impl fmt::Display for ErrorContext {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.format_with_metadata())
	}
}

impl StdError for ErrorContext {
	fn source(&self) -> Option<&(dyn StdError + 'static)> {
		self.source.as_deref().map(|source| source as &(dyn StdError + 'static))
	}
}

/// Errors that carry a trace id
pub trait TraceableError: StdError + Send + Sync {
	fn trace_id(&self) -> String;
}

impl TraceableError for dyn StdError + Send + Sync + 'static {
	fn trace_id(&self) -> String {
		inherited_trace_id(self).unwrap_or_else(|| Uuid::new_v4().to_string())
	}
}

/// First trace id found on `err` or its sources
fn inherited_trace_id(err: &(dyn StdError + 'static)) -> Option<String> {
	std::iter::successors(Some(err), |&current| current.source())
		.take(TRACE_SEARCH_DEPTH + 1)
		.find_map(own_trace_id)
}

fn own_trace_id(err: &(dyn StdError + 'static)) -> Option<String> {
	use crate::{
		models::ConfigError,
		services::{
			blockchain::{BlockChainError, TransportError},
			blockwatcher::BlockWatcherError,
			notification::NotificationError,
		},
	};

	if let Some(context) = err.downcast_ref::<ErrorContext>() {
		return Some(context.trace_id.clone());
	}
	if let Some(e) = err.downcast_ref::<BlockWatcherError>() {
		return Some(e.trace_id());
	}
	if let Some(e) = err.downcast_ref::<BlockChainError>() {
		return Some(e.trace_id());
	}
	if let Some(e) = err.downcast_ref::<TransportError>() {
		return Some(e.trace_id());
	}
	if let Some(e) = err.downcast_ref::<NotificationError>() {
		return Some(e.trace_id());
	}
	err.downcast_ref::<ConfigError>().map(|e| e.trace_id())
}

/// Renders `err` followed by one `Caused by:` line per source
fn error_chain(err: &dyn StdError) -> String {
	let mut rendered = err.to_string();
	let mut source = err.source();
	while let Some(cause) = source {
		rendered.push_str("\n\tCaused by: ");
		rendered.push_str(&cause.to_string());
		source = cause.source();
	}
	rendered
}
