//! Notification delivery errors.
//!
//! A failed delivery is logged when the error is created. Callers treat it as
//! informational: alerts and reports that cannot be delivered never stop ingestion.

use crate::utils::logging::error::{ErrorContext, ErrorSource, TraceableError};
use std::collections::HashMap;
use thiserror::Error as ThisError;

#[derive(ThisError, Debug)]
pub enum NotificationError {
	/// The sink refused or could not complete a write
	#[error("Notification failed: {0}")]
	NotifyFailed(Box<ErrorContext>),
}

impl NotificationError {
	pub fn notify_failed(
		msg: impl Into<String>,
		source: Option<ErrorSource>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::NotifyFailed(Box::new(ErrorContext::new_with_log(msg, source, metadata)))
	}

	pub fn context(&self) -> &ErrorContext {
		match self {
			Self::NotifyFailed(ctx) => ctx,
		}
	}
}

impl TraceableError for NotificationError {
	fn trace_id(&self) -> String {
		self.context().trace_id.clone()
	}
}
