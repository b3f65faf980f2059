//! Notification sinks.
//!
//! Alerts and reports leave the monitor through a [`NotificationSink`]. Three sinks
//! ship with the crate:
//! - [`LogNotifier`]: structured `tracing` events
//! - [`ConsoleNotifier`]: plain text on stdout
//! - [`CallbackNotifier`]: caller-supplied closure

use async_trait::async_trait;
use std::sync::Arc;

mod callback;
mod console;
mod error;
mod log;

use crate::models::{Alert, NotifierKind, Report};

pub use callback::{CallbackNotifier, NotificationEvent};
pub use console::ConsoleNotifier;
pub use error::NotificationError;
pub use log::LogNotifier;

/// Destination for alerts and reports
#[async_trait]
pub trait NotificationSink: Send + Sync {
	async fn notify_alert(&self, alert: &Alert) -> Result<(), NotificationError>;

	async fn notify_report(&self, report: &Report) -> Result<(), NotificationError>;
}

/// Builds the sink selected in the monitor configuration
pub fn create_notifier(kind: NotifierKind) -> Arc<dyn NotificationSink> {
	match kind {
		NotifierKind::Log => Arc::new(LogNotifier::new()),
		NotifierKind::Console => Arc::new(ConsoleNotifier::new()),
	}
}
