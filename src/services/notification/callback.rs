//! Notification sink handing events to caller-supplied code.

use async_trait::async_trait;
use std::sync::Arc;

use crate::{
	models::{Alert, Report},
	services::notification::{NotificationError, NotificationSink},
};

/// Anything a sink can receive
#[derive(Debug, Clone, PartialEq)]
pub enum NotificationEvent {
	Alert(Alert),
	Report(Report),
}

type Callback = Arc<dyn Fn(NotificationEvent) + Send + Sync>;

/// Invokes a callback for every alert and report
///
/// The callback runs on the notifying task and must not block.
#[derive(Clone)]
pub struct CallbackNotifier {
	callback: Callback,
}

impl CallbackNotifier {
	pub fn new(callback: impl Fn(NotificationEvent) + Send + Sync + 'static) -> Self {
		Self {
			callback: Arc::new(callback),
		}
	}
}

#[async_trait]
impl NotificationSink for CallbackNotifier {
	async fn notify_alert(&self, alert: &Alert) -> Result<(), NotificationError> {
		(self.callback)(NotificationEvent::Alert(alert.clone()));
		Ok(())
	}

	async fn notify_report(&self, report: &Report) -> Result<(), NotificationError> {
		(self.callback)(NotificationEvent::Report(report.clone()));
		Ok(())
	}
}
