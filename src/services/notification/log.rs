//! Notification sink writing to the structured log.

use async_trait::async_trait;

use crate::{
	models::{Alert, Report},
	services::notification::{NotificationError, NotificationSink},
};

/// Emits alerts as warnings and reports as info events through `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl LogNotifier {
	pub fn new() -> Self {
		Self
	}
}

#[async_trait]
impl NotificationSink for LogNotifier {
	async fn notify_alert(&self, alert: &Alert) -> Result<(), NotificationError> {
		tracing::warn!(
			rule = %alert.rule,
			block_number = alert.block_number,
			"{}",
			alert
		);
		Ok(())
	}

	async fn notify_report(&self, report: &Report) -> Result<(), NotificationError> {
		let kind = match report {
			Report::Periodic(_) => "periodic",
			Report::Final(_) => "final",
		};
		tracing::info!(report = kind, "\n{}", report);
		Ok(())
	}
}
