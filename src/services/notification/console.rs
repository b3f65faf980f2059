//! Notification sink printing to standard output.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::Mutex;

use crate::{
	models::{Alert, Report},
	services::notification::{NotificationError, NotificationSink},
};

/// Prints alerts and reports as plain text lines
///
/// Writes go to stdout by default; any async writer can be supplied instead.
pub struct ConsoleNotifier<W = tokio::io::Stdout> {
	writer: Mutex<W>,
}

impl ConsoleNotifier {
	pub fn new() -> Self {
		Self::with_writer(tokio::io::stdout())
	}
}

impl Default for ConsoleNotifier {
	fn default() -> Self {
		Self::new()
	}
}

impl<W: AsyncWrite + Unpin + Send> ConsoleNotifier<W> {
	pub fn with_writer(writer: W) -> Self {
		Self {
			writer: Mutex::new(writer),
		}
	}

	/// Consumes the notifier and returns the writer
	pub fn into_inner(self) -> W {
		self.writer.into_inner()
	}

	async fn write_line(&self, text: String) -> Result<(), NotificationError> {
		let mut writer = self.writer.lock().await;
		let result = async {
			writer.write_all(text.as_bytes()).await?;
			writer.write_all(b"\n").await?;
			writer.flush().await
		}
		.await;

		result.map_err(|e| {
			NotificationError::notify_failed(
				"Failed to write notification to console",
				Some(Box::new(e)),
				Some(HashMap::from([("sink".to_string(), "console".to_string())])),
			)
		})
	}
}

#[async_trait]
impl<W: AsyncWrite + Unpin + Send> NotificationSink for ConsoleNotifier<W> {
	async fn notify_alert(&self, alert: &Alert) -> Result<(), NotificationError> {
		self.write_line(alert.to_string()).await
	}

	async fn notify_report(&self, report: &Report) -> Result<(), NotificationError> {
		self.write_line(report.to_string()).await
	}
}
