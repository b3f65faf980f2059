//! Periodic and final reporting.
//!
//! The reporter takes read-only snapshots of the shared aggregator. The read lock is
//! held only while the snapshot is built; delivery to the sink happens after it is
//! released, so reporting never holds up ingestion.

use chrono::Utc;
use std::{sync::Arc, time::Duration};
use tokio::{
	sync::watch,
	time::{interval_at, Instant, MissedTickBehavior},
};

use crate::{
	models::{FinalReport, PeriodicReport, Report},
	services::{aggregator::SharedAggregator, notification::NotificationSink},
};

/// Builds reports from the aggregator and hands them to a notification sink
#[derive(Clone)]
pub struct Reporter {
	aggregator: SharedAggregator,
	notifier: Arc<dyn NotificationSink>,
	interval: Duration,
}

impl Reporter {
	pub fn new(
		aggregator: SharedAggregator,
		notifier: Arc<dyn NotificationSink>,
		interval: Duration,
	) -> Self {
		Self {
			aggregator,
			notifier,
			interval,
		}
	}

	pub fn interval(&self) -> Duration {
		self.interval
	}

	/// Snapshot of the current statistics and history window
	pub async fn periodic_report(&self) -> PeriodicReport {
		self.aggregator.read().await.periodic_report(Utc::now())
	}

	/// Summary of the whole session, built from the running statistics
	pub async fn final_report(&self) -> FinalReport {
		self.aggregator.read().await.final_report(Utc::now())
	}

	/// Delivers a report to the sink. Delivery failures are logged by the sink error.
	pub async fn emit(&self, report: Report) {
		if self.notifier.notify_report(&report).await.is_err() {
			tracing::debug!("Report delivery failed");
		}
	}

	/// Emits a periodic report on every tick until shutdown is signalled.
	///
	/// The first report is emitted one full interval after the loop starts.
	pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
		let mut ticker = interval_at(Instant::now() + self.interval, self.interval);
		ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

		loop {
			tokio::select! {
				biased;
				_ = async { let _ = shutdown.wait_for(|stopped| *stopped).await; } => break,
				_ = ticker.tick() => {
					let report = self.periodic_report().await;
					tracing::debug!(block_count = report.block_count, "Emitting periodic report");
					self.emit(Report::Periodic(report)).await;
				}
			}
		}

		tracing::debug!("Reporter stopped");
	}
}
