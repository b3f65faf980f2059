//! Block ingestion pipeline.
//!
//! Consumes head notifications, fetches each full block, extracts its record and
//! folds it into the shared aggregator. Per-block failures are logged once and the
//! block is skipped; only a transport failure ends a session.

use std::{collections::HashMap, sync::Arc, time::Duration};
use tokio::sync::{mpsc, watch};
use tracing::instrument;

use crate::{
	models::{Alert, BlockRecord, EVMBlock, HeadNotification},
	services::{
		aggregator::SharedAggregator,
		alert::AlertEngine,
		blockchain::{BlockChainClient, BlockChainError},
		blockwatcher::{error::BlockWatcherError, tracker::BlockTracker, transport::HeadItem},
		extractor::extract_record,
		notification::NotificationSink,
	},
	utils::{
		formatting::{format_gas, format_gwei},
		metrics,
	},
};

/// Why an ingestion session ended
#[derive(Debug)]
pub enum SessionEnd {
	/// Shutdown was signalled
	Shutdown,
	/// The notification stream failed or closed
	TransportFailed(BlockWatcherError),
}

/// Result of handling one notification
#[derive(Debug)]
pub enum IngestOutcome {
	/// The block was folded; carries the record and the alerts it raised
	Folded(BlockRecord, Vec<Alert>),
	/// Duplicate or out-of-order notification, dropped without fetching
	Dropped,
	/// Fetch or parse failed; the block was skipped
	Skipped,
	/// Shutdown was signalled while the block was being fetched
	Cancelled,
}

fn block_metadata(block_number: u64) -> Option<HashMap<String, String>> {
	Some(HashMap::from([(
		"block_number".to_string(),
		block_number.to_string(),
	)]))
}

/// Maps a client failure to a block watcher error. Malformed data is a parse error;
/// anything else is a failed fetch.
fn classify_client_error(error: anyhow::Error, block_number: u64) -> BlockWatcherError {
	let is_parse = matches!(
		error.downcast_ref::<BlockChainError>(),
		Some(BlockChainError::ParseError(_))
	);
	if is_parse {
		BlockWatcherError::parse_error(
			format!("Malformed data for block {}", block_number),
			Some(error.into()),
			block_metadata(block_number),
		)
	} else {
		BlockWatcherError::fetch_error(
			format!("Failed to fetch block {}", block_number),
			Some(error.into()),
			block_metadata(block_number),
		)
	}
}

/// Drives notifications through fetch, extraction, aggregation and alerting.
///
/// Owned by a single task; it is the only writer of the shared aggregator.
pub struct BlockIngestor<C> {
	client: C,
	aggregator: SharedAggregator,
	alerts: Arc<AlertEngine>,
	notifier: Arc<dyn NotificationSink>,
	tracker: BlockTracker,
	fetch_timeout: Duration,
}

impl<C: BlockChainClient> BlockIngestor<C> {
	pub fn new(
		client: C,
		aggregator: SharedAggregator,
		alerts: Arc<AlertEngine>,
		notifier: Arc<dyn NotificationSink>,
		fetch_timeout: Duration,
	) -> Self {
		Self {
			client,
			aggregator,
			alerts,
			notifier,
			tracker: BlockTracker::new(),
			fetch_timeout,
		}
	}

	/// Last block accepted across all sessions of this ingestor
	pub fn last_block(&self) -> Option<u64> {
		self.tracker.last_block()
	}

	/// Processes notifications until shutdown or a transport failure.
	pub async fn run(
		&mut self,
		notifications: &mut mpsc::Receiver<HeadItem>,
		shutdown: &mut watch::Receiver<bool>,
	) -> SessionEnd {
		loop {
			let item = tokio::select! {
				biased;
				_ = shutdown.wait_for(|stopped| *stopped) => return SessionEnd::Shutdown,
				item = notifications.recv() => item,
			};

			match item {
				Some(Ok(head)) => {
					if let IngestOutcome::Cancelled = self.ingest(head, shutdown).await {
						return SessionEnd::Shutdown;
					}
				}
				Some(Err(error)) => return SessionEnd::TransportFailed(error),
				None => {
					return SessionEnd::TransportFailed(BlockWatcherError::transport_error(
						"Head notification stream ended",
						None,
						None,
					))
				}
			}
		}
	}

	/// Handles a single notification.
	///
	/// The fetch races the shutdown signal and is bounded by the fetch timeout.
	#[instrument(skip_all, fields(block_number = head.number))]
	pub async fn ingest(
		&mut self,
		head: HeadNotification,
		shutdown: &mut watch::Receiver<bool>,
	) -> IngestOutcome {
		if self.tracker.is_stale(head.number) {
			tracing::debug!(
				last_accepted = self.tracker.last_block(),
				"Dropping duplicate or out-of-order block"
			);
			metrics::record_block_skipped("duplicate");
			return IngestOutcome::Dropped;
		}

		let fetched = tokio::select! {
			biased;
			_ = shutdown.wait_for(|stopped| *stopped) => return IngestOutcome::Cancelled,
			fetched = self.fetch_block(head.number) => fetched,
		};

		match self.fold(fetched).await {
			Ok((record, alerts)) => IngestOutcome::Folded(record, alerts),
			Err(error) => {
				let reason = match error {
					BlockWatcherError::ParseError(_) => "parse",
					_ => "fetch",
				};
				tracing::warn!(error = %error, "Skipping block {}", head.number);
				metrics::record_block_skipped(reason);
				IngestOutcome::Skipped
			}
		}
	}

	async fn fetch_block(&self, block_number: u64) -> Result<EVMBlock, BlockWatcherError> {
		match tokio::time::timeout(
			self.fetch_timeout,
			self.client.get_block_by_number(block_number),
		)
		.await
		{
			Ok(Ok(block)) => Ok(block),
			Ok(Err(error)) => Err(classify_client_error(error, block_number)),
			Err(elapsed) => Err(BlockWatcherError::fetch_error(
				format!(
					"Timed out after {}ms fetching block {}",
					self.fetch_timeout.as_millis(),
					block_number
				),
				Some(Box::new(elapsed)),
				block_metadata(block_number),
			)),
		}
	}

	async fn fold(
		&mut self,
		fetched: Result<EVMBlock, BlockWatcherError>,
	) -> Result<(BlockRecord, Vec<Alert>), BlockWatcherError> {
		let block = fetched?;

		let (record, alerts) = {
			let mut aggregator = self.aggregator.write().await;
			let record = extract_record(&block, aggregator.latest())?;

			if self.tracker.is_stale(record.number) || !aggregator.update(record.clone()) {
				return Err(BlockWatcherError::parse_error(
					format!("Node returned already processed block {}", record.number),
					None,
					block_metadata(record.number),
				));
			}
			self.tracker.record_block(record.number);

			let alerts = self.alerts.evaluate(&record, aggregator.stats());
			(record, alerts)
		};

		log_block(&record);
		metrics::record_block_processed(&record);

		for alert in &alerts {
			metrics::record_alert(&alert.rule);
			if self.notifier.notify_alert(alert).await.is_err() {
				tracing::debug!(rule = %alert.rule, "Alert delivery failed");
			}
		}

		Ok((record, alerts))
	}
}

/// One structured line per folded block
fn log_block(record: &BlockRecord) {
	tracing::info!(
		block_number = record.number,
		transactions = record.transaction_count,
		contract_creations = record.contract_creations,
		gas_used = record.gas_used,
		gas_limit = record.gas_limit,
		gas_utilization = %format!("{:.1}", record.gas_utilization()),
		average_gas_price_gwei = %format_gwei(record.average_gas_price),
		interval_secs = record.block_interval,
		"Block {} | {} txs | gas {}/{} ({:.1}%) | avg price {} gwei",
		record.number,
		record.transaction_count,
		format_gas(record.gas_used),
		format_gas(record.gas_limit),
		record.gas_utilization(),
		format_gwei(record.average_gas_price)
	);
}
