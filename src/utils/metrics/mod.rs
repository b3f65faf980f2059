//! Metrics module for the application.
//!
//! - This module contains the global Prometheus registry.
//! - Defines the block monitor metrics and the helpers that record them.

pub mod server;
use lazy_static::lazy_static;
use prometheus::{Encoder, Gauge, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};

use crate::models::BlockRecord;

lazy_static! {
	/// Global Prometheus registry.
	///
	/// This registry holds all metrics defined in this module and is used
	/// to gather metrics for exposure via the metrics endpoint.
	pub static ref REGISTRY: Registry = Registry::new();

	/// Counter of blocks folded into the running statistics.
	pub static ref BLOCKS_PROCESSED: IntCounter = {
		let counter = IntCounter::new("blocks_processed_total", "Blocks folded into statistics").unwrap();
		REGISTRY.register(Box::new(counter.clone())).unwrap();
		counter
	};

	/// Counter of blocks that were not folded, labelled by reason
	/// (`fetch`, `parse`, `duplicate`).
	pub static ref BLOCKS_SKIPPED: IntCounterVec = {
		let counter = IntCounterVec::new(
			Opts::new("blocks_skipped_total", "Blocks skipped by the ingestion pipeline"),
			&["reason"]
		).unwrap();
		REGISTRY.register(Box::new(counter.clone())).unwrap();
		counter
	};

	/// Counter of fired alerts, labelled by rule name.
	pub static ref ALERTS_FIRED: IntCounterVec = {
		let counter = IntCounterVec::new(
			Opts::new("alerts_fired_total", "Alerts emitted by the rule engine"),
			&["rule"]
		).unwrap();
		REGISTRY.register(Box::new(counter.clone())).unwrap();
		counter
	};

	/// Counter of transport reconnect attempts.
	pub static ref RECONNECT_ATTEMPTS: IntCounter = {
		let counter = IntCounter::new("reconnect_attempts_total", "Transport reconnect attempts").unwrap();
		REGISTRY.register(Box::new(counter.clone())).unwrap();
		counter
	};

	/// Gauge for the number of the most recently folded block.
	pub static ref LATEST_BLOCK: Gauge = {
		let gauge = Gauge::new("latest_block_number", "Number of the last processed block").unwrap();
		REGISTRY.register(Box::new(gauge.clone())).unwrap();
		gauge
	};

	/// Gauge for the gas utilization (0-100) of the most recently folded block.
	pub static ref GAS_UTILIZATION: Gauge = {
		let gauge = Gauge::new("last_block_gas_utilization_percentage", "Gas utilization of the last processed block").unwrap();
		REGISTRY.register(Box::new(gauge.clone())).unwrap();
		gauge
	};
}

/// Gather all metrics and encode into the provided format.
pub fn gather_metrics() -> Result<Vec<u8>, Box<dyn std::error::Error>> {
	let encoder = TextEncoder::new();
	let metric_families = REGISTRY.gather();
	let mut buffer = Vec::new();
	encoder.encode(&metric_families, &mut buffer)?;
	Ok(buffer)
}

/// Records a block that was folded into the statistics.
pub fn record_block_processed(record: &BlockRecord) {
	BLOCKS_PROCESSED.inc();
	LATEST_BLOCK.set(record.number as f64);
	GAS_UTILIZATION.set(record.gas_utilization());
}

/// Records a block that the ingestion pipeline dropped.
pub fn record_block_skipped(reason: &str) {
	BLOCKS_SKIPPED.with_label_values(&[reason]).inc();
}

/// Records an alert fired by the given rule.
pub fn record_alert(rule: &str) {
	ALERTS_FIRED.with_label_values(&[rule]).inc();
}

pub fn record_reconnect_attempt() {
	RECONNECT_ATTEMPTS.inc();
}
