use alloy::primitives::U256;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Running statistics for one monitoring session.
///
/// Extremes and totals are cumulative over the whole session. The average block
/// interval only covers the records currently held in the history window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitorStats {
	pub session_start: DateTime<Utc>,
	pub block_count: u64,
	pub total_transactions: u64,
	pub total_gas_used: U256,
	pub min_transactions: Option<usize>,
	pub max_transactions: Option<usize>,
	pub min_gas_used: Option<u64>,
	pub max_gas_used: Option<u64>,
	/// Mean interval in seconds over the history window
	pub average_block_interval: Option<f64>,
	pub last_block_timestamp: Option<u64>,
	pub last_block_number: Option<u64>,
}

impl MonitorStats {
	pub fn new(session_start: DateTime<Utc>) -> Self {
		Self {
			session_start,
			block_count: 0,
			total_transactions: 0,
			total_gas_used: U256::ZERO,
			min_transactions: None,
			max_transactions: None,
			min_gas_used: None,
			max_gas_used: None,
			average_block_interval: None,
			last_block_timestamp: None,
			last_block_number: None,
		}
	}

	/// Time elapsed since the session started, clamped at zero
	pub fn uptime(&self, now: DateTime<Utc>) -> Duration {
		(now - self.session_start).to_std().unwrap_or_default()
	}

	pub fn average_transactions(&self) -> Option<f64> {
		(self.block_count > 0).then(|| self.total_transactions as f64 / self.block_count as f64)
	}

	/// Blocks processed per hour of uptime. None before any time has elapsed.
	pub fn blocks_per_hour(&self, now: DateTime<Utc>) -> Option<f64> {
		let hours = self.uptime(now).as_secs_f64() / 3600.0;
		(hours > 0.0).then(|| self.block_count as f64 / hours)
	}
}

impl Default for MonitorStats {
	fn default() -> Self {
		Self::new(Utc::now())
	}
}
