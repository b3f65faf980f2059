//! Rolling statistics over ingested blocks.
//!
//! The [`StatsAggregator`] owns both the session-long [`MonitorStats`] and the bounded
//! [`HistoryWindow`]. It is shared between the ingestion loop (single writer) and the
//! reporter (reader) through a [`SharedAggregator`], so a report never observes a
//! partially folded record.

mod window;

pub use window::HistoryWindow;

use alloy::primitives::U256;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::models::{BlockRecord, FinalReport, MonitorStats, PeriodicReport, RecentSummary};

/// Number of records covered by the recent-blocks section of periodic reports
pub const RECENT_SUMMARY_BLOCKS: usize = 10;

/// Aggregator shared between ingestion and reporting
pub type SharedAggregator = Arc<RwLock<StatsAggregator>>;

/// Folds block records into running statistics and a bounded history
#[derive(Debug, Clone)]
pub struct StatsAggregator {
	stats: MonitorStats,
	window: HistoryWindow,
}

impl StatsAggregator {
	pub fn new(history_capacity: usize, session_start: DateTime<Utc>) -> Self {
		Self {
			stats: MonitorStats::new(session_start),
			window: HistoryWindow::new(history_capacity),
		}
	}

	/// Wraps the aggregator for sharing between tasks
	pub fn shared(self) -> SharedAggregator {
		Arc::new(RwLock::new(self))
	}

	pub fn stats(&self) -> &MonitorStats {
		&self.stats
	}

	pub fn window(&self) -> &HistoryWindow {
		&self.window
	}

	/// The last record folded, used as the interval baseline for the next block
	pub fn latest(&self) -> Option<&BlockRecord> {
		self.window.latest()
	}

	/// Folds `record` into the statistics and the history window.
	///
	/// Extremes and totals are updated in constant time. Only the average interval is
	/// recomputed, from the window. Returns `false` without touching anything when the
	/// window already holds this block number.
	pub fn update(&mut self, record: BlockRecord) -> bool {
		let number = record.number;
		let timestamp = record.timestamp;
		let transactions = record.transaction_count;
		let gas_used = record.gas_used;

		if !self.window.add(record) {
			return false;
		}

		let average_block_interval = self.window_average_interval();
		let stats = &mut self.stats;
		stats.block_count += 1;
		stats.total_transactions += transactions as u64;
		stats.total_gas_used = stats.total_gas_used.saturating_add(U256::from(gas_used));
		stats.min_transactions = Some(stats.min_transactions.map_or(transactions, |m| m.min(transactions)));
		stats.max_transactions = Some(stats.max_transactions.map_or(transactions, |m| m.max(transactions)));
		stats.min_gas_used = Some(stats.min_gas_used.map_or(gas_used, |m| m.min(gas_used)));
		stats.max_gas_used = Some(stats.max_gas_used.map_or(gas_used, |m| m.max(gas_used)));
		stats.last_block_timestamp = Some(timestamp);
		stats.last_block_number = Some(number);
		stats.average_block_interval = average_block_interval;

		true
	}

	fn window_average_interval(&self) -> Option<f64> {
		let (sum, count) = self
			.window
			.iter()
			.filter_map(|r| r.block_interval)
			.fold((0u128, 0u64), |(sum, count), interval| {
				(sum + interval as u128, count + 1)
			});
		(count > 0).then(|| sum as f64 / count as f64)
	}

	/// Summary of the newest `n` records, once the window holds at least `n`.
	pub fn recent_summary(&self, n: usize) -> Option<RecentSummary> {
		if n == 0 || self.window.len() < n {
			return None;
		}

		let (transactions, gas) = self
			.window
			.recent(n)
			.fold((0u64, 0u128), |(tx, gas), r| {
				(tx + r.transaction_count as u64, gas + r.gas_used as u128)
			});

		let mut intervals: Vec<u64> = self
			.window
			.recent(n)
			.filter_map(|r| r.block_interval)
			.collect();
		intervals.sort_unstable();

		Some(RecentSummary {
			block_count: n,
			average_transactions: transactions as f64 / n as f64,
			average_gas_used: (gas / n as u128) as u64,
			median_interval: intervals.get(intervals.len() / 2).copied(),
		})
	}

	/// Snapshot for the periodic reporter
	pub fn periodic_report(&self, now: DateTime<Utc>) -> PeriodicReport {
		let stats = &self.stats;
		PeriodicReport {
			generated_at: now,
			uptime: stats.uptime(now),
			block_count: stats.block_count,
			total_transactions: stats.total_transactions,
			average_transactions: stats.average_transactions(),
			min_transactions: stats.min_transactions,
			max_transactions: stats.max_transactions,
			min_gas_used: stats.min_gas_used,
			max_gas_used: stats.max_gas_used,
			average_block_interval: stats.average_block_interval,
			last_block_number: stats.last_block_number,
			window_len: self.window.len(),
			recent: self.recent_summary(RECENT_SUMMARY_BLOCKS),
		}
	}

	/// Summary emitted when the monitor stops; built from the running stats only
	pub fn final_report(&self, now: DateTime<Utc>) -> FinalReport {
		let stats = &self.stats;
		FinalReport {
			generated_at: now,
			uptime: stats.uptime(now),
			block_count: stats.block_count,
			total_transactions: stats.total_transactions,
			blocks_per_hour: stats.blocks_per_hour(now),
			average_transactions: stats.average_transactions(),
			average_block_interval: stats.average_block_interval,
			total_gas_used: stats.total_gas_used,
			last_block_number: stats.last_block_number,
		}
	}
}
