//! Periodic and final summary reports.
//!
//! Reports are plain data snapshots. Rendering to text happens through `Display`,
//! so every notification sink prints the same layout.

use alloy::primitives::U256;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, time::Duration};

use crate::utils::formatting::{format_duration, format_gas, format_number};

const RULE: &str = "================================";

/// Summary over the most recent records of the history window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentSummary {
	/// Number of records the summary covers
	pub block_count: usize,
	pub average_transactions: f64,
	pub average_gas_used: u64,
	/// Median of the known intervals, in seconds
	pub median_interval: Option<u64>,
}

/// Snapshot emitted on every reporter tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodicReport {
	pub generated_at: DateTime<Utc>,
	pub uptime: Duration,
	pub block_count: u64,
	pub total_transactions: u64,
	pub average_transactions: Option<f64>,
	pub min_transactions: Option<usize>,
	pub max_transactions: Option<usize>,
	pub min_gas_used: Option<u64>,
	pub max_gas_used: Option<u64>,
	pub average_block_interval: Option<f64>,
	pub last_block_number: Option<u64>,
	/// Number of records held by the history window when the snapshot was taken
	pub window_len: usize,
	pub recent: Option<RecentSummary>,
}

/// Summary emitted exactly once when the monitor stops.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalReport {
	pub generated_at: DateTime<Utc>,
	pub uptime: Duration,
	pub block_count: u64,
	pub total_transactions: u64,
	pub blocks_per_hour: Option<f64>,
	pub average_transactions: Option<f64>,
	pub average_block_interval: Option<f64>,
	pub total_gas_used: U256,
	pub last_block_number: Option<u64>,
}

/// Any report the reporter can emit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Report {
	Periodic(PeriodicReport),
	Final(FinalReport),
}

fn format_interval(seconds: f64) -> String {
	format_duration(Duration::from_secs_f64(seconds.max(0.0)))
}

impl fmt::Display for PeriodicReport {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		writeln!(f, "Periodic monitor report")?;
		writeln!(f, "{}", RULE)?;
		writeln!(f, "Uptime: {}", format_duration(self.uptime))?;
		writeln!(f, "Blocks processed: {}", format_number(self.block_count))?;
		writeln!(
			f,
			"Transactions: {}",
			format_number(self.total_transactions)
		)?;
		if let Some(avg) = self.average_transactions {
			writeln!(f, "Average transactions/block: {:.1}", avg)?;
		}
		if let (Some(min), Some(max)) = (self.min_transactions, self.max_transactions) {
			writeln!(f, "Transaction range: {} - {}", min, max)?;
		}
		if let (Some(min), Some(max)) = (self.min_gas_used, self.max_gas_used) {
			writeln!(f, "Gas used range: {} - {}", format_gas(min), format_gas(max))?;
		}
		if let Some(interval) = self.average_block_interval {
			writeln!(f, "Average block interval: {}", format_interval(interval))?;
		}
		if let Some(recent) = &self.recent {
			writeln!(f, "Last {} blocks:", recent.block_count)?;
			writeln!(
				f,
				"  Average transactions: {:.1}",
				recent.average_transactions
			)?;
			writeln!(
				f,
				"  Average gas used: {}",
				format_gas(recent.average_gas_used)
			)?;
			if let Some(median) = recent.median_interval {
				writeln!(
					f,
					"  Median block interval: {}",
					format_duration(Duration::from_secs(median))
				)?;
			}
		}
		write!(f, "{}", RULE)
	}
}

impl fmt::Display for FinalReport {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		writeln!(f, "Final monitor report")?;
		writeln!(f, "{}", RULE)?;
		writeln!(f, "Total uptime: {}", format_duration(self.uptime))?;
		writeln!(f, "Blocks processed: {}", format_number(self.block_count))?;
		writeln!(
			f,
			"Transactions processed: {}",
			format_number(self.total_transactions)
		)?;
		if let Some(rate) = self.blocks_per_hour {
			writeln!(f, "Block rate: {:.1}/hour", rate)?;
		}
		if let Some(avg) = self.average_transactions {
			writeln!(f, "Average transactions/block: {:.1}", avg)?;
		}
		if let Some(interval) = self.average_block_interval {
			writeln!(f, "Average block interval: {}", format_interval(interval))?;
		}
		let total_gas = u64::try_from(self.total_gas_used).unwrap_or(u64::MAX);
		writeln!(f, "Total gas used: {}", format_gas(total_gas))?;
		write!(f, "{}", RULE)
	}
}

impl fmt::Display for Report {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Report::Periodic(report) => report.fmt(f),
			Report::Final(report) => report.fmt(f),
		}
	}
}
