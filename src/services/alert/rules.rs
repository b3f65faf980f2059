//! Built-in alert rules.

use crate::{
	models::{BlockRecord, MonitorStats},
	services::alert::AlertRule,
	utils::formatting::format_number,
};

/// Fires when a block carries more than `threshold` transactions
#[derive(Debug, Clone)]
pub struct HighTransactionCountRule {
	pub threshold: usize,
}

impl AlertRule for HighTransactionCountRule {
	fn name(&self) -> &str {
		"high transaction count"
	}

	fn matches(&self, record: &BlockRecord, _stats: &MonitorStats) -> bool {
		record.transaction_count > self.threshold
	}

	fn message(&self, record: &BlockRecord, _stats: &MonitorStats) -> String {
		format!(
			"Block {} has {} transactions (threshold {})",
			format_number(record.number),
			record.transaction_count,
			self.threshold
		)
	}
}

/// Fires when gas utilization exceeds `threshold_percent`
#[derive(Debug, Clone)]
pub struct HighGasUtilizationRule {
	pub threshold_percent: f64,
}

impl AlertRule for HighGasUtilizationRule {
	fn name(&self) -> &str {
		"high gas utilization"
	}

	fn matches(&self, record: &BlockRecord, _stats: &MonitorStats) -> bool {
		record.gas_utilization() > self.threshold_percent
	}

	fn message(&self, record: &BlockRecord, _stats: &MonitorStats) -> String {
		format!(
			"Block {} gas utilization {:.1}% (threshold {:.1}%)",
			format_number(record.number),
			record.gas_utilization(),
			self.threshold_percent
		)
	}
}

/// Fires when a block arrives more than `threshold_secs` after its predecessor
#[derive(Debug, Clone)]
pub struct LongBlockIntervalRule {
	pub threshold_secs: u64,
}

impl AlertRule for LongBlockIntervalRule {
	fn name(&self) -> &str {
		"long block interval"
	}

	fn matches(&self, record: &BlockRecord, _stats: &MonitorStats) -> bool {
		record
			.block_interval
			.is_some_and(|interval| interval > self.threshold_secs)
	}

	fn message(&self, record: &BlockRecord, _stats: &MonitorStats) -> String {
		format!(
			"Block {} arrived {}s after the previous block (threshold {}s)",
			format_number(record.number),
			record.block_interval.unwrap_or_default(),
			self.threshold_secs
		)
	}
}

/// Fires for blocks without transactions
#[derive(Debug, Clone, Default)]
pub struct EmptyBlockRule;

impl AlertRule for EmptyBlockRule {
	fn name(&self) -> &str {
		"empty block"
	}

	fn matches(&self, record: &BlockRecord, _stats: &MonitorStats) -> bool {
		record.is_empty()
	}

	fn message(&self, record: &BlockRecord, _stats: &MonitorStats) -> String {
		format!("Block {} contains no transactions", format_number(record.number))
	}
}
