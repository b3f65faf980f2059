//! Alert rule engine.
//!
//! Rules implement [`AlertRule`] and are evaluated in order by the [`AlertEngine`].
//! Every rule whose predicate holds produces one [`Alert`]; evaluation never stops early
//! and never mutates state, so the same input always yields the same alerts.

mod rules;

pub use rules::{EmptyBlockRule, HighGasUtilizationRule, HighTransactionCountRule, LongBlockIntervalRule};

use crate::models::{Alert, AlertThresholds, BlockRecord, MonitorStats};

/// A named predicate over a freshly folded record and the stats that include it
pub trait AlertRule: Send + Sync {
	fn name(&self) -> &str;

	fn matches(&self, record: &BlockRecord, stats: &MonitorStats) -> bool;

	fn message(&self, record: &BlockRecord, stats: &MonitorStats) -> String;
}

/// Ordered, fixed set of alert rules
#[derive(Default)]
pub struct AlertEngine {
	rules: Vec<Box<dyn AlertRule>>,
}

impl AlertEngine {
	/// Creates an engine without rules
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates an engine with the built-in rules enabled by `thresholds`.
	///
	/// Order: transaction count, gas utilization, block interval, empty block.
	pub fn from_config(thresholds: &AlertThresholds) -> Self {
		let mut engine = Self::new();
		if let Some(threshold) = thresholds.high_transaction_count {
			engine = engine.with_rule(HighTransactionCountRule { threshold });
		}
		if let Some(threshold_percent) = thresholds.high_gas_utilization_percent {
			engine = engine.with_rule(HighGasUtilizationRule { threshold_percent });
		}
		if let Some(threshold_secs) = thresholds.long_block_interval_secs {
			engine = engine.with_rule(LongBlockIntervalRule { threshold_secs });
		}
		if thresholds.empty_block {
			engine = engine.with_rule(EmptyBlockRule);
		}
		engine
	}

	/// Appends a rule; it is evaluated after the rules already present
	pub fn with_rule(mut self, rule: impl AlertRule + 'static) -> Self {
		self.rules.push(Box::new(rule));
		self
	}

	pub fn rule_names(&self) -> Vec<&str> {
		self.rules.iter().map(|rule| rule.name()).collect()
	}

	pub fn len(&self) -> usize {
		self.rules.len()
	}

	pub fn is_empty(&self) -> bool {
		self.rules.is_empty()
	}

	/// Runs every rule in order and returns the alerts that fired
	pub fn evaluate(&self, record: &BlockRecord, stats: &MonitorStats) -> Vec<Alert> {
		self.rules
			.iter()
			.filter(|rule| rule.matches(record, stats))
			.map(|rule| Alert {
				rule: rule.name().to_string(),
				block_number: record.number,
				message: rule.message(record, stats),
			})
			.collect()
	}
}
