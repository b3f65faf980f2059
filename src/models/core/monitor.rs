use serde::{Deserialize, Serialize};

use crate::utils::http::RetryConfig;

/// How block heads reach the monitor
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportMode {
	/// Live `newHeads` subscription over WebSocket
	#[default]
	Push,
	/// Periodic `eth_blockNumber` diffing over HTTP
	Poll,
}

/// What the lifecycle controller does when a push subscription is lost
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum ReconnectPolicy {
	/// Retry with exponential backoff, at most `max_attempts` times
	Bounded {
		max_attempts: usize,
		initial_backoff_ms: u64,
		max_backoff_ms: u64,
	},
	/// Stop the session on the first transport failure
	Terminate,
}

impl Default for ReconnectPolicy {
	fn default() -> Self {
		Self::Bounded {
			max_attempts: 5,
			initial_backoff_ms: 1_000,
			max_backoff_ms: 30_000,
		}
	}
}

/// Thresholds for the built-in alert rules.
///
/// A `null` threshold (or `empty_block: false`) disables that rule.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AlertThresholds {
	/// Fire when a block carries more transactions than this
	#[serde(default = "default_high_transaction_count")]
	pub high_transaction_count: Option<usize>,
	/// Fire when gas utilization exceeds this percentage
	#[serde(default = "default_high_gas_utilization")]
	pub high_gas_utilization_percent: Option<f64>,
	/// Fire when the interval since the previous block exceeds this many seconds
	#[serde(default = "default_long_block_interval")]
	pub long_block_interval_secs: Option<u64>,
	/// Fire on blocks without transactions
	#[serde(default = "default_true")]
	pub empty_block: bool,
}

fn default_high_transaction_count() -> Option<usize> {
	Some(200)
}

fn default_high_gas_utilization() -> Option<f64> {
	Some(95.0)
}

fn default_long_block_interval() -> Option<u64> {
	Some(20)
}

fn default_true() -> bool {
	true
}

impl Default for AlertThresholds {
	fn default() -> Self {
		Self {
			high_transaction_count: default_high_transaction_count(),
			high_gas_utilization_percent: default_high_gas_utilization(),
			long_block_interval_secs: default_long_block_interval(),
			empty_block: true,
		}
	}
}

/// Where alerts and reports are delivered
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotifierKind {
	/// Structured `tracing` events
	#[default]
	Log,
	/// Plain lines on stdout
	Console,
}

/// Construction parameters for a block monitor.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MonitorConfig {
	/// HTTP JSON-RPC endpoint used for block queries
	pub rpc_url: String,

	/// WebSocket endpoint used for push subscriptions
	#[serde(default)]
	pub ws_url: Option<String>,

	#[serde(default)]
	pub transport: TransportMode,

	/// Poll tick in milliseconds
	#[serde(default = "default_poll_interval_ms")]
	pub poll_interval_ms: u64,

	/// Maximum number of blocks a single poll tick may emit
	#[serde(default = "default_max_lookback_blocks")]
	pub max_lookback_blocks: u64,

	/// Capacity of the rolling history window
	#[serde(default = "default_history_capacity")]
	pub history_capacity: usize,

	/// Seconds between periodic reports
	#[serde(default = "default_report_interval_secs")]
	pub report_interval_secs: u64,

	/// Upper bound on a single block fetch, in milliseconds
	#[serde(default = "default_fetch_timeout_ms")]
	pub fetch_timeout_ms: u64,

	/// How long stop() waits for tasks before aborting them, in milliseconds
	#[serde(default = "default_shutdown_grace_ms")]
	pub shutdown_grace_ms: u64,

	/// Retry policy for individual JSON-RPC requests
	#[serde(default)]
	pub rpc_retry: RetryConfig,

	#[serde(default)]
	pub reconnect: ReconnectPolicy,

	#[serde(default)]
	pub alerts: AlertThresholds,

	#[serde(default)]
	pub notifier: NotifierKind,
}

fn default_poll_interval_ms() -> u64 {
	10_000
}

fn default_max_lookback_blocks() -> u64 {
	50
}

fn default_history_capacity() -> usize {
	100
}

fn default_report_interval_secs() -> u64 {
	300
}

fn default_fetch_timeout_ms() -> u64 {
	10_000
}

fn default_shutdown_grace_ms() -> u64 {
	5_000
}

impl MonitorConfig {
	/// Configuration with every optional field at its default
	pub fn new(rpc_url: impl Into<String>) -> Self {
		Self {
			rpc_url: rpc_url.into(),
			ws_url: None,
			transport: TransportMode::default(),
			poll_interval_ms: default_poll_interval_ms(),
			max_lookback_blocks: default_max_lookback_blocks(),
			history_capacity: default_history_capacity(),
			report_interval_secs: default_report_interval_secs(),
			fetch_timeout_ms: default_fetch_timeout_ms(),
			shutdown_grace_ms: default_shutdown_grace_ms(),
			rpc_retry: RetryConfig::default(),
			reconnect: ReconnectPolicy::default(),
			alerts: AlertThresholds::default(),
			notifier: NotifierKind::default(),
		}
	}
}
