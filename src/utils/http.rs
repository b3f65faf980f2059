//! Retrying HTTP client for JSON-RPC.
//!
//! The retry policy is part of the monitor configuration (`rpc_retry`). Rate limits and
//! node-side failures are retried with exponential backoff before a request fails; a
//! request that still fails costs one block, never the session.

use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{
	policies::ExponentialBackoff, Jitter, RetryTransientMiddleware, RetryableStrategy,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Retry policy for JSON-RPC requests sent over HTTP
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct RetryConfig {
	/// Retries after the first attempt; `0` disables retrying
	#[serde(default = "default_max_retries")]
	pub max_retries: u32,
	#[serde(default = "default_initial_backoff_ms")]
	pub initial_backoff_ms: u64,
	#[serde(default = "default_max_backoff_ms")]
	pub max_backoff_ms: u64,
	/// Randomize each backoff between zero and its computed value
	#[serde(default = "default_jitter")]
	pub jitter: bool,
}

fn default_max_retries() -> u32 {
	3
}

fn default_initial_backoff_ms() -> u64 {
	250
}

fn default_max_backoff_ms() -> u64 {
	10_000
}

fn default_jitter() -> bool {
	true
}

impl Default for RetryConfig {
	fn default() -> Self {
		Self {
			max_retries: default_max_retries(),
			initial_backoff_ms: default_initial_backoff_ms(),
			max_backoff_ms: default_max_backoff_ms(),
			jitter: default_jitter(),
		}
	}
}

impl RetryConfig {
	/// Backoff policy handed to the retry middleware
	pub fn backoff_policy(&self) -> ExponentialBackoff {
		let jitter = if self.jitter { Jitter::Full } else { Jitter::None };
		let initial = Duration::from_millis(self.initial_backoff_ms);
		let max = Duration::from_millis(self.max_backoff_ms).max(initial);

		ExponentialBackoff::builder()
			.jitter(jitter)
			.base(2)
			.retry_bounds(initial, max)
			.build_with_max_retries(self.max_retries)
	}
}

/// Wraps `base_client` in retry middleware.
///
/// `strategy` decides which responses are retried; without one the middleware's default
/// classification is used.
pub fn create_retryable_http_client<S>(
	config: &RetryConfig,
	base_client: reqwest::Client,
	strategy: Option<S>,
) -> ClientWithMiddleware
where
	S: RetryableStrategy + Send + Sync + 'static,
{
	let policy = config.backoff_policy();
	let builder = ClientBuilder::new(base_client);

	match strategy {
		Some(strategy) => builder.with(RetryTransientMiddleware::new_with_policy_and_strategy(
			policy, strategy,
		)),
		None => builder.with(RetryTransientMiddleware::new_with_policy(policy)),
	}
	.build()
}
