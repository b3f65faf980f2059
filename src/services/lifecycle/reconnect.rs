//! Reconnection after a lost head subscription.

use backon::{BackoffBuilder, ExponentialBuilder};
use std::time::Duration;
use tokio::sync::watch;

use crate::{
	models::ReconnectPolicy,
	services::blockwatcher::{HeadSubscription, HeadTransport},
	utils::metrics,
};

/// Result of a reconnection attempt sequence
#[derive(Debug)]
pub enum Reconnect {
	/// A fresh subscription was acquired
	Acquired(HeadSubscription),
	/// Shutdown was signalled while waiting or connecting
	Shutdown,
	/// The policy forbids (further) attempts
	GaveUp,
}

/// Delays to wait before each attempt. Empty for `terminate`.
pub fn backoff_delays(policy: &ReconnectPolicy) -> Vec<Duration> {
	match *policy {
		ReconnectPolicy::Terminate => Vec::new(),
		ReconnectPolicy::Bounded {
			max_attempts,
			initial_backoff_ms,
			max_backoff_ms,
		} => ExponentialBuilder::default()
			.with_min_delay(Duration::from_millis(initial_backoff_ms))
			.with_max_delay(Duration::from_millis(max_backoff_ms))
			.with_max_times(max_attempts)
			.build()
			.collect(),
	}
}

/// Tries to acquire a new subscription according to `policy`.
///
/// Attempts run sequentially with exponential backoff; every sleep and every attempt
/// races the shutdown signal.
pub async fn reconnect(
	transport: &dyn HeadTransport,
	policy: &ReconnectPolicy,
	shutdown: &mut watch::Receiver<bool>,
) -> Reconnect {
	let delays = backoff_delays(policy);
	let max_attempts = delays.len();

	if max_attempts == 0 {
		tracing::error!("Reconnect policy is terminate, giving up on lost subscription");
		return Reconnect::GaveUp;
	}

	for (attempt, delay) in delays.into_iter().enumerate() {
		let attempt = attempt + 1;
		tracing::info!(
			attempt,
			max_attempts,
			delay_ms = delay.as_millis() as u64,
			"Reconnecting in {:?}",
			delay
		);

		tokio::select! {
			biased;
			_ = shutdown.wait_for(|stopped| *stopped) => return Reconnect::Shutdown,
			_ = tokio::time::sleep(delay) => {}
		}

		metrics::record_reconnect_attempt();
		let acquired = tokio::select! {
			biased;
			_ = shutdown.wait_for(|stopped| *stopped) => return Reconnect::Shutdown,
			acquired = transport.acquire() => acquired,
		};

		match acquired {
			Ok(subscription) => {
				tracing::info!(attempt, "Reconnected to head notifications");
				return Reconnect::Acquired(subscription);
			}
			Err(error) => {
				tracing::warn!(attempt, max_attempts, error = %error, "Reconnect attempt failed");
			}
		}
	}

	tracing::error!(max_attempts, "Giving up after {} reconnect attempts", max_attempts);
	Reconnect::GaveUp
}
