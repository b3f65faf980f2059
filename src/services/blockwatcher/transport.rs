//! Head notification transports.
//!
//! A transport turns a blockchain client into a channel of [`HeadNotification`]s:
//! - [`PushTransport`] forwards a live `newHeads` subscription
//! - [`PollTransport`] periodically diffs the latest block number against the last
//!   position it saw
//!
//! Both hand back a [`HeadSubscription`]. A terminal failure is delivered as an `Err`
//! item on the channel, so "no data yet" and "subscription lost" are never confused.

use async_trait::async_trait;
use futures::StreamExt;
use std::{ops::RangeInclusive, time::Duration};
use tokio::{
	sync::mpsc,
	task::JoinHandle,
	time::{interval, MissedTickBehavior},
};
use tracing::instrument;
use uuid::Uuid;

use crate::{
	models::{HeadNotification, TransportMode},
	services::{blockchain::BlockChainClient, blockwatcher::error::BlockWatcherError},
};

/// Capacity of the notification channel between a transport task and ingestion
const NOTIFICATION_BUFFER: usize = 256;

/// Item type delivered by every transport
pub type HeadItem = Result<HeadNotification, BlockWatcherError>;

/// Owns the background task that feeds a subscription.
///
/// `unsubscribe` releases the task exactly once; dropping the handle does the same.
#[derive(Debug)]
pub struct SubscriptionHandle {
	id: Uuid,
	task: Option<JoinHandle<()>>,
}

impl SubscriptionHandle {
	pub fn new(task: JoinHandle<()>) -> Self {
		Self {
			id: Uuid::new_v4(),
			task: Some(task),
		}
	}

	pub fn id(&self) -> Uuid {
		self.id
	}

	pub fn is_active(&self) -> bool {
		self.task.as_ref().is_some_and(|task| !task.is_finished())
	}

	/// Stops the feeding task. Returns `true` only for the call that released it.
	pub fn unsubscribe(&mut self) -> bool {
		match self.task.take() {
			Some(task) => {
				task.abort();
				tracing::debug!(subscription = %self.id, "Unsubscribed from head notifications");
				true
			}
			None => false,
		}
	}
}

impl Drop for SubscriptionHandle {
	fn drop(&mut self) {
		self.unsubscribe();
	}
}

/// An acquired stream of head notifications plus the handle that owns it
#[derive(Debug)]
pub struct HeadSubscription {
	pub notifications: mpsc::Receiver<HeadItem>,
	pub handle: SubscriptionHandle,
}

/// Source of head notifications
///
/// Implementations must not retry terminal failures themselves; reconnecting is the
/// lifecycle controller's decision.
#[async_trait]
pub trait HeadTransport: Send + Sync {
	/// Which transport variant this is
	fn mode(&self) -> TransportMode;

	/// Opens a new subscription
	async fn acquire(&self) -> Result<HeadSubscription, BlockWatcherError>;
}

/// Live subscription transport over the client's `subscribe_heads`
pub struct PushTransport<C> {
	client: C,
}

impl<C: BlockChainClient + 'static> PushTransport<C> {
	pub fn new(client: C) -> Self {
		Self { client }
	}
}

#[async_trait]
impl<C: BlockChainClient + 'static> HeadTransport for PushTransport<C> {
	fn mode(&self) -> TransportMode {
		TransportMode::Push
	}

	#[instrument(skip(self))]
	async fn acquire(&self) -> Result<HeadSubscription, BlockWatcherError> {
		let mut stream = self.client.subscribe_heads().await.map_err(|e| {
			BlockWatcherError::transport_error(
				"Failed to subscribe to new heads",
				Some(e.into()),
				None,
			)
		})?;

		let (tx, rx) = mpsc::channel(NOTIFICATION_BUFFER);
		let task = tokio::spawn(async move {
			while let Some(item) = stream.next().await {
				let item = item.map_err(|e| {
					BlockWatcherError::transport_error(
						"Head subscription failed",
						Some(e.into()),
						None,
					)
				});
				let terminal = item.is_err();
				if tx.send(item).await.is_err() || terminal {
					return;
				}
			}
			let _ = tx
				.send(Err(BlockWatcherError::transport_error(
					"Head subscription closed by remote",
					None,
					None,
				)))
				.await;
		});

		let handle = SubscriptionHandle::new(task);
		tracing::info!(subscription = %handle.id(), "Subscribed to new heads");
		Ok(HeadSubscription {
			notifications: rx,
			handle,
		})
	}
}

/// Periodic polling transport over the client's `get_latest_block_number`
pub struct PollTransport<C> {
	client: C,
	poll_interval: Duration,
	max_lookback_blocks: u64,
	start_after: Option<u64>,
}

impl<C: BlockChainClient + 'static> PollTransport<C> {
	pub fn new(client: C, poll_interval: Duration, max_lookback_blocks: u64) -> Self {
		Self {
			client,
			poll_interval,
			max_lookback_blocks,
			start_after: None,
		}
	}

	/// Uses `block_number` as the last seen position instead of taking the first poll
	/// as the baseline
	pub fn starting_after(mut self, block_number: u64) -> Self {
		self.start_after = Some(block_number);
		self
	}
}

/// Blocks to announce when the chain moved from `last_seen` to `current`.
///
/// Bounded to the newest `max_lookback` blocks. `None` when the chain did not advance.
pub fn catch_up_range(
	last_seen: u64,
	current: u64,
	max_lookback: u64,
) -> Option<RangeInclusive<u64>> {
	if current <= last_seen {
		return None;
	}
	let oldest_allowed = current.saturating_sub(max_lookback.saturating_sub(1));
	Some((last_seen + 1).max(oldest_allowed)..=current)
}

#[async_trait]
impl<C: BlockChainClient + 'static> HeadTransport for PollTransport<C> {
	fn mode(&self) -> TransportMode {
		TransportMode::Poll
	}

	#[instrument(skip(self))]
	async fn acquire(&self) -> Result<HeadSubscription, BlockWatcherError> {
		let client = self.client.clone();
		let poll_interval = self.poll_interval;
		let max_lookback = self.max_lookback_blocks;
		let mut last_seen = self.start_after;

		let (tx, rx) = mpsc::channel(NOTIFICATION_BUFFER);
		let task = tokio::spawn(async move {
			let mut ticker = interval(poll_interval);
			ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

			loop {
				ticker.tick().await;
				if tx.is_closed() {
					return;
				}

				let current = match client.get_latest_block_number().await {
					Ok(current) => current,
					Err(e) => {
						tracing::warn!(error = %e, "Failed to poll latest block number, retrying next tick");
						continue;
					}
				};

				let Some(last) = last_seen else {
					tracing::debug!(block_number = current, "Polling baseline established");
					last_seen = Some(current);
					continue;
				};

				if let Some(range) = catch_up_range(last, current, max_lookback) {
					let skipped = range.start() - last - 1;
					if skipped > 0 {
						tracing::warn!(
							skipped,
							max_lookback,
							"Look-back limit reached, skipping {} blocks",
							skipped
						);
					}
					for block_number in range {
						if tx.send(Ok(HeadNotification::new(block_number))).await.is_err() {
							return;
						}
					}
					last_seen = Some(current);
				}
			}
		});

		let handle = SubscriptionHandle::new(task);
		tracing::info!(
			subscription = %handle.id(),
			poll_interval_ms = poll_interval.as_millis() as u64,
			"Polling for new heads"
		);
		Ok(HeadSubscription {
			notifications: rx,
			handle,
		})
	}
}
