//! Scripted head transports.

use std::{
	collections::VecDeque,
	sync::{
		atomic::{AtomicUsize, Ordering},
		Mutex,
	},
};

use async_trait::async_trait;
use chain_event_monitor::{
	models::{HeadNotification, TransportMode},
	services::blockwatcher::{
		BlockWatcherError, HeadItem, HeadSubscription, HeadTransport, SubscriptionHandle,
	},
};
use tokio::sync::mpsc;

/// What a scripted subscription does after replaying its heads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AfterScript {
	/// Stay open until released
	Hold,
	/// Report a broken subscription
	Fail,
}

/// Push-style transport replaying one script per acquisition.
///
/// Acquisitions beyond the scripts fail with a transport error.
pub struct ScriptedPushTransport {
	scripts: Mutex<VecDeque<(Vec<u64>, AfterScript)>>,
	acquisitions: AtomicUsize,
}

impl ScriptedPushTransport {
	pub fn new(scripts: Vec<(Vec<u64>, AfterScript)>) -> Self {
		Self {
			scripts: Mutex::new(scripts.into()),
			acquisitions: AtomicUsize::new(0),
		}
	}

	pub fn acquisitions(&self) -> usize {
		self.acquisitions.load(Ordering::SeqCst)
	}
}

#[async_trait]
impl HeadTransport for ScriptedPushTransport {
	fn mode(&self) -> TransportMode {
		TransportMode::Push
	}

	async fn acquire(&self) -> Result<HeadSubscription, BlockWatcherError> {
		self.acquisitions.fetch_add(1, Ordering::SeqCst);
		let (heads, after) = self.scripts.lock().unwrap().pop_front().ok_or_else(|| {
			BlockWatcherError::transport_error("Failed to connect to ws://node", None, None)
		})?;

		let (tx, rx) = mpsc::channel::<HeadItem>(16);
		let task = tokio::spawn(async move {
			for number in heads {
				if tx.send(Ok(HeadNotification::new(number))).await.is_err() {
					return;
				}
			}
			match after {
				AfterScript::Hold => tx.closed().await,
				AfterScript::Fail => {
					let _ = tx
						.send(Err(BlockWatcherError::transport_error(
							"connection reset by peer",
							None,
							None,
						)))
						.await;
				}
			}
		});

		Ok(HeadSubscription {
			notifications: rx,
			handle: SubscriptionHandle::new(task),
		})
	}
}
