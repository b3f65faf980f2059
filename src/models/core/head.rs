use alloy::primitives::B256;
use serde::{Deserialize, Serialize};

/// Announcement that a new block head is available.
///
/// Both transport variants produce this shape, so ingestion never knows whether
/// the head arrived over a live subscription or from a poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadNotification {
	/// Block number of the announced head
	pub number: u64,
	/// Block hash, when the transport knows it
	pub hash: Option<B256>,
}

impl HeadNotification {
	pub fn new(number: u64) -> Self {
		Self { number, hash: None }
	}

	pub fn with_hash(number: u64, hash: B256) -> Self {
		Self {
			number,
			hash: Some(hash),
		}
	}
}
