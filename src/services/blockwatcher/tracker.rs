//! Block ordering for the ingestion loop.
//!
//! The [`BlockTracker`] remembers the most recently accepted block number and is used
//! to identify:
//! - Duplicate or out-of-order notifications, which are dropped before any fetch
//! - Gaps between consecutive accepted blocks, which are logged as missed ranges

/// How a block number relates to the blocks accepted so far
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockOrdering {
	/// Nothing has been accepted yet
	First,
	/// Directly follows the last accepted block
	Next,
	/// Ahead of the last accepted block; `missed` blocks in between were never seen
	Gap { missed_from: u64, missed_to: u64 },
	/// Not greater than the last accepted block
	Stale { last_accepted: u64 },
}

/// Tracks the sequence of accepted blocks for one chain.
///
/// Owned by the ingestion loop, so no locking is needed.
#[derive(Debug, Clone, Default)]
pub struct BlockTracker {
	last_accepted: Option<u64>,
}

impl BlockTracker {
	pub fn new() -> Self {
		Self::default()
	}

	/// Classifies a block number against the last accepted block.
	pub fn check(&self, block_number: u64) -> BlockOrdering {
		match self.last_accepted {
			None => BlockOrdering::First,
			Some(last) if block_number <= last => BlockOrdering::Stale {
				last_accepted: last,
			},
			Some(last) if block_number == last + 1 => BlockOrdering::Next,
			Some(last) => BlockOrdering::Gap {
				missed_from: last + 1,
				missed_to: block_number - 1,
			},
		}
	}

	/// Whether a notification for this block should be dropped without fetching
	pub fn is_stale(&self, block_number: u64) -> bool {
		matches!(self.check(block_number), BlockOrdering::Stale { .. })
	}

	/// Records an accepted block.
	///
	/// Logs a warning for any gap since the previous accepted block. Returns `false`
	/// and records nothing when the block is a duplicate or out of order.
	pub fn record_block(&mut self, block_number: u64) -> bool {
		match self.check(block_number) {
			BlockOrdering::Stale { last_accepted } => {
				tracing::debug!(
					block_number,
					last_accepted,
					"Out of order or duplicate block ignored"
				);
				return false;
			}
			BlockOrdering::Gap {
				missed_from,
				missed_to,
			} => {
				tracing::warn!(
					missed_from,
					missed_to,
					missed = missed_to - missed_from + 1,
					"Missed blocks {} to {}",
					missed_from,
					missed_to
				);
			}
			BlockOrdering::First | BlockOrdering::Next => {}
		}

		self.last_accepted = Some(block_number);
		true
	}

	/// Retrieves the most recently accepted block number.
	pub fn last_block(&self) -> Option<u64> {
		self.last_accepted
	}
}
