//! Bounded history of recent block records.

use std::collections::VecDeque;

use crate::models::BlockRecord;

/// Fixed-capacity FIFO of block records.
///
/// Holds at most `capacity` records in arrival order and never two records with the
/// same block number.
#[derive(Debug, Clone)]
pub struct HistoryWindow {
	records: VecDeque<BlockRecord>,
	capacity: usize,
}

impl HistoryWindow {
	/// Creates an empty window. A capacity of zero is raised to one.
	pub fn new(capacity: usize) -> Self {
		let capacity = capacity.max(1);
		Self {
			records: VecDeque::with_capacity(capacity),
			capacity,
		}
	}

	/// Appends `record`, evicting the oldest entry when full.
	///
	/// Returns `false` and leaves the window unchanged if a record with the same block
	/// number is already present.
	pub fn add(&mut self, record: BlockRecord) -> bool {
		if self.contains(record.number) {
			return false;
		}
		if self.records.len() == self.capacity {
			self.records.pop_front();
		}
		self.records.push_back(record);
		true
	}

	pub fn contains(&self, block_number: u64) -> bool {
		self.records.iter().any(|r| r.number == block_number)
	}

	pub fn len(&self) -> usize {
		self.records.len()
	}

	pub fn is_empty(&self) -> bool {
		self.records.is_empty()
	}

	pub fn capacity(&self) -> usize {
		self.capacity
	}

	/// Most recently added record
	pub fn latest(&self) -> Option<&BlockRecord> {
		self.records.back()
	}

	/// Records oldest first
	pub fn iter(&self) -> impl Iterator<Item = &BlockRecord> {
		self.records.iter()
	}

	/// The newest `n` records, oldest first
	pub fn recent(&self, n: usize) -> impl Iterator<Item = &BlockRecord> {
		self.records.iter().skip(self.records.len().saturating_sub(n))
	}

	/// Block numbers held, oldest first
	pub fn block_numbers(&self) -> Vec<u64> {
		self.records.iter().map(|r| r.number).collect()
	}
}
