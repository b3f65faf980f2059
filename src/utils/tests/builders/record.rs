use crate::models::BlockRecord;
use alloy::primitives::{Address, U256};

use super::evm::block::{block_hash, BLOCK_TIME, GENESIS_TIMESTAMP};

/// A builder for creating test block records with default values.
#[derive(Debug, Clone)]
pub struct BlockRecordBuilder {
	record: BlockRecord,
	timestamp_set: bool,
}

impl Default for BlockRecordBuilder {
	fn default() -> Self {
		Self {
			record: BlockRecord {
				number: 1,
				hash: block_hash(1),
				timestamp: GENESIS_TIMESTAMP + BLOCK_TIME,
				transaction_count: 10,
				gas_used: 15_000_000,
				gas_limit: 30_000_000,
				miner: Address::ZERO,
				base_fee_per_gas: None,
				block_interval: None,
				average_gas_price: U256::ZERO,
				min_gas_price: None,
				max_gas_price: None,
				contract_creations: 0,
				total_value: U256::ZERO,
			},
			timestamp_set: false,
		}
	}
}

impl BlockRecordBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets the number; hash and (unless set explicitly) timestamp follow it.
	pub fn number(mut self, number: u64) -> Self {
		self.record.number = number;
		self.record.hash = block_hash(number);
		if !self.timestamp_set {
			self.record.timestamp = GENESIS_TIMESTAMP + number * BLOCK_TIME;
		}
		self
	}

	pub fn timestamp(mut self, timestamp: u64) -> Self {
		self.record.timestamp = timestamp;
		self.timestamp_set = true;
		self
	}

	pub fn transaction_count(mut self, count: usize) -> Self {
		self.record.transaction_count = count;
		self
	}

	pub fn gas_used(mut self, gas_used: u64) -> Self {
		self.record.gas_used = gas_used;
		self
	}

	pub fn gas_limit(mut self, gas_limit: u64) -> Self {
		self.record.gas_limit = gas_limit;
		self
	}

	pub fn block_interval(mut self, interval: Option<u64>) -> Self {
		self.record.block_interval = interval;
		self
	}

	pub fn average_gas_price(mut self, price: U256) -> Self {
		self.record.average_gas_price = price;
		self
	}

	pub fn contract_creations(mut self, count: usize) -> Self {
		self.record.contract_creations = count;
		self
	}

	pub fn total_value(mut self, value: U256) -> Self {
		self.record.total_value = value;
		self
	}

	pub fn build(self) -> BlockRecord {
		self.record
	}
}
