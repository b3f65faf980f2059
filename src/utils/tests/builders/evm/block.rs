use crate::models::{EVMBaseBlock, EVMBlock, EVMTransaction};
use alloy::primitives::{Address, B256, U256, U64};

/// A builder for creating test EVM blocks with default values.
///
/// Unless overridden, the hash is derived from the block number, the gas limit is
/// 30M and the timestamp advances 12 seconds per block from a fixed origin.
#[derive(Debug, Default)]
pub struct BlockBuilder {
	number: Option<u64>,
	hash: Option<B256>,
	missing_number: bool,
	missing_hash: bool,
	miner: Option<Address>,
	timestamp: Option<U256>,
	gas_used: Option<U256>,
	gas_limit: Option<U256>,
	base_fee_per_gas: Option<U256>,
	transactions: Vec<EVMTransaction>,
}

/// Timestamp of block 0 used by the builder
pub const GENESIS_TIMESTAMP: u64 = 1_700_000_000;

/// Seconds between consecutive builder blocks
pub const BLOCK_TIME: u64 = 12;

/// Hash the builder assigns to a block number
pub fn block_hash(number: u64) -> B256 {
	B256::left_padding_from(&number.to_be_bytes())
}

impl BlockBuilder {
	/// Creates a new BlockBuilder instance.
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets the block number.
	pub fn number(mut self, number: u64) -> Self {
		self.number = Some(number);
		self
	}

	/// Sets the block hash.
	pub fn hash(mut self, hash: B256) -> Self {
		self.hash = Some(hash);
		self
	}

	/// Leaves the block number unset, as for a pending block.
	pub fn without_number(mut self) -> Self {
		self.missing_number = true;
		self
	}

	/// Leaves the block hash unset, as for a pending block.
	pub fn without_hash(mut self) -> Self {
		self.missing_hash = true;
		self
	}

	/// Sets the miner address.
	pub fn miner(mut self, miner: Address) -> Self {
		self.miner = Some(miner);
		self
	}

	/// Sets the timestamp in seconds.
	pub fn timestamp(mut self, timestamp: u64) -> Self {
		self.timestamp = Some(U256::from(timestamp));
		self
	}

	/// Sets a raw timestamp, including values that do not fit in 64 bits.
	pub fn raw_timestamp(mut self, timestamp: U256) -> Self {
		self.timestamp = Some(timestamp);
		self
	}

	/// Sets the gas used.
	pub fn gas_used(mut self, gas_used: u64) -> Self {
		self.gas_used = Some(U256::from(gas_used));
		self
	}

	/// Sets a raw gas used value, including values that do not fit in 64 bits.
	pub fn raw_gas_used(mut self, gas_used: U256) -> Self {
		self.gas_used = Some(gas_used);
		self
	}

	/// Sets the gas limit.
	pub fn gas_limit(mut self, gas_limit: u64) -> Self {
		self.gas_limit = Some(U256::from(gas_limit));
		self
	}

	/// Sets the base fee per gas.
	pub fn base_fee_per_gas(mut self, base_fee: U256) -> Self {
		self.base_fee_per_gas = Some(base_fee);
		self
	}

	/// Adds a single transaction.
	pub fn transaction(mut self, transaction: EVMTransaction) -> Self {
		self.transactions.push(transaction);
		self
	}

	/// Replaces the transaction list.
	pub fn transactions(mut self, transactions: Vec<EVMTransaction>) -> Self {
		self.transactions = transactions;
		self
	}

	/// Builds the Block instance.
	pub fn build(self) -> EVMBlock {
		let number = self.number.unwrap_or(1);

		EVMBlock(EVMBaseBlock {
			hash: (!self.missing_hash).then(|| self.hash.unwrap_or_else(|| block_hash(number))),
			parent_hash: block_hash(number.saturating_sub(1)),
			author: self.miner.unwrap_or_default(),
			number: (!self.missing_number).then(|| U64::from(number)),
			gas_used: self.gas_used.unwrap_or_default(),
			gas_limit: self.gas_limit.unwrap_or(U256::from(30_000_000u64)),
			base_fee_per_gas: self.base_fee_per_gas,
			timestamp: self
				.timestamp
				.unwrap_or_else(|| U256::from(GENESIS_TIMESTAMP + number * BLOCK_TIME)),
			transactions: self.transactions,
		})
	}
}
