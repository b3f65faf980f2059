//! EVM block data structures.

use alloy::{
	primitives::{Address, B256, U256, U64},
	rpc::types::{Block as AlloyBlock, BlockTransactions, Transaction as AlloyTransaction},
};
use serde::{Deserialize, Serialize};
use std::ops::Deref;

use super::EVMTransaction;

/// Base Block struct
///
/// Mirrors the JSON shape returned by `eth_getBlockByNumber` with full transaction objects.
/// Only the fields the monitor reads are kept; unknown fields are ignored.
#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
pub struct BaseBlock<TX> {
	/// Hash of the block. None if pending.
	pub hash: Option<B256>,
	/// Hash of the parent
	#[serde(rename = "parentHash", default)]
	pub parent_hash: B256,
	/// Miner/author's address.
	#[serde(rename = "miner", default)]
	pub author: Address,
	/// Block number. None if pending.
	pub number: Option<U64>,
	/// Gas Used
	#[serde(rename = "gasUsed")]
	pub gas_used: U256,
	/// Gas Limit
	#[serde(rename = "gasLimit", default)]
	pub gas_limit: U256,
	/// Base fee per unit of gas (if past London)
	#[serde(
		rename = "baseFeePerGas",
		default,
		skip_serializing_if = "Option::is_none"
	)]
	pub base_fee_per_gas: Option<U256>,
	/// Timestamp
	pub timestamp: U256,
	/// Transactions
	#[serde(default)]
	pub transactions: Vec<TX>,
}

/// Wrapper around Base Block that implements additional functionality
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct Block(pub BaseBlock<EVMTransaction>);

impl Block {
	/// Get the block number
	///
	/// Returns the block number as an `Option<u64>`.
	pub fn number(&self) -> Option<u64> {
		self.0.number.map(|n| n.to())
	}

	/// Number of transactions carried by the block
	pub fn transaction_count(&self) -> usize {
		self.0.transactions.len()
	}
}

impl From<BaseBlock<EVMTransaction>> for Block {
	fn from(block: BaseBlock<EVMTransaction>) -> Self {
		Self(block)
	}
}

impl From<AlloyBlock<AlloyTransaction>> for Block {
	fn from(block: AlloyBlock<AlloyTransaction>) -> Self {
		let block = BaseBlock {
			hash: Some(block.header.hash),
			parent_hash: block.header.inner.parent_hash,
			author: block.header.inner.beneficiary,
			number: Some(U64::from(block.header.inner.number)),
			gas_used: U256::from(block.header.inner.gas_used),
			gas_limit: U256::from(block.header.inner.gas_limit),
			base_fee_per_gas: block.header.inner.base_fee_per_gas.map(U256::from),
			timestamp: U256::from(block.header.inner.timestamp),
			transactions: match block.transactions {
				BlockTransactions::Full(txs) => txs.into_iter().map(EVMTransaction::from).collect(),
				_ => vec![],
			},
		};

		Self(block)
	}
}

impl Deref for Block {
	type Target = BaseBlock<EVMTransaction>;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
