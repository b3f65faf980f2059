//! Mock implementations of blockchain clients.
//!
//! - [`MockBlockChainClient`] - mockall mock of the client trait
//! - [`ChainClient`] - scripted client serving generated blocks for a moving head

use std::sync::{
	atomic::{AtomicU64, Ordering},
	Arc,
};

use async_trait::async_trait;
use chain_event_monitor::{
	models::EVMBlock,
	services::blockchain::{BlockChainClient, BlockChainError, HeadStream},
	utils::tests::builders::evm::{block::BlockBuilder, transaction::TransactionBuilder},
};
use mockall::mock;

mock! {
	/// Mock implementation of the blockchain client trait.
	pub BlockChainClient {}

	#[async_trait]
	impl BlockChainClient for BlockChainClient {
		async fn get_latest_block_number(&self) -> Result<u64, anyhow::Error>;
		async fn get_block_by_number(&self, block_number: u64) -> Result<EVMBlock, anyhow::Error>;
		async fn subscribe_heads(&self) -> Result<HeadStream, anyhow::Error>;
	}

	impl Clone for BlockChainClient {
		fn clone(&self) -> Self;
	}
}

/// Client whose head is moved by the test.
///
/// Every block up to the head exists; block `n` carries `n % 5` transactions.
/// Heights listed in `missing` fail with a request error.
#[derive(Clone, Default)]
pub struct ChainClient {
	head: Arc<AtomicU64>,
	missing: Arc<Vec<u64>>,
}

impl ChainClient {
	pub fn at(head: u64) -> Self {
		Self {
			head: Arc::new(AtomicU64::new(head)),
			missing: Arc::new(Vec::new()),
		}
	}

	pub fn with_missing(mut self, missing: Vec<u64>) -> Self {
		self.missing = Arc::new(missing);
		self
	}

	pub fn set_head(&self, head: u64) {
		self.head.store(head, Ordering::SeqCst);
	}
}

/// Block `number` as served by [`ChainClient`]
pub fn chain_block(number: u64) -> EVMBlock {
	let transactions = (number % 5) as usize;
	BlockBuilder::new()
		.number(number)
		.gas_used(1_000_000 * transactions as u64)
		.transactions(
			(0..transactions)
				.map(|_| TransactionBuilder::new().build())
				.collect(),
		)
		.build()
}

#[async_trait]
impl BlockChainClient for ChainClient {
	async fn get_latest_block_number(&self) -> Result<u64, anyhow::Error> {
		Ok(self.head.load(Ordering::SeqCst))
	}

	async fn get_block_by_number(&self, block_number: u64) -> Result<EVMBlock, anyhow::Error> {
		if self.missing.contains(&block_number) || block_number > self.head.load(Ordering::SeqCst) {
			return Err(BlockChainError::request_error(
				format!("Failed to get block: {}", block_number),
				None,
				None,
			)
			.into());
		}
		Ok(chain_block(block_number))
	}

	async fn subscribe_heads(&self) -> Result<HeadStream, anyhow::Error> {
		Err(BlockChainError::connection_error("No WebSocket URL configured", None, None).into())
	}
}
