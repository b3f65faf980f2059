//! Core blockchain client interface.
//!
//! This module defines the interface the monitor uses to talk to a ledger node:
//! point queries over JSON-RPC and a live stream of new block heads.

use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::models::{EVMBlock, HeadNotification};

/// Stream of block heads produced by a live subscription.
///
/// An `Err` item means the subscription is broken. The stream may also simply end
/// when the remote side closes it.
pub type HeadStream = BoxStream<'static, Result<HeadNotification, anyhow::Error>>;

/// Defines the core interface for blockchain clients
#[async_trait]
pub trait BlockChainClient: Send + Sync + Clone {
	/// Retrieves the latest block number from the blockchain
	///
	/// # Returns
	/// * `Result<u64, anyhow::Error>` - The latest block number or an error
	async fn get_latest_block_number(&self) -> Result<u64, anyhow::Error>;

	/// Retrieves a single block with full transaction objects
	///
	/// # Arguments
	/// * `block_number` - The block to fetch
	///
	/// # Returns
	/// * `Result<EVMBlock, anyhow::Error>` - The block, or an error wrapping a
	///   [`BlockChainError`](super::BlockChainError) describing the failure
	async fn get_block_by_number(&self, block_number: u64) -> Result<EVMBlock, anyhow::Error>;

	/// Opens a live subscription to new block heads
	///
	/// # Returns
	/// * `Result<HeadStream, anyhow::Error>` - The head stream or a connection error
	async fn subscribe_heads(&self) -> Result<HeadStream, anyhow::Error>;
}
