//! EVM-compatible blockchain client implementation.
//!
//! This module provides functionality to interact with Ethereum and other EVM-compatible
//! blockchains: block queries over HTTP JSON-RPC and `newHeads` subscriptions over
//! WebSocket.

use std::collections::HashMap;

use alloy::providers::{Provider, ProviderBuilder, WsConnect};
use anyhow::Context;
use async_trait::async_trait;
use futures::StreamExt;
use serde_json::json;
use tracing::instrument;

use crate::{
	models::{EVMBlock, HeadNotification, MonitorConfig},
	services::blockchain::{
		client::{BlockChainClient, HeadStream},
		transports::{BlockchainTransport, HttpTransportClient, TransportError},
		BlockChainError,
	},
};

/// Client implementation for Ethereum Virtual Machine (EVM) compatible blockchains
///
/// Provides high-level access to EVM blockchain data through an HTTP transport, plus
/// an optional WebSocket endpoint for live head subscriptions.
#[derive(Clone)]
pub struct EvmClient<T: Send + Sync + Clone> {
	/// The underlying HTTP transport client for RPC communication
	http_client: T,
	/// WebSocket endpoint used by `subscribe_heads`
	ws_url: Option<String>,
}

impl<T: Send + Sync + Clone> EvmClient<T> {
	/// Creates a new EVM client instance with a specific transport client
	pub fn new_with_transport(http_client: T) -> Self {
		Self {
			http_client,
			ws_url: None,
		}
	}

	/// Sets the WebSocket endpoint used for head subscriptions
	pub fn with_ws_url(mut self, ws_url: impl Into<String>) -> Self {
		self.ws_url = Some(ws_url.into());
		self
	}
}

impl EvmClient<HttpTransportClient> {
	/// Creates a new EVM client instance
	///
	/// # Arguments
	/// * `config` - Monitor configuration containing the RPC and WebSocket endpoints
	///
	/// # Returns
	/// * `Result<Self, anyhow::Error>` - New client instance or connection error
	pub async fn new(config: &MonitorConfig) -> Result<Self, anyhow::Error> {
		let transport = HttpTransportClient::new(&config.rpc_url, &config.rpc_retry).await?;
		let client = Self::new_with_transport(transport);
		Ok(match &config.ws_url {
			Some(ws_url) => client.with_ws_url(ws_url.clone()),
			None => client,
		})
	}
}

fn block_metadata(block_number: u64) -> Option<HashMap<String, String>> {
	Some(HashMap::from([(
		"block_number".to_string(),
		block_number.to_string(),
	)]))
}

/// Request failure tagged with whether a later retry could succeed
fn request_failed(
	message: impl Into<String>,
	err: TransportError,
	block_number: Option<u64>,
) -> BlockChainError {
	let mut metadata = block_number
		.and_then(block_metadata)
		.unwrap_or_default();
	metadata.insert("transient".to_string(), err.is_transient().to_string());
	BlockChainError::request_error(message, Some(Box::new(err)), Some(metadata))
}

#[async_trait]
impl<T: Send + Sync + Clone + BlockchainTransport> BlockChainClient for EvmClient<T> {
	/// Retrieves the latest block number
	#[instrument(skip(self))]
	async fn get_latest_block_number(&self) -> Result<u64, anyhow::Error> {
		let response = self
			.http_client
			.send_raw_request::<serde_json::Value>("eth_blockNumber", None)
			.await
			.map_err(|e| request_failed("Failed to get latest block number", e, None))?;

		// Extract the "result" field from the JSON-RPC response
		let hex_str = response
			.get("result")
			.and_then(|v| v.as_str())
			.ok_or_else(|| {
				BlockChainError::parse_error(
					format!("Missing 'result' field in response: {}", response),
					None,
					None,
				)
			})?;

		// Parse hex string to u64
		u64::from_str_radix(hex_str.trim_start_matches("0x"), 16).map_err(|e| {
			BlockChainError::parse_error(
				format!("Failed to parse block number: {}", hex_str),
				Some(Box::new(e)),
				None,
			)
			.into()
		})
	}

	/// Retrieves a single block including full transaction objects
	#[instrument(skip(self), fields(block_number))]
	async fn get_block_by_number(&self, block_number: u64) -> Result<EVMBlock, anyhow::Error> {
		let params = json!([
			format!("0x{:x}", block_number),
			true // include full transaction objects
		]);

		let response = self
			.http_client
			.send_raw_request("eth_getBlockByNumber", Some(params))
			.await
			.map_err(|e| {
				request_failed(
					format!("Failed to get block: {}", block_number),
					e,
					Some(block_number),
				)
			})?;

		let block_data = response.get("result").ok_or_else(|| {
			BlockChainError::parse_error(
				format!("Missing 'result' field in response: {}", response),
				None,
				block_metadata(block_number),
			)
		})?;

		if block_data.is_null() {
			return Err(BlockChainError::block_not_found(
				format!("Block {} not found", block_number),
				None,
				block_metadata(block_number),
			)
			.into());
		}

		let block: EVMBlock = serde_json::from_value(block_data.clone()).map_err(|e| {
			BlockChainError::parse_error(
				format!("Failed to parse block: {}", block_number),
				Some(Box::new(e)),
				block_metadata(block_number),
			)
		})?;

		Ok(block)
	}

	/// Subscribes to `newHeads` over the configured WebSocket endpoint
	///
	/// The provider is owned by the returned stream, so the connection lives exactly as
	/// long as the stream does.
	#[instrument(skip(self))]
	async fn subscribe_heads(&self) -> Result<HeadStream, anyhow::Error> {
		let ws_url = self.ws_url.as_deref().ok_or_else(|| {
			BlockChainError::connection_error("No WebSocket URL configured", None, None)
		})?;

		let provider = ProviderBuilder::new()
			.connect_ws(WsConnect::new(ws_url))
			.await
			.map_err(|e| {
				BlockChainError::connection_error(
					format!("Failed to connect to {}", ws_url),
					Some(Box::new(e)),
					None,
				)
			})?;

		let subscription = provider.subscribe_blocks().await.map_err(|e| {
			BlockChainError::connection_error(
				"Failed to subscribe to new heads",
				Some(Box::new(e)),
				None,
			)
		})?;

		let stream = subscription.into_stream().map(move |header| {
			let _connection = &provider;
			Ok(HeadNotification::with_hash(header.inner.number, header.hash))
		});

		Ok(stream.boxed())
	}
}
