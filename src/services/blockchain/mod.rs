//! Blockchain client interfaces and implementations.
//!
//! The [`BlockChainClient`] trait is the only view the monitor has of the node.
//! [`EvmClient`] implements it with HTTP JSON-RPC queries and WebSocket `newHeads`
//! subscriptions.

mod client;
mod clients;
mod error;
mod transports;

pub use client::{BlockChainClient, HeadStream};
pub use clients::EvmClient;
pub use error::BlockChainError;
pub use transports::{
	rpc_request, BlockchainTransport, HttpTransportClient, TransientErrorRetryStrategy,
	TransportError,
};
