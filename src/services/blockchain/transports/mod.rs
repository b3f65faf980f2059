//! JSON-RPC transport used by the ledger client.
//!
//! Block queries go over HTTP through retrying middleware. Live head subscriptions go
//! over WebSocket and are owned by the EVM client.

mod error;
mod http;

pub use error::TransportError;
pub use http::HttpTransportClient;

use reqwest::StatusCode;
use reqwest_retry::{default_on_request_failure, Retryable, RetryableStrategy};
use serde::Serialize;
use serde_json::{json, Value};

/// Sends JSON-RPC requests to a node
#[async_trait::async_trait]
pub trait BlockchainTransport: Send + Sync {
	/// Sends `method` with `params` and returns the whole response envelope
	async fn send_raw_request<P>(
		&self,
		method: &str,
		params: Option<P>,
	) -> Result<Value, TransportError>
	where
		P: Into<Value> + Send + Clone + Serialize;
}

/// JSON-RPC 2.0 request envelope. Absent params are sent as an empty array.
pub fn rpc_request<P: Into<Value>>(id: u64, method: &str, params: Option<P>) -> Value {
	json!({
		"jsonrpc": "2.0",
		"id": id,
		"method": method,
		"params": params.map(Into::into).unwrap_or_else(|| json!([])),
	})
}

/// Retries rate limits, timeouts and node-side failures; everything else is final
pub struct TransientErrorRetryStrategy;

impl RetryableStrategy for TransientErrorRetryStrategy {
	fn handle(
		&self,
		res: &Result<reqwest::Response, reqwest_middleware::Error>,
	) -> Option<Retryable> {
		match res {
			Ok(response) => classify_status(response.status()),
			Err(error) => default_on_request_failure(error),
		}
	}
}

fn classify_status(status: StatusCode) -> Option<Retryable> {
	if status.is_success() {
		None
	} else if status.is_server_error()
		|| status == StatusCode::TOO_MANY_REQUESTS
		|| status == StatusCode::REQUEST_TIMEOUT
	{
		Some(Retryable::Transient)
	} else {
		Some(Retryable::Fatal)
	}
}
