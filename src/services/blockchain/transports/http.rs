//! JSON-RPC over HTTP.
//!
//! Requests share one pooled `reqwest` client wrapped in retry middleware. The endpoint
//! is checked with `net_version` when the client is created, so a monitor never starts
//! against an unreachable node.

use anyhow::Context;
use async_trait::async_trait;
use reqwest_middleware::ClientWithMiddleware;
use serde::Serialize;
use serde_json::Value;
use std::{
	collections::HashMap,
	sync::{
		atomic::{AtomicU64, Ordering},
		Arc,
	},
	time::Duration,
};
use url::Url;

use crate::{
	services::blockchain::transports::{
		rpc_request, BlockchainTransport, TransientErrorRetryStrategy, TransportError,
	},
	utils::http::{create_retryable_http_client, RetryConfig},
};

/// HTTP JSON-RPC client for one node endpoint. Clones share the connection pool.
#[derive(Clone, Debug)]
pub struct HttpTransportClient {
	client: ClientWithMiddleware,
	url: Url,
	next_id: Arc<AtomicU64>,
}

impl HttpTransportClient {
	/// Builds the client and checks that `rpc_url` answers `net_version`
	pub async fn new(rpc_url: &str, retry_config: &RetryConfig) -> Result<Self, anyhow::Error> {
		let url = Url::parse(rpc_url).with_context(|| format!("Invalid RPC URL: {}", rpc_url))?;

		let base_client = reqwest::ClientBuilder::new()
			.pool_idle_timeout(Duration::from_secs(90))
			.pool_max_idle_per_host(8)
			.timeout(Duration::from_secs(30))
			.connect_timeout(Duration::from_secs(10))
			.build()
			.context("Failed to create base HTTP client")?;

		let client = create_retryable_http_client(
			retry_config,
			base_client,
			Some(TransientErrorRetryStrategy),
		);

		let response = client
			.post(url.clone())
			.json(&rpc_request(0, "net_version", None::<Value>))
			.send()
			.await
			.with_context(|| format!("Failed to connect to {}", url))?;

		let status = response.status();
		if !status.is_success() {
			anyhow::bail!("Endpoint {} answered the connectivity check with {}", url, status);
		}
		tracing::debug!(url = %url, "RPC endpoint reachable");

		Ok(Self {
			client,
			url,
			next_id: Arc::new(AtomicU64::new(1)),
		})
	}

	pub fn url(&self) -> &Url {
		&self.url
	}
}

#[async_trait]
impl BlockchainTransport for HttpTransportClient {
	async fn send_raw_request<P>(
		&self,
		method: &str,
		params: Option<P>,
	) -> Result<Value, TransportError>
	where
		P: Into<Value> + Send + Clone + Serialize,
	{
		let id = self.next_id.fetch_add(1, Ordering::Relaxed);
		let request = rpc_request(id, method, params);
		let metadata = Some(HashMap::from([("method".to_string(), method.to_string())]));

		let body = serde_json::to_vec(&request).map_err(|e| {
			TransportError::request_serialization(
				"Failed to serialize request JSON",
				Some(Box::new(e)),
				metadata.clone(),
			)
		})?;

		let response = self
			.client
			.post(self.url.clone())
			.header("Content-Type", "application/json")
			.body(body)
			.send()
			.await
			.map_err(|e| {
				TransportError::network(
					format!("Failed to send request to {}", self.url),
					Some(Box::new(e)),
					metadata.clone(),
				)
			})?;

		let status = response.status();
		if !status.is_success() {
			let error_body = response.text().await.unwrap_or_default();
			return Err(TransportError::http(
				status,
				self.url.to_string(),
				error_body,
				None,
				metadata,
			));
		}

		response.json().await.map_err(|e| {
			TransportError::response_parse(
				"Failed to parse JSON response",
				Some(Box::new(e)),
				metadata,
			)
		})
	}
}
