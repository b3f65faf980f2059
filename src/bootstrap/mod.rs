//! Bootstrap module for wiring the monitor together.
//!
//! Turns a validated [`MonitorConfig`] into a ready-to-start [`BlockMonitor`]:
//! - `EvmClient`: JSON-RPC block queries and `newHeads` subscriptions
//! - `HeadTransport`: push or poll delivery of block heads, per `transport`
//! - `AlertEngine`: the built-in rules enabled by `alerts`
//! - `NotificationSink`: the sink selected by `notifier`

use std::{error::Error, sync::Arc, time::Duration};

use crate::{
	models::{ConfigError, ConfigLoader, MonitorConfig, TransportMode},
	services::{
		alert::AlertEngine,
		blockchain::{BlockChainClient, EvmClient, HttpTransportClient},
		blockwatcher::{HeadTransport, PollTransport, PushTransport},
		lifecycle::BlockMonitor,
		notification::create_notifier,
	},
};

/// Type alias for handling ServiceResult
pub type Result<T> = std::result::Result<T, Box<dyn Error>>;

/// Monitor backed by the HTTP/WebSocket EVM client
pub type EvmMonitor = BlockMonitor<EvmClient<HttpTransportClient>>;

/// Selects the head transport configured for `client`.
pub fn create_transport<C>(config: &MonitorConfig, client: C) -> Arc<dyn HeadTransport>
where
	C: BlockChainClient + 'static,
{
	match config.transport {
		TransportMode::Push => Arc::new(PushTransport::new(client)),
		TransportMode::Poll => Arc::new(PollTransport::new(
			client,
			Duration::from_millis(config.poll_interval_ms),
			config.max_lookback_blocks,
		)),
	}
}

/// Builds an idle monitor around an existing client.
///
/// # Errors
/// Returns a `ValidationError` if `config` does not pass validation.
pub fn create_monitor_with_client<C>(
	config: &MonitorConfig,
	client: C,
) -> std::result::Result<BlockMonitor<C>, ConfigError>
where
	C: BlockChainClient + 'static,
{
	let transport = create_transport(config, client.clone());
	let alerts = AlertEngine::from_config(&config.alerts);
	tracing::debug!(rules = ?alerts.rule_names(), "Alert rules enabled");

	BlockMonitor::new(
		config,
		client,
		transport,
		alerts,
		create_notifier(config.notifier),
	)
}

/// Connects to the configured node and builds an idle monitor.
///
/// # Errors
/// Returns an error if the config is invalid or the RPC endpoint cannot be reached.
pub async fn create_monitor(config: &MonitorConfig) -> Result<EvmMonitor> {
	config.validate()?;
	let client = EvmClient::new(config).await.map_err(|e| {
		Box::<dyn Error>::from(format!(
			"Failed to connect to {}: {}",
			config.rpc_url, e
		))
	})?;
	Ok(create_monitor_with_client(config, client)?)
}
