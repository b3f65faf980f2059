//! Monitor configuration loading and validation.
//!
//! This module implements the ConfigLoader trait for MonitorConfig. Endpoints may be
//! overridden from the environment (or a `.env` file) so secrets stay out of the JSON.

use async_trait::async_trait;
use std::{collections::HashMap, path::Path};

use crate::models::{
	config::error::ConfigError, ConfigLoader, MonitorConfig, ReconnectPolicy, TransportMode,
};

/// Environment variable overriding `rpc_url`
pub const RPC_URL_ENV: &str = "ETHEREUM_RPC_URL";

/// Environment variable overriding `ws_url`
pub const WS_URL_ENV: &str = "ETHEREUM_WS_URL";

impl MonitorConfig {
	/// Replace endpoints with values from the environment, when set and non-empty.
	pub fn apply_env_overrides(mut self) -> Self {
		dotenvy::dotenv().ok();
		if let Some(rpc_url) = non_empty_env(RPC_URL_ENV) {
			self.rpc_url = rpc_url;
		}
		if let Some(ws_url) = non_empty_env(WS_URL_ENV) {
			self.ws_url = Some(ws_url);
		}
		self
	}
}

fn non_empty_env(key: &str) -> Option<String> {
	std::env::var(key)
		.ok()
		.map(|v| v.trim().to_string())
		.filter(|v| !v.is_empty())
}

fn validate_url(field: &str, value: &str, schemes: &[&str]) -> Result<(), ConfigError> {
	let parsed = url::Url::parse(value).map_err(|e| {
		ConfigError::validation_error(
			format!("{} is not a valid URL: {}", field, e),
			Some(Box::new(e)),
			Some(HashMap::from([(field.to_string(), value.to_string())])),
		)
	})?;

	if !schemes.contains(&parsed.scheme()) {
		return Err(ConfigError::validation_error(
			format!("{} must use one of: {}", field, schemes.join(", ")),
			None,
			Some(HashMap::from([(field.to_string(), value.to_string())])),
		));
	}

	Ok(())
}

#[async_trait]
impl ConfigLoader for MonitorConfig {
	/// Load the monitor configuration from a specific file
	///
	/// Reads the JSON file, applies environment overrides and validates the result.
	async fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
		let metadata = Some(HashMap::from([(
			"path".to_string(),
			path.display().to_string(),
		)]));

		if !Self::is_json_file(path) {
			return Err(ConfigError::file_error(
				"monitor config must be a .json file",
				None,
				metadata,
			));
		}

		let contents = tokio::fs::read_to_string(path).await.map_err(|e| {
			ConfigError::file_error(
				format!("failed to read monitor config file: {}", e),
				Some(Box::new(e)),
				metadata.clone(),
			)
		})?;

		let config: MonitorConfig = serde_json::from_str(&contents).map_err(|e| {
			ConfigError::parse_error(
				format!("failed to parse monitor config: {}", e),
				Some(Box::new(e)),
				metadata.clone(),
			)
		})?;

		let config = config.apply_env_overrides();
		config.validate()?;

		Ok(config)
	}

	/// Validate the monitor configuration
	///
	/// Ensures that:
	/// - Endpoints are well-formed and match the chosen transport
	/// - Capacities, intervals and timeouts are positive
	/// - Reconnect backoff bounds are consistent
	/// - Alert thresholds are in range
	fn validate(&self) -> Result<(), ConfigError> {
		validate_url("rpc_url", &self.rpc_url, &["http", "https"])?;

		if let Some(ws_url) = &self.ws_url {
			validate_url("ws_url", ws_url, &["ws", "wss"])?;
		}

		if self.transport == TransportMode::Push && self.ws_url.is_none() {
			return Err(ConfigError::validation_error(
				"push transport requires ws_url",
				None,
				Some(HashMap::from([(
					"transport".to_string(),
					"push".to_string(),
				)])),
			));
		}

		if self.history_capacity == 0 {
			return Err(ConfigError::validation_error(
				"history_capacity must be greater than 0",
				None,
				None,
			));
		}

		if self.poll_interval_ms == 0 {
			return Err(ConfigError::validation_error(
				"poll_interval_ms must be greater than 0",
				None,
				None,
			));
		}

		if self.max_lookback_blocks == 0 {
			return Err(ConfigError::validation_error(
				"max_lookback_blocks must be greater than 0",
				None,
				None,
			));
		}

		if self.report_interval_secs == 0 {
			return Err(ConfigError::validation_error(
				"report_interval_secs must be greater than 0",
				None,
				None,
			));
		}

		if self.fetch_timeout_ms == 0 {
			return Err(ConfigError::validation_error(
				"fetch_timeout_ms must be greater than 0",
				None,
				None,
			));
		}

		if let ReconnectPolicy::Bounded {
			max_attempts,
			initial_backoff_ms,
			max_backoff_ms,
		} = self.reconnect
		{
			if max_attempts == 0 {
				return Err(ConfigError::validation_error(
					"reconnect.max_attempts must be greater than 0",
					None,
					None,
				));
			}
			if initial_backoff_ms == 0 || initial_backoff_ms > max_backoff_ms {
				return Err(ConfigError::validation_error(
					"reconnect backoff must satisfy 0 < initial_backoff_ms <= max_backoff_ms",
					None,
					Some(HashMap::from([
						(
							"initial_backoff_ms".to_string(),
							initial_backoff_ms.to_string(),
						),
						("max_backoff_ms".to_string(), max_backoff_ms.to_string()),
					])),
				));
			}
		}

		if self.rpc_retry.initial_backoff_ms > self.rpc_retry.max_backoff_ms {
			return Err(ConfigError::validation_error(
				"rpc_retry.initial_backoff_ms must not exceed rpc_retry.max_backoff_ms",
				None,
				None,
			));
		}

		if let Some(percent) = self.alerts.high_gas_utilization_percent {
			if !(percent > 0.0 && percent <= 100.0) {
				return Err(ConfigError::validation_error(
					"alerts.high_gas_utilization_percent must be within (0, 100]",
					None,
					Some(HashMap::from([(
						"high_gas_utilization_percent".to_string(),
						percent.to_string(),
					)])),
				));
			}
		}

		self.validate_protocol();

		Ok(())
	}

	/// Validate the safety of the protocol used by the endpoints
	///
	/// Returns if safe, or logs a warning message if unsafe.
	fn validate_protocol(&self) {
		if self.rpc_url.starts_with("http://") {
			tracing::warn!("Monitor uses an insecure RPC URL: {}", self.rpc_url);
		}
		if let Some(ws_url) = &self.ws_url {
			if ws_url.starts_with("ws://") {
				tracing::warn!("Monitor uses an insecure WebSocket URL: {}", ws_url);
			}
		}
	}
}
