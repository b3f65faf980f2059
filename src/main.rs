//! Ethereum block monitor entry point.
//!
//! This binary loads the monitor configuration, connects to the configured node and
//! follows the chain head until interrupted, emitting alerts and periodic reports.
//!
//! # Flow
//! 1. Applies CLI options to the environment and sets up logging
//! 2. Loads and validates the monitor configuration
//! 3. Optionally starts the Prometheus metrics server
//! 4. Starts the monitor and waits for Ctrl+C or an unrecoverable transport failure
//! 5. Stops the monitor, which emits the final report

pub mod bootstrap;
pub mod models;
pub mod services;
pub mod utils;

use crate::{
	bootstrap::{create_monitor, Result},
	models::{ConfigLoader, MonitorConfig, TransportMode},
	services::lifecycle::MonitorOutcome,
	utils::{
		logging::setup_logging, metrics::server::create_metrics_server, parse_duration,
		parse_string_to_bytes_size,
	},
};

use clap::{Parser, ValueEnum};
use dotenvy::dotenv_override;
use std::{
	env::{set_var, var},
	path::PathBuf,
	time::Duration,
};
use tracing::{error, info};

/// Default location of the monitor configuration
const DEFAULT_CONFIG_PATH: &str = "config/monitor.json";

#[derive(Debug, Clone, Copy, ValueEnum)]
enum TransportArg {
	Push,
	Poll,
}

impl From<TransportArg> for TransportMode {
	fn from(arg: TransportArg) -> Self {
		match arg {
			TransportArg::Push => TransportMode::Push,
			TransportArg::Poll => TransportMode::Poll,
		}
	}
}

#[derive(Parser)]
#[command(
	name = "chain-event-monitor",
	about = "Follows an Ethereum chain head, aggregates per-block statistics and raises alerts when blocks cross configured thresholds.",
	version
)]
struct Cli {
	/// Path to the monitor configuration file
	#[arg(long, value_name = "PATH", default_value = DEFAULT_CONFIG_PATH)]
	config: PathBuf,

	/// Override the head transport (push or poll)
	#[arg(long, value_enum, value_name = "MODE")]
	transport: Option<TransportArg>,

	/// Override the poll interval (e.g., "500ms", "12s")
	#[arg(long, value_name = "DURATION", value_parser = parse_duration)]
	poll_interval: Option<Duration>,

	/// Override the periodic report interval (e.g., "30s", "5m")
	#[arg(long, value_name = "DURATION", value_parser = parse_duration)]
	report_interval: Option<Duration>,

	/// Write logs to file instead of stdout
	#[arg(long)]
	log_file: bool,

	/// Set log level (trace, debug, info, warn, error)
	#[arg(long, value_name = "LEVEL")]
	log_level: Option<String>,

	/// Path to store log files (default: logs/)
	#[arg(long, value_name = "PATH")]
	log_path: Option<String>,

	/// Maximum log file size before rolling (e.g., "1GB", "500MB", "1024KB")
	#[arg(long, value_name = "SIZE", value_parser = parse_string_to_bytes_size)]
	log_max_size: Option<u64>,

	/// Address to start the metrics server on (default: 127.0.0.1:8081)
	#[arg(long, value_name = "HOST:PORT")]
	metrics_address: Option<String>,

	/// Enable metrics server
	#[arg(long)]
	metrics: bool,

	/// Validate the configuration file without starting the monitor
	#[arg(long)]
	check: bool,
}

impl Cli {
	/// Apply CLI options to environment variables, overriding any existing values
	fn apply_to_env(&self) {
		// Reload environment variables from .env file
		dotenv_override().ok();

		if self.log_file {
			set_var("LOG_MODE", "file");
		}

		if let Ok(level) = var("RUST_LOG") {
			set_var("LOG_LEVEL", level);
		}

		if let Some(level) = &self.log_level {
			set_var("LOG_LEVEL", level);
			set_var("RUST_LOG", level);
		}

		if let Some(path) = &self.log_path {
			set_var("LOG_DATA_DIR", path);
		}

		if let Some(max_size) = &self.log_max_size {
			set_var("LOG_MAX_SIZE", max_size.to_string());
		}

		if self.metrics {
			set_var("METRICS_ENABLED", "true");
		}
	}

	/// Apply CLI overrides on top of the loaded configuration
	fn apply_to_config(&self, mut config: MonitorConfig) -> MonitorConfig {
		if let Some(transport) = self.transport {
			config.transport = transport.into();
		}
		if let Some(interval) = self.poll_interval {
			config.poll_interval_ms = interval.as_millis().max(1) as u64;
		}
		if let Some(interval) = self.report_interval {
			config.report_interval_secs = interval.as_secs().max(1);
		}
		config
	}
}

async fn load_config(cli: &Cli) -> Result<MonitorConfig> {
	let config = MonitorConfig::load_from_path(&cli.config).await?;
	let config = cli.apply_to_config(config);
	config.validate()?;
	Ok(config)
}

/// Resolves on Ctrl+C. If the handler cannot be installed it never resolves.
async fn ctrl_c() {
	if let Err(e) = tokio::signal::ctrl_c().await {
		error!("Error waiting for Ctrl+C: {}", e);
		std::future::pending::<()>().await;
	}
}

/// Main entry point for the block monitor.
///
/// # Errors
/// Returns an error if the configuration is invalid, the node cannot be reached, or
/// the head subscription is lost for good.
#[tokio::main]
async fn main() -> Result<()> {
	let cli = Cli::parse();

	cli.apply_to_env();

	setup_logging().unwrap_or_else(|e| {
		error!("Failed to setup logging: {}", e);
	});

	let config = match load_config(&cli).await {
		Ok(config) => config,
		Err(e) => {
			error!("Invalid configuration {}: {}", cli.config.display(), e);
			return Err(e);
		}
	};

	if cli.check {
		info!(
			transport = ?config.transport,
			history_capacity = config.history_capacity,
			"✓ Configuration {} is valid",
			cli.config.display()
		);
		return Ok(());
	}

	let metrics_enabled =
		cli.metrics || var("METRICS_ENABLED").map(|v| v == "true").unwrap_or(false);
	let metrics_address = cli
		.metrics_address
		.clone()
		.unwrap_or_else(|| "127.0.0.1:8081".to_string());

	let metrics_server = if metrics_enabled {
		info!("Metrics server enabled, starting on {}", metrics_address);
		match create_metrics_server(metrics_address) {
			Ok(server) => Some(server),
			Err(e) => {
				error!("Failed to create metrics server: {}", e);
				None
			}
		}
	} else {
		info!("Metrics server disabled. Use --metrics flag or METRICS_ENABLED=true to enable");
		None
	};

	let monitor = create_monitor(&config).await?;
	monitor.start(ctrl_c()).await?;

	info!("Monitor started. Press Ctrl+C to shutdown");

	let outcome = if let Some(metrics_future) = metrics_server {
		tokio::select! {
			outcome = monitor.wait() => outcome,
			result = metrics_future => {
				if let Err(e) = result {
					error!("Metrics server error: {}", e);
				}
				info!("Metrics server stopped, shutting down monitor...");
				monitor.stop().await;
				monitor.wait().await
			}
		}
	} else {
		monitor.wait().await
	};

	match outcome {
		MonitorOutcome::Shutdown => {
			info!("Shutdown complete");
			Ok(())
		}
		MonitorOutcome::TransportFailed { reason } => {
			error!(reason = %reason, "Monitor stopped after losing the head subscription");
			Err(format!("transport failed: {}", reason).into())
		}
	}
}
