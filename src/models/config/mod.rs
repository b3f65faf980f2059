//! Configuration loading and validation.
//!
//! A monitor is described by one JSON file. Loading applies endpoint overrides from the
//! environment, then validates the result; a config that fails validation never reaches
//! the monitor.

#![allow(clippy::result_large_err)]

use async_trait::async_trait;
use std::path::Path;

mod error;
mod monitor_config;

pub use error::ConfigError;
pub use monitor_config::{RPC_URL_ENV, WS_URL_ENV};

/// Loads and checks a configuration file
#[async_trait]
pub trait ConfigLoader: Sized {
	/// Reads, overrides and validates the configuration at `path`
	async fn load_from_path(path: &Path) -> Result<Self, ConfigError>;

	/// Rejects values the monitor cannot run with
	fn validate(&self) -> Result<(), ConfigError>;

	/// Warns about endpoints that use unencrypted schemes
	fn validate_protocol(&self);

	fn is_json_file(path: &Path) -> bool {
		path.extension()
			.is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
	}
}
