//! Domain models and data structures for block monitoring.
//!
//! This module contains all the core data structures used throughout the application:
//!
//! - `blockchain`: Raw EVM blocks and transactions as returned by the node
//! - `config`: Configuration loading and validation
//! - `core`: Core domain models (records, statistics, alerts, reports, settings)

mod blockchain;
mod config;
mod core;

// Re-export blockchain types
pub use blockchain::evm::{EVMBaseBlock, EVMBaseTransaction, EVMBlock, EVMTransaction};

// Re-export core types
pub use core::{
	Alert, AlertThresholds, BlockRecord, FinalReport, HeadNotification, MonitorConfig,
	MonitorStats, NotifierKind, PeriodicReport, RecentSummary, ReconnectPolicy, Report,
	TransportMode,
};

// Re-export config types
pub use config::{ConfigError, ConfigLoader, RPC_URL_ENV, WS_URL_ENV};
