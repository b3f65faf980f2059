//! Live Ethereum block monitor.
//!
//! This library follows the head of an Ethereum chain, derives per-block metrics,
//! keeps rolling statistics over a bounded history and raises alerts when blocks
//! cross configured thresholds. It includes:
//!
//! - Configuration loading from JSON with environment overrides
//! - Push (WebSocket `newHeads`) and poll (HTTP `eth_blockNumber`) head transports
//! - Periodic and final reports delivered to a pluggable notification sink
//! - Bounded reconnection and an idempotent shutdown
//!
//! # Module Structure
//!
//! - `bootstrap`: Wires configuration into a ready-to-start monitor
//! - `models`: Data structures for configuration, blocks, records and reports
//! - `services`: Core business logic and blockchain interaction
//! - `utils`: Common utilities and helper functions

pub mod bootstrap;
pub mod models;
pub mod services;
pub mod utils;
