//! Core services implementing the business logic.
//!
//! This module contains the main service implementations:
//! - `aggregator`: Rolling statistics and the bounded history window
//! - `alert`: Threshold rules evaluated against each block
//! - `blockchain`: Blockchain client interfaces and implementations
//! - `blockwatcher`: Head transports and the block ingestion loop
//! - `extractor`: Block to metrics record conversion
//! - `lifecycle`: Startup, reconnection and shutdown of the monitor
//! - `notification`: Alert and report delivery
//! - `reporter`: Periodic and final reports

pub mod aggregator;
pub mod alert;
pub mod blockchain;
pub mod blockwatcher;
pub mod extractor;
pub mod lifecycle;
pub mod notification;
pub mod reporter;
