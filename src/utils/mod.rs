//! Utility modules for common functionality.
//!
//! This module provides various utility functions and types that are used across
//! the application. Currently includes:
//!
//! - formatting: Human-readable rendering of gas, wei and durations
//! - http: HTTP client utilities (i.e. creation of retryable HTTP clients)
//! - logging: Logging utilities
//! - metrics: Metrics utilities
//! - parsing: Parsing utilities
//! - tests: Test utilities

pub mod formatting;
pub mod http;
pub mod logging;
pub mod metrics;
pub mod parsing;
pub mod tests;

pub use http::*;
pub use parsing::*;
