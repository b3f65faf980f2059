//! Parsing utilities
//!
//! This module provides utilities for parsing various types of data.

use byte_unit::Byte;
use lazy_static::lazy_static;
use regex::Regex;
use std::{str::FromStr, time::Duration};

lazy_static! {
	static ref DURATION_PATTERN: Regex =
		Regex::new(r"^\s*(\d+)\s*(ms|s|m|h)?\s*$").expect("valid duration pattern");
}

/// Parses a string argument into a `u64` value representing a file size.
///
/// Accepts human-readable formats like "1GB", "500MB", "1024KB", etc.
/// Returns an error if the format is invalid.
pub fn parse_string_to_bytes_size(s: &str) -> Result<u64, String> {
	match Byte::from_str(s) {
		Ok(byte) => Ok(byte.as_u64()),
		Err(e) => Err(format!("Invalid size format: '{}'. Error: {}", s, e)),
	}
}

/// Parses a duration such as "500ms", "12s", "5m" or "1h".
///
/// A bare number is read as milliseconds. Zero is rejected.
pub fn parse_duration(s: &str) -> Result<Duration, String> {
	let captures = DURATION_PATTERN
		.captures(s)
		.ok_or_else(|| format!("Invalid duration format: '{}'", s))?;

	let value: u64 = captures[1]
		.parse()
		.map_err(|e| format!("Invalid duration value: '{}'. Error: {}", s, e))?;

	let duration = match captures.get(2).map(|unit| unit.as_str()) {
		None | Some("ms") => Duration::from_millis(value),
		Some("s") => Duration::from_secs(value),
		Some("m") => Duration::from_secs(value.saturating_mul(60)),
		Some("h") => Duration::from_secs(value.saturating_mul(3600)),
		Some(unit) => return Err(format!("Unknown duration unit: '{}'", unit)),
	};

	if duration.is_zero() {
		return Err(format!("Duration must be greater than zero: '{}'", s));
	}
	Ok(duration)
}
