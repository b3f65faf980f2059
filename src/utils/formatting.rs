//! Display helpers for block metrics
//!
//! Pure functions used by block logs and reports. Wei values are converted with
//! alloy's unit helpers so no precision is lost before the final rounding.

use alloy::primitives::{utils::format_units, U256};
use std::time::Duration;

/// Formats a gas amount with a `K`/`M` suffix (e.g. `21.0K`, `1.5M`).
pub fn format_gas(gas: u64) -> String {
	if gas >= 1_000_000 {
		format!("{:.1}M", gas as f64 / 1_000_000.0)
	} else if gas >= 1_000 {
		format!("{:.1}K", gas as f64 / 1_000.0)
	} else {
		gas.to_string()
	}
}

fn format_wei_in(wei: U256, unit: &str, decimals: usize) -> String {
	let value = format_units(wei, unit)
		.ok()
		.and_then(|s| s.parse::<f64>().ok())
		.unwrap_or(0.0);
	format!("{:.*}", decimals, value)
}

/// Formats a wei amount as gwei with two decimals.
pub fn format_gwei(wei: U256) -> String {
	format_wei_in(wei, "gwei", 2)
}

/// Formats a wei amount as ether with four decimals.
pub fn format_ether(wei: U256) -> String {
	format_wei_in(wei, "ether", 4)
}

/// Formats a duration in the largest fitting unit (`1.5h`, `2.0m`, `30.0s`).
pub fn format_duration(duration: Duration) -> String {
	let secs = duration.as_secs_f64();
	if secs >= 3600.0 {
		format!("{:.1}h", secs / 3600.0)
	} else if secs >= 60.0 {
		format!("{:.1}m", secs / 60.0)
	} else {
		format!("{:.1}s", secs)
	}
}

/// Formats an integer with comma thousands separators.
pub fn format_number(n: u64) -> String {
	let digits = n.to_string();
	let mut out = String::with_capacity(digits.len() + digits.len() / 3);
	for (i, c) in digits.chars().enumerate() {
		if i > 0 && (digits.len() - i) % 3 == 0 {
			out.push(',');
		}
		out.push(c);
	}
	out
}
