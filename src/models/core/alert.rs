use serde::{Deserialize, Serialize};
use std::fmt;

/// A fired alert: one rule matched one block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
	/// Name of the rule that fired
	pub rule: String,
	pub block_number: u64,
	/// Rendered, human-readable message
	pub message: String,
}

impl fmt::Display for Alert {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "ALERT [{}] {}", self.rule, self.message)
	}
}
