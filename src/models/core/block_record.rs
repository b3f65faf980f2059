use alloy::primitives::{Address, B256, U256};
use serde::{Deserialize, Serialize};

/// Normalized per-block metrics produced by the extractor.
///
/// Wei amounts are kept as `U256`. Floating point is only used for display ratios.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockRecord {
	pub number: u64,
	pub hash: B256,
	/// Seconds since the unix epoch
	pub timestamp: u64,
	pub transaction_count: usize,
	pub gas_used: u64,
	pub gas_limit: u64,
	pub miner: Address,
	pub base_fee_per_gas: Option<U256>,
	/// Seconds since the previous record of this session. Absent for the first
	/// record and whenever the timestamp went backwards.
	pub block_interval: Option<u64>,
	/// Mean gas price over transactions carrying one, zero when none do
	pub average_gas_price: U256,
	pub min_gas_price: Option<U256>,
	pub max_gas_price: Option<U256>,
	pub contract_creations: usize,
	/// Sum of value transferred by all transactions, in wei
	pub total_value: U256,
}

impl BlockRecord {
	/// Gas used as a percentage of the gas limit. Zero when the limit is zero.
	pub fn gas_utilization(&self) -> f64 {
		if self.gas_limit == 0 {
			return 0.0;
		}
		self.gas_used as f64 / self.gas_limit as f64 * 100.0
	}

	/// Transactions that call or transfer to an existing account
	pub fn transfers(&self) -> usize {
		self.transaction_count.saturating_sub(self.contract_creations)
	}

	pub fn is_empty(&self) -> bool {
		self.transaction_count == 0
	}
}
