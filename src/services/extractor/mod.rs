//! Block metrics extraction.
//!
//! Maps a raw EVM block (plus the previously accepted record, for the interval) to a
//! normalized [`BlockRecord`]. The transform is pure: no I/O and no shared state.

use alloy::primitives::U256;
use std::collections::HashMap;

use crate::{
	models::{BlockRecord, EVMBlock},
	services::blockwatcher::BlockWatcherError,
};

fn block_metadata(block: &EVMBlock) -> Option<HashMap<String, String>> {
	block.number().map(|number| {
		HashMap::from([("block_number".to_string(), number.to_string())])
	})
}

fn to_u64(value: U256, field: &str, block: &EVMBlock) -> Result<u64, BlockWatcherError> {
	u64::try_from(value).map_err(|e| {
		BlockWatcherError::parse_error(
			format!("{} does not fit in 64 bits: {}", field, value),
			Some(Box::new(e)),
			block_metadata(block),
		)
	})
}

/// Gas price statistics over the transactions that carry a price
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct GasPriceSummary {
	average: U256,
	min: Option<U256>,
	max: Option<U256>,
}

fn summarize_gas_prices<'a>(prices: impl Iterator<Item = &'a U256>) -> GasPriceSummary {
	let mut total = U256::ZERO;
	let mut count = 0u64;
	let mut summary = GasPriceSummary::default();

	for price in prices {
		total = total.saturating_add(*price);
		count += 1;
		summary.min = Some(summary.min.map_or(*price, |min| min.min(*price)));
		summary.max = Some(summary.max.map_or(*price, |max| max.max(*price)));
	}

	if count > 0 {
		summary.average = total / U256::from(count);
	}
	summary
}

/// Derives the metrics record for `block`.
///
/// `previous` is the last record accepted in this session. The interval is absent
/// when there is none, or when the timestamp went backwards.
///
/// # Errors
/// Returns a `ParseError` when the block has no number or hash, or when gas or
/// timestamp values do not fit in 64 bits.
pub fn extract_record(
	block: &EVMBlock,
	previous: Option<&BlockRecord>,
) -> Result<BlockRecord, BlockWatcherError> {
	let number = block.number().ok_or_else(|| {
		BlockWatcherError::parse_error("Block has no number", None, None)
	})?;
	let hash = block.hash.ok_or_else(|| {
		BlockWatcherError::parse_error("Block has no hash", None, block_metadata(block))
	})?;

	let timestamp = to_u64(block.timestamp, "timestamp", block)?;
	let gas_used = to_u64(block.gas_used, "gas_used", block)?;
	let gas_limit = to_u64(block.gas_limit, "gas_limit", block)?;

	let block_interval = previous.and_then(|prev| timestamp.checked_sub(prev.timestamp));

	let gas_prices = summarize_gas_prices(block.transactions.iter().filter_map(|tx| tx.gas_price()));

	let contract_creations = block
		.transactions
		.iter()
		.filter(|tx| tx.is_contract_creation())
		.count();

	let total_value = block
		.transactions
		.iter()
		.fold(U256::ZERO, |acc, tx| acc.saturating_add(*tx.value()));

	Ok(BlockRecord {
		number,
		hash,
		timestamp,
		transaction_count: block.transaction_count(),
		gas_used,
		gas_limit,
		miner: block.author,
		base_fee_per_gas: block.base_fee_per_gas,
		block_interval,
		average_gas_price: gas_prices.average,
		min_gas_price: gas_prices.min,
		max_gas_price: gas_prices.max,
		contract_creations,
		total_value,
	})
}
