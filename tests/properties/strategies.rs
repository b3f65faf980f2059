use chain_event_monitor::{
	models::{AlertThresholds, BlockRecord},
	utils::tests::builders::record::BlockRecordBuilder,
};
use proptest::{option, prelude::*};

const MAX_TRANSACTIONS: usize = 1_500;
const MAX_GAS_LIMIT: u64 = 60_000_000;
const MAX_RECORDS: usize = 60;

pub fn record_strategy(number: u64) -> impl Strategy<Value = BlockRecord> {
	(
		0..MAX_TRANSACTIONS,
		1..=MAX_GAS_LIMIT,
		0.0..=1.0f64,
		option::of(0u64..120),
	)
		.prop_map(move |(transactions, gas_limit, fill, interval)| {
			BlockRecordBuilder::new()
				.number(number)
				.transaction_count(transactions)
				.gas_limit(gas_limit)
				.gas_used((gas_limit as f64 * fill) as u64)
				.block_interval(interval)
				.build()
		})
}

/// Records with strictly increasing block numbers, possibly with gaps
pub fn records_strategy() -> impl Strategy<Value = Vec<BlockRecord>> {
	prop::collection::vec(1u64..4, 1..MAX_RECORDS).prop_flat_map(|steps| {
		let numbers: Vec<u64> = steps
			.iter()
			.scan(0u64, |number, step| {
				*number += step;
				Some(*number)
			})
			.collect();
		numbers
			.into_iter()
			.map(record_strategy)
			.collect::<Vec<_>>()
	})
}

pub fn thresholds_strategy() -> impl Strategy<Value = AlertThresholds> {
	(
		option::of(0..MAX_TRANSACTIONS),
		option::of(0.0..=100.0f64),
		option::of(0u64..120),
		any::<bool>(),
	)
		.prop_map(
			|(high_transaction_count, high_gas_utilization_percent, long_block_interval_secs, empty_block)| {
				AlertThresholds {
					high_transaction_count,
					high_gas_utilization_percent,
					long_block_interval_secs,
					empty_block,
				}
			},
		)
}
