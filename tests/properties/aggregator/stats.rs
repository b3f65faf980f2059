use crate::properties::strategies::records_strategy;
use chain_event_monitor::services::aggregator::StatsAggregator;
use chrono::Utc;
use proptest::{prelude::*, test_runner::Config};

proptest! {
	#![proptest_config(Config {
		failure_persistence: None,
		..Config::default()
	})]

	#[test]
	fn test_window_keeps_newest_records_in_order(
		records in records_strategy(),
		capacity in 1usize..20,
	) {
		let mut aggregator = StatsAggregator::new(capacity, Utc::now());
		for record in &records {
			prop_assert!(aggregator.update(record.clone()));
			prop_assert!(aggregator.window().len() <= capacity);
		}

		let expected: Vec<u64> = records
			.iter()
			.rev()
			.take(capacity)
			.rev()
			.map(|r| r.number)
			.collect();
		prop_assert_eq!(aggregator.window().block_numbers(), expected);
	}

	#[test]
	fn test_stats_match_folded_records(records in records_strategy()) {
		let mut aggregator = StatsAggregator::new(10, Utc::now());
		for record in &records {
			aggregator.update(record.clone());
		}
		// Replaying the newest record is rejected as a duplicate
		if let Some(last) = records.last() {
			prop_assert!(!aggregator.update(last.clone()));
		}

		let stats = aggregator.stats();
		prop_assert_eq!(stats.block_count, records.len() as u64);
		prop_assert_eq!(
			stats.total_transactions,
			records.iter().map(|r| r.transaction_count as u64).sum::<u64>()
		);
		prop_assert_eq!(
			stats.min_transactions,
			records.iter().map(|r| r.transaction_count).min()
		);
		prop_assert_eq!(
			stats.max_transactions,
			records.iter().map(|r| r.transaction_count).max()
		);
		prop_assert_eq!(stats.last_block_number, records.last().map(|r| r.number));
	}

	#[test]
	fn test_average_interval_within_window_bounds(
		records in records_strategy(),
		capacity in 1usize..20,
	) {
		let mut aggregator = StatsAggregator::new(capacity, Utc::now());
		for record in &records {
			aggregator.update(record.clone());
		}

		let intervals: Vec<u64> = aggregator
			.window()
			.iter()
			.filter_map(|r| r.block_interval)
			.collect();
		match aggregator.stats().average_block_interval {
			None => prop_assert!(intervals.is_empty()),
			Some(average) => {
				let min = *intervals.iter().min().unwrap() as f64;
				let max = *intervals.iter().max().unwrap() as f64;
				prop_assert!(average >= min && average <= max);
			}
		}
	}
}
