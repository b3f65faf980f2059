use crate::properties::strategies::{record_strategy, thresholds_strategy};
use chain_event_monitor::{models::MonitorStats, services::alert::AlertEngine};
use chrono::Utc;
use proptest::{prelude::*, test_runner::Config};

proptest! {
	#![proptest_config(Config {
		failure_persistence: None,
		..Config::default()
	})]

	#[test]
	fn test_evaluation_is_deterministic(
		record in record_strategy(7),
		thresholds in thresholds_strategy(),
	) {
		let engine = AlertEngine::from_config(&thresholds);
		let stats = MonitorStats::new(Utc::now());

		let first = engine.evaluate(&record, &stats);
		let second = engine.evaluate(&record, &stats);
		prop_assert_eq!(&first, &second);
		prop_assert!(first.len() <= engine.len());
		prop_assert!(first.iter().all(|alert| alert.block_number == 7));
	}

	#[test]
	fn test_rules_fire_exactly_when_thresholds_are_crossed(
		record in record_strategy(11),
		thresholds in thresholds_strategy(),
	) {
		let engine = AlertEngine::from_config(&thresholds);
		let alerts = engine.evaluate(&record, &MonitorStats::new(Utc::now()));
		let fired = |rule: &str| alerts.iter().any(|alert| alert.rule == rule);

		prop_assert_eq!(
			fired("high transaction count"),
			thresholds
				.high_transaction_count
				.is_some_and(|threshold| record.transaction_count > threshold)
		);
		prop_assert_eq!(
			fired("high gas utilization"),
			thresholds
				.high_gas_utilization_percent
				.is_some_and(|threshold| record.gas_utilization() > threshold)
		);
		prop_assert_eq!(
			fired("long block interval"),
			match (thresholds.long_block_interval_secs, record.block_interval) {
				(Some(threshold), Some(interval)) => interval > threshold,
				_ => false,
			}
		);
		prop_assert_eq!(
			fired("empty block"),
			thresholds.empty_block && record.transaction_count == 0
		);
	}
}
