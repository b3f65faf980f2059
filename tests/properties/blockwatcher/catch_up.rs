use chain_event_monitor::services::blockwatcher::catch_up_range;
use proptest::{prelude::*, test_runner::Config};

proptest! {
	#![proptest_config(Config {
		failure_persistence: None,
		..Config::default()
	})]

	#[test]
	fn test_catch_up_range_is_bounded(
		last_seen in 0u64..1_000_000,
		advance in 0u64..5_000,
		max_lookback in 1u64..500,
	) {
		let current = last_seen + advance;
		match catch_up_range(last_seen, current, max_lookback) {
			None => prop_assert_eq!(advance, 0),
			Some(range) => {
				prop_assert_eq!(*range.end(), current);
				prop_assert!(*range.start() > last_seen);
				let len = range.end() - range.start() + 1;
				prop_assert_eq!(len, advance.min(max_lookback));
			}
		}
	}

	#[test]
	fn test_no_range_when_chain_goes_backwards(
		last_seen in 1u64..1_000_000,
		behind in 1u64..1_000,
		max_lookback in 1u64..500,
	) {
		let current = last_seen.saturating_sub(behind);
		prop_assert!(catch_up_range(last_seen, current, max_lookback).is_none());
	}
}
