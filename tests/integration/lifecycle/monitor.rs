use std::{sync::Arc, time::Duration};

use chain_event_monitor::{
	models::{AlertThresholds, ReconnectPolicy, TransportMode},
	services::{
		alert::AlertEngine,
		blockwatcher::{BlockWatcherError, PollTransport},
		lifecycle::{BlockMonitor, MonitorOutcome, MonitorState},
	},
	utils::tests::builders::config::MonitorConfigBuilder,
};

use crate::integration::mocks::{
	capturing_notifier, AfterScript, CapturedEvents, ChainClient, ScriptedPushTransport,
};

fn quick_reconnect(max_attempts: usize) -> ReconnectPolicy {
	ReconnectPolicy::Bounded {
		max_attempts,
		initial_backoff_ms: 5,
		max_backoff_ms: 20,
	}
}

fn push_monitor(
	client: ChainClient,
	transport: Arc<ScriptedPushTransport>,
	policy: ReconnectPolicy,
) -> (BlockMonitor<ChainClient>, CapturedEvents) {
	let config = MonitorConfigBuilder::new()
		.reconnect(policy)
		.report_interval_secs(3600)
		.shutdown_grace_ms(500)
		.build();
	let (notifier, events) = capturing_notifier();
	let monitor = BlockMonitor::new(
		&config,
		client,
		transport,
		AlertEngine::from_config(&AlertThresholds::default()),
		notifier,
	)
	.unwrap();
	(monitor, events)
}

#[tokio::test]
async fn test_push_session_folds_blocks_and_alerts() {
	let transport = Arc::new(ScriptedPushTransport::new(vec![(
		vec![1, 2, 3, 4, 5],
		AfterScript::Hold,
	)]));
	let (monitor, events) = push_monitor(ChainClient::at(5), transport, quick_reconnect(3));

	monitor.start(std::future::pending()).await.unwrap();
	tokio::time::sleep(Duration::from_millis(200)).await;
	let report = monitor.stop().await;

	assert_eq!(report.block_count, 5);
	assert_eq!(report.total_transactions, 10);
	assert_eq!(report.last_block_number, Some(5));
	assert_eq!(report.average_block_interval, Some(12.0));

	let alerts = events.alerts();
	assert_eq!(alerts.len(), 1);
	assert_eq!(alerts[0].rule, "empty block");
	assert_eq!(alerts[0].block_number, 5);
}

#[tokio::test]
async fn test_exhausted_reconnects_stop_with_single_final_report() {
	let transport = Arc::new(ScriptedPushTransport::new(vec![(
		vec![1, 2],
		AfterScript::Fail,
	)]));
	let (monitor, events) =
		push_monitor(ChainClient::at(2), transport.clone(), quick_reconnect(2));

	monitor.start(std::future::pending()).await.unwrap();
	let outcome = tokio::time::timeout(Duration::from_secs(5), monitor.wait())
		.await
		.unwrap();

	assert!(matches!(outcome, MonitorOutcome::TransportFailed { .. }));
	assert_eq!(monitor.state(), MonitorState::Stopped);
	// Initial acquisition plus two reconnect attempts
	assert_eq!(transport.acquisitions(), 3);

	let again = monitor.stop().await;
	let finals = events.final_reports();
	assert_eq!(finals.len(), 1);
	assert_eq!(finals[0], again);
	assert_eq!(again.block_count, 2);
}

#[tokio::test]
async fn test_exhausted_reconnects_stop_monitor_unattended() {
	let transport = Arc::new(ScriptedPushTransport::new(vec![(
		vec![1, 2],
		AfterScript::Fail,
	)]));
	let config = MonitorConfigBuilder::new()
		.reconnect(quick_reconnect(2))
		.report_interval_secs(1)
		.shutdown_grace_ms(500)
		.build();
	let (notifier, events) = capturing_notifier();
	let monitor = BlockMonitor::new(
		&config,
		ChainClient::at(2),
		transport.clone(),
		AlertEngine::new(),
		notifier,
	)
	.unwrap();
	let mut states = monitor.subscribe_state();

	monitor.start(std::future::pending()).await.unwrap();
	tokio::time::timeout(
		Duration::from_secs(5),
		states.wait_for(|state| *state == MonitorState::Stopped),
	)
	.await
	.unwrap()
	.unwrap();

	assert_eq!(monitor.state(), MonitorState::Stopped);
	assert_eq!(transport.acquisitions(), 3);
	let finals = events.final_reports();
	assert_eq!(finals.len(), 1);
	assert_eq!(finals[0].block_count, 2);

	// The reporter is gone once stopped
	let periodic = events.periodic_count();
	tokio::time::sleep(Duration::from_millis(1500)).await;
	assert_eq!(events.periodic_count(), periodic);
	assert_eq!(events.final_reports().len(), 1);
}

#[tokio::test]
async fn test_reconnect_resumes_without_double_counting() {
	let transport = Arc::new(ScriptedPushTransport::new(vec![
		(vec![1, 2], AfterScript::Fail),
		(vec![2, 3, 4], AfterScript::Hold),
	]));
	let (monitor, _events) =
		push_monitor(ChainClient::at(4), transport.clone(), quick_reconnect(3));

	monitor.start(std::future::pending()).await.unwrap();
	tokio::time::sleep(Duration::from_millis(250)).await;
	assert_eq!(monitor.state(), MonitorState::Running);

	let report = monitor.stop().await;
	assert_eq!(report.block_count, 4);
	assert_eq!(report.last_block_number, Some(4));
	assert_eq!(transport.acquisitions(), 2);
}

#[tokio::test]
async fn test_terminate_policy_stops_on_first_failure() {
	let transport = Arc::new(ScriptedPushTransport::new(vec![
		(vec![1], AfterScript::Fail),
		(vec![2], AfterScript::Hold),
	]));
	let (monitor, _events) =
		push_monitor(ChainClient::at(2), transport.clone(), ReconnectPolicy::Terminate);

	monitor.start(std::future::pending()).await.unwrap();
	let outcome = tokio::time::timeout(Duration::from_secs(5), monitor.wait())
		.await
		.unwrap();

	assert!(matches!(outcome, MonitorOutcome::TransportFailed { .. }));
	assert_eq!(transport.acquisitions(), 1);
}

#[tokio::test]
async fn test_start_twice_and_stop_twice() {
	let transport = Arc::new(ScriptedPushTransport::new(vec![(vec![], AfterScript::Hold)]));
	let (monitor, events) = push_monitor(ChainClient::at(0), transport, quick_reconnect(1));

	monitor.start(std::future::pending()).await.unwrap();
	assert!(matches!(
		monitor.start(std::future::pending()).await,
		Err(BlockWatcherError::StateError(_))
	));

	let first = monitor.stop().await;
	let second = monitor.stop().await;
	assert_eq!(first, second);
	assert_eq!(first.block_count, 0);
	assert_eq!(events.final_reports().len(), 1);
	assert!(matches!(
		monitor.start(std::future::pending()).await,
		Err(BlockWatcherError::StateError(_))
	));
}

#[tokio::test]
async fn test_shutdown_signal_ends_session() {
	let transport = Arc::new(ScriptedPushTransport::new(vec![(vec![1], AfterScript::Hold)]));
	let (monitor, events) = push_monitor(ChainClient::at(1), transport, quick_reconnect(1));
	let (signal_tx, signal_rx) = tokio::sync::oneshot::channel::<()>();

	monitor
		.start(async move {
			let _ = signal_rx.await;
		})
		.await
		.unwrap();
	tokio::time::sleep(Duration::from_millis(50)).await;
	signal_tx.send(()).unwrap();

	let outcome = tokio::time::timeout(Duration::from_secs(5), monitor.wait())
		.await
		.unwrap();
	assert_eq!(outcome, MonitorOutcome::Shutdown);
	assert_eq!(events.final_reports().len(), 1);
	assert_eq!(events.final_reports()[0].block_count, 1);
}

#[tokio::test]
async fn test_poll_session_skips_unfetchable_block() {
	let client = ChainClient::at(100).with_missing(vec![102]);
	let config = MonitorConfigBuilder::new()
		.transport(TransportMode::Poll)
		.poll_interval_ms(20)
		.report_interval_secs(3600)
		.build();
	let transport = Arc::new(PollTransport::new(
		client.clone(),
		Duration::from_millis(config.poll_interval_ms),
		config.max_lookback_blocks,
	));
	let (notifier, _events) = capturing_notifier();
	let monitor = BlockMonitor::new(
		&config,
		client.clone(),
		transport,
		AlertEngine::new(),
		notifier,
	)
	.unwrap();

	monitor.start(std::future::pending()).await.unwrap();
	tokio::time::sleep(Duration::from_millis(60)).await;
	client.set_head(103);
	tokio::time::sleep(Duration::from_millis(200)).await;

	{
		let aggregator = monitor.aggregator();
		let aggregator = aggregator.read().await;
		assert_eq!(aggregator.window().block_numbers(), vec![101, 103]);
	}

	let report = monitor.stop().await;
	assert_eq!(report.block_count, 2);
	assert_eq!(report.last_block_number, Some(103));
}
