use std::io::Write;

use mockito::Server;
use tempfile::NamedTempFile;

use chain_event_monitor::{
	bootstrap::{create_monitor, create_monitor_with_client},
	models::{ConfigLoader, MonitorConfig, ReconnectPolicy, TransportMode},
	services::lifecycle::MonitorState,
};

use crate::integration::mocks::{create_http_valid_server_mock_network_response, ChainClient};

fn write_config(contents: &str) -> NamedTempFile {
	let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
	file.write_all(contents.as_bytes()).unwrap();
	file
}

#[tokio::test]
async fn test_load_config_and_build_monitor() {
	let file = write_config(
		r#"{
			"rpc_url": "https://node.example",
			"transport": "poll",
			"poll_interval_ms": 2000,
			"history_capacity": 25,
			"reconnect": { "strategy": "terminate" },
			"alerts": { "high_transaction_count": 150, "empty_block": false }
		}"#,
	);

	let config = MonitorConfig::load_from_path(file.path()).await.unwrap();
	assert_eq!(config.transport, TransportMode::Poll);
	assert_eq!(config.reconnect, ReconnectPolicy::Terminate);
	assert_eq!(config.alerts.high_transaction_count, Some(150));

	let monitor = create_monitor_with_client(&config, ChainClient::at(0)).unwrap();
	assert_eq!(monitor.state(), MonitorState::Idle);
	assert_eq!(monitor.aggregator().read().await.window().capacity(), 25);
}

#[tokio::test]
async fn test_push_config_without_ws_url_is_rejected() {
	let file = write_config(r#"{ "rpc_url": "https://node.example", "transport": "push" }"#);
	assert!(MonitorConfig::load_from_path(file.path()).await.is_err());
}

#[tokio::test]
async fn test_create_monitor_checks_endpoint() {
	let mut server = Server::new_async().await;
	let endpoint = create_http_valid_server_mock_network_response(&mut server);

	let mut config = MonitorConfig::new(server.url());
	config.transport = TransportMode::Poll;

	let monitor = create_monitor(&config).await.unwrap();
	assert_eq!(monitor.state(), MonitorState::Idle);
	endpoint.assert();
}

#[tokio::test]
async fn test_create_monitor_rejects_invalid_config_before_connecting() {
	let mut config = MonitorConfig::new("https://node.example".to_string());
	config.transport = TransportMode::Poll;
	config.report_interval_secs = 0;

	assert!(create_monitor(&config).await.is_err());
}
