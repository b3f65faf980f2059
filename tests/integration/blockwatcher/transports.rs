use std::time::Duration;

use futures::{stream, StreamExt};
use tokio::time::timeout;

use chain_event_monitor::{
	models::HeadNotification,
	services::blockwatcher::{
		BlockWatcherError, HeadSubscription, HeadTransport, PollTransport, PushTransport,
	},
};

use crate::integration::mocks::{ChainClient, MockBlockChainClient};

async fn next_number(subscription: &mut HeadSubscription) -> Option<u64> {
	match timeout(Duration::from_secs(2), subscription.notifications.recv()).await {
		Ok(Some(Ok(head))) => Some(head.number),
		_ => None,
	}
}

#[tokio::test]
async fn test_push_forwards_heads_then_reports_failure() {
	let mut client = MockBlockChainClient::new();
	client.expect_subscribe_heads().times(1).returning(|| {
		Ok(stream::iter(vec![
			Ok(HeadNotification::new(500)),
			Ok(HeadNotification::new(501)),
			Err(anyhow::anyhow!("connection reset by peer")),
			Ok(HeadNotification::new(502)),
		])
		.boxed())
	});

	let transport = PushTransport::new(client);
	let mut subscription = transport.acquire().await.unwrap();

	assert_eq!(next_number(&mut subscription).await, Some(500));
	assert_eq!(next_number(&mut subscription).await, Some(501));
	assert!(matches!(
		subscription.notifications.recv().await,
		Some(Err(BlockWatcherError::TransportError(_)))
	));
	// Nothing is forwarded after the failure
	assert!(subscription.notifications.recv().await.is_none());
}

#[tokio::test]
async fn test_push_acquire_fails_when_subscription_refused() {
	let mut client = MockBlockChainClient::new();
	client
		.expect_subscribe_heads()
		.times(1)
		.returning(|| Err(anyhow::anyhow!("connection refused")));

	let transport = PushTransport::new(client);
	assert!(matches!(
		transport.acquire().await,
		Err(BlockWatcherError::TransportError(_))
	));
}

#[tokio::test]
async fn test_poll_emits_each_new_block_in_order() {
	let client = ChainClient::at(100);
	let transport = PollTransport::new(client.clone(), Duration::from_millis(20), 50);
	let mut subscription = transport.acquire().await.unwrap();

	// First poll only establishes the baseline
	tokio::time::sleep(Duration::from_millis(60)).await;
	assert!(subscription.notifications.try_recv().is_err());

	client.set_head(103);
	assert_eq!(next_number(&mut subscription).await, Some(101));
	assert_eq!(next_number(&mut subscription).await, Some(102));
	assert_eq!(next_number(&mut subscription).await, Some(103));

	subscription.handle.unsubscribe();
	assert!(!subscription.handle.is_active());
}

#[tokio::test]
async fn test_poll_respects_lookback_limit() {
	let client = ChainClient::at(1_000);
	let transport = PollTransport::new(client.clone(), Duration::from_millis(20), 3);
	let mut subscription = transport.acquire().await.unwrap();

	tokio::time::sleep(Duration::from_millis(60)).await;
	client.set_head(1_100);

	assert_eq!(next_number(&mut subscription).await, Some(1_098));
	assert_eq!(next_number(&mut subscription).await, Some(1_099));
	assert_eq!(next_number(&mut subscription).await, Some(1_100));
}

#[tokio::test]
async fn test_poll_resumes_after_known_block() {
	let client = ChainClient::at(12);
	let transport =
		PollTransport::new(client, Duration::from_millis(20), 50).starting_after(10);
	let mut subscription = transport.acquire().await.unwrap();

	assert_eq!(next_number(&mut subscription).await, Some(11));
	assert_eq!(next_number(&mut subscription).await, Some(12));
}
