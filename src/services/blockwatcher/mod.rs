//! Block watcher service implementation.
//!
//! This module provides functionality to follow the head of an EVM chain and turn each
//! new block into metrics. It includes:
//! - Push and poll transports delivering head notifications
//! - Block ordering and gap tracking
//! - The ingestion pipeline folding blocks into the shared aggregator
//! - Error handling specific to block watching operations

mod error;
mod ingest;
mod tracker;
mod transport;

pub use error::BlockWatcherError;
pub use ingest::{BlockIngestor, IngestOutcome, SessionEnd};
pub use tracker::{BlockOrdering, BlockTracker};
pub use transport::{
	catch_up_range, HeadItem, HeadSubscription, HeadTransport, PollTransport, PushTransport,
	SubscriptionHandle,
};
