//! Core domain models for the block monitor.
//!
//! This module contains the fundamental data structures that represent:
//! - Head notifications delivered by the transport layer
//! - Block records and running statistics derived from ingested blocks
//! - Alerts and reports emitted to notification sinks
//! - Monitor settings

mod alert;
mod block_record;
mod head;
mod monitor;
mod report;
mod stats;

pub use alert::Alert;
pub use block_record::BlockRecord;
pub use head::HeadNotification;
pub use monitor::{AlertThresholds, MonitorConfig, NotifierKind, ReconnectPolicy, TransportMode};
pub use report::{FinalReport, PeriodicReport, RecentSummary, Report};
pub use stats::MonitorStats;
