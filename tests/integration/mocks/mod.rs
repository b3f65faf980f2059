//! Mock implementations for testing purposes.
//!
//! This module contains mock implementations of the traits used throughout the
//! application, primarily for testing. It includes mocks for:
//! - Blockchain clients
//! - Head transports
//! - Notification sinks and mock JSON-RPC servers
//!
//! Client mocks are implemented using the `mockall` crate.

mod clients;
mod notifier;
mod server;
mod transports;
#[allow(unused_imports)]
pub use clients::*;
#[allow(unused_imports)]
pub use notifier::*;
#[allow(unused_imports)]
pub use server::*;
#[allow(unused_imports)]
pub use transports::*;
