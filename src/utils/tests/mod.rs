//! Test helper utilities
//!
//! This module contains test helper utilities for the application.
//!
//! - `builders`: Test helper utilities for creating test instances of models

pub mod builders {
	// Raw chain data
	pub mod evm {
		pub mod block;
		pub mod transaction;
	}

	// Monitor models
	pub mod config;
	pub mod record;
}

pub use builders::*;
