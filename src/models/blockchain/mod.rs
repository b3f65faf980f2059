//! Blockchain-specific model implementations.
//!
//! Raw data as delivered by the ledger client, before the metrics extractor
//! normalizes it into a block record.

pub mod evm;
