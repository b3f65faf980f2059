//! Ethereum Virtual Machine (EVM) blockchain specific implementations.
//!
//! This module contains the raw block and transaction shapes returned by
//! EVM JSON-RPC nodes.

mod block;
mod transaction;

pub use block::{BaseBlock as EVMBaseBlock, Block as EVMBlock};
pub use transaction::{BaseTransaction as EVMBaseTransaction, Transaction as EVMTransaction};
