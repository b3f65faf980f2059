//! EVM transaction data structures.

use std::ops::Deref;

use serde::{Deserialize, Serialize};

use alloy::{
	consensus::Transaction as AlloyConsensusTransaction,
	primitives::{Address, Bytes, B256, U256},
	rpc::types::Transaction as AlloyTransaction,
};

/// Base Transaction struct
///
/// Only the fields needed for block metrics are modelled.
#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
pub struct BaseTransaction {
	/// Hash
	pub hash: B256,
	/// Nonce
	#[serde(default)]
	pub nonce: U256,
	/// Sender
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub from: Option<Address>,
	/// Recipient (None when contract creation)
	#[serde(default)]
	pub to: Option<Address>,
	/// Transferred value
	#[serde(default)]
	pub value: U256,
	/// Gas Price
	#[serde(rename = "gasPrice", default)]
	pub gas_price: Option<U256>,
	/// Gas amount
	#[serde(default)]
	pub gas: U256,
	/// Input data
	#[serde(default)]
	pub input: Bytes,
}

/// Wrapper around Base Transaction that implements additional functionality
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Transaction(pub BaseTransaction);

impl Transaction {
	/// Get the transaction value (amount of ETH transferred)
	pub fn value(&self) -> &U256 {
		&self.0.value
	}

	/// Get the transaction sender address
	pub fn sender(&self) -> Option<&Address> {
		self.0.from.as_ref()
	}

	/// Get the transaction recipient address (None for contract creation)
	pub fn to(&self) -> Option<&Address> {
		self.0.to.as_ref()
	}

	/// Get the gas price, if the node reported one
	pub fn gas_price(&self) -> Option<&U256> {
		self.0.gas_price.as_ref()
	}

	/// Get the transaction hash
	pub fn hash(&self) -> &B256 {
		&self.0.hash
	}

	/// A transaction without a recipient deploys a contract
	pub fn is_contract_creation(&self) -> bool {
		self.0.to.is_none()
	}
}

impl From<BaseTransaction> for Transaction {
	fn from(tx: BaseTransaction) -> Self {
		Self(tx)
	}
}

impl From<AlloyTransaction> for Transaction {
	fn from(tx: AlloyTransaction) -> Self {
		let gas_price = tx
			.effective_gas_price
			.or_else(|| tx.inner.gas_price())
			.map(U256::from);
		let tx = BaseTransaction {
			hash: *tx.inner.tx_hash(),
			nonce: U256::from(tx.inner.nonce()),
			from: Some(tx.inner.signer()),
			to: tx.inner.to(),
			value: tx.inner.value(),
			gas_price,
			gas: U256::from(tx.inner.gas_limit()),
			input: tx.inner.input().clone(),
		};
		Self(tx)
	}
}

impl Deref for Transaction {
	type Target = BaseTransaction;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
