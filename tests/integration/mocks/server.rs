//! Helpers for mock JSON-RPC servers.

use mockito::{Matcher, Mock, ServerGuard};
use serde_json::{json, Value};

/// Answers the `net_version` connectivity check
pub fn create_http_valid_server_mock_network_response(server: &mut ServerGuard) -> Mock {
	server
		.mock("POST", "/")
		.match_body(Matcher::PartialJson(json!({ "method": "net_version" })))
		.with_header("content-type", "application/json")
		.with_status(200)
		.with_body(r#"{"jsonrpc":"2.0","id":0,"result":"1"}"#)
		.create()
}

/// Answers a single JSON-RPC method with `result`
pub fn create_rpc_mock(server: &mut ServerGuard, method: &str, result: Value) -> Mock {
	server
		.mock("POST", "/")
		.match_body(Matcher::PartialJson(json!({ "method": method })))
		.with_header("content-type", "application/json")
		.with_status(200)
		.with_body(json!({ "jsonrpc": "2.0", "id": 1, "result": result }).to_string())
		.create()
}

/// A post-London block as returned by `eth_getBlockByNumber` with full transactions
pub fn block_json(number: u64) -> Value {
	json!({
		"hash": format!("0x{:064x}", number),
		"parentHash": format!("0x{:064x}", number.saturating_sub(1)),
		"miner": "0x95222290dd7278aa3ddd389cc1e1d165cc4bafe5",
		"number": format!("0x{:x}", number),
		"gasUsed": "0xe4e1c0",
		"gasLimit": "0x1c9c380",
		"baseFeePerGas": "0x3b9aca00",
		"timestamp": "0x6553f100",
		"difficulty": "0x0",
		"transactions": [
			{
				"hash": format!("0x{:064x}", 0xaa),
				"nonce": "0x1",
				"from": "0x1111111111111111111111111111111111111111",
				"to": "0x2222222222222222222222222222222222222222",
				"value": "0xde0b6b3a7640000",
				"gasPrice": "0x4a817c800",
				"gas": "0x5208",
				"input": "0x"
			},
			{
				"hash": format!("0x{:064x}", 0xbb),
				"nonce": "0x2",
				"from": "0x1111111111111111111111111111111111111111",
				"to": null,
				"value": "0x0",
				"gasPrice": "0x2540be400",
				"gas": "0x30d40",
				"input": "0x6080"
			}
		]
	})
}
