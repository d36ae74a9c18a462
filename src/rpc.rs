//! Thin `eth_getLogs` collaborator over the request layer

use serde_json::json;

use crate::client::{ApiResult, RequestClient};
use crate::transport::RequestPayload;

/// Height-range log fetching as seen by the extractor.
///
/// The production implementation talks JSON-RPC; tests substitute scripted
/// fakes.
pub trait FetchLogs {
    /// Fetch all event logs for heights `from_height..=to_height`. The
    /// success body is suitable for direct persistence as artifact content.
    fn get_logs(&self, from_height: u64, to_height: u64) -> ApiResult;
}

/// JSON-RPC log fetch service for one contract
pub struct EthRpcService {
    client: RequestClient,
    contract: String,
}

impl EthRpcService {
    pub fn new(client: RequestClient, contract: impl Into<String>) -> Self {
        Self {
            client,
            contract: contract.into(),
        }
    }

    fn log_filter(&self, from_height: u64, to_height: u64) -> RequestPayload {
        let mut payload = RequestPayload::new();
        payload.insert("jsonrpc".to_string(), json!("2.0"));
        payload.insert("method".to_string(), json!("eth_getLogs"));
        payload.insert(
            "params".to_string(),
            json!([{
                "address": self.contract,
                "fromBlock": format!("{:#x}", from_height),
                "toBlock": format!("{:#x}", to_height),
            }]),
        );
        payload.insert("id".to_string(), json!(1));
        payload
    }
}

impl FetchLogs for EthRpcService {
    fn get_logs(&self, from_height: u64, to_height: u64) -> ApiResult {
        self.client.post("", &self.log_filter(from_height, to_height))
    }
}
