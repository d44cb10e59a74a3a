use crate::error::{Result, VaultError};
use crate::rpc::RpcTransport;
use alloy::primitives::keccak256;
use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::collections::HashMap;

/// Canned node for tests. `eth_call` replies are keyed by `eth_call:<selector>`.
/// `eth_sendRawTransaction` echoes the Keccak hash of the payload unless a
/// reply was registered for it.
#[derive(Default)]
pub struct MockTransport {
    replies: Mutex<HashMap<String, Result<Value>>>,
    calls: Mutex<Vec<(String, Value)>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// A node on `chain_id` holding `balance_wei` for every address.
    pub fn funded(chain_id: u64, balance_wei: u128) -> Self {
        let mock = Self::new();
        mock.reply("eth_chainId", json!(format!("0x{:x}", chain_id)));
        mock.reply("eth_getBalance", json!(format!("0x{:x}", balance_wei)));
        mock.reply("eth_getTransactionCount", json!("0x5"));
        mock.reply("eth_gasPrice", json!("0x3b9aca00"));
        mock.reply("eth_estimateGas", json!("0xea60"));
        mock
    }

    pub fn reply(&self, key: &str, value: Value) {
        self.replies.lock().insert(key.to_string(), Ok(value));
    }

    pub fn fail(&self, key: &str, error: VaultError) {
        self.replies.lock().insert(key.to_string(), Err(error));
    }

    pub fn calls(&self) -> Vec<(String, Value)> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    pub fn methods(&self) -> Vec<String> {
        self.calls.lock().iter().map(|(m, _)| m.clone()).collect()
    }

    fn key_for(method: &str, params: &Value) -> String {
        if method == "eth_call" {
            let selector = params[0]["data"]
                .as_str()
                .map(|d| d.chars().take(10).collect::<String>())
                .unwrap_or_default();
            return format!("eth_call:{}", selector);
        }
        method.to_string()
    }
}

#[async_trait]
impl RpcTransport for MockTransport {
    async fn request(&self, method: &str, params: Value) -> Result<Value> {
        self.calls.lock().push((method.to_string(), params.clone()));

        let key = Self::key_for(method, &params);
        let mut replies = self.replies.lock();
        match replies.remove(&key) {
            Some(Ok(value)) => {
                replies.insert(key, Ok(value.clone()));
                Ok(value)
            }
            Some(Err(err)) => Err(err),
            None if method == "eth_sendRawTransaction" => {
                let raw = params[0].as_str().unwrap_or_default();
                let bytes = hex::decode(raw.trim_start_matches("0x")).unwrap_or_default();
                Ok(json!(keccak256(bytes).to_string()))
            }
            None => Err(VaultError::rejected(format!("method {} not mocked", method))),
        }
    }
}
