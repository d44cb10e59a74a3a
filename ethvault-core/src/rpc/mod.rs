//! Minimal Ethereum JSON-RPC client.
//!
//! Transport failures surface as [`VaultError::NetworkUnavailable`]; a JSON-RPC
//! error object from the node surfaces as [`VaultError::Rejected`] with the
//! node's message untouched.

#[cfg(test)]
pub(crate) mod mock;

use crate::error::{Result, VaultError};
use alloy::primitives::{Address, U256};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[async_trait]
pub trait RpcTransport: Send + Sync {
    /// Send one JSON-RPC call and return its `result` member.
    async fn request(&self, method: &str, params: Value) -> Result<Value>;
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

pub struct HttpTransport {
    url: String,
    client: reqwest::Client,
    next_id: AtomicU64,
}

impl HttpTransport {
    pub fn new(url: &str, timeout: Duration) -> Result<Self> {
        let url = url.trim();
        if url.is_empty() {
            return Err(VaultError::config("RPC URL cannot be empty"));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| VaultError::internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            url: url.to_string(),
            client,
            next_id: AtomicU64::new(1),
        })
    }
}

#[async_trait]
impl RpcTransport for HttpTransport {
    async fn request(&self, method: &str, params: Value) -> Result<Value> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });

        tracing::debug!("RPC -> {} {}", self.url, method);

        let response = self
            .client
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                VaultError::network_unavailable(format!(
                    "{} request to {} failed: {}",
                    method, self.url, e
                ))
            })?;

        let status = response.status();
        if status.is_server_error() || status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(VaultError::network_unavailable(format!(
                "{} returned HTTP {}",
                self.url, status
            )));
        }

        let response: RpcResponse = response
            .json()
            .await
            .map_err(|e| VaultError::rpc(format!("{} response was not JSON-RPC: {}", method, e)))?;

        if let Some(err) = response.error {
            return Err(VaultError::rejected(format!("{} (code {})", err.message, err.code)));
        }

        response
            .result
            .ok_or_else(|| VaultError::rpc(format!("{} response has no result", method)))
    }
}

/// Typed wrappers over the handful of `eth_*` calls the wallet needs.
#[derive(Clone)]
pub struct RpcClient {
    transport: Arc<dyn RpcTransport>,
}

impl RpcClient {
    pub fn new(transport: Arc<dyn RpcTransport>) -> Self {
        Self { transport }
    }

    pub fn http(url: &str, timeout: Duration) -> Result<Self> {
        Ok(Self::new(Arc::new(HttpTransport::new(url, timeout)?)))
    }

    pub async fn chain_id(&self) -> Result<u64> {
        let value = self.transport.request("eth_chainId", json!([])).await?;
        parse_u64(&value)
    }

    pub async fn balance(&self, address: Address) -> Result<U256> {
        let value = self
            .transport
            .request("eth_getBalance", json!([address.to_string(), "latest"]))
            .await?;
        parse_u256(&value)
    }

    pub async fn pending_nonce(&self, address: Address) -> Result<u64> {
        let value = self
            .transport
            .request("eth_getTransactionCount", json!([address.to_string(), "pending"]))
            .await?;
        parse_u64(&value)
    }

    pub async fn gas_price(&self) -> Result<u128> {
        let value = self.transport.request("eth_gasPrice", json!([])).await?;
        let price = parse_u256(&value)?;
        u128::try_from(price).map_err(|_| VaultError::rpc(format!("gas price {} overflows", price)))
    }

    pub async fn estimate_gas(&self, from: Address, to: Address, data: &[u8]) -> Result<u64> {
        let call = json!({
            "from": from.to_string(),
            "to": to.to_string(),
            "data": format!("0x{}", hex::encode(data)),
        });
        let value = self.transport.request("eth_estimateGas", json!([call])).await?;
        parse_u64(&value)
    }

    pub async fn call(&self, to: Address, data: &[u8]) -> Result<Vec<u8>> {
        let call = json!({
            "to": to.to_string(),
            "data": format!("0x{}", hex::encode(data)),
        });
        let value = self
            .transport
            .request("eth_call", json!([call, "latest"]))
            .await?;
        parse_bytes(&value)
    }

    /// Returns the hash the node reports for the submitted payload.
    pub async fn send_raw_transaction(&self, raw: &[u8]) -> Result<String> {
        let value = self
            .transport
            .request(
                "eth_sendRawTransaction",
                json!([format!("0x{}", hex::encode(raw))]),
            )
            .await?;
        value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| VaultError::rpc(format!("expected a hash string, got {}", value)))
    }
}

fn as_hex_str(value: &Value) -> Result<&str> {
    value
        .as_str()
        .filter(|s| s.starts_with("0x"))
        .ok_or_else(|| VaultError::rpc(format!("expected a 0x-prefixed string, got {}", value)))
}

pub(crate) fn parse_u256(value: &Value) -> Result<U256> {
    let s = as_hex_str(value)?;
    let digits = &s[2..];
    if digits.is_empty() {
        return Ok(U256::ZERO);
    }
    U256::from_str_radix(digits, 16)
        .map_err(|e| VaultError::rpc(format!("bad quantity {}: {}", s, e)))
}

pub(crate) fn parse_u64(value: &Value) -> Result<u64> {
    let s = as_hex_str(value)?;
    let digits = &s[2..];
    if digits.is_empty() {
        return Ok(0);
    }
    u64::from_str_radix(digits, 16)
        .map_err(|e| VaultError::rpc(format!("bad quantity {}: {}", s, e)))
}

pub(crate) fn parse_bytes(value: &Value) -> Result<Vec<u8>> {
    let s = as_hex_str(value)?;
    hex::decode(&s[2..]).map_err(|e| VaultError::rpc(format!("bad hex data: {}", e)))
}
