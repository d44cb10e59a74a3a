use crate::error::{Result, VaultError};
use crate::evm::address::parse_address;
use crate::evm::erc20;
use crate::rpc::RpcClient;
use crate::types::Balance;
use crate::wallet::NetworkDescriptor;

use alloy::primitives::Address;
use futures::future::try_join_all;

/// Read-only balance queries. Every call is idempotent and safe to poll.
pub struct BalanceReader {
    network: NetworkDescriptor,
    rpc: RpcClient,
}

impl BalanceReader {
    pub fn new(network: NetworkDescriptor, rpc: RpcClient) -> Self {
        Self { network, rpc }
    }

    pub async fn get_balance(&self, address: &str) -> Result<Balance> {
        let address = parse_address(address).map_err(VaultError::InvalidAddress)?;
        self.native_balance(address).await
    }

    pub async fn native_balance(&self, address: Address) -> Result<Balance> {
        let raw = self.rpc.balance(address).await?;
        Ok(Balance::new(
            raw,
            self.network.native_decimals,
            self.network.native_symbol.clone(),
        ))
    }

    /// Token holdings scaled by the contract's own `decimals()`.
    pub async fn get_token_balance(&self, token: &str, address: &str) -> Result<Balance> {
        let token = parse_address(token).map_err(VaultError::InvalidAddress)?;
        let owner = parse_address(address).map_err(VaultError::InvalidAddress)?;

        let balance_call = erc20::encode_balance_of(owner);
        let decimals_call = erc20::encode_decimals();
        let (raw_word, decimals_word) = futures::try_join!(
            self.rpc.call(token, &balance_call),
            self.rpc.call(token, &decimals_call),
        )?;
        let raw = erc20::decode_uint_word(&raw_word)?;
        let decimals = erc20::decode_decimals(&decimals_word)?;

        Ok(Balance::new(raw, decimals, token.to_checksum(None)))
    }

    /// Native balances for many addresses, queried concurrently.
    pub async fn get_balances(&self, addresses: &[Address]) -> Result<Vec<Balance>> {
        try_join_all(addresses.iter().map(|a| self.native_balance(*a))).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rpc::mock::MockTransport;
    use crate::test_vectors::*;
    use crate::wallet::KnownNetwork;
    use alloy::primitives::U256;
    use serde_json::json;
    use std::sync::Arc;

    const TOKEN: &str = "0x5FbDB2315678afecb367f032d93F642f64180aa3";

    fn reader(mock: Arc<MockTransport>) -> BalanceReader {
        BalanceReader::new(KnownNetwork::Local.descriptor(), RpcClient::new(mock))
    }

    #[tokio::test]
    async fn test_native_balance() {
        let mock = Arc::new(MockTransport::funded(31_337, 1_500_000_000_000_000_000));
        let balance = reader(mock.clone()).get_balance(JUNK_ADDRESS_0).await.unwrap();

        assert_eq!(balance.formatted(), "1.5");
        assert_eq!(balance.symbol, "ETH");
        assert_eq!(mock.methods(), vec!["eth_getBalance".to_string()]);
    }

    #[tokio::test]
    async fn test_token_balance_uses_declared_decimals() {
        let mock = Arc::new(MockTransport::new());
        mock.reply("eth_call:0x70a08231", json!(format!("0x{:064x}", 12_345_678u64)));
        mock.reply("eth_call:0x313ce567", json!(format!("0x{:064x}", 6u8)));

        let balance = reader(mock)
            .get_token_balance(TOKEN, JUNK_ADDRESS_0)
            .await
            .unwrap();

        assert_eq!(balance.raw, U256::from(12_345_678u64));
        assert_eq!(balance.decimals, 6);
        assert_eq!(balance.formatted(), "12.345678");
    }

    #[tokio::test]
    async fn test_invalid_address_is_rejected_locally() {
        let mock = Arc::new(MockTransport::funded(31_337, 1));
        let err = reader(mock.clone()).get_balance("0xnope").await.unwrap_err();
        assert!(matches!(err, VaultError::InvalidAddress(_)));
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn test_many_balances() {
        let mock = Arc::new(MockTransport::funded(31_337, 7));
        let addresses: Vec<Address> = [JUNK_ADDRESS_0, JUNK_ADDRESS_1, JUNK_ADDRESS_2]
            .iter()
            .map(|a| a.parse().unwrap())
            .collect();

        let balances = reader(mock.clone()).get_balances(&addresses).await.unwrap();
        assert_eq!(balances.len(), 3);
        assert!(balances.iter().all(|b| b.raw == U256::from(7u64)));
        assert_eq!(mock.call_count(), 3);
    }
}
