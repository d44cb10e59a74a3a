use crate::error::{Result, VaultError};
use crate::wallet::WordCount;
use alloy::primitives::Address;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Duration;

/// PBKDF2 rounds below this are refused when sealing a mnemonic.
pub const MIN_KDF_ITERATIONS: u32 = 10_000;
pub const DEFAULT_KDF_ITERATIONS: u32 = 100_000;
/// Upper bound on PBKDF2 rounds accepted from config or a vault file.
pub const MAX_KDF_ITERATIONS: u32 = 10_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Curve {
    Secp256k1,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AddressEncoding {
    /// Keccak-256 derived, mixed-case checksum
    Eip55,
}

/// Networks the wallet knows how to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KnownNetwork {
    Ethereum,
    Sepolia,
    Polygon,
    Bsc,
    Local,
}

impl KnownNetwork {
    pub const ALL: [KnownNetwork; 5] = [
        KnownNetwork::Ethereum,
        KnownNetwork::Sepolia,
        KnownNetwork::Polygon,
        KnownNetwork::Bsc,
        KnownNetwork::Local,
    ];

    pub fn descriptor(self) -> NetworkDescriptor {
        let (name, chain_id, rpc_url, symbol) = match self {
            KnownNetwork::Ethereum => ("ethereum", 1, "https://ethereum-rpc.publicnode.com", "ETH"),
            KnownNetwork::Sepolia => (
                "sepolia",
                11_155_111,
                "https://ethereum-sepolia-rpc.publicnode.com",
                "ETH",
            ),
            KnownNetwork::Polygon => ("polygon", 137, "https://polygon-rpc.com", "POL"),
            KnownNetwork::Bsc => ("bsc", 56, "https://bsc-dataseed.binance.org", "BNB"),
            KnownNetwork::Local => ("local", 31_337, "http://127.0.0.1:8545", "ETH"),
        };

        NetworkDescriptor {
            name: name.to_string(),
            chain_id,
            rpc_url: rpc_url.to_string(),
            curve: Curve::Secp256k1,
            address_encoding: AddressEncoding::Eip55,
            native_symbol: symbol.to_string(),
            native_decimals: 18,
        }
    }

    pub fn parse(name: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|n| n.descriptor().name == name.to_lowercase())
            .ok_or_else(|| {
                VaultError::config(format!(
                    "Invalid network: {}. Supported networks: ethereum, sepolia, polygon, bsc, local",
                    name
                ))
            })
    }
}

/// Everything the signer and balance reader need to know about a chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkDescriptor {
    pub name: String,
    pub chain_id: u64,
    pub rpc_url: String,
    pub curve: Curve,
    pub address_encoding: AddressEncoding,
    pub native_symbol: String,
    pub native_decimals: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssetDescriptor {
    Native,
    Token {
        contract: Address,
        symbol: String,
        decimals: u8,
    },
}

/// A configured coin slot. Slot `i` in [`WalletConfig::coins`] is derived at
/// path index `i`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoinDescriptor {
    pub id: String,
    pub symbol: String,
    pub network: KnownNetwork,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeePolicy {
    pub default_priority: FeePriority,
    pub max_gas_price_gwei: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeePriority {
    Slow,
    Normal,
    Fast,
    Fastest,
}

impl FeePriority {
    /// Percentage applied to the node's suggested gas price.
    pub fn multiplier_percent(self) -> u128 {
        match self {
            FeePriority::Slow => 90,
            FeePriority::Normal => 100,
            FeePriority::Fast => 125,
            FeePriority::Fastest => 150,
        }
    }
}

impl FeePolicy {
    pub fn max_gas_price_wei(&self) -> u128 {
        self.max_gas_price_gwei as u128 * 1_000_000_000
    }

    pub fn apply(&self, suggested: u128) -> Result<u128> {
        let price = suggested.saturating_mul(self.default_priority.multiplier_percent()) / 100;
        let cap = self.max_gas_price_wei();
        if price > cap {
            return Err(VaultError::FeeCapExceeded { price, cap });
        }
        Ok(price)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletConfig {
    pub network: KnownNetwork,
    pub rpc_url: Option<String>,
    pub default_account_count: u32,
    pub word_count: WordCount,
    pub kdf_iterations: u32,
    pub rpc_timeout: Duration,
    pub fee_policy: FeePolicy,
    pub coins: Vec<CoinDescriptor>,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            network: KnownNetwork::Local,
            rpc_url: None,
            default_account_count: 1,
            word_count: WordCount::Twelve,
            kdf_iterations: DEFAULT_KDF_ITERATIONS,
            rpc_timeout: Duration::from_secs(10),
            fee_policy: FeePolicy {
                default_priority: FeePriority::Normal,
                max_gas_price_gwei: 500,
            },
            coins: vec![
                CoinDescriptor {
                    id: "ethereum".to_string(),
                    symbol: "ETH".to_string(),
                    network: KnownNetwork::Ethereum,
                },
                CoinDescriptor {
                    id: "binancecoin".to_string(),
                    symbol: "BNB".to_string(),
                    network: KnownNetwork::Bsc,
                },
                CoinDescriptor {
                    id: "polygon".to_string(),
                    symbol: "POL".to_string(),
                    network: KnownNetwork::Polygon,
                },
            ],
        }
    }
}

impl WalletConfig {
    pub fn new(network: KnownNetwork) -> Self {
        Self {
            network,
            ..Self::default()
        }
    }

    /// Descriptor for the configured network with any RPC override applied.
    pub fn network_descriptor(&self) -> NetworkDescriptor {
        let mut descriptor = self.network.descriptor();
        if let Some(url) = &self.rpc_url {
            descriptor.rpc_url = url.clone();
        }
        descriptor
    }

    pub fn validate(&self) -> Result<()> {
        if self.network_descriptor().rpc_url.trim().is_empty() {
            return Err(VaultError::config("RPC URL cannot be empty"));
        }

        if self.default_account_count == 0 {
            return Err(VaultError::config(
                "Default account count must be greater than 0",
            ));
        }

        if !(MIN_KDF_ITERATIONS..=MAX_KDF_ITERATIONS).contains(&self.kdf_iterations) {
            return Err(VaultError::config(format!(
                "KDF iterations must be between {} and {}",
                MIN_KDF_ITERATIONS, MAX_KDF_ITERATIONS
            )));
        }

        if self.fee_policy.max_gas_price_gwei == 0 {
            return Err(VaultError::config("Max gas price must be greater than 0"));
        }

        let mut seen = HashSet::new();
        for coin in &self.coins {
            if !seen.insert(coin.id.as_str()) {
                return Err(VaultError::config(format!(
                    "Duplicate coin id: {}",
                    coin.id
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(WalletConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rpc_override() {
        let mut config = WalletConfig::new(KnownNetwork::Sepolia);
        assert_eq!(config.network_descriptor().chain_id, 11_155_111);

        config.rpc_url = Some("http://node.internal:8545".to_string());
        let descriptor = config.network_descriptor();
        assert_eq!(descriptor.rpc_url, "http://node.internal:8545");
        assert_eq!(descriptor.chain_id, 11_155_111);

        config.rpc_url = Some("  ".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_kdf_iteration_bounds() {
        let mut config = WalletConfig::default();
        config.kdf_iterations = MIN_KDF_ITERATIONS - 1;
        assert!(matches!(config.validate(), Err(VaultError::Config(_))));

        config.kdf_iterations = MAX_KDF_ITERATIONS + 1;
        assert!(matches!(config.validate(), Err(VaultError::Config(_))));

        config.kdf_iterations = MAX_KDF_ITERATIONS;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_duplicate_coin_ids_rejected() {
        let mut config = WalletConfig::default();
        let first = config.coins[0].clone();
        config.coins.push(first);
        assert!(matches!(config.validate(), Err(VaultError::Config(_))));
    }

    #[test]
    fn test_parse_network() {
        assert_eq!(KnownNetwork::parse("Polygon").unwrap(), KnownNetwork::Polygon);
        assert!(KnownNetwork::parse("solana").is_err());
    }

    #[test]
    fn test_fee_policy() {
        let policy = FeePolicy {
            default_priority: FeePriority::Fast,
            max_gas_price_gwei: 10,
        };
        assert_eq!(policy.apply(4_000_000_000).unwrap(), 5_000_000_000);
        assert!(matches!(
            policy.apply(9_000_000_000),
            Err(VaultError::FeeCapExceeded { .. })
        ));
    }
}
