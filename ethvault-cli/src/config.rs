use ethvault_core::wallet::config::DEFAULT_KDF_ITERATIONS;
use ethvault_core::{FeePriority, KnownNetwork, Result, WalletConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub network: KnownNetwork,
    pub rpc_url: Option<String>,
    /// Accounts derived every time the wallet is unlocked.
    pub account_count: u32,
    pub kdf_iterations: u32,
    pub fee_priority: FeePriority,
    pub max_gas_price_gwei: u64,
}

impl Default for CliConfig {
    fn default() -> Self {
        let wallet = WalletConfig::default();
        Self {
            network: wallet.network,
            rpc_url: None,
            account_count: wallet.default_account_count,
            kdf_iterations: DEFAULT_KDF_ITERATIONS,
            fee_priority: wallet.fee_policy.default_priority,
            max_gas_price_gwei: wallet.fee_policy.max_gas_price_gwei,
        }
    }
}

impl CliConfig {
    pub fn default_data_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("ethvault")
    }

    /// Missing file means defaults.
    pub async fn load(data_dir: &Path) -> Result<Self> {
        let path = data_dir.join(CONFIG_FILE);
        match tokio::fs::read_to_string(&path).await {
            Ok(json) => Ok(serde_json::from_str(&json)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn save(&self, data_dir: &Path) -> Result<()> {
        tokio::fs::create_dir_all(data_dir).await?;
        let json = serde_json::to_string_pretty(self)?;
        tokio::fs::write(data_dir.join(CONFIG_FILE), json).await?;
        Ok(())
    }

    pub fn wallet_config(&self) -> Result<WalletConfig> {
        let mut config = WalletConfig::new(self.network);
        config.rpc_url = self.rpc_url.clone();
        config.default_account_count = self.account_count.max(1);
        config.kdf_iterations = self.kdf_iterations;
        config.fee_policy.default_priority = self.fee_priority;
        config.fee_policy.max_gas_price_gwei = self.max_gas_price_gwei;
        config.validate()?;
        Ok(config)
    }
}
