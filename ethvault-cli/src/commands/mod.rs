pub mod balance;
pub mod transaction;
pub mod wallet;

pub use balance::{handle_balance_command, BalanceCommands};
pub use transaction::{handle_transaction_command, TransactionCommands};
pub use wallet::{handle_wallet_command, WalletCommands};

use crate::config::CliConfig;
use crate::keystore::Keystore;

use dialoguer::Password;
use ethvault_core::{Result, RpcClient, VaultError, WalletConfig, WalletSession};
use std::path::PathBuf;
use zeroize::Zeroizing;

/// Read by [`prompt_password`] before falling back to an interactive prompt.
pub const PASSWORD_ENV: &str = "ETHVAULT_PASSWORD";

/// Shared state for every command: where things live and how to reach the node.
pub struct App {
    pub data_dir: PathBuf,
    pub config: CliConfig,
    pub keystore: Keystore,
}

impl App {
    pub fn new(data_dir: PathBuf, config: CliConfig) -> Self {
        let keystore = Keystore::new(&data_dir);
        Self {
            data_dir,
            config,
            keystore,
        }
    }

    pub fn wallet_config(&self) -> Result<WalletConfig> {
        self.config.wallet_config()
    }

    pub fn rpc(&self) -> Result<RpcClient> {
        let config = self.wallet_config()?;
        RpcClient::http(&config.network_descriptor().rpc_url, config.rpc_timeout)
    }

    /// Load the vault, ask for its password and unlock a fresh session.
    pub async fn unlock_session(&self) -> Result<WalletSession> {
        let sealed = self.keystore.load().await?;
        let session = WalletSession::new(self.wallet_config()?)?;
        let password = prompt_password("Wallet password", false)?;
        session.unlock(&sealed, &password, self.config.account_count.max(1))?;
        Ok(session)
    }
}

pub fn prompt_password(prompt: &str, confirm: bool) -> Result<Zeroizing<String>> {
    if let Ok(password) = std::env::var(PASSWORD_ENV) {
        return Ok(Zeroizing::new(password));
    }

    let mut input = Password::new().with_prompt(prompt);
    if confirm {
        input = input.with_confirmation("Confirm password", "Passwords do not match");
    }
    input
        .interact()
        .map(Zeroizing::new)
        .map_err(|e| VaultError::dialog(e.to_string()))
}
