use crate::error::{Result, VaultError};
use crate::evm::TransactionSigner;
use crate::types::TransactionId;
use crate::vault::{open_mnemonic, seal_mnemonic, EncryptedMnemonic};
use crate::wallet::{
    generate_mnemonic, AssetDescriptor, CoinWallet, HdWallet, WalletAccount, WalletConfig,
    WordCount,
};

use alloy::primitives::U256;
use parking_lot::RwLock;
use zeroize::Zeroizing;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalletState {
    Uninitialized,
    Ready,
}

/// The single live wallet of a user session.
///
/// Holds at most one [`HdWallet`]. Every operation except creation fails
/// with [`VaultError::WalletNotReady`] until a wallet is generated,
/// recovered or unlocked.
pub struct WalletSession {
    config: WalletConfig,
    wallet: RwLock<Option<HdWallet>>,
}

impl WalletSession {
    pub fn new(config: WalletConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            wallet: RwLock::new(None),
        })
    }

    pub fn config(&self) -> &WalletConfig {
        &self.config
    }

    pub fn state(&self) -> WalletState {
        match self.wallet.read().as_ref() {
            Some(_) => WalletState::Ready,
            None => WalletState::Uninitialized,
        }
    }

    /// Generate a new phrase, install the wallet and hand the phrase back
    /// for the user to record.
    pub fn generate(&self, word_count: WordCount, account_count: u32) -> Result<Zeroizing<String>> {
        let phrase = generate_mnemonic(word_count)?;
        let wallet = HdWallet::create(&phrase, account_count)?;
        self.install(wallet);
        tracing::info!("Generated {}-word wallet", word_count.words());
        Ok(phrase)
    }

    pub fn recover(&self, phrase: &str, account_count: u32) -> Result<()> {
        let wallet = HdWallet::recover(phrase, account_count)?;
        self.install(wallet);
        Ok(())
    }

    /// Open a sealed phrase and install the wallet it describes.
    pub fn unlock(
        &self,
        sealed: &EncryptedMnemonic,
        password: &str,
        account_count: u32,
    ) -> Result<()> {
        let phrase = open_mnemonic(sealed, password)?;
        let wallet = HdWallet::recover(&phrase, account_count)?;
        self.install(wallet);
        tracing::info!("Unlocked wallet");
        Ok(())
    }

    /// Seal the current phrase under `password` with the configured KDF cost.
    pub fn seal(&self, password: &str) -> Result<EncryptedMnemonic> {
        let guard = self.wallet.read();
        let wallet = guard.as_ref().ok_or(VaultError::WalletNotReady)?;
        seal_mnemonic(wallet.mnemonic(), password, self.config.kdf_iterations)
    }

    /// Count-then-derive happens under one write lock, so concurrent callers
    /// always receive distinct consecutive indices.
    pub fn add_account(&self) -> Result<WalletAccount> {
        let mut guard = self.wallet.write();
        let wallet = guard.as_mut().ok_or(VaultError::WalletNotReady)?;
        wallet.add_account().cloned()
    }

    pub fn select_account(&self, index: u32) -> Result<WalletAccount> {
        let mut guard = self.wallet.write();
        let wallet = guard.as_mut().ok_or(VaultError::WalletNotReady)?;
        wallet.select_account(index).cloned()
    }

    pub fn current_account(&self) -> Result<WalletAccount> {
        let guard = self.wallet.read();
        let wallet = guard.as_ref().ok_or(VaultError::WalletNotReady)?;
        wallet
            .selected_account()
            .cloned()
            .ok_or(VaultError::AccountNotFound { index: 0 })
    }

    pub fn accounts(&self) -> Result<Vec<WalletAccount>> {
        let guard = self.wallet.read();
        let wallet = guard.as_ref().ok_or(VaultError::WalletNotReady)?;
        Ok(wallet.accounts().to_vec())
    }

    /// One wallet per configured coin, coin `i` at path index `i`.
    pub fn coin_wallets(&self) -> Result<Vec<CoinWallet>> {
        let guard = self.wallet.read();
        let wallet = guard.as_ref().ok_or(VaultError::WalletNotReady)?;
        wallet.coin_wallets(&self.config.coins)
    }

    /// Sign with the selected account and submit. The account is copied out
    /// of the lock before any network await.
    pub async fn sign_and_send(
        &self,
        signer: &TransactionSigner,
        recipient: &str,
        amount: U256,
        asset: &AssetDescriptor,
    ) -> Result<TransactionId> {
        let account = self.current_account()?;
        signer.sign_and_send(&account, recipient, amount, asset).await
    }

    /// Scrub the wallet and return to `Uninitialized`.
    pub fn clear(&self) {
        let mut guard = self.wallet.write();
        if let Some(mut wallet) = guard.take() {
            wallet.wipe();
            tracing::info!("Wallet session cleared");
        }
    }

    fn install(&self, wallet: HdWallet) {
        let mut guard = self.wallet.write();
        if let Some(mut previous) = guard.replace(wallet) {
            previous.wipe();
        }
    }
}
