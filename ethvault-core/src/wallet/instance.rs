use crate::error::{Result, VaultError};
use crate::wallet::config::CoinDescriptor;
use crate::wallet::derivation::{coin_wallets_from_seed, AccountDeriver};
use crate::wallet::{mnemonic_to_seed, normalize_phrase, CoinWallet, WalletAccount};

use std::fmt;
use zeroize::{Zeroize, Zeroizing};

/// An in-memory HD wallet: the phrase, its seed and an append-only list of
/// accounts where `accounts[i].index() == i`.
///
/// Secrets live in zeroizing buffers and are scrubbed on [`HdWallet::wipe`]
/// or drop.
pub struct HdWallet {
    mnemonic: Zeroizing<String>,
    seed: Zeroizing<[u8; 64]>,
    accounts: Vec<WalletAccount>,
    selected: usize,
}

impl fmt::Debug for HdWallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HdWallet")
            .field("accounts", &self.accounts.len())
            .field("selected", &self.selected)
            .finish_non_exhaustive()
    }
}

impl HdWallet {
    /// Build a wallet from a freshly generated phrase.
    pub fn create(mnemonic: &str, account_count: u32) -> Result<Self> {
        Self::from_phrase(mnemonic, account_count)
    }

    /// Build a wallet from a phrase the user already holds.
    pub fn recover(mnemonic: &str, account_count: u32) -> Result<Self> {
        let wallet = Self::from_phrase(mnemonic, account_count)?;
        tracing::info!("Recovered wallet with {} accounts", wallet.accounts.len());
        Ok(wallet)
    }

    fn from_phrase(mnemonic: &str, account_count: u32) -> Result<Self> {
        let seed = mnemonic_to_seed(mnemonic)?;
        let accounts = AccountDeriver::from_seed(seed.as_ref())?.derive_range(account_count)?;

        Ok(Self {
            mnemonic: normalize_phrase(mnemonic),
            seed,
            accounts,
            selected: 0,
        })
    }

    /// Derive the account at the next unused index and append it.
    pub fn add_account(&mut self) -> Result<&WalletAccount> {
        if self.is_wiped() {
            return Err(VaultError::WalletNotReady);
        }
        let next = u32::try_from(self.accounts.len())
            .map_err(|_| VaultError::derivation("Account index space exhausted"))?;

        let account = AccountDeriver::from_seed(self.seed.as_ref())?.derive(next)?;
        self.accounts.push(account);
        tracing::debug!("Added account #{}", next);

        Ok(&self.accounts[self.accounts.len() - 1])
    }

    /// Point at an already derived account. Never derives.
    pub fn select_account(&mut self, index: u32) -> Result<&WalletAccount> {
        let slot = index as usize;
        if slot >= self.accounts.len() {
            return Err(VaultError::AccountNotFound { index });
        }
        self.selected = slot;
        Ok(&self.accounts[slot])
    }

    /// `None` only for a wallet created with zero accounts.
    pub fn selected_account(&self) -> Option<&WalletAccount> {
        self.accounts.get(self.selected)
    }

    pub fn selected_index(&self) -> Option<u32> {
        self.selected_account().map(WalletAccount::index)
    }

    pub fn accounts(&self) -> &[WalletAccount] {
        &self.accounts
    }

    pub fn mnemonic(&self) -> &str {
        &self.mnemonic
    }

    pub fn coin_wallets(&self, coins: &[CoinDescriptor]) -> Result<Vec<CoinWallet>> {
        if self.is_wiped() {
            return Err(VaultError::WalletNotReady);
        }
        coin_wallets_from_seed(self.seed.as_ref(), coins)
    }

    pub fn is_wiped(&self) -> bool {
        self.mnemonic.is_empty()
    }

    /// Scrub the phrase, the seed and every derived key, leaving an empty wallet.
    pub fn wipe(&mut self) {
        self.mnemonic.zeroize();
        self.seed.zeroize();
        // Dropping each account zeroizes its private key buffer.
        self.accounts.clear();
        self.selected = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_vectors::*;
    use crate::wallet::{derive_account, derive_accounts, generate_mnemonic, WordCount};

    #[test]
    fn test_monotonic_account_growth() {
        let mut wallet = HdWallet::create(TEST_JUNK, 1).unwrap();
        for _ in 0..3 {
            wallet.add_account().unwrap();
        }

        let indices: Vec<u32> = wallet.accounts().iter().map(|a| a.index()).collect();
        assert_eq!(indices, vec![0, 1, 2, 3]);

        for i in 0..2 {
            let direct = derive_account(TEST_JUNK, i).unwrap();
            let held = &wallet.accounts()[i as usize];
            assert_eq!(held.address(), direct.address());
            assert_eq!(held.private_key(), direct.private_key());
        }
    }

    #[test]
    fn test_create_matches_recover() {
        let phrase = generate_mnemonic(WordCount::Twelve).unwrap();
        for n in 0..5 {
            let created = HdWallet::create(&phrase, n).unwrap();
            let recovered = HdWallet::recover(&phrase, n).unwrap();
            let direct = derive_accounts(&phrase, n).unwrap();

            assert_eq!(created.accounts().len(), n as usize);
            for ((a, b), c) in created
                .accounts()
                .iter()
                .zip(recovered.accounts())
                .zip(&direct)
            {
                assert_eq!(a.address(), b.address());
                assert_eq!(a.address(), c.address());
            }
        }
    }

    #[test]
    fn test_recover_rejects_bad_checksum() {
        let err = HdWallet::recover(BAD_CHECKSUM, 1).unwrap_err();
        assert!(matches!(err, VaultError::InvalidMnemonic(_)));
    }

    #[test]
    fn test_select_account() {
        let mut wallet = HdWallet::create(TEST_JUNK, 3).unwrap();
        assert_eq!(wallet.selected_index(), Some(0));

        let selected = wallet.select_account(2).unwrap();
        assert_eq!(selected.address_string(), JUNK_ADDRESS_2);
        assert_eq!(wallet.selected_index(), Some(2));
        assert_eq!(wallet.accounts().len(), 3);

        let err = wallet.select_account(3).unwrap_err();
        assert!(matches!(err, VaultError::AccountNotFound { index: 3 }));
        assert_eq!(wallet.selected_index(), Some(2));
    }

    #[test]
    fn test_zero_accounts() {
        let mut wallet = HdWallet::create(TEST_JUNK, 0).unwrap();
        assert!(wallet.selected_account().is_none());

        let first = wallet.add_account().unwrap();
        assert_eq!(first.address_string(), JUNK_ADDRESS_0);
    }

    #[test]
    fn test_mnemonic_is_normalized() {
        let messy = format!("  {}  ", TEST_JUNK.to_uppercase());
        let wallet = HdWallet::recover(&messy, 1).unwrap();
        assert_eq!(wallet.mnemonic(), TEST_JUNK);
    }

    #[test]
    fn test_wipe() {
        let mut wallet = HdWallet::create(TEST_JUNK, 2).unwrap();
        wallet.wipe();

        assert!(wallet.mnemonic().is_empty());
        assert!(wallet.accounts().is_empty());
        assert!(wallet.selected_account().is_none());
        assert!(matches!(wallet.add_account(), Err(VaultError::WalletNotReady)));
    }

    #[test]
    fn test_debug_hides_secrets() {
        let wallet = HdWallet::create(TEST_JUNK, 1).unwrap();
        let debug = format!("{:?}", wallet);
        assert!(!debug.contains("junk"));
    }
}
