use crate::error::{Result, VaultError};
use crate::evm::address::address_from_public_key;
use crate::wallet::config::{CoinDescriptor, KnownNetwork};
use crate::wallet::mnemonic_to_seed;

use alloy::primitives::Address;
use bitcoin::bip32::{ChildNumber, DerivationPath, Xpriv};
use bitcoin::secp256k1::{All, PublicKey, Secp256k1};
use bitcoin::Network;
use std::fmt;
use std::str::FromStr;
use zeroize::Zeroizing;

pub const PURPOSE: u32 = 44;
pub const COIN_TYPE_ETH: u32 = 60;
pub const ACCOUNT: u32 = 0;
pub const CHANGE: u32 = 0;

/// `DerivationPath`'s `Display` drops the leading `m`.
pub fn render_path(path: &DerivationPath) -> String {
    if path.as_ref().is_empty() {
        return "m".to_string();
    }
    format!("m/{}", path)
}

/// `m/44'/60'/0'/0/{index}`
pub fn account_path(index: u32) -> Result<DerivationPath> {
    let mut children = prefix_children()?;
    children.push(normal(index)?);
    Ok(DerivationPath::from(children))
}

fn prefix_children() -> Result<Vec<ChildNumber>> {
    Ok(vec![
        hardened(PURPOSE)?,
        hardened(COIN_TYPE_ETH)?,
        hardened(ACCOUNT)?,
        normal(CHANGE)?,
    ])
}

fn prefix_path() -> Result<DerivationPath> {
    Ok(DerivationPath::from(prefix_children()?))
}

fn hardened(index: u32) -> Result<ChildNumber> {
    ChildNumber::from_hardened_idx(index)
        .map_err(|e| VaultError::derivation(format!("Invalid hardened index {}: {}", index, e)))
}

fn normal(index: u32) -> Result<ChildNumber> {
    ChildNumber::from_normal_idx(index)
        .map_err(|e| VaultError::derivation(format!("Index {} out of range: {}", index, e)))
}

/// One derived keypair. The private key is wiped when the account drops.
#[derive(Clone)]
pub struct WalletAccount {
    index: u32,
    path: DerivationPath,
    address: Address,
    private_key: Zeroizing<[u8; 32]>,
    public_key: PublicKey,
}

impl fmt::Debug for WalletAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalletAccount")
            .field("index", &self.index)
            .field("path", &render_path(&self.path))
            .field("address", &self.address)
            .field("private_key", &"[REDACTED]")
            .finish()
    }
}

impl WalletAccount {
    fn from_xpriv(secp: &Secp256k1<All>, index: u32, path: DerivationPath, key: &Xpriv) -> Self {
        let public_key = key.private_key.public_key(secp);
        Self {
            index,
            path,
            address: address_from_public_key(&public_key),
            private_key: Zeroizing::new(key.private_key.secret_bytes()),
            public_key,
        }
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn path(&self) -> &DerivationPath {
        &self.path
    }

    /// BIP-32 notation with the master prefix, e.g. `m/44'/60'/0'/0/3`.
    pub fn path_string(&self) -> String {
        render_path(&self.path)
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// EIP-55 rendering of [`Self::address`].
    pub fn address_string(&self) -> String {
        self.address.to_checksum(None)
    }

    pub fn private_key(&self) -> &[u8; 32] {
        &self.private_key
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }
}

/// Per-coin wallet. Coin slot `i` lives at path index `i`.
#[derive(Clone)]
pub struct CoinWallet {
    pub coin_id: String,
    pub symbol: String,
    pub network: KnownNetwork,
    pub account: WalletAccount,
}

impl fmt::Debug for CoinWallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CoinWallet")
            .field("coin_id", &self.coin_id)
            .field("symbol", &self.symbol)
            .field("network", &self.network)
            .field("account", &self.account)
            .finish()
    }
}

impl CoinWallet {
    pub fn address(&self) -> Address {
        self.account.address()
    }

    pub fn private_key(&self) -> &[u8; 32] {
        self.account.private_key()
    }
}

/// Keys derived up to `m/44'/60'/0'/0`, ready to fan out per index.
pub(crate) struct AccountDeriver {
    secp: Secp256k1<All>,
    base: Xpriv,
}

impl AccountDeriver {
    pub(crate) fn from_seed(seed: &[u8]) -> Result<Self> {
        let secp = Secp256k1::new();
        let master = master_key(seed)?;
        let base = master
            .derive_priv(&secp, &prefix_path()?)
            .map_err(|e| {
                VaultError::derivation(format!("Failed to derive account prefix: {}", e))
            })?;
        Ok(Self { secp, base })
    }

    pub(crate) fn derive(&self, index: u32) -> Result<WalletAccount> {
        let child = self
            .base
            .derive_priv(&self.secp, &[normal(index)?])
            .map_err(|e| {
                VaultError::derivation(format!("Failed to derive child {}: {}", index, e))
            })?;
        Ok(WalletAccount::from_xpriv(
            &self.secp,
            index,
            account_path(index)?,
            &child,
        ))
    }

    pub(crate) fn derive_range(&self, count: u32) -> Result<Vec<WalletAccount>> {
        (0..count).map(|i| self.derive(i)).collect()
    }
}

fn master_key(seed: &[u8]) -> Result<Xpriv> {
    Xpriv::new_master(Network::Bitcoin, seed)
        .map_err(|e| VaultError::derivation(format!("Failed to derive master key: {}", e)))
}

/// Accounts `0..count` on `m/44'/60'/0'/0/i`. `count == 0` is an empty list.
pub fn derive_accounts(mnemonic: &str, count: u32) -> Result<Vec<WalletAccount>> {
    let seed = mnemonic_to_seed(mnemonic)?;
    let accounts = AccountDeriver::from_seed(seed.as_ref())?.derive_range(count)?;
    tracing::debug!("Derived {} accounts", accounts.len());
    Ok(accounts)
}

pub fn derive_account(mnemonic: &str, index: u32) -> Result<WalletAccount> {
    let seed = mnemonic_to_seed(mnemonic)?;
    AccountDeriver::from_seed(seed.as_ref())?.derive(index)
}

/// Derive an arbitrary BIP-32 path such as `m/44'/60'/1'/0/3`. The trailing
/// child number is reported as the account index.
pub fn derive_path(mnemonic: &str, path: &str) -> Result<WalletAccount> {
    let path = DerivationPath::from_str(path)
        .map_err(|e| VaultError::derivation(format!("Invalid derivation path '{}': {}", path, e)))?;

    let seed = mnemonic_to_seed(mnemonic)?;
    let secp = Secp256k1::new();
    let key = master_key(seed.as_ref())?
        .derive_priv(&secp, &path)
        .map_err(|e| {
            VaultError::derivation(format!("Failed to derive {}: {}", render_path(&path), e))
        })?;

    let index = match path.as_ref().last() {
        Some(ChildNumber::Normal { index }) | Some(ChildNumber::Hardened { index }) => *index,
        None => 0,
    };

    Ok(WalletAccount::from_xpriv(&secp, index, path, &key))
}

/// Coin `i` of `coins` gets path index `i`; every coin shares the
/// secp256k1/Keccak address scheme regardless of its chain family.
pub fn derive_coin_wallets(mnemonic: &str, coins: &[CoinDescriptor]) -> Result<Vec<CoinWallet>> {
    let seed = mnemonic_to_seed(mnemonic)?;
    coin_wallets_from_seed(seed.as_ref(), coins)
}

pub(crate) fn coin_wallets_from_seed(
    seed: &[u8],
    coins: &[CoinDescriptor],
) -> Result<Vec<CoinWallet>> {
    let deriver = AccountDeriver::from_seed(seed)?;
    coins
        .iter()
        .enumerate()
        .map(|(i, coin)| {
            let index = u32::try_from(i)
                .map_err(|_| VaultError::derivation(format!("Coin slot {} out of range", i)))?;
            Ok(CoinWallet {
                coin_id: coin.id.clone(),
                symbol: coin.symbol.clone(),
                network: coin.network,
                account: deriver.derive(index)?,
            })
        })
        .collect()
}
