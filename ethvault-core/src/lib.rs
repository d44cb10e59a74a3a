//! ethvault core - HD wallet key management for Ethereum-family networks
//!
//! BIP-39 phrases, BIP-44 account derivation on `m/44'/60'/0'/0/i`, an
//! in-memory wallet model, transaction signing and balance reads over
//! JSON-RPC. Nothing here touches the filesystem.

pub mod balance;
pub mod error;
pub mod evm;
pub mod rpc;
pub mod types;
pub mod vault;
pub mod wallet;

pub use balance::BalanceReader;
pub use error::{Result, VaultError};
pub use evm::{SignedTransaction, TransactionSigner};
pub use rpc::{HttpTransport, RpcClient, RpcTransport};
pub use types::{format_amount, parse_amount, Balance, TransactionId};
pub use vault::{open_mnemonic, seal_mnemonic, EncryptedMnemonic};
pub use wallet::{
    derive_account, derive_accounts, derive_coin_wallets, derive_path, generate_mnemonic,
    parse_mnemonic, validate_mnemonic, AssetDescriptor, CoinDescriptor, CoinWallet, FeePolicy,
    FeePriority, HdWallet, KnownNetwork, NetworkDescriptor, WalletAccount, WalletConfig,
    WalletSession, WalletState, WordCount,
};

pub use alloy::primitives::{Address, U256};

#[cfg(test)]
pub(crate) mod test_vectors {
    //! Well-known development phrases and their published BIP-44 accounts.

    pub const TEST_JUNK: &str = "test test test test test test test test test test test junk";
    pub const TEST_ABOUT: &str =
        "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";
    pub const BAD_CHECKSUM: &str =
        "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon";

    pub const JUNK_ADDRESS_0: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";
    pub const JUNK_ADDRESS_1: &str = "0x70997970C51812dc3A010C7d01b50e0d17dc79C8";
    pub const JUNK_ADDRESS_2: &str = "0x3C44CdDdB6a900fa2b585dd299e03d12FA4293BC";
    pub const JUNK_PRIVATE_KEY_0: &str =
        "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
    pub const JUNK_PRIVATE_KEY_1: &str =
        "59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d";

    pub const ABOUT_ADDRESS_0: &str = "0x9858EfFD232B4033E47d90003D41EC34EcaEda94";
}
