use thiserror::Error;

pub type Result<T> = std::result::Result<T, VaultError>;

#[derive(Error, Debug)]
pub enum VaultError {
    #[error("Invalid mnemonic: {0}")]
    InvalidMnemonic(String),

    #[error("Key derivation failed: {0}")]
    Derivation(String),

    #[error("Network unavailable: {0}")]
    NetworkUnavailable(String),

    #[error("Transaction rejected by node: {0}")]
    Rejected(String),

    #[error("Insufficient funds: need {need}, have {available}")]
    InsufficientFunds { need: String, available: String },

    #[error("Invalid recipient: {0}")]
    InvalidRecipient(String),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Gas price {price} wei exceeds cap of {cap} wei")]
    FeeCapExceeded { price: u128, cap: u128 },

    #[error("Wallet is not initialized")]
    WalletNotReady,

    #[error("Account not found: {index}")]
    AccountNotFound { index: u32 },

    #[error("Entropy source failure: {0}")]
    Entropy(String),

    #[error("Vault error: {0}")]
    Vault(String),

    #[error("Malformed RPC response: {0}")]
    Rpc(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Dialog error: {0}")]
    Dialog(String),
}

impl VaultError {
    pub fn invalid_mnemonic(msg: impl Into<String>) -> Self {
        Self::InvalidMnemonic(msg.into())
    }

    pub fn derivation(msg: impl Into<String>) -> Self {
        Self::Derivation(msg.into())
    }

    pub fn network_unavailable(msg: impl Into<String>) -> Self {
        Self::NetworkUnavailable(msg.into())
    }

    pub fn rejected(msg: impl Into<String>) -> Self {
        Self::Rejected(msg.into())
    }

    pub fn invalid_recipient(msg: impl Into<String>) -> Self {
        Self::InvalidRecipient(msg.into())
    }

    pub fn vault(msg: impl Into<String>) -> Self {
        Self::Vault(msg.into())
    }

    pub fn rpc(msg: impl Into<String>) -> Self {
        Self::Rpc(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn dialog(msg: impl Into<String>) -> Self {
        Self::Dialog(msg.into())
    }

    /// Only transport failures are safe to retry. A node rejection is final.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::NetworkUnavailable(_))
    }
}
