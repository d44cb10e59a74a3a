pub mod config;
pub mod derivation;
pub mod instance;
pub mod manager;

pub use config::{
    AssetDescriptor, CoinDescriptor, FeePolicy, FeePriority, KnownNetwork, NetworkDescriptor,
    WalletConfig,
};
pub use derivation::{
    derive_account, derive_accounts, derive_coin_wallets, derive_path, CoinWallet, WalletAccount,
};
pub use instance::HdWallet;
pub use manager::{WalletSession, WalletState};

use crate::error::{Result, VaultError};
use bip39::rand::{rngs::OsRng, RngCore};
use bip39::{Language, Mnemonic};
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, Zeroizing};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WordCount {
    Twelve,
    Fifteen,
    Eighteen,
    TwentyOne,
    TwentyFour,
}

impl WordCount {
    pub const fn words(self) -> usize {
        match self {
            WordCount::Twelve => 12,
            WordCount::Fifteen => 15,
            WordCount::Eighteen => 18,
            WordCount::TwentyOne => 21,
            WordCount::TwentyFour => 24,
        }
    }

    pub const fn entropy_bytes(self) -> usize {
        self.words() * 4 / 3
    }

    pub fn from_words(words: usize) -> Result<Self> {
        match words {
            12 => Ok(WordCount::Twelve),
            15 => Ok(WordCount::Fifteen),
            18 => Ok(WordCount::Eighteen),
            21 => Ok(WordCount::TwentyOne),
            24 => Ok(WordCount::TwentyFour),
            n => Err(VaultError::config(format!(
                "Unsupported word count: {}. Use 12, 15, 18, 21 or 24",
                n
            ))),
        }
    }
}

impl Default for WordCount {
    fn default() -> Self {
        WordCount::Twelve
    }
}

/// Generate a fresh English BIP-39 phrase from OS entropy.
///
/// An entropy failure is returned as [`VaultError::Entropy`]; there is no
/// fallback source.
pub fn generate_mnemonic(word_count: WordCount) -> Result<Zeroizing<String>> {
    let mut entropy = [0u8; 32];
    let len = word_count.entropy_bytes();

    OsRng
        .try_fill_bytes(&mut entropy[..len])
        .map_err(|e| VaultError::Entropy(e.to_string()))?;

    let result = Mnemonic::from_entropy_in(Language::English, &entropy[..len]);
    entropy.zeroize();

    let mut mnemonic = result
        .map_err(|e| VaultError::internal(format!("Failed to generate mnemonic: {}", e)))?;
    let phrase = Zeroizing::new(mnemonic.to_string());
    mnemonic.zeroize();

    Ok(phrase)
}

pub fn validate_mnemonic(phrase: &str) -> bool {
    parse_mnemonic(phrase).is_ok()
}

/// Parse and checksum-verify a phrase. Whitespace and case are normalized first.
pub fn parse_mnemonic(phrase: &str) -> Result<Mnemonic> {
    let normalized = normalize_phrase(phrase);

    Mnemonic::parse_in(Language::English, normalized.as_str()).map_err(|e| {
        let reason = match e {
            bip39::Error::BadWordCount(n) => {
                format!("expected 12, 15, 18, 21 or 24 words, got {}", n)
            }
            bip39::Error::UnknownWord(i) => format!("word #{} is not in the wordlist", i + 1),
            bip39::Error::InvalidChecksum => "checksum mismatch".to_string(),
            other => other.to_string(),
        };
        VaultError::invalid_mnemonic(reason)
    })
}

pub(crate) fn normalize_phrase(phrase: &str) -> Zeroizing<String> {
    Zeroizing::new(
        phrase
            .split_whitespace()
            .map(|w| w.to_lowercase())
            .collect::<Vec<_>>()
            .join(" "),
    )
}

/// 64-byte BIP-39 seed for a validated phrase, empty passphrase.
pub(crate) fn mnemonic_to_seed(phrase: &str) -> Result<Zeroizing<[u8; 64]>> {
    let mut mnemonic = parse_mnemonic(phrase)?;
    let seed = Zeroizing::new(mnemonic.to_seed(""));
    mnemonic.zeroize();
    Ok(seed)
}
