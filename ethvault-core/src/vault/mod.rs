//! Password-sealed mnemonic storage format.
//!
//! The core never writes the sealed form anywhere; callers decide where the
//! JSON lives.

pub mod encryption;

pub use encryption::{open_mnemonic, seal_mnemonic};

use crate::error::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const VAULT_VERSION: u32 = 1;
pub const ENCRYPTION_METHOD: &str = "ChaCha20Poly1305+PBKDF2-SHA256";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncryptedMnemonic {
    pub version: u32,
    pub encryption_method: String,
    pub kdf_iterations: u32,
    #[serde(with = "base64_bytes")]
    pub salt: Vec<u8>,
    #[serde(with = "base64_bytes")]
    pub nonce: Vec<u8>,
    #[serde(with = "base64_bytes")]
    pub ciphertext: Vec<u8>,
    pub checksum: String,
    pub created_at: DateTime<Utc>,
}

impl EncryptedMnemonic {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

mod base64_bytes {
    use base64::{engine::general_purpose, Engine as _};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&general_purpose::STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        general_purpose::STANDARD
            .decode(encoded)
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_vectors::TEST_JUNK;
    use crate::wallet::config::MIN_KDF_ITERATIONS;

    #[test]
    fn test_json_round_trip_opens() {
        let sealed = seal_mnemonic(TEST_JUNK, "pw", MIN_KDF_ITERATIONS).unwrap();
        let json = sealed.to_json().unwrap();

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(value["salt"].is_string());
        assert!(value["ciphertext"].is_string());

        let restored = EncryptedMnemonic::from_json(&json).unwrap();
        assert_eq!(open_mnemonic(&restored, "pw").unwrap().as_str(), TEST_JUNK);
    }

    #[test]
    fn test_bad_base64_is_serialization_error() {
        let sealed = seal_mnemonic(TEST_JUNK, "pw", MIN_KDF_ITERATIONS).unwrap();
        let mut value: serde_json::Value =
            serde_json::from_str(&sealed.to_json().unwrap()).unwrap();
        value["nonce"] = serde_json::json!("%%%");

        let result = EncryptedMnemonic::from_json(&value.to_string());
        assert!(matches!(result, Err(crate::error::VaultError::Serialization(_))));
    }
}
