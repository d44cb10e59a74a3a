use crate::error::{Result, VaultError};
use crate::vault::{EncryptedMnemonic, ENCRYPTION_METHOD, VAULT_VERSION};
use crate::wallet::config::{MAX_KDF_ITERATIONS, MIN_KDF_ITERATIONS};
use crate::wallet::{normalize_phrase, parse_mnemonic};

use bip39::rand::{rngs::OsRng, RngCore};
use chacha20poly1305::{
    aead::{Aead, AeadCore, KeyInit},
    ChaCha20Poly1305, Key, Nonce,
};
use chrono::Utc;
use pbkdf2::pbkdf2_hmac;
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

pub(crate) const SALT_SIZE: usize = 32;
pub(crate) const NONCE_SIZE: usize = 12;

/// Encrypt a validated mnemonic under a password-derived key.
pub fn seal_mnemonic(phrase: &str, password: &str, iterations: u32) -> Result<EncryptedMnemonic> {
    if password.is_empty() {
        return Err(VaultError::vault("Password cannot be empty"));
    }
    check_iterations(iterations)?;

    parse_mnemonic(phrase)?;
    let phrase = normalize_phrase(phrase);

    let mut salt = [0u8; SALT_SIZE];
    OsRng
        .try_fill_bytes(&mut salt)
        .map_err(|e| VaultError::Entropy(e.to_string()))?;

    let key = derive_key(password, &salt, iterations);
    let cipher = ChaCha20Poly1305::new(Key::from_slice(key.as_ref()));
    let nonce = ChaCha20Poly1305::generate_nonce(&mut OsRng);

    let ciphertext = cipher
        .encrypt(&nonce, phrase.as_bytes())
        .map_err(|e| VaultError::vault(format!("Encryption failed: {}", e)))?;

    let checksum = calculate_checksum(&ciphertext);

    Ok(EncryptedMnemonic {
        version: VAULT_VERSION,
        encryption_method: ENCRYPTION_METHOD.to_string(),
        kdf_iterations: iterations,
        salt: salt.to_vec(),
        nonce: nonce.to_vec(),
        ciphertext,
        checksum,
        created_at: Utc::now(),
    })
}

/// Decrypt a sealed mnemonic. The recovered phrase is re-validated.
pub fn open_mnemonic(sealed: &EncryptedMnemonic, password: &str) -> Result<Zeroizing<String>> {
    if password.is_empty() {
        return Err(VaultError::vault("Password cannot be empty"));
    }
    if sealed.version != VAULT_VERSION || sealed.encryption_method != ENCRYPTION_METHOD {
        return Err(VaultError::vault(format!(
            "Unsupported vault format: v{} {}",
            sealed.version, sealed.encryption_method
        )));
    }
    if sealed.salt.len() != SALT_SIZE || sealed.nonce.len() != NONCE_SIZE {
        return Err(VaultError::vault("Vault salt or nonce has the wrong length"));
    }
    check_iterations(sealed.kdf_iterations)?;
    if calculate_checksum(&sealed.ciphertext) != sealed.checksum {
        return Err(VaultError::vault("Vault checksum verification failed"));
    }

    let key = derive_key(password, &sealed.salt, sealed.kdf_iterations);
    let cipher = ChaCha20Poly1305::new(Key::from_slice(key.as_ref()));
    let nonce = Nonce::from_slice(&sealed.nonce);

    let plaintext = Zeroizing::new(
        cipher
            .decrypt(nonce, sealed.ciphertext.as_ref())
            .map_err(|_| {
                VaultError::vault("Decryption failed: wrong password or corrupted vault")
            })?,
    );

    let phrase = std::str::from_utf8(&plaintext)
        .map_err(|_| VaultError::vault("Vault does not contain a UTF-8 phrase"))?;
    parse_mnemonic(phrase)?;

    Ok(Zeroizing::new(phrase.to_string()))
}

fn check_iterations(iterations: u32) -> Result<()> {
    if !(MIN_KDF_ITERATIONS..=MAX_KDF_ITERATIONS).contains(&iterations) {
        return Err(VaultError::vault(format!(
            "KDF iterations {} outside {}..={}",
            iterations, MIN_KDF_ITERATIONS, MAX_KDF_ITERATIONS
        )));
    }
    Ok(())
}

fn derive_key(password: &str, salt: &[u8], iterations: u32) -> Zeroizing<[u8; 32]> {
    let mut key = Zeroizing::new([0u8; 32]);
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, iterations, key.as_mut());
    key
}

fn calculate_checksum(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_vectors::TEST_JUNK;

    const ITERATIONS: u32 = MIN_KDF_ITERATIONS;

    #[test]
    fn test_seal_open() {
        let sealed = seal_mnemonic(TEST_JUNK, "correct horse", ITERATIONS).unwrap();
        let opened = open_mnemonic(&sealed, "correct horse").unwrap();

        assert_eq!(opened.as_str(), TEST_JUNK);
        assert_eq!(sealed.salt.len(), SALT_SIZE);
        assert_eq!(sealed.nonce.len(), NONCE_SIZE);
        assert_eq!(sealed.kdf_iterations, ITERATIONS);
    }

    #[test]
    fn test_salt_and_nonce_are_fresh() {
        let a = seal_mnemonic(TEST_JUNK, "pw", ITERATIONS).unwrap();
        let b = seal_mnemonic(TEST_JUNK, "pw", ITERATIONS).unwrap();
        assert_ne!(a.salt, b.salt);
        assert_ne!(a.ciphertext, b.ciphertext);
    }

    #[test]
    fn test_wrong_password() {
        let sealed = seal_mnemonic(TEST_JUNK, "correct horse", ITERATIONS).unwrap();
        let result = open_mnemonic(&sealed, "battery staple");
        assert!(matches!(result, Err(VaultError::Vault(_))));
    }

    #[test]
    fn test_empty_password_rejected() {
        assert!(matches!(
            seal_mnemonic(TEST_JUNK, "", ITERATIONS),
            Err(VaultError::Vault(_))
        ));
    }

    #[test]
    fn test_tampered_ciphertext() {
        let mut sealed = seal_mnemonic(TEST_JUNK, "pw", ITERATIONS).unwrap();
        sealed.ciphertext[0] ^= 0x01;
        assert!(matches!(open_mnemonic(&sealed, "pw"), Err(VaultError::Vault(_))));

        // Checksum recomputed, so only the AEAD tag catches the edit.
        sealed.checksum = calculate_checksum(&sealed.ciphertext);
        assert!(matches!(open_mnemonic(&sealed, "pw"), Err(VaultError::Vault(_))));
    }

    #[test]
    fn test_invalid_phrase_not_sealed() {
        let result = seal_mnemonic("abandon abandon", "pw", ITERATIONS);
        assert!(matches!(result, Err(VaultError::InvalidMnemonic(_))));
    }

    #[test]
    fn test_iteration_bounds_on_seal() {
        assert!(seal_mnemonic(TEST_JUNK, "pw", 1).is_err());
        assert!(seal_mnemonic(TEST_JUNK, "pw", MAX_KDF_ITERATIONS + 1).is_err());
    }

    #[test]
    fn test_tampered_iteration_count_rejected() {
        let mut sealed = seal_mnemonic(TEST_JUNK, "pw", ITERATIONS).unwrap();

        for bogus in [0, 1, MIN_KDF_ITERATIONS - 1, MAX_KDF_ITERATIONS + 1, u32::MAX] {
            sealed.kdf_iterations = bogus;
            assert!(matches!(open_mnemonic(&sealed, "pw"), Err(VaultError::Vault(_))));
        }

        sealed.kdf_iterations = ITERATIONS;
        assert_eq!(open_mnemonic(&sealed, "pw").unwrap().as_str(), TEST_JUNK);
    }
}
