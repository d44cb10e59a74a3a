use ethvault_core::{EncryptedMnemonic, Result, VaultError};
use std::path::{Path, PathBuf};

const VAULT_FILE: &str = "vault.json";

/// The sealed mnemonic on disk. One wallet per data directory.
pub struct Keystore {
    path: PathBuf,
}

impl Keystore {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join(VAULT_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn exists(&self) -> bool {
        tokio::fs::try_exists(&self.path).await.unwrap_or(false)
    }

    pub async fn save(&self, sealed: &EncryptedMnemonic) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&self.path, sealed.to_json()?).await?;
        tracing::debug!("Wrote vault to {}", self.path.display());
        Ok(())
    }

    /// A missing vault file surfaces as [`VaultError::WalletNotReady`].
    pub async fn load(&self) -> Result<EncryptedMnemonic> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(json) => EncryptedMnemonic::from_json(&json),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(VaultError::WalletNotReady),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn delete(&self) -> Result<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(VaultError::WalletNotReady),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ethvault_core::seal_mnemonic;
    use ethvault_core::wallet::config::MIN_KDF_ITERATIONS;
    use tempfile::tempdir;

    const PHRASE: &str = "test test test test test test test test test test test junk";

    #[tokio::test]
    async fn test_save_load_delete() {
        let dir = tempdir().unwrap();
        let keystore = Keystore::new(&dir.path().join("nested"));
        assert!(!keystore.exists().await);

        let sealed = seal_mnemonic(PHRASE, "pw", MIN_KDF_ITERATIONS).unwrap();
        keystore.save(&sealed).await.unwrap();
        assert!(keystore.exists().await);

        let loaded = keystore.load().await.unwrap();
        assert_eq!(
            ethvault_core::open_mnemonic(&loaded, "pw").unwrap().as_str(),
            PHRASE
        );

        keystore.delete().await.unwrap();
        assert!(!keystore.exists().await);
    }

    #[tokio::test]
    async fn test_missing_vault_is_not_ready() {
        let dir = tempdir().unwrap();
        let keystore = Keystore::new(dir.path());
        assert!(matches!(keystore.load().await, Err(VaultError::WalletNotReady)));
        assert!(matches!(keystore.delete().await, Err(VaultError::WalletNotReady)));
    }

    #[tokio::test]
    async fn test_corrupt_vault_is_serialization_error() {
        let dir = tempdir().unwrap();
        let keystore = Keystore::new(dir.path());
        tokio::fs::write(keystore.path(), "{not json").await.unwrap();
        assert!(matches!(
            keystore.load().await,
            Err(VaultError::Serialization(_))
        ));
    }
}
