use tracing::{debug, warn};
use uuid::Uuid;
use vault_crypto::SealedBlob;
use zeroize::Zeroize;

use crate::container::{WalletContainer, CURRENT_VERSION};
use crate::error::WalletError;
use crate::mnemonic;
use crate::secret::{self, SecretType};
use crate::storage::WalletStorage;

/// Orchestrates container creation, import, and persistence.
///
/// The manager never holds decrypted secret bytes itself; every secret
/// touch happens inside a container operation. Read-then-write sequences
/// (`migrate_containers_if_needed`, the `*_persist` helpers) are not
/// transactional against concurrent external writers: last write wins.
pub struct WalletManager<S: WalletStorage> {
    storage: S,
}

impl<S: WalletStorage> WalletManager<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Creates a container around a freshly generated mnemonic and
    /// attaches its first account.
    pub fn create_wallet(
        &self,
        password: &str,
        name: Option<&str>,
    ) -> Result<WalletContainer, WalletError> {
        if password.is_empty() {
            return Err(WalletError::EmptyPassword);
        }

        let mut phrase = mnemonic::generate_mnemonic()?;
        let sealed = SealedBlob::seal(phrase.as_bytes(), password.as_bytes())
            .map_err(|e| WalletError::EncryptionFailed(e.to_string()));
        phrase.zeroize();

        let mut container = WalletContainer::new(
            generate_identifier(),
            self.resolve_name(name),
            SecretType::Mnemonic,
            sealed?,
        );
        container.add_next_account(password)?;

        debug!(identifier = container.identifier(), "created wallet container");
        Ok(container)
    }

    /// Imports `input` as either a mnemonic or a hex private key.
    ///
    /// The two validators are mutually exclusive; input matching neither
    /// fails with [`WalletError::InvalidInput`].
    pub fn import_wallet(
        &self,
        input: &str,
        password: &str,
        name: Option<&str>,
    ) -> Result<WalletContainer, WalletError> {
        if mnemonic::is_valid_mnemonic(input) {
            self.import_mnemonic(input, password, name)
        } else if secret::is_valid_private_key(input) {
            self.import_private_key(input, password, name)
        } else {
            Err(WalletError::InvalidInput)
        }
    }

    /// Imports a BIP-39 mnemonic. The container starts with an empty
    /// roster; the caller decides which accounts to surface.
    pub fn import_mnemonic(
        &self,
        phrase: &str,
        password: &str,
        name: Option<&str>,
    ) -> Result<WalletContainer, WalletError> {
        if password.is_empty() {
            return Err(WalletError::EmptyPassword);
        }
        if !mnemonic::is_valid_mnemonic(phrase) {
            return Err(WalletError::InvalidMnemonic);
        }

        let sealed = SealedBlob::seal(phrase.as_bytes(), password.as_bytes())
            .map_err(|e| WalletError::EncryptionFailed(e.to_string()))?;

        let container = WalletContainer::new(
            generate_identifier(),
            self.resolve_name(name),
            SecretType::Mnemonic,
            sealed,
        );

        debug!(identifier = container.identifier(), "imported mnemonic wallet");
        Ok(container)
    }

    /// Imports a hex-encoded secp256k1 private key and attaches its
    /// primary account.
    pub fn import_private_key(
        &self,
        private_key: &str,
        password: &str,
        name: Option<&str>,
    ) -> Result<WalletContainer, WalletError> {
        if password.is_empty() {
            return Err(WalletError::EmptyPassword);
        }

        let mut key =
            secret::decode_private_key(private_key).ok_or(WalletError::InvalidPrivateKey)?;
        let sealed = SealedBlob::seal(&key, password.as_bytes())
            .map_err(|e| WalletError::EncryptionFailed(e.to_string()));
        key.zeroize();

        let mut container = WalletContainer::new(
            generate_identifier(),
            self.resolve_name(name),
            SecretType::PrivateKey,
            sealed?,
        );
        container.add_next_account(password)?;

        debug!(identifier = container.identifier(), "imported private-key wallet");
        Ok(container)
    }

    /// Round-trips a previously exported container blob.
    pub fn import_container(&self, data: &[u8]) -> Result<WalletContainer, WalletError> {
        WalletContainer::from_slice(data)
    }

    /// [`create_wallet`] followed by an immediate save; the container is
    /// returned only after persistence succeeded.
    ///
    /// [`create_wallet`]: Self::create_wallet
    pub fn create_wallet_persist(
        &mut self,
        password: &str,
        name: Option<&str>,
    ) -> Result<WalletContainer, WalletError> {
        let container = self.create_wallet(password, name)?;
        self.save(&container)?;
        Ok(container)
    }

    /// [`import_wallet`] followed by an immediate save.
    ///
    /// [`import_wallet`]: Self::import_wallet
    pub fn import_wallet_persist(
        &mut self,
        input: &str,
        password: &str,
        name: Option<&str>,
    ) -> Result<WalletContainer, WalletError> {
        let container = self.import_wallet(input, password, name)?;
        self.save(&container)?;
        Ok(container)
    }

    /// [`import_mnemonic`] followed by an immediate save.
    ///
    /// [`import_mnemonic`]: Self::import_mnemonic
    pub fn import_mnemonic_persist(
        &mut self,
        phrase: &str,
        password: &str,
        name: Option<&str>,
    ) -> Result<WalletContainer, WalletError> {
        let container = self.import_mnemonic(phrase, password, name)?;
        self.save(&container)?;
        Ok(container)
    }

    /// [`import_private_key`] followed by an immediate save.
    ///
    /// [`import_private_key`]: Self::import_private_key
    pub fn import_private_key_persist(
        &mut self,
        private_key: &str,
        password: &str,
        name: Option<&str>,
    ) -> Result<WalletContainer, WalletError> {
        let container = self.import_private_key(private_key, password, name)?;
        self.save(&container)?;
        Ok(container)
    }

    pub fn count(&self) -> usize {
        self.storage.count()
    }

    /// Loads every persisted container, surfacing import failures
    /// per entry. Skipping unparseable entries is the caller's policy
    /// choice, not the manager's.
    pub fn load_all(&self) -> Result<Vec<Result<WalletContainer, WalletError>>, WalletError> {
        let blobs = self.storage.load_all()?;
        Ok(blobs
            .iter()
            .map(|blob| WalletContainer::from_slice(blob))
            .collect())
    }

    pub fn load(&self, identifier: &str) -> Result<Option<WalletContainer>, WalletError> {
        match self.storage.load(identifier)? {
            Some(blob) => Ok(Some(WalletContainer::from_slice(&blob)?)),
            None => Ok(None),
        }
    }

    pub fn save(&mut self, container: &WalletContainer) -> Result<(), WalletError> {
        let blob = container.export()?;
        self.storage.save(container.identifier(), &blob)
    }

    pub fn delete(&mut self, identifier: &str) -> Result<(), WalletError> {
        self.storage.delete(identifier)
    }

    pub fn delete_wallet(&mut self, container: &WalletContainer) -> Result<(), WalletError> {
        self.delete(container.identifier())
    }

    pub fn delete_all(&mut self) -> Result<(), WalletError> {
        self.storage.delete_all()
    }

    /// Re-persists any container whose stored schema version lags the
    /// current one.
    ///
    /// This is the single tolerant path in the core: a container that
    /// fails to import, export, or save is logged and skipped so one
    /// corrupt entry cannot block the rest.
    pub fn migrate_containers_if_needed(&mut self) -> Result<(), WalletError> {
        for blob in self.storage.load_all()? {
            let container = match WalletContainer::from_slice(&blob) {
                Ok(container) => container,
                Err(err) => {
                    warn!(%err, "skipping unparseable container during migration");
                    continue;
                }
            };

            if container.version() == CURRENT_VERSION {
                continue;
            }

            match container.export() {
                Ok(exported) => {
                    if let Err(err) = self.storage.save(container.identifier(), &exported) {
                        warn!(
                            identifier = container.identifier(),
                            %err,
                            "failed to re-save container during migration"
                        );
                    }
                }
                Err(err) => warn!(
                    identifier = container.identifier(),
                    %err,
                    "failed to export container during migration"
                ),
            }
        }
        Ok(())
    }

    fn resolve_name(&self, name: Option<&str>) -> String {
        match name {
            Some(name) => name.to_owned(),
            None => format!("Wallet #{}", self.count() + 1),
        }
    }
}

fn generate_identifier() -> String {
    Uuid::new_v4().to_string()
}
