use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use vault_crypto::{CryptoError, SealedBlob};
use zeroize::Zeroizing;

use crate::account::WalletAccount;
use crate::derivation;
use crate::error::WalletError;
use crate::mnemonic;
use crate::secret::{DecryptedSecret, SecretType};
use crate::signer::{self, SignerInput};

/// Current exchange-format schema version.
pub const CURRENT_VERSION: u32 = 1;

/// A password-gated wallet: one sealed secret plus its derived accounts.
///
/// Every secret-derived operation decrypts within the call and discards
/// the plaintext before returning; the sealed blob is the only long-lived
/// copy. Password correctness is only ever established by the decrypt
/// itself succeeding, so a wrong password and a corrupted blob are
/// indistinguishable beyond their error kinds.
///
/// Shared-container mutation (add/remove account) is not synchronized
/// internally; callers holding one container across threads must serialize
/// access themselves.
#[derive(Debug, Clone)]
pub struct WalletContainer {
    identifier: String,
    name: String,
    version: u32,
    secret_type: SecretType,
    sealed: SealedBlob,
    accounts: Vec<WalletAccount>,
}

/// The exchange-format record, inverse of [`WalletContainer::export`].
#[derive(Serialize, Deserialize)]
struct ContainerRecord {
    identifier: String,
    version: u32,
    #[serde(default)]
    name: String,
    wallet: SecretRecord,
    #[serde(default)]
    accounts: Vec<WalletAccount>,
}

#[derive(Serialize, Deserialize)]
struct SecretRecord {
    #[serde(rename = "type")]
    secret_type: SecretType,
    #[serde(flatten)]
    sealed: SealedBlob,
}

impl WalletContainer {
    /// Imports a container from its exported exchange-format bytes.
    pub fn from_slice(data: &[u8]) -> Result<Self, WalletError> {
        let record: ContainerRecord = serde_json::from_slice(data)
            .map_err(|e| WalletError::MalformedContainer(e.to_string()))?;

        let mut container = Self {
            identifier: record.identifier,
            name: record.name,
            version: record.version,
            secret_type: record.wallet.secret_type,
            sealed: record.wallet.sealed,
            accounts: record.accounts,
        };
        container.migrate_version_if_needed();
        Ok(container)
    }

    pub(crate) fn new(
        identifier: String,
        name: String,
        secret_type: SecretType,
        sealed: SealedBlob,
    ) -> Self {
        let mut container = Self {
            identifier,
            name,
            version: CURRENT_VERSION,
            secret_type,
            sealed,
            accounts: Vec::new(),
        };
        container.migrate_version_if_needed();
        container
    }

    /// Forward-compatibility hook run on every load. `version` is reserved;
    /// no migration exists yet.
    fn migrate_version_if_needed(&mut self) {}

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn secret_type(&self) -> SecretType {
        self.secret_type
    }

    /// The account roster in display (insertion) order.
    pub fn accounts(&self) -> &[WalletAccount] {
        &self.accounts
    }

    /// Canonical derivation path for an account index.
    pub fn derivation_path(&self, account_index: u32) -> String {
        derivation::derivation_path(account_index)
    }

    /// Derives the account for an explicit derivation path.
    pub fn derive_account(
        &self,
        derivation_path: &str,
        password: &str,
    ) -> Result<WalletAccount, WalletError> {
        let path = derivation::parse_path(derivation_path)?;
        let index = derivation::address_index(&path)?;

        self.with_seed(password, |seed| {
            let key = derivation::private_key_from_seed(seed, &path)?;
            Ok(WalletAccount {
                address: derivation::address_for_key(&key)?,
                index: Some(index),
                derivation_path: Some(path.to_string()),
            })
        })
    }

    /// Derives the account at a BIP-44 address index.
    pub fn derive_account_at(
        &self,
        account_index: u32,
        password: &str,
    ) -> Result<WalletAccount, WalletError> {
        self.derive_account(&self.derivation_path(account_index), password)
    }

    /// Derives the inclusive index range in one pass.
    ///
    /// The secret is decrypted once and the account-level extended key is
    /// derived once, so scanning a large range does not repeat the KDF per
    /// index. Fails atomically: a wrong password yields no partial results.
    pub fn derive_accounts(
        &self,
        from_index: u32,
        to_index: u32,
        password: &str,
    ) -> Result<Vec<WalletAccount>, WalletError> {
        self.with_seed(password, |seed| {
            let account_key = derivation::account_xprv(seed)?;
            let mut accounts =
                Vec::with_capacity((to_index.saturating_sub(from_index) as usize) + 1);

            for index in from_index..=to_index {
                let key = derivation::child_private_key(&account_key, index)?;
                accounts.push(WalletAccount {
                    address: derivation::address_for_key(&key)?,
                    index: Some(index),
                    derivation_path: Some(derivation::derivation_path(index)),
                });
            }
            Ok(accounts)
        })
    }

    /// The container's primary account: the sole key of a private-key
    /// container (no index, no path), or index 0 of a mnemonic container.
    pub fn derive_primary_account(&self, password: &str) -> Result<WalletAccount, WalletError> {
        match self.secret_type {
            SecretType::PrivateKey => self.with_decrypted_secret(password, |secret| {
                let DecryptedSecret::PrivateKey(key) = secret else {
                    return Err(WalletError::WrongContainerType);
                };
                Ok(WalletAccount {
                    address: derivation::address_for_key(key)?,
                    index: None,
                    derivation_path: None,
                })
            }),
            SecretType::Mnemonic => self.derive_account_at(0, password),
        }
    }

    /// Derives and appends the account for `derivation_path`.
    ///
    /// Mnemonic containers reject a path that is already on the roster;
    /// private-key containers always replace their single entry with the
    /// freshly derived primary account.
    pub fn add_account(
        &mut self,
        derivation_path: &str,
        password: &str,
    ) -> Result<WalletAccount, WalletError> {
        match self.secret_type {
            SecretType::PrivateKey => {
                let account = self.derive_primary_account(password)?;
                self.accounts = vec![account.clone()];
                Ok(account)
            }
            SecretType::Mnemonic => {
                if self.has_account(derivation_path) {
                    return Err(WalletError::DuplicateAccount(derivation_path.to_string()));
                }
                let account = self.derive_account(derivation_path, password)?;
                self.accounts.push(account.clone());
                Ok(account)
            }
        }
    }

    /// Appends the account at the next unused index:
    /// `max(existing indices) + 1`, or 0 for an empty roster.
    pub fn add_next_account(&mut self, password: &str) -> Result<WalletAccount, WalletError> {
        let next_index = self
            .accounts
            .iter()
            .filter_map(|account| account.index)
            .max()
            .map_or(0, |index| index + 1);
        let path = self.derivation_path(next_index);
        self.add_account(&path, password)
    }

    pub fn has_account(&self, derivation_path: &str) -> bool {
        self.accounts
            .iter()
            .any(|account| account.derivation_path.as_deref() == Some(derivation_path))
    }

    /// Removes the first roster entry matching `derivation_path`.
    pub fn remove_account(&mut self, derivation_path: &str) -> Result<(), WalletError> {
        match self
            .accounts
            .iter()
            .position(|account| account.derivation_path.as_deref() == Some(derivation_path))
        {
            Some(position) => {
                self.accounts.remove(position);
                Ok(())
            }
            None => Err(WalletError::AccountNotFound(derivation_path.to_string())),
        }
    }

    /// Decrypts the raw private key for an explicit derivation path.
    /// The result is zeroed on drop and never cached.
    pub fn decrypt_private_key(
        &self,
        derivation_path: &str,
        password: &str,
    ) -> Result<Zeroizing<[u8; 32]>, WalletError> {
        let path = derivation::parse_path(derivation_path)?;
        self.with_seed(password, |seed| {
            derivation::private_key_from_seed(seed, &path)
        })
    }

    /// Decrypts the raw private key at a BIP-44 address index.
    pub fn decrypt_private_key_at(
        &self,
        account_index: u32,
        password: &str,
    ) -> Result<Zeroizing<[u8; 32]>, WalletError> {
        self.decrypt_private_key(&self.derivation_path(account_index), password)
    }

    /// Decrypts the sole key of a private-key container.
    pub fn decrypt_primary_private_key(
        &self,
        password: &str,
    ) -> Result<Zeroizing<[u8; 32]>, WalletError> {
        if self.secret_type != SecretType::PrivateKey {
            return Err(WalletError::WrongContainerType);
        }
        self.with_decrypted_secret(password, |secret| match secret {
            DecryptedSecret::PrivateKey(key) => Ok(Zeroizing::new(*key)),
            DecryptedSecret::Mnemonic(_) => Err(WalletError::WrongContainerType),
        })
    }

    /// Decrypts the mnemonic phrase of a mnemonic container.
    pub fn decrypt_mnemonic(&self, password: &str) -> Result<SecretString, WalletError> {
        if self.secret_type != SecretType::Mnemonic {
            return Err(WalletError::WrongContainerType);
        }
        self.with_decrypted_secret(password, |secret| match secret {
            DecryptedSecret::Mnemonic(phrase) => Ok(SecretString::from(phrase.clone())),
            DecryptedSecret::PrivateKey(_) => Err(WalletError::WrongContainerType),
        })
    }

    /// Re-seals the secret under a new password.
    ///
    /// The plaintext identity is unchanged; only the encryption wrapper
    /// rotates. The swap happens after the new wrapper exists, so a failure
    /// at any stage leaves the container's sealed state untouched.
    pub fn change_password(&mut self, old: &str, new: &str) -> Result<(), WalletError> {
        let resealed = self.with_decrypted_secret(old, |secret| {
            let plaintext: &[u8] = match secret {
                DecryptedSecret::Mnemonic(phrase) => phrase.as_bytes(),
                DecryptedSecret::PrivateKey(key) => key,
            };
            SealedBlob::seal(plaintext, new.as_bytes())
                .map_err(|e| WalletError::EncryptionFailed(e.to_string()))
        })?;

        self.sealed = resealed;
        Ok(())
    }

    /// Serializes the container into the exchange format.
    pub fn export(&self) -> Result<Vec<u8>, WalletError> {
        let record = ContainerRecord {
            identifier: self.identifier.clone(),
            version: self.version,
            name: self.name.clone(),
            wallet: SecretRecord {
                secret_type: self.secret_type,
                sealed: self.sealed.clone(),
            },
            accounts: self.accounts.clone(),
        };
        serde_json::to_vec(&record).map_err(|e| WalletError::ExportFailed(e.to_string()))
    }

    /// Signs `input` with the account addressed by `derivation_path`, or
    /// with the primary key when no path is given. Key material never
    /// outlives the call.
    pub fn sign(
        &self,
        input: &SignerInput,
        derivation_path: Option<&str>,
        password: &str,
    ) -> Result<Vec<u8>, WalletError> {
        let key = match derivation_path {
            Some(path) => self.decrypt_private_key(path, password)?,
            None => match self.secret_type {
                SecretType::PrivateKey => self.decrypt_primary_private_key(password)?,
                SecretType::Mnemonic => self.decrypt_private_key_at(0, password)?,
            },
        };
        signer::sign(input, &key)
    }

    /// Gates an operation on the decrypted secret. The plaintext and the
    /// parsed secret are both scoped to this call and zeroed on every exit
    /// path, success or failure.
    fn with_decrypted_secret<T>(
        &self,
        password: &str,
        f: impl FnOnce(&DecryptedSecret) -> Result<T, WalletError>,
    ) -> Result<T, WalletError> {
        let plaintext = self.sealed.open(password.as_bytes()).map_err(|e| match e {
            CryptoError::DecryptionFailed(_) => WalletError::WrongPassword,
            other => WalletError::MalformedContainer(other.to_string()),
        })?;

        let secret = DecryptedSecret::from_plaintext(self.secret_type, &plaintext)?;
        f(&secret)
    }

    /// Gates an operation on the BIP-39 seed; only mnemonic containers can
    /// derive, so a private-key secret fails here.
    fn with_seed<T>(
        &self,
        password: &str,
        f: impl FnOnce(&[u8]) -> Result<T, WalletError>,
    ) -> Result<T, WalletError> {
        self.with_decrypted_secret(password, |secret| match secret {
            DecryptedSecret::Mnemonic(phrase) => {
                let seed = mnemonic::mnemonic_to_seed(phrase)?;
                f(&seed[..])
            }
            DecryptedSecret::PrivateKey(_) => Err(WalletError::UnableToDerive),
        })
    }
}
