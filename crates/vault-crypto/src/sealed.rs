use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, Zeroizing};

use crate::cipher;
use crate::error::CryptoError;
use crate::kdf;

/// A password-sealed secret: Argon2id key derivation + AES-256-GCM.
///
/// This is the encrypted-secret wrapper embedded in a wallet container's
/// exchange format. The plaintext identity survives re-sealing under a new
/// password; opening with a wrong password fails authentication rather than
/// producing garbage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SealedBlob {
    #[serde(with = "hex_bytes")]
    salt: Vec<u8>,
    #[serde(with = "hex_bytes")]
    ciphertext: Vec<u8>,
}

impl SealedBlob {
    /// Seals `plaintext` under `password` with a fresh random salt.
    pub fn seal(plaintext: &[u8], password: &[u8]) -> Result<Self, CryptoError> {
        let salt = kdf::generate_salt();
        let mut key = kdf::derive_key(password, &salt)?;
        let sealed = cipher::encrypt(plaintext, &key);
        key.zeroize();

        Ok(Self {
            salt: salt.to_vec(),
            ciphertext: sealed?,
        })
    }

    /// Opens the blob, returning the plaintext zeroed on drop.
    ///
    /// Fails with [`CryptoError::DecryptionFailed`] when the password is
    /// wrong (GCM tag mismatch).
    pub fn open(&self, password: &[u8]) -> Result<Zeroizing<Vec<u8>>, CryptoError> {
        let salt: [u8; kdf::SALT_SIZE] = self
            .salt
            .as_slice()
            .try_into()
            .map_err(|_| CryptoError::MalformedBlob(format!("salt length {}", self.salt.len())))?;

        let mut key = kdf::derive_key(password, &salt)?;
        let opened = cipher::decrypt(&self.ciphertext, &key);
        key.zeroize();

        Ok(Zeroizing::new(opened?))
    }
}

mod hex_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        hex::decode(&s).map_err(serde::de::Error::custom)
    }
}
