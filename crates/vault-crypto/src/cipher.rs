use aes_gcm::aead::{Aead, OsRng};
use aes_gcm::{AeadCore, Aes256Gcm, Key, KeyInit, Nonce};

use crate::error::CryptoError;

/// AES-256-GCM nonce size in bytes.
const NONCE_SIZE: usize = 12;

/// Encrypts `plaintext` with AES-256-GCM under the given 32-byte key.
///
/// A random 12-byte nonce is generated and prepended, so the output layout
/// is `nonce (12 bytes) | ciphertext + tag`.
pub fn encrypt(plaintext: &[u8], key: &[u8; 32]) -> Result<Vec<u8>, CryptoError> {
    let aead = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key));
    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);

    let sealed = aead
        .encrypt(&nonce, plaintext)
        .map_err(|e| CryptoError::EncryptionFailed(e.to_string()))?;

    let mut output = Vec::with_capacity(NONCE_SIZE + sealed.len());
    output.extend_from_slice(&nonce);
    output.extend_from_slice(&sealed);
    Ok(output)
}

/// Decrypts data produced by [`encrypt`], verifying the GCM tag.
pub fn decrypt(ciphertext_with_nonce: &[u8], key: &[u8; 32]) -> Result<Vec<u8>, CryptoError> {
    if ciphertext_with_nonce.len() < NONCE_SIZE {
        return Err(CryptoError::MalformedBlob(format!(
            "ciphertext too short: {} bytes",
            ciphertext_with_nonce.len()
        )));
    }

    let (nonce_bytes, sealed) = ciphertext_with_nonce.split_at(NONCE_SIZE);
    let aead = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key));

    aead.decrypt(Nonce::from_slice(nonce_bytes), sealed)
        .map_err(|e| CryptoError::DecryptionFailed(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_key() -> [u8; 32] {
        let mut key = [0u8; 32];
        for (i, byte) in key.iter_mut().enumerate() {
            *byte = i as u8;
        }
        key
    }

    #[test]
    fn encrypt_decrypt_roundtrip() {
        let key = test_key();
        let plaintext = b"genre allow company blind";

        let sealed = encrypt(plaintext, &key).unwrap();
        let opened = decrypt(&sealed, &key).unwrap();
        assert_eq!(opened, plaintext);
    }

    #[test]
    fn nonce_is_prepended() {
        let key = test_key();
        let sealed = encrypt(b"test", &key).unwrap();
        // 12-byte nonce + plaintext-sized ciphertext + 16-byte tag.
        assert_eq!(sealed.len(), NONCE_SIZE + 4 + 16);
    }

    #[test]
    fn fresh_nonce_per_call() {
        let key = test_key();
        let a = encrypt(b"same input", &key).unwrap();
        let b = encrypt(b"same input", &key).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn wrong_key_fails() {
        let key = test_key();
        let mut wrong = test_key();
        wrong[0] ^= 0xff;

        let sealed = encrypt(b"secret", &key).unwrap();
        assert!(matches!(
            decrypt(&sealed, &wrong),
            Err(CryptoError::DecryptionFailed(_))
        ));
    }

    #[test]
    fn tampered_ciphertext_fails() {
        let key = test_key();
        let mut sealed = encrypt(b"tamper test", &key).unwrap();
        let last = sealed.len() - 1;
        sealed[last] ^= 0xff;
        assert!(decrypt(&sealed, &key).is_err());
    }

    #[test]
    fn truncated_input_fails() {
        assert!(matches!(
            decrypt(&[0u8; 5], &test_key()),
            Err(CryptoError::MalformedBlob(_))
        ));
    }
}
