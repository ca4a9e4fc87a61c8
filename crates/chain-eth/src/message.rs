use k256::ecdsa::signature::hazmat::PrehashSigner;
use k256::ecdsa::{RecoveryId, Signature, SigningKey};
use sha3::{Digest, Keccak256};
use zeroize::Zeroize;

use crate::error::EthError;

/// Signs a 32-byte digest directly.
///
/// Returns the 65-byte signature `r || s || recovery_id`, with the raw
/// recovery id (0 or 1) in the final byte.
pub fn sign_digest(digest: &[u8], private_key: &[u8; 32]) -> Result<Vec<u8>, EthError> {
    if digest.len() != 32 {
        return Err(EthError::SigningError(format!(
            "digest must be exactly 32 bytes, got {}",
            digest.len()
        )));
    }

    let (signature, recovery_id) = sign_prehash(digest, private_key)?;
    Ok(encode_signature(&signature, recovery_id))
}

/// Signs a message with the EIP-191 `personal_sign` scheme.
///
/// The digest is `keccak256("\x19Ethereum Signed Message:\n" + len(message)
/// + message)`; the fixed prefix keeps a personally-signed message from
/// doubling as a transaction signature.
pub fn personal_sign(message: &[u8], private_key: &[u8; 32]) -> Result<Vec<u8>, EthError> {
    let digest = personal_message_digest(message);
    let (signature, recovery_id) = sign_prehash(&digest, private_key)?;
    Ok(encode_signature(&signature, recovery_id))
}

/// Computes the EIP-191 prefixed digest of `message`.
pub fn personal_message_digest(message: &[u8]) -> [u8; 32] {
    let prefix = format!("\x19Ethereum Signed Message:\n{}", message.len());
    let mut hasher = Keccak256::new();
    hasher.update(prefix.as_bytes());
    hasher.update(message);
    hasher.finalize().into()
}

/// Shared prehash signer for every signing path in this crate.
pub(crate) fn sign_prehash(
    digest: &[u8],
    private_key: &[u8; 32],
) -> Result<(Signature, RecoveryId), EthError> {
    let mut key_bytes = *private_key;
    let signing_key = SigningKey::from_bytes((&key_bytes).into())
        .map_err(|e| EthError::InvalidPrivateKey(e.to_string()))?;
    key_bytes.zeroize();

    signing_key
        .sign_prehash(digest)
        .map_err(|e| EthError::SigningError(e.to_string()))
}

fn encode_signature(signature: &Signature, recovery_id: RecoveryId) -> Vec<u8> {
    let mut sig = Vec::with_capacity(65);
    sig.extend_from_slice(&signature.r().to_bytes());
    sig.extend_from_slice(&signature.s().to_bytes());
    sig.push(recovery_id.to_byte());
    sig
}
