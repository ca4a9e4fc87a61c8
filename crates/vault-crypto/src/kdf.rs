use argon2::{Algorithm, Argon2, Params, Version};
use rand::rngs::OsRng;
use rand::RngCore;

use crate::error::CryptoError;

/// Argon2id salt size in bytes.
pub const SALT_SIZE: usize = 16;

/// Derives a 32-byte AES key from `password` and `salt` using Argon2id.
///
/// Parameters are fixed by the sealed-blob format: 64 MiB memory,
/// 3 iterations, parallelism 4.
pub fn derive_key(password: &[u8], salt: &[u8; SALT_SIZE]) -> Result<[u8; 32], CryptoError> {
    let params = Params::new(65536, 3, 4, Some(32))
        .map_err(|e| CryptoError::KdfFailed(format!("invalid argon2 params: {e}")))?;

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let mut output = [0u8; 32];
    argon2
        .hash_password_into(password, salt, &mut output)
        .map_err(|e| CryptoError::KdfFailed(format!("argon2 hash failed: {e}")))?;

    Ok(output)
}

/// Generates a random salt from the OS CSPRNG.
pub fn generate_salt() -> [u8; SALT_SIZE] {
    let mut salt = [0u8; SALT_SIZE];
    OsRng.fill_bytes(&mut salt);
    salt
}
