//! # vault-crypto
//!
//! Password-sealed secret blobs for the wallet core: Argon2id key
//! derivation plus AES-256-GCM, packaged as a serializable [`SealedBlob`].

pub mod cipher;
pub mod error;
pub mod kdf;
pub mod sealed;

pub use error::CryptoError;
pub use sealed::SealedBlob;
