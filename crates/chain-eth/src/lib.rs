//! EVM signing primitives for the wallet core.
//!
//! This crate provides:
//! - Ethereum address derivation from secp256k1 public keys (EIP-55 checksums)
//! - Raw-digest and EIP-191 personal-message signing
//! - EIP-712 typed-data digests (delegated to `alloy-dyn-abi`)
//! - Legacy (EIP-155) and fee-market (EIP-1559) transaction signing
//!
//! Everything here is stateless: functions take raw private-key bytes,
//! produce output, and retain nothing.

pub mod address;
pub mod error;
pub mod message;
pub mod transaction;
pub mod typed_data;

pub use error::EthError;
pub use transaction::{EthTransaction, Fee};
