//! # wallet-core
//!
//! Self-custodial key management for EVM accounts: password-sealed wallet
//! containers, BIP-44 account derivation, message/transaction signing, and
//! a pluggable persistence layer.
//!
//! Secrets are decrypted only within the scope of a single call and zeroed
//! before it returns; the sealed blob inside a [`WalletContainer`] is the
//! only durable copy of a wallet's mnemonic or private key.

pub mod account;
pub mod container;
pub mod derivation;
pub mod error;
pub mod manager;
pub mod mnemonic;
pub mod secret;
pub mod signer;
pub mod storage;

pub use account::WalletAccount;
pub use container::WalletContainer;
pub use error::WalletError;
pub use manager::WalletManager;
pub use secret::SecretType;
pub use signer::{Fee, SignerInput, TransactionInput};
pub use storage::{MemoryWalletStorage, WalletStorage};
