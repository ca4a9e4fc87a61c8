use thiserror::Error;

/// Wallet core errors, surfaced as typed results to the immediate caller.
///
/// Nothing is retried internally; in particular a [`WrongPassword`]
/// failure must be re-prompted by the caller.
///
/// [`WrongPassword`]: WalletError::WrongPassword
#[derive(Debug, Error)]
pub enum WalletError {
    #[error("malformed container: {0}")]
    MalformedContainer(String),

    #[error("input is neither a mnemonic nor a private key")]
    InvalidInput,

    #[error("password must not be empty")]
    EmptyPassword,

    #[error("wrong password")]
    WrongPassword,

    #[error("operation not supported for this container type")]
    WrongContainerType,

    #[error("invalid derivation path: {0}")]
    InvalidDerivationPath(String),

    #[error("unable to derive account")]
    UnableToDerive,

    #[error("invalid mnemonic")]
    InvalidMnemonic,

    #[error("invalid private key")]
    InvalidPrivateKey,

    #[error("account already exists: {0}")]
    DuplicateAccount(String),

    #[error("account not found: {0}")]
    AccountNotFound(String),

    #[error("encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("signing failed: {0}")]
    SigningFailed(String),

    #[error("export failed: {0}")]
    ExportFailed(String),

    #[error("storage error: {0}")]
    StorageError(String),
}

impl From<chain_eth::EthError> for WalletError {
    fn from(e: chain_eth::EthError) -> Self {
        WalletError::SigningFailed(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_wrong_password() {
        assert_eq!(WalletError::WrongPassword.to_string(), "wrong password");
    }

    #[test]
    fn display_duplicate_account() {
        let err = WalletError::DuplicateAccount("m/44'/60'/0'/0/1".into());
        assert_eq!(
            err.to_string(),
            "account already exists: m/44'/60'/0'/0/1"
        );
    }

    #[test]
    fn eth_error_maps_to_signing_failed() {
        let err: WalletError = chain_eth::EthError::SigningError("bad digest".into()).into();
        assert!(matches!(err, WalletError::SigningFailed(_)));
    }
}
