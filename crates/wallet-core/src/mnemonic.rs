use bip39::{Language, Mnemonic};
use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::{Zeroize, Zeroizing};

use crate::error::WalletError;

/// Generates a new 12-word BIP-39 mnemonic (128 bits of entropy).
pub fn generate_mnemonic() -> Result<String, WalletError> {
    let mut entropy = [0u8; 16];
    OsRng.fill_bytes(&mut entropy);
    let mnemonic = Mnemonic::from_entropy_in(Language::English, &entropy)
        .map_err(|_| WalletError::InvalidMnemonic);
    entropy.zeroize();
    Ok(mnemonic?.to_string())
}

/// Validates a BIP-39 phrase (word-list membership and checksum).
pub fn is_valid_mnemonic(phrase: &str) -> bool {
    Mnemonic::parse_in_normalized(Language::English, phrase).is_ok()
}

/// Validates a single word against the BIP-39 word list.
pub fn is_valid_word(word: &str) -> bool {
    Language::English.find_word(word).is_some()
}

/// Word-list completions for a typed prefix, for entry autocomplete.
pub fn word_suggestions(prefix: &str) -> Vec<&'static str> {
    Language::English.words_by_prefix(prefix).to_vec()
}

/// Derives the 64-byte BIP-39 seed for `phrase` (empty passphrase).
pub(crate) fn mnemonic_to_seed(phrase: &str) -> Result<Zeroizing<[u8; 64]>, WalletError> {
    let mnemonic = Mnemonic::parse_in_normalized(Language::English, phrase)
        .map_err(|_| WalletError::InvalidMnemonic)?;
    Ok(Zeroizing::new(mnemonic.to_seed("")))
}
