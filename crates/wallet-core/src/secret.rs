use k256::ecdsa::SigningKey;
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::WalletError;

/// The kind of secret a container holds, fixed at creation.
///
/// A closed variant rather than a trait object: every gated operation
/// checks the discriminant in one place, which keeps invariants like
/// "private-key containers never hold more than one account" enforceable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SecretType {
    Mnemonic,
    PrivateKey,
}

/// A decrypted wallet secret, scoped to a single container operation and
/// zeroed on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub(crate) enum DecryptedSecret {
    Mnemonic(String),
    PrivateKey([u8; 32]),
}

impl DecryptedSecret {
    pub(crate) fn from_plaintext(
        secret_type: SecretType,
        plaintext: &[u8],
    ) -> Result<Self, WalletError> {
        match secret_type {
            SecretType::Mnemonic => {
                let phrase = std::str::from_utf8(plaintext).map_err(|_| {
                    WalletError::MalformedContainer("mnemonic secret is not utf-8".into())
                })?;
                Ok(DecryptedSecret::Mnemonic(phrase.to_owned()))
            }
            SecretType::PrivateKey => {
                let key: [u8; 32] = plaintext.try_into().map_err(|_| {
                    WalletError::MalformedContainer("private-key secret is not 32 bytes".into())
                })?;
                Ok(DecryptedSecret::PrivateKey(key))
            }
        }
    }
}

/// Checks that `input` is a hex-encoded scalar valid on secp256k1.
pub fn is_valid_private_key(input: &str) -> bool {
    decode_private_key(input).is_some()
}

/// Decodes a 0x-optional 64-character hex private key, rejecting scalars
/// outside the curve order.
pub(crate) fn decode_private_key(input: &str) -> Option<[u8; 32]> {
    let hex_part = input.strip_prefix("0x").unwrap_or(input);
    if hex_part.len() != 64 {
        return None;
    }

    let mut bytes = hex::decode(hex_part).ok()?;
    let key: [u8; 32] = bytes.as_slice().try_into().ok()?;
    bytes.zeroize();

    SigningKey::from_bytes((&key).into()).ok()?;
    Some(key)
}
