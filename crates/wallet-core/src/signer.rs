use crate::error::WalletError;

pub use chain_eth::transaction::Fee;

/// A signing request. Constructed by the caller for one signing call,
/// consumed once, never persisted.
#[derive(Debug, Clone)]
pub enum SignerInput {
    /// A precomputed 32-byte digest, signed as-is.
    Sign(Vec<u8>),
    /// Message bytes, signed under the EIP-191 personal-message prefix.
    PersonalSign(Vec<u8>),
    /// An EIP-712 typed-data JSON payload.
    TypedData(Vec<u8>),
    /// A chain transaction.
    Transaction(TransactionInput),
}

/// Transaction fields supplied by the caller for a single signing call.
#[derive(Debug, Clone)]
pub struct TransactionInput {
    pub chain_id: u64,
    pub nonce: u64,
    /// Recipient as a 0x-prefixed hex address.
    pub to: String,
    /// Calldata (empty for plain transfers).
    pub data: Vec<u8>,
    /// Transfer value in wei.
    pub value: u128,
    pub gas_limit: u64,
    /// Fee model; selects legacy or fee-market encoding.
    pub fee: Fee,
}

/// Stateless signing engine: a request plus raw key bytes in, a signature
/// or fully encoded transaction out.
///
/// Nothing is retained across calls; the caller owns the key material and
/// is responsible for discarding it afterwards. All four request kinds
/// share one curve primitive, only the digest construction differs.
pub fn sign(input: &SignerInput, private_key: &[u8; 32]) -> Result<Vec<u8>, WalletError> {
    match input {
        SignerInput::Sign(digest) => {
            Ok(chain_eth::message::sign_digest(digest, private_key)?)
        }
        SignerInput::PersonalSign(message) => {
            Ok(chain_eth::message::personal_sign(message, private_key)?)
        }
        SignerInput::TypedData(payload) => {
            let digest = chain_eth::typed_data::signing_hash(payload)?;
            Ok(chain_eth::message::sign_digest(&digest, private_key)?)
        }
        SignerInput::Transaction(input) => {
            let tx = chain_eth::EthTransaction {
                chain_id: input.chain_id,
                nonce: input.nonce,
                gas_limit: input.gas_limit,
                to: input.to.clone(),
                value: input.value,
                data: input.data.clone(),
                fee: input.fee,
            };
            Ok(chain_eth::transaction::sign_transaction(&tx, private_key)?)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_key() -> [u8; 32] {
        let mut key = [0u8; 32];
        let bytes =
            hex::decode("15b30fbf6d02f91412755a27ad1402f75a0068dfae968420095c6b632d54f816")
                .unwrap();
        key.copy_from_slice(&bytes);
        key
    }

    #[test]
    fn raw_and_personal_differ_on_same_bytes() {
        let data = vec![0xCC; 32];
        let raw = sign(&SignerInput::Sign(data.clone()), &test_key()).unwrap();
        let personal = sign(&SignerInput::PersonalSign(data), &test_key()).unwrap();
        assert_ne!(raw, personal);
    }

    #[test]
    fn raw_sign_requires_digest_length() {
        let result = sign(&SignerInput::Sign(vec![0u8; 20]), &test_key());
        assert!(matches!(result, Err(WalletError::SigningFailed(_))));
    }

    #[test]
    fn typed_data_garbage_fails() {
        let result = sign(&SignerInput::TypedData(b"{oops".to_vec()), &test_key());
        assert!(matches!(result, Err(WalletError::SigningFailed(_))));
    }
}
