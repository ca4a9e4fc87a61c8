use alloy_dyn_abi::TypedData;

use crate::error::EthError;

/// Computes the EIP-712 signing hash of a typed-data JSON payload.
///
/// Canonicalization of the structured data (type encoding, struct hashing,
/// domain separator) is delegated to `alloy-dyn-abi`; this function only
/// parses the payload and surfaces the digest.
pub fn signing_hash(payload: &[u8]) -> Result<[u8; 32], EthError> {
    let typed: TypedData = serde_json::from_slice(payload)
        .map_err(|e| EthError::InvalidTypedData(format!("parse failed: {e}")))?;

    let digest = typed
        .eip712_signing_hash()
        .map_err(|e| EthError::InvalidTypedData(format!("hashing failed: {e}")))?;

    Ok(digest.0)
}
