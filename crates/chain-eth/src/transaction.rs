use alloy_rlp::{Encodable, RlpEncodable};
use sha3::{Digest, Keccak256};

use crate::address;
use crate::error::EthError;
use crate::message;

/// Fee model selecting the wire encoding of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fee {
    /// Single flat gas price; encoded as a legacy EIP-155 transaction.
    Classic { gas_price: u128 },
    /// EIP-1559 fee market; encoded as a type-2 enveloped transaction.
    FeeMarket {
        max_priority_fee_per_gas: u128,
        max_fee_per_gas: u128,
    },
}

/// An unsigned EVM transaction.
#[derive(Debug, Clone)]
pub struct EthTransaction {
    pub chain_id: u64,
    pub nonce: u64,
    pub gas_limit: u64,
    /// Recipient address as a 0x-prefixed hex string.
    pub to: String,
    /// Transfer value in wei.
    pub value: u128,
    /// Calldata (empty for plain transfers).
    pub data: Vec<u8>,
    pub fee: Fee,
}

/// Signs `tx` and returns the fully encoded signed transaction bytes,
/// ready for broadcast.
///
/// The fee model picks the encoding: `Classic` produces a legacy RLP
/// transaction with EIP-155 replay protection (`v = chain_id * 2 + 35 +
/// parity`); `FeeMarket` produces the `0x02`-enveloped EIP-1559 form with
/// an empty access list.
pub fn sign_transaction(tx: &EthTransaction, private_key: &[u8; 32]) -> Result<Vec<u8>, EthError> {
    match tx.fee {
        Fee::Classic { gas_price } => sign_legacy(tx, gas_price, private_key),
        Fee::FeeMarket {
            max_priority_fee_per_gas,
            max_fee_per_gas,
        } => sign_fee_market(tx, max_priority_fee_per_gas, max_fee_per_gas, private_key),
    }
}

fn sign_legacy(
    tx: &EthTransaction,
    gas_price: u128,
    private_key: &[u8; 32],
) -> Result<Vec<u8>, EthError> {
    let to = RlpAddress(address::parse_address(&tx.to)?);

    // EIP-155: the unsigned payload carries (chain_id, 0, 0) in the
    // signature slots.
    let unsigned = LegacyUnsignedFields {
        nonce: tx.nonce,
        gas_price,
        gas_limit: tx.gas_limit,
        to: to.clone(),
        value: tx.value,
        data: RlpBytes(tx.data.clone()),
        chain_id: tx.chain_id,
        zero_r: 0,
        zero_s: 0,
    };

    let mut payload = Vec::new();
    unsigned.encode(&mut payload);
    let digest = Keccak256::digest(&payload);

    let (signature, recovery_id) = message::sign_prehash(digest.as_slice(), private_key)?;
    let (r, s) = signature_words(&signature);

    let signed = LegacySignedFields {
        nonce: tx.nonce,
        gas_price,
        gas_limit: tx.gas_limit,
        to,
        value: tx.value,
        data: RlpBytes(tx.data.clone()),
        v: tx.chain_id * 2 + 35 + recovery_id.to_byte() as u64,
        r,
        s,
    };

    let mut raw_tx = Vec::new();
    signed.encode(&mut raw_tx);
    Ok(raw_tx)
}

fn sign_fee_market(
    tx: &EthTransaction,
    max_priority_fee_per_gas: u128,
    max_fee_per_gas: u128,
    private_key: &[u8; 32],
) -> Result<Vec<u8>, EthError> {
    let to = RlpAddress(address::parse_address(&tx.to)?);

    let unsigned = FeeMarketUnsignedFields {
        chain_id: tx.chain_id,
        nonce: tx.nonce,
        max_priority_fee_per_gas,
        max_fee_per_gas,
        gas_limit: tx.gas_limit,
        to: to.clone(),
        value: tx.value,
        data: RlpBytes(tx.data.clone()),
        access_list: Vec::new(),
    };

    // Signing payload: 0x02 || rlp(unsigned_fields).
    let mut payload = Vec::with_capacity(1 + unsigned.length());
    payload.push(0x02);
    unsigned.encode(&mut payload);
    let digest = Keccak256::digest(&payload);

    let (signature, recovery_id) = message::sign_prehash(digest.as_slice(), private_key)?;
    let (r, s) = signature_words(&signature);

    let signed = FeeMarketSignedFields {
        chain_id: tx.chain_id,
        nonce: tx.nonce,
        max_priority_fee_per_gas,
        max_fee_per_gas,
        gas_limit: tx.gas_limit,
        to,
        value: tx.value,
        data: RlpBytes(tx.data.clone()),
        access_list: Vec::new(),
        signature_y_parity: recovery_id.to_byte(),
        signature_r: r,
        signature_s: s,
    };

    let mut raw_tx = Vec::with_capacity(1 + signed.length());
    raw_tx.push(0x02);
    signed.encode(&mut raw_tx);
    Ok(raw_tx)
}

fn signature_words(signature: &k256::ecdsa::Signature) -> (RlpU256, RlpU256) {
    let mut r = [0u8; 32];
    let mut s = [0u8; 32];
    r.copy_from_slice(&signature.r().to_bytes());
    s.copy_from_slice(&signature.s().to_bytes());
    (RlpU256(r), RlpU256(s))
}

// ---------------------------------------------------------------------------
// RLP-encodable structures
// ---------------------------------------------------------------------------

#[derive(RlpEncodable)]
struct LegacyUnsignedFields {
    nonce: u64,
    gas_price: u128,
    gas_limit: u64,
    to: RlpAddress,
    value: u128,
    data: RlpBytes,
    chain_id: u64,
    zero_r: u8,
    zero_s: u8,
}

#[derive(RlpEncodable)]
struct LegacySignedFields {
    nonce: u64,
    gas_price: u128,
    gas_limit: u64,
    to: RlpAddress,
    value: u128,
    data: RlpBytes,
    v: u64,
    r: RlpU256,
    s: RlpU256,
}

#[derive(RlpEncodable)]
struct FeeMarketUnsignedFields {
    chain_id: u64,
    nonce: u64,
    max_priority_fee_per_gas: u128,
    max_fee_per_gas: u128,
    gas_limit: u64,
    to: RlpAddress,
    value: u128,
    data: RlpBytes,
    access_list: Vec<AccessListItem>,
}

#[derive(RlpEncodable)]
struct FeeMarketSignedFields {
    chain_id: u64,
    nonce: u64,
    max_priority_fee_per_gas: u128,
    max_fee_per_gas: u128,
    gas_limit: u64,
    to: RlpAddress,
    value: u128,
    data: RlpBytes,
    access_list: Vec<AccessListItem>,
    signature_y_parity: u8,
    signature_r: RlpU256,
    signature_s: RlpU256,
}

/// An EIP-2930 access list entry (always empty here).
#[derive(Debug, Clone, RlpEncodable)]
struct AccessListItem {
    address: RlpAddress,
    storage_keys: Vec<RlpU256>,
}

/// A 20-byte address encoding as an RLP string.
#[derive(Debug, Clone)]
struct RlpAddress([u8; 20]);

impl Encodable for RlpAddress {
    fn encode(&self, out: &mut dyn alloy_rlp::BufMut) {
        self.0.as_slice().encode(out);
    }

    fn length(&self) -> usize {
        self.0.as_slice().length()
    }
}

/// Calldata encoding as an RLP string (not a list of integers).
#[derive(Debug, Clone)]
struct RlpBytes(Vec<u8>);

impl Encodable for RlpBytes {
    fn encode(&self, out: &mut dyn alloy_rlp::BufMut) {
        self.0.as_slice().encode(out);
    }

    fn length(&self) -> usize {
        self.0.as_slice().length()
    }
}

/// A 256-bit word encoding as minimal big-endian bytes with leading zeros
/// stripped (standard RLP integer encoding).
#[derive(Debug, Clone)]
struct RlpU256([u8; 32]);

impl Encodable for RlpU256 {
    fn encode(&self, out: &mut dyn alloy_rlp::BufMut) {
        let start = self.0.iter().position(|&b| b != 0).unwrap_or(32);
        self.0[start..].encode(out);
    }

    fn length(&self) -> usize {
        let start = self.0.iter().position(|&b| b != 0).unwrap_or(32);
        self.0[start..].length()
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

    fn classic_transfer() -> EthTransaction {
        EthTransaction {
            chain_id: 1,
            nonce: 0,
            gas_limit: 21_000,
            to: "0x7467594dd44629415864af5bcbf861b0c886afad".into(),
            value: 0,
            data: Vec::new(),
            fee: Fee::Classic {
                gas_price: 0x0ab5d04c00, // 46 gwei
            },
        }
    }

    #[test]
    fn legacy_known_vector() {
        let raw = sign_transaction(&classic_transfer(), &test_key()).unwrap();
        assert_eq!(
            hex::encode(raw),
            "f86480850ab5d04c00825208947467594dd44629415864af5bcbf861b0c886afad808026a08a\
             79f5d3d7bec3670cffdf8f36adbded9f566fdcd41e7628741e6aecca2c761ea0\
             40474ba7f53392511de1bfcea364b14956a4b0d8285f08aef6bee284abb24228"
        );
    }

    #[test]
    fn fee_market_uses_type_2_envelope() {
        let mut tx = classic_transfer();
        tx.fee = Fee::FeeMarket {
            max_priority_fee_per_gas: 1_000_000_000,
            max_fee_per_gas: 50_000_000_000,
        };

        let raw = sign_transaction(&tx, &test_key()).unwrap();
        assert_eq!(raw[0], 0x02);
        assert!(raw.len() > 10);
    }

    #[test]
    fn fee_model_changes_encoding() {
        let classic = sign_transaction(&classic_transfer(), &test_key()).unwrap();

        let mut tx = classic_transfer();
        tx.fee = Fee::FeeMarket {
            max_priority_fee_per_gas: 0x0ab5d04c00,
            max_fee_per_gas: 0x0ab5d04c00,
        };
        let fee_market = sign_transaction(&tx, &test_key()).unwrap();

        assert_ne!(classic, fee_market);
        assert_ne!(classic[0], 0x02);
    }

    #[test]
    fn signing_is_deterministic() {
        let a = sign_transaction(&classic_transfer(), &test_key()).unwrap();
        let b = sign_transaction(&classic_transfer(), &test_key()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn different_nonces_differ() {
        let mut tx = classic_transfer();
        let a = sign_transaction(&tx, &test_key()).unwrap();
        tx.nonce = 1;
        let b = sign_transaction(&tx, &test_key()).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn different_chain_ids_differ() {
        let mut tx = classic_transfer();
        let a = sign_transaction(&tx, &test_key()).unwrap();
        tx.chain_id = 137;
        let b = sign_transaction(&tx, &test_key()).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn invalid_recipient_rejected() {
        let mut tx = classic_transfer();
        tx.to = "not-an-address".into();
        assert!(sign_transaction(&tx, &test_key()).is_err());
    }

    #[test]
    fn invalid_private_key_rejected() {
        assert!(sign_transaction(&classic_transfer(), &[0u8; 32]).is_err());
    }

    #[test]
    fn rlp_u256_zero_encodes_as_empty_string() {
        let mut buf = Vec::new();
        RlpU256([0u8; 32]).encode(&mut buf);
        assert_eq!(buf, vec![0x80]);
    }

    #[test]
    fn rlp_bytes_empty_encodes_as_empty_string() {
        let mut buf = Vec::new();
        RlpBytes(Vec::new()).encode(&mut buf);
        assert_eq!(buf, vec![0x80]);
    }
}
