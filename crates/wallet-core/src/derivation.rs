use bip32::{ChildNumber, DerivationPath, XPrv};
use k256::ecdsa::SigningKey;
use zeroize::Zeroizing;

use crate::error::WalletError;

/// BIP-44 prefix for EVM accounts: purpose 44', coin type 60', account 0',
/// external chain. Only the address index varies.
const PATH_PREFIX: &str = "m/44'/60'/0'/0";

/// Canonical derivation path for an account index.
pub fn derivation_path(account_index: u32) -> String {
    format!("{PATH_PREFIX}/{account_index}")
}

/// Parses a path string, rejecting anything BIP-32 cannot represent.
pub(crate) fn parse_path(path: &str) -> Result<DerivationPath, WalletError> {
    path.parse()
        .map_err(|_| WalletError::InvalidDerivationPath(path.to_string()))
}

/// The address-index component (final path element).
pub(crate) fn address_index(path: &DerivationPath) -> Result<u32, WalletError> {
    path.iter()
        .last()
        .map(|child| child.index())
        .ok_or_else(|| WalletError::InvalidDerivationPath(path.to_string()))
}

/// Derives the private key for a full path from a BIP-39 seed.
pub(crate) fn private_key_from_seed(
    seed: &[u8],
    path: &DerivationPath,
) -> Result<Zeroizing<[u8; 32]>, WalletError> {
    let xprv = XPrv::derive_from_path(seed, path).map_err(|_| WalletError::UnableToDerive)?;
    let bytes: [u8; 32] = xprv.to_bytes().into();
    Ok(Zeroizing::new(bytes))
}

/// Derives the extended key for the fixed account-level prefix once, so a
/// batch derivation can extend it per index instead of re-walking the path.
pub(crate) fn account_xprv(seed: &[u8]) -> Result<XPrv, WalletError> {
    let prefix: DerivationPath = PATH_PREFIX
        .parse()
        .map_err(|_| WalletError::UnableToDerive)?;
    XPrv::derive_from_path(seed, &prefix).map_err(|_| WalletError::UnableToDerive)
}

/// Extends the account-level key by one non-hardened address index.
pub(crate) fn child_private_key(
    account: &XPrv,
    index: u32,
) -> Result<Zeroizing<[u8; 32]>, WalletError> {
    let child_number =
        ChildNumber::new(index, false).map_err(|_| WalletError::UnableToDerive)?;
    let child = account
        .derive_child(child_number)
        .map_err(|_| WalletError::UnableToDerive)?;
    let bytes: [u8; 32] = child.to_bytes().into();
    Ok(Zeroizing::new(bytes))
}

/// EIP-55 address for a raw private key.
pub(crate) fn address_for_key(key: &[u8; 32]) -> Result<String, WalletError> {
    let signing = SigningKey::from_bytes(key.into()).map_err(|_| WalletError::UnableToDerive)?;
    Ok(chain_eth::address::address_from_verifying_key(
        signing.verifying_key(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mnemonic::mnemonic_to_seed;

    const TEST_MNEMONIC: &str =
        "genre allow company blind security cluster cost stock skate wait debris subway";

    #[test]
    fn path_string_format() {
        assert_eq!(derivation_path(0), "m/44'/60'/0'/0/0");
        assert_eq!(derivation_path(1), "m/44'/60'/0'/0/1");
        assert_eq!(derivation_path(2), "m/44'/60'/0'/0/2");
    }

    #[test]
    fn address_index_reads_final_component() {
        let path = parse_path("m/44'/60'/0'/0/7").unwrap();
        assert_eq!(address_index(&path).unwrap(), 7);
    }

    #[test]
    fn garbage_path_rejected() {
        assert!(matches!(
            parse_path("not/a/path"),
            Err(WalletError::InvalidDerivationPath(_))
        ));
    }

    #[test]
    fn known_private_keys() {
        let seed = mnemonic_to_seed(TEST_MNEMONIC).unwrap();
        let expected = [
            "dbe95804848004ef312ee1877eb5af4eaf4692a8e04ff97649edbc3c71f4f656",
            "15b30fbf6d02f91412755a27ad1402f75a0068dfae968420095c6b632d54f816",
            "5bceb69fcc15f63cc30f44f403f9899638aa2a0758ae55719e5690e26f0ccb3b",
        ];

        for (index, want) in expected.iter().enumerate() {
            let path = parse_path(&derivation_path(index as u32)).unwrap();
            let key = private_key_from_seed(&*seed, &path).unwrap();
            assert_eq!(&hex::encode(&key[..]), want);
        }
    }

    #[test]
    fn known_addresses() {
        let seed = mnemonic_to_seed(TEST_MNEMONIC).unwrap();
        let expected = [
            "0xED4a971eA7948B79265C3CA0b9F79D9b56c0022d",
            "0x7467594Dd44629415864Af5BcBf861b0C886afAD",
            "0x04b9aB3Be467cbB98f275B266952977116FF59b7",
        ];

        for (index, want) in expected.iter().enumerate() {
            let path = parse_path(&derivation_path(index as u32)).unwrap();
            let key = private_key_from_seed(&*seed, &path).unwrap();
            assert_eq!(&address_for_key(&key).unwrap(), want);
        }
    }

    #[test]
    fn child_derivation_matches_full_path() {
        let seed = mnemonic_to_seed(TEST_MNEMONIC).unwrap();
        let account = account_xprv(&*seed).unwrap();

        for index in 0..5u32 {
            let path = parse_path(&derivation_path(index)).unwrap();
            let from_path = private_key_from_seed(&*seed, &path).unwrap();
            let from_child = child_private_key(&account, index).unwrap();
            assert_eq!(*from_path, *from_child);
        }
    }
}
