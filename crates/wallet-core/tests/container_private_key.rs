//! Container behavior for private-key-backed wallets: a single primary
//! account and no HD derivation.

use wallet_core::{
    MemoryWalletStorage, SecretType, WalletContainer, WalletError, WalletManager,
};

const PRIVATE_KEY: &str = "15b30fbf6d02f91412755a27ad1402f75a0068dfae968420095c6b632d54f816";
const ADDRESS: &str = "0x7467594Dd44629415864Af5BcBf861b0C886afAD";
const PASSWORD: &str = "12345678";

fn imported_container() -> WalletContainer {
    let manager = WalletManager::new(MemoryWalletStorage::new("tests"));
    manager
        .import_private_key(PRIVATE_KEY, PASSWORD, None)
        .unwrap()
}

#[test]
fn secret_type_is_private_key() {
    assert_eq!(imported_container().secret_type(), SecretType::PrivateKey);
}

#[test]
fn roster_has_exactly_one_account() {
    let container = imported_container();
    assert_eq!(container.accounts().len(), 1);

    let account = &container.accounts()[0];
    assert_eq!(account.address, ADDRESS);
    assert_eq!(account.index, None);
    assert_eq!(account.derivation_path, None);
}

#[test]
fn primary_private_key_decrypts_back() {
    let container = imported_container();
    let key = container.decrypt_primary_private_key(PASSWORD).unwrap();
    assert_eq!(hex::encode(&key[..]), PRIVATE_KEY);
}

#[test]
fn primary_private_key_wrong_password() {
    let container = imported_container();
    assert!(matches!(
        container.decrypt_primary_private_key("bad-password"),
        Err(WalletError::WrongPassword)
    ));
}

#[test]
fn primary_account_has_no_derivation() {
    let container = imported_container();
    let account = container.derive_primary_account(PASSWORD).unwrap();
    assert_eq!(account.address, ADDRESS);
    assert_eq!(account.index, None);
    assert_eq!(account.derivation_path, None);
}

#[test]
fn indexed_derivation_always_fails() {
    let container = imported_container();
    for index in 0..3 {
        assert!(container.derive_account_at(index, PASSWORD).is_err());
    }
}

#[test]
fn pathed_derivation_always_fails() {
    let container = imported_container();
    for index in 0..3 {
        let path = format!("m/44'/60'/0'/0/{index}");
        assert!(matches!(
            container.derive_account(&path, PASSWORD),
            Err(WalletError::UnableToDerive)
        ));
    }
}

#[test]
fn batch_derivation_always_fails() {
    let container = imported_container();
    assert!(matches!(
        container.derive_accounts(0, 99, PASSWORD),
        Err(WalletError::UnableToDerive)
    ));
}

#[test]
fn pathed_key_decryption_always_fails() {
    let container = imported_container();
    for index in 0..3 {
        assert!(container.decrypt_private_key_at(index, PASSWORD).is_err());
        let path = format!("m/44'/60'/0'/0/{index}");
        assert!(container.decrypt_private_key(&path, PASSWORD).is_err());
    }
}

#[test]
fn mnemonic_decryption_is_wrong_type() {
    let container = imported_container();
    assert!(matches!(
        container.decrypt_mnemonic(PASSWORD),
        Err(WalletError::WrongContainerType)
    ));
}

#[test]
fn add_account_replaces_instead_of_appending() {
    let mut container = imported_container();
    container
        .add_account("m/44'/60'/0'/0/5", PASSWORD)
        .unwrap();
    container.add_next_account(PASSWORD).unwrap();

    assert_eq!(container.accounts().len(), 1);
    assert_eq!(container.accounts()[0].address, ADDRESS);
}

#[test]
fn export_roundtrip_preserves_key() {
    let container = imported_container();
    let restored = WalletContainer::from_slice(&container.export().unwrap()).unwrap();

    assert_eq!(restored.secret_type(), SecretType::PrivateKey);
    assert_eq!(restored.accounts(), container.accounts());

    let key = restored.decrypt_primary_private_key(PASSWORD).unwrap();
    assert_eq!(hex::encode(&key[..]), PRIVATE_KEY);
}

#[test]
fn change_password_preserves_key() {
    let mut container = imported_container();
    container.change_password(PASSWORD, "abcdefg").unwrap();

    let key = container.decrypt_primary_private_key("abcdefg").unwrap();
    assert_eq!(hex::encode(&key[..]), PRIVATE_KEY);

    assert!(matches!(
        container.decrypt_primary_private_key(PASSWORD),
        Err(WalletError::WrongPassword)
    ));
}

#[test]
fn zero_x_prefixed_key_imports_identically() {
    let manager = WalletManager::new(MemoryWalletStorage::new("tests"));
    let container = manager
        .import_private_key(&format!("0x{PRIVATE_KEY}"), PASSWORD, None)
        .unwrap();
    assert_eq!(container.accounts()[0].address, ADDRESS);
}
