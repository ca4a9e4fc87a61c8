use serde::{Deserialize, Serialize};

/// One entry in a container's account roster.
///
/// `index` and `derivation_path` are both present for HD-derived accounts
/// and both absent for a primary private-key account; when present, the
/// path's final component equals `index`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletAccount {
    /// EIP-55 checksum-cased address.
    pub address: String,
    /// BIP-44 address-index component.
    #[serde(default)]
    pub index: Option<u32>,
    /// Canonical derivation path.
    #[serde(default)]
    pub derivation_path: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_camel_case_path() {
        let account = WalletAccount {
            address: "0xED4a971eA7948B79265C3CA0b9F79D9b56c0022d".into(),
            index: Some(0),
            derivation_path: Some("m/44'/60'/0'/0/0".into()),
        };

        let json = serde_json::to_value(&account).unwrap();
        assert_eq!(json["derivationPath"], "m/44'/60'/0'/0/0");
        assert_eq!(json["index"], 0);
    }

    #[test]
    fn primary_account_fields_are_null() {
        let account = WalletAccount {
            address: "0x7467594Dd44629415864Af5BcBf861b0C886afAD".into(),
            index: None,
            derivation_path: None,
        };

        let json = serde_json::to_value(&account).unwrap();
        assert!(json["index"].is_null());
        assert!(json["derivationPath"].is_null());
    }

    #[test]
    fn deserializes_with_missing_optionals() {
        let account: WalletAccount =
            serde_json::from_str(r#"{"address": "0xabc"}"#).unwrap();
        assert_eq!(account.index, None);
        assert_eq!(account.derivation_path, None);
    }
}
