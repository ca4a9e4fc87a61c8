use std::collections::BTreeMap;

use crate::error::WalletError;

/// Key-value persistence for exported container blobs.
///
/// Implementations address entries by a backend-chosen prefix plus the
/// container identifier and treat every call as a scoped, synchronous,
/// possibly-failing operation: backend resources must be released on every
/// exit path. Blobs are opaque here; parsing happens in the manager.
pub trait WalletStorage {
    fn count(&self) -> usize;

    fn load_all(&self) -> Result<Vec<Vec<u8>>, WalletError>;

    fn load(&self, identifier: &str) -> Result<Option<Vec<u8>>, WalletError>;

    fn save(&mut self, identifier: &str, blob: &[u8]) -> Result<(), WalletError>;

    fn delete(&mut self, identifier: &str) -> Result<(), WalletError>;

    fn delete_all(&mut self) -> Result<(), WalletError>;
}

/// In-memory storage for tests and ephemeral embedders.
///
/// Keys are namespaced as `{prefix}.{identifier}`; iteration order is the
/// key order, so `load_all` is deterministic.
#[derive(Debug, Default)]
pub struct MemoryWalletStorage {
    prefix: String,
    entries: BTreeMap<String, Vec<u8>>,
}

impl MemoryWalletStorage {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            entries: BTreeMap::new(),
        }
    }

    fn container_key(&self, identifier: &str) -> String {
        format!("{}.{}", self.prefix, identifier)
    }
}

impl WalletStorage for MemoryWalletStorage {
    fn count(&self) -> usize {
        self.entries.len()
    }

    fn load_all(&self) -> Result<Vec<Vec<u8>>, WalletError> {
        Ok(self.entries.values().cloned().collect())
    }

    fn load(&self, identifier: &str) -> Result<Option<Vec<u8>>, WalletError> {
        Ok(self.entries.get(&self.container_key(identifier)).cloned())
    }

    fn save(&mut self, identifier: &str, blob: &[u8]) -> Result<(), WalletError> {
        let key = self.container_key(identifier);
        self.entries.insert(key, blob.to_vec());
        Ok(())
    }

    fn delete(&mut self, identifier: &str) -> Result<(), WalletError> {
        let key = self.container_key(identifier);
        self.entries.remove(&key);
        Ok(())
    }

    fn delete_all(&mut self) -> Result<(), WalletError> {
        self.entries.clear();
        Ok(())
    }
}
