//! The persistence boundary the catalog reads and writes through.
//!
//! A [`KeyValueStorage`] is a flat map of string keys to string blobs with no
//! cross-key transactions, the same contract a browser's local storage offers.
//! The crate ships two implementations:
//!
//! - [`MemoryStorage`]: an in-process map. Clones share the same map, which lets
//!   tests model two sessions looking at one storage slot.
//! - [`LocalDbState`](crate::local_db_state::LocalDbState): an LMDB environment
//!   on disk.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use crate::error::StorageError;

/// String-keyed blob storage.
///
/// All methods take `&self`; implementations handle their own interior
/// mutability (LMDB transactions, `RefCell`).
pub trait KeyValueStorage {
    /// Returns the value stored under `key`, or `None` if the key is absent.
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Stores `value` under `key`, replacing any previous value.
    fn write(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Removes `key`. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

impl<T: KeyValueStorage + ?Sized> KeyValueStorage for &T {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).read(key)
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).write(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

impl<T: KeyValueStorage + ?Sized> KeyValueStorage for Rc<T> {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).read(key)
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).write(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

#[derive(Debug, Default)]
struct MemoryInner {
    entries: BTreeMap<String, String>,
    quota: Option<usize>,
}

/// In-memory [`KeyValueStorage`].
///
/// Cloning yields another handle to the same map. An optional byte quota
/// (sum of key and value lengths) emulates the size limit of browser storage;
/// writes that would exceed it fail with [`StorageError::QuotaExceeded`] and
/// leave the previous value in place.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    inner: Rc<RefCell<MemoryInner>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a storage that rejects writes once `limit` bytes are in use.
    pub fn with_quota(limit: usize) -> Self {
        let storage = Self::default();
        storage.set_quota(Some(limit));
        storage
    }

    /// Changes the byte quota. `None` removes the limit.
    pub fn set_quota(&self, limit: Option<usize>) {
        self.inner.borrow_mut().quota = limit;
    }

    /// Total bytes currently stored (keys plus values).
    pub fn used_bytes(&self) -> usize {
        self.inner
            .borrow()
            .entries
            .iter()
            .map(|(k, v)| k.len() + v.len())
            .sum()
    }

    pub fn keys(&self) -> Vec<String> {
        self.inner.borrow().entries.keys().cloned().collect()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.inner.borrow().entries.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut inner = self.inner.borrow_mut();

        if let Some(limit) = inner.quota {
            let current = inner
                .entries
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum::<usize>();
            let requested = current + key.len() + value.len();
            if requested > limit {
                return Err(StorageError::QuotaExceeded {
                    key: key.to_string(),
                    requested,
                    limit,
                });
            }
        }

        inner.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.inner.borrow_mut().entries.remove(key);
        Ok(())
    }
}
