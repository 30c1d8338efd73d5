//! LMDB-backed key-value slot.
//!
//! [`LocalDbState`] opens (or creates) an LMDB environment in the directory
//! `<name>.lmdb` and stores every key in the environment's unnamed database.
//! Each `read`, `write` and `remove` runs in its own transaction, so a write is
//! durable once it returns and visible to any other process that opens the same
//! directory.

use std::fs;
use std::path::{Path, PathBuf};

use lmdb::{Database, DatabaseFlags, Environment, Transaction, WriteFlags};
use log::{debug, info};

use crate::error::StorageError;
use crate::storage::KeyValueStorage;

pub struct LocalDbState {
    env: Environment,
    db: Database,
    path: PathBuf,
}

impl LocalDbState {
    /// Opens the environment at `<name>.lmdb`, creating the directory if needed.
    ///
    /// `map_size` is the maximum size of the memory map in bytes; writes that
    /// would grow the database past it fail with `MDB_MAP_FULL`.
    pub fn init(name: &str, map_size: usize) -> Result<Self, StorageError> {
        let path = PathBuf::from(format!("{name}.lmdb"));

        if !path.exists() {
            info!("Creating catalog database at: {}", path.display());
            fs::create_dir_all(&path)?;
        }

        let env = Environment::new().set_map_size(map_size).open(&path)?;
        let db = env.create_db(None, DatabaseFlags::empty())?;

        info!("Catalog database opened at: {}", path.display());
        Ok(Self { env, db, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl KeyValueStorage for LocalDbState {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        let txn = self.env.begin_ro_txn()?;
        let value = match txn.get(self.db, &key) {
            Ok(bytes) => Some(bytes.to_vec()),
            Err(lmdb::Error::NotFound) => None,
            Err(e) => return Err(e.into()),
        };
        txn.commit()?;

        match value {
            Some(bytes) => Ok(Some(String::from_utf8(bytes)?)),
            None => Ok(None),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut txn = self.env.begin_rw_txn()?;
        txn.put(self.db, &key, &value, WriteFlags::empty())?;
        txn.commit()?;
        debug!("Wrote {} bytes under '{}'", value.len(), key);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut txn = self.env.begin_rw_txn()?;
        match txn.del(self.db, &key, None) {
            Ok(()) | Err(lmdb::Error::NotFound) => {}
            Err(e) => return Err(e.into()),
        }
        txn.commit()?;
        Ok(())
    }
}
