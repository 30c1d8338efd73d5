//! One storefront session over an LMDB-backed slot: the catalog, the cart and
//! the fallback poller, sharing a single environment.

use std::rc::Rc;
use std::time::Instant;

use log::info;

use crate::cart_state::Cart;
use crate::catalog_state::CatalogStore;
use crate::config::CatalogConfig;
use crate::error::{CatalogResult, StorageError};
use crate::local_db_state::LocalDbState;
use crate::sync::{StorageEvent, StorageWatcher};

pub struct CatalogSession {
    pub store: CatalogStore<Rc<LocalDbState>>,
    pub cart: Cart<Rc<LocalDbState>>,
    watcher: StorageWatcher,
}

impl CatalogSession {
    pub fn open(config: CatalogConfig) -> Result<Self, StorageError> {
        let db = Rc::new(LocalDbState::init(&config.db_name, config.map_size)?);

        let store = CatalogStore::open_with_config(Rc::clone(&db), &config);
        let cart = Cart::load(db, config.cart_key.clone());
        let watcher = StorageWatcher::new(config.poll_interval());

        info!(
            "Catalog session '{}' ready with {} products",
            config.db_name,
            store.len()
        );
        Ok(Self {
            store,
            cart,
            watcher,
        })
    }

    /// Polls storage if the configured interval has elapsed.
    pub fn poll(&mut self) -> CatalogResult<bool> {
        self.watcher.tick(&mut self.store, Instant::now())
    }

    /// Forwards a change notification for `key` from the host.
    pub fn notify_storage_change(&mut self, key: &str) -> CatalogResult<bool> {
        if key == self.cart.key() {
            self.cart.reload();
            return Ok(true);
        }
        self.store.handle_storage_event(&StorageEvent::new(key))
    }
}
