//! The catalog store: the authoritative product list for one session.
//!
//! [`CatalogStore`] keeps the collection in memory in insertion order and
//! mirrors it to a single storage key as a JSON array. Every mutation writes
//! the full collection back before returning. If that write fails, the
//! in-memory change is undone and the error is returned, so memory never runs
//! ahead of storage.
//!
//! ```
//! use storefront_catalog_core::catalog_model::{ProductDraft, ProductPatch};
//! use storefront_catalog_core::catalog_state::CatalogStore;
//! use storefront_catalog_core::storage::MemoryStorage;
//!
//! let mut store = CatalogStore::open(MemoryStorage::new());
//! assert_eq!(store.len(), 11);
//!
//! let lamp = store.add(ProductDraft::new("Desk Lamp", 24.5, "/img/lamp.png", "home"))?;
//! assert_eq!(lamp.id, 12);
//!
//! let cheaper = store.update(lamp.id, ProductPatch::price(19.0))?.expect("lamp exists");
//! assert_eq!(cheaper.price, 19.0);
//! # Ok::<(), storefront_catalog_core::error::CatalogError>(())
//! ```

use chrono::{NaiveDate, Utc};
use log::{debug, info, warn};
use serde::Serialize;

use crate::catalog_model::{Category, Product, ProductDraft, ProductPatch, ALL_CATEGORIES};
use crate::catalog_query::{ProductQuery, SearchScope};
use crate::config::CatalogConfig;
use crate::error::{CatalogError, CatalogResult};
use crate::seed::{seed_products, KNOWN_BRANDS};
use crate::storage::KeyValueStorage;
use crate::sync::{CatalogEvent, CatalogListener, StorageEvent, SubscriptionId};

/// Counters shown on the admin dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogStats {
    pub total: usize,
    pub in_stock: usize,
    pub featured: usize,
}

/// A category with the number of products currently filed under it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategorySummary {
    pub id: String,
    pub name: String,
    pub description: String,
    pub count: usize,
}

enum SlotState {
    Stored { products: Vec<Product>, blob: String },
    Missing,
    Unreadable(String),
}

pub struct CatalogStore<S: KeyValueStorage> {
    storage: S,
    products_key: String,
    id_counter_key: String,
    products: Vec<Product>,
    // Highest id ever handed out, so ids of deleted products are not reused.
    last_id: u64,
    // Blob last read from or written to storage; reloads skip identical blobs.
    last_synced: Option<String>,
    listeners: Vec<(SubscriptionId, CatalogListener)>,
    next_subscription: u64,
    date_source: Box<dyn Fn() -> NaiveDate>,
}

impl<S: KeyValueStorage> CatalogStore<S> {
    /// Opens the catalog with the default keys.
    pub fn open(storage: S) -> Self {
        Self::open_with_config(storage, &CatalogConfig::default())
    }

    /// Loads the collection from `config.products_key`.
    ///
    /// A missing, unreadable or unparseable slot is replaced by the seed list,
    /// which is written back immediately. This never fails: if that write
    /// fails too, the seed list is served from memory and the next mutation
    /// retries the write.
    pub fn open_with_config(storage: S, config: &CatalogConfig) -> Self {
        let mut store = Self {
            storage,
            products_key: config.products_key.clone(),
            id_counter_key: config.id_counter_key(),
            products: Vec::new(),
            last_id: 0,
            last_synced: None,
            listeners: Vec::new(),
            next_subscription: 1,
            date_source: Box::new(|| Utc::now().date_naive()),
        };

        match store.load_slot() {
            SlotState::Stored { products, blob } => {
                info!(
                    "Loaded {} products from '{}'",
                    products.len(),
                    store.products_key
                );
                store.products = products;
                store.last_synced = Some(blob);
            }
            SlotState::Missing => {
                info!("No catalog under '{}', seeding sample products", store.products_key);
                store.adopt_seed_on_open();
            }
            SlotState::Unreadable(reason) => {
                warn!(
                    "Catalog under '{}' is unreadable ({reason}), falling back to sample products",
                    store.products_key
                );
                store.adopt_seed_on_open();
            }
        }

        store.refresh_id_counter();
        store
    }

    fn adopt_seed_on_open(&mut self) {
        self.products = seed_products();
        if let Err(e) = self.persist() {
            warn!("Failed to persist seed catalog: {e}");
        }
    }

    fn load_slot(&self) -> SlotState {
        match self.storage.read(&self.products_key) {
            Ok(Some(blob)) => match serde_json::from_str::<Vec<Product>>(&blob) {
                Ok(products) => SlotState::Stored { products, blob },
                Err(e) => SlotState::Unreadable(format!("invalid catalog JSON: {e}")),
            },
            Ok(None) => SlotState::Missing,
            Err(e) => SlotState::Unreadable(e.to_string()),
        }
    }

    fn refresh_id_counter(&mut self) {
        let stored = match self.storage.read(&self.id_counter_key) {
            Ok(Some(value)) => value.trim().parse::<u64>().unwrap_or_else(|e| {
                warn!("Ignoring invalid id counter '{value}': {e}");
                0
            }),
            Ok(None) => 0,
            Err(e) => {
                warn!("Could not read id counter: {e}");
                0
            }
        };
        self.last_id = self.last_id.max(stored).max(self.max_id());
    }

    fn max_id(&self) -> u64 {
        self.products.iter().map(|p| p.id).max().unwrap_or(0)
    }

    fn next_id(&self) -> CatalogResult<u64> {
        let highest = self.last_id.max(self.max_id());
        highest
            .checked_add(1)
            .ok_or(CatalogError::IdSpaceExhausted { highest })
    }

    fn persist(&mut self) -> CatalogResult<()> {
        let blob = serde_json::to_string(&self.products)?;
        self.storage.write(&self.products_key, &blob)?;
        debug!(
            "Persisted {} products ({} bytes)",
            self.products.len(),
            blob.len()
        );
        self.last_synced = Some(blob);
        Ok(())
    }

    // Persists the current collection, restoring `previous` if the write fails.
    fn commit(&mut self, previous: Vec<Product>) -> CatalogResult<()> {
        if let Err(e) = self.persist() {
            warn!("Catalog write failed, in-memory change rolled back: {e}");
            self.products = previous;
            return Err(e);
        }
        Ok(())
    }

    fn notify(&mut self, event: CatalogEvent) {
        for (_, listener) in self.listeners.iter_mut() {
            listener(&event);
        }
    }

    fn today(&self) -> String {
        (self.date_source)().format("%Y-%m-%d").to_string()
    }

    /// Replaces the clock used for `dateAdded` (UTC today by default).
    pub fn set_date_source(&mut self, source: impl Fn() -> NaiveDate + 'static) {
        self.date_source = Box::new(source);
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn products_key(&self) -> &str {
        &self.products_key
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Borrowed view of the collection in catalog order.
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Owned copy of the collection; changing it does not affect the store.
    pub fn get_all(&self) -> Vec<Product> {
        self.products.clone()
    }

    pub fn get_by_id(&self, id: u64) -> Option<Product> {
        self.products.iter().find(|p| p.id == id).cloned()
    }

    /// Validates `draft`, assigns the next id and today's date, appends and persists.
    pub fn add(&mut self, draft: ProductDraft) -> CatalogResult<Product> {
        draft.validate()?;

        let id = self.next_id()?;
        let product = draft.into_product(id, self.today());

        let previous = self.products.clone();
        self.products.push(product.clone());
        self.commit(previous)?;

        self.last_id = id;
        if let Err(e) = self.storage.write(&self.id_counter_key, &id.to_string()) {
            warn!("Failed to persist id counter {id}: {e}");
        }

        info!("Added product {} '{}'", product.id, product.name);
        self.notify(CatalogEvent::Added(product.clone()));
        Ok(product)
    }

    /// Merges `patch` into the product with `id`.
    ///
    /// Returns `Ok(None)` if no product has that id; nothing is created. An
    /// empty patch returns the product without writing or notifying.
    pub fn update(&mut self, id: u64, patch: ProductPatch) -> CatalogResult<Option<Product>> {
        patch.validate()?;

        let Some(index) = self.products.iter().position(|p| p.id == id) else {
            debug!("Update skipped, product {id} not found");
            return Ok(None);
        };

        if patch.is_empty() {
            return Ok(Some(self.products[index].clone()));
        }

        let previous = self.products.clone();
        patch.apply_to(&mut self.products[index]);
        self.commit(previous)?;

        let updated = self.products[index].clone();
        info!("Updated product {id}");
        self.notify(CatalogEvent::Updated(updated.clone()));
        Ok(Some(updated))
    }

    /// Removes the first product with `id` and returns it.
    pub fn delete(&mut self, id: u64) -> CatalogResult<Option<Product>> {
        let Some(index) = self.products.iter().position(|p| p.id == id) else {
            debug!("Delete skipped, product {id} not found");
            return Ok(None);
        };

        let previous = self.products.clone();
        let removed = self.products.remove(index);
        self.commit(previous)?;

        info!("Deleted product {id} '{}'", removed.name);
        self.notify(CatalogEvent::Deleted(removed.clone()));
        Ok(Some(removed))
    }

    /// Discards every product and restores the seed list.
    ///
    /// The id counter is kept, so ids handed out before the reset are not
    /// assigned again.
    pub fn reset_to_seed(&mut self) -> CatalogResult<()> {
        let previous = std::mem::replace(&mut self.products, seed_products());
        self.commit(previous)?;

        warn!("Catalog reset to {} sample products", self.products.len());
        self.notify(CatalogEvent::Reset);
        Ok(())
    }

    /// Case-insensitive substring search over name, description and category.
    pub fn search_by_text(&self, query: &str) -> Vec<Product> {
        let needle = query.to_lowercase();
        self.products
            .iter()
            .filter(|p| SearchScope::Catalog.matches(p, &needle))
            .cloned()
            .collect()
    }

    /// Products in `category_id`; `"all"` returns everything.
    pub fn filter_by_category(&self, category_id: &str) -> Vec<Product> {
        if category_id == ALL_CATEGORIES {
            return self.get_all();
        }
        self.products
            .iter()
            .filter(|p| p.category == category_id)
            .cloned()
            .collect()
    }

    pub fn featured(&self) -> Vec<Product> {
        self.products.iter().filter(|p| p.featured).cloned().collect()
    }

    /// Products whose brand equals `brand`, ignoring case.
    pub fn by_brand(&self, brand: &str) -> Vec<Product> {
        let wanted = brand.to_lowercase();
        self.products
            .iter()
            .filter(|p| {
                p.brand
                    .as_deref()
                    .is_some_and(|b| b.to_lowercase() == wanted)
            })
            .cloned()
            .collect()
    }

    pub fn brands(&self) -> &'static [&'static str] {
        &KNOWN_BRANDS
    }

    pub fn stats(&self) -> CatalogStats {
        CatalogStats {
            total: self.products.len(),
            in_stock: self.products.iter().filter(|p| p.in_stock).count(),
            featured: self.products.iter().filter(|p| p.featured).count(),
        }
    }

    /// The category table with live counts, `"all"` first.
    pub fn categories(&self) -> Vec<CategorySummary> {
        let mut summaries = vec![CategorySummary {
            id: ALL_CATEGORIES.to_string(),
            name: "All Categories".to_string(),
            description: "Browse all products".to_string(),
            count: self.products.len(),
        }];

        summaries.extend(Category::ALL.into_iter().map(|category| CategorySummary {
            id: category.id().to_string(),
            name: category.display_name().to_string(),
            description: category.description().to_string(),
            count: self
                .products
                .iter()
                .filter(|p| p.category == category.id())
                .count(),
        }));

        summaries
    }

    /// Runs the storefront filter pipeline over the collection.
    pub fn query(&self, query: &ProductQuery) -> Vec<Product> {
        query.apply(&self.products)
    }

    /// Re-reads the products slot and adopts it if another session changed it.
    ///
    /// - unchanged blob: nothing happens, returns `false`
    /// - new blob: adopted, listeners get [`CatalogEvent::Reloaded`]
    /// - slot removed: the seed list is adopted and written back
    /// - unreadable blob: the in-memory collection is kept, returns `false`
    pub fn reload_from_storage(&mut self) -> CatalogResult<bool> {
        match self.load_slot() {
            SlotState::Stored { products, blob } => {
                if self.last_synced.as_deref() == Some(blob.as_str()) {
                    return Ok(false);
                }

                self.products = products;
                self.last_synced = Some(blob);
                self.refresh_id_counter();

                let count = self.products.len();
                info!("Reloaded {count} products changed by another session");
                self.notify(CatalogEvent::Reloaded { count });
                Ok(true)
            }
            SlotState::Missing => {
                info!("Catalog slot '{}' was cleared, re-seeding", self.products_key);
                let previous = std::mem::replace(&mut self.products, seed_products());
                self.commit(previous)?;
                self.notify(CatalogEvent::Reset);
                Ok(true)
            }
            SlotState::Unreadable(reason) => {
                warn!("Ignoring unreadable catalog update: {reason}");
                Ok(false)
            }
        }
    }

    /// Entry point for storage change notifications.
    ///
    /// Events for other keys are ignored.
    pub fn handle_storage_event(&mut self, event: &StorageEvent) -> CatalogResult<bool> {
        if event.key == self.id_counter_key {
            self.refresh_id_counter();
            return Ok(false);
        }
        if event.key != self.products_key {
            return Ok(false);
        }
        self.reload_from_storage()
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&CatalogEvent) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns `false` if `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sub, _)| *sub != id);
        self.listeners.len() != before
    }
}
