//! Shopping cart persisted next to the catalog.
//!
//! The cart is stored as a JSON array of product records, each with an extra
//! `quantity` field, under its own key. Items are snapshots: later catalog
//! edits do not change what is already in the cart.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::catalog_model::Product;
use crate::error::CatalogResult;
use crate::storage::KeyValueStorage;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    #[serde(flatten)]
    pub product: Product,
    pub quantity: u32,
}

impl CartItem {
    pub fn subtotal(&self) -> f64 {
        self.product.price * f64::from(self.quantity)
    }
}

pub struct Cart<S: KeyValueStorage> {
    storage: S,
    key: String,
    items: Vec<CartItem>,
}

impl<S: KeyValueStorage> Cart<S> {
    /// Loads the cart under `key`. A missing or unreadable cart starts empty.
    pub fn load(storage: S, key: impl Into<String>) -> Self {
        let key = key.into();
        let items = read_items(&storage, &key);
        Self {
            storage,
            key,
            items,
        }
    }

    /// Replaces the in-memory items with what is currently stored.
    pub fn reload(&mut self) {
        self.items = read_items(&self.storage, &self.key);
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of quantities, the number shown on the cart badge.
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    pub fn total(&self) -> f64 {
        self.items.iter().map(CartItem::subtotal).sum()
    }

    /// Adds one unit of `product`; returns the new quantity for that product.
    pub fn add_product(&mut self, product: &Product) -> CatalogResult<u32> {
        let previous = self.items.clone();

        let quantity = match self.items.iter_mut().find(|i| i.product.id == product.id) {
            Some(item) => {
                item.quantity += 1;
                item.quantity
            }
            None => {
                self.items.push(CartItem {
                    product: product.clone(),
                    quantity: 1,
                });
                1
            }
        };

        self.commit(previous)?;
        Ok(quantity)
    }

    /// Sets the quantity for `product_id`; `0` removes the item.
    ///
    /// Returns the updated item, or `None` if it is not in the cart (or was removed).
    pub fn set_quantity(&mut self, product_id: u64, quantity: u32) -> CatalogResult<Option<CartItem>> {
        if quantity == 0 {
            self.remove(product_id)?;
            return Ok(None);
        }

        let Some(index) = self.items.iter().position(|i| i.product.id == product_id) else {
            return Ok(None);
        };

        let previous = self.items.clone();
        self.items[index].quantity = quantity;
        self.commit(previous)?;
        Ok(Some(self.items[index].clone()))
    }

    pub fn remove(&mut self, product_id: u64) -> CatalogResult<Option<CartItem>> {
        let Some(index) = self.items.iter().position(|i| i.product.id == product_id) else {
            return Ok(None);
        };

        let previous = self.items.clone();
        let removed = self.items.remove(index);
        self.commit(previous)?;
        Ok(Some(removed))
    }

    /// Empties the cart and removes its key from storage.
    pub fn clear(&mut self) -> CatalogResult<()> {
        self.storage.remove(&self.key)?;
        self.items.clear();
        Ok(())
    }

    fn commit(&mut self, previous: Vec<CartItem>) -> CatalogResult<()> {
        let result: CatalogResult<()> = serde_json::to_string(&self.items)
            .map_err(Into::into)
            .and_then(|blob| self.storage.write(&self.key, &blob).map_err(Into::into));

        if let Err(e) = result {
            warn!("Cart write failed, change rolled back: {e}");
            self.items = previous;
            return Err(e);
        }

        debug!("Cart saved with {} items", self.items.len());
        Ok(())
    }
}

fn read_items<S: KeyValueStorage>(storage: &S, key: &str) -> Vec<CartItem> {
    match storage.read(key) {
        Ok(Some(blob)) => serde_json::from_str(&blob).unwrap_or_else(|e| {
            warn!("Discarding unreadable cart under '{key}': {e}");
            Vec::new()
        }),
        Ok(None) => Vec::new(),
        Err(e) => {
            warn!("Could not read cart under '{key}': {e}");
            Vec::new()
        }
    }
}
