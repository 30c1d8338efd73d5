//! Runtime configuration for a catalog session.

use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const DEFAULT_DB_NAME: &str = "storefront_catalog";
pub const DEFAULT_PRODUCTS_KEY: &str = "ecommerce_products";
pub const DEFAULT_CART_KEY: &str = "cart";
pub const DEFAULT_MAP_SIZE: usize = 10 * 1024 * 1024;
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1000;

/// Settings supplied by the host application.
///
/// Every field has a default, so `{}` is a valid configuration:
///
/// ```
/// use storefront_catalog_core::config::CatalogConfig;
///
/// let config = CatalogConfig::from_json(r#"{"db_name": "shop"}"#)?;
/// assert_eq!(config.db_name, "shop");
/// assert_eq!(config.products_key, "ecommerce_products");
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// LMDB environment name; the directory is `<db_name>.lmdb`.
    pub db_name: String,
    /// Key holding the product collection.
    pub products_key: String,
    /// Key holding the shopping cart.
    pub cart_key: String,
    /// LMDB memory map size in bytes.
    pub map_size: usize,
    /// Fallback polling interval for hosts without change notifications.
    pub poll_interval_ms: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            db_name: DEFAULT_DB_NAME.to_string(),
            products_key: DEFAULT_PRODUCTS_KEY.to_string(),
            cart_key: DEFAULT_CART_KEY.to_string(),
            map_size: DEFAULT_MAP_SIZE,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl CatalogConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Key storing the highest product id ever assigned.
    pub fn id_counter_key(&self) -> String {
        format!("{}_last_id", self.products_key)
    }
}
