//! # Storefront Catalog Core
//!
//! The product catalog behind a local-first storefront: a single ordered list
//! of products kept in memory and mirrored, after every change, to one slot of
//! a key-value store. The same core serves the shopper-facing grid (search,
//! filters, sorting) and the admin editor (add, edit, delete, reset).
//!
//! ## Features
//!
//! - **Seeded on first run**: an empty or corrupt slot falls back to an
//!   11-product sample catalog, written back immediately
//! - **Write-through**: `add`, `update`, `delete` and `reset_to_seed` persist the
//!   full collection before returning; a failed write is reported and undone
//! - **Stable ids**: ids grow monotonically and are never handed out twice
//! - **Storefront queries**: search → price range → rating → category → sort
//! - **Multi-session aware**: change notifications or interval polling pick up
//!   writes made by other sessions sharing the slot
//! - **Pluggable storage**: LMDB on disk ([`local_db_state::LocalDbState`]) or
//!   in memory ([`storage::MemoryStorage`])
//!
//! ## Quick Start
//!
//! ```
//! use storefront_catalog_core::catalog_query::{ProductQuery, SortKey};
//! use storefront_catalog_core::catalog_state::CatalogStore;
//! use storefront_catalog_core::storage::MemoryStorage;
//!
//! let store = CatalogStore::open(MemoryStorage::new());
//!
//! let affordable = store.query(
//!     &ProductQuery::default()
//!         .with_price_range(0.0, 500.0)
//!         .with_min_rating(4.5)
//!         .sorted_by(SortKey::PriceLow),
//! );
//! assert_eq!(affordable.first().map(|p| p.name.as_str()), Some("Boat Watch CQ1"));
//! ```
//!
//! ## FFI Functions
//!
//! A UI host (Flutter, a WebView shell) drives a [`session::CatalogSession`]
//! through C-compatible functions. Every function except
//! [`catalog_open`]/[`catalog_open_with_config`] returns an [`AppResponse`]
//! as a JSON C string that must be released with [`catalog_free_string`].
//!
//! - [`catalog_open`], [`catalog_open_with_config`], [`catalog_close`]
//! - [`catalog_get_all`], [`catalog_get_by_id`]
//! - [`catalog_add`], [`catalog_update`], [`catalog_delete`], [`catalog_reset_to_seed`]
//! - [`catalog_search`], [`catalog_filter_by_category`], [`catalog_query`]
//! - [`catalog_stats`], [`catalog_categories`]
//! - [`catalog_refresh`], [`catalog_storage_event`]
//! - [`catalog_cart_get`], [`catalog_cart_add`], [`catalog_cart_set_quantity`],
//!   [`catalog_cart_clear`]

pub mod app_response;
pub mod cart_state;
pub mod catalog_model;
pub mod catalog_query;
pub mod catalog_state;
pub mod config;
pub mod error;
pub mod local_db_state;
pub mod seed;
pub mod session;
pub mod storage;
pub mod sync;

use std::ffi::{CStr, CString};
use std::os::raw::c_char;

use log::{info, warn};
use serde::Serialize;

pub use crate::app_response::AppResponse;
use crate::catalog_model::{ProductDraft, ProductPatch};
use crate::catalog_query::ProductQuery;
use crate::config::CatalogConfig;
use crate::session::CatalogSession;

/// Opens (or creates) the catalog database `<name>.lmdb` with default settings.
///
/// # Parameters
///
/// * `name` - A null-terminated C string containing the database name
///
/// # Returns
///
/// A pointer to the new [`CatalogSession`], or a null pointer on failure.
/// Release it with [`catalog_close`].
///
/// # Examples
///
/// ```no_run
/// use std::ffi::CString;
/// use storefront_catalog_core::{catalog_close, catalog_open};
///
/// let name = CString::new("storefront").unwrap();
/// let session = catalog_open(name.as_ptr());
///
/// if !session.is_null() {
///     catalog_close(session);
/// }
/// ```
///
/// # Errors
///
/// Returns null if the pointer is null, the name is not UTF-8, or the LMDB
/// environment cannot be opened.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn catalog_open(name: *const c_char) -> *mut CatalogSession {
    if name.is_null() {
        warn!("Null name pointer passed to catalog_open");
        return std::ptr::null_mut();
    }

    let name_str = match unsafe { CStr::from_ptr(name).to_str() } {
        Ok(s) => s,
        Err(e) => {
            warn!("Invalid UTF-8 in name parameter: {e}");
            return std::ptr::null_mut();
        }
    };

    let config = CatalogConfig {
        db_name: name_str.to_string(),
        ..CatalogConfig::default()
    };
    open_session(config)
}

/// Opens a session from a JSON [`CatalogConfig`]; omitted fields take defaults.
///
/// ```json
/// { "db_name": "storefront", "products_key": "ecommerce_products", "poll_interval_ms": 1000 }
/// ```
///
/// Returns null on a null pointer, invalid JSON, or an LMDB failure.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn catalog_open_with_config(config_json: *const c_char) -> *mut CatalogSession {
    if config_json.is_null() {
        warn!("Null config pointer passed to catalog_open_with_config");
        return std::ptr::null_mut();
    }

    let json = match unsafe { CStr::from_ptr(config_json).to_str() } {
        Ok(s) => s,
        Err(e) => {
            warn!("Invalid UTF-8 in config parameter: {e}");
            return std::ptr::null_mut();
        }
    };

    match CatalogConfig::from_json(json) {
        Ok(config) => open_session(config),
        Err(e) => {
            warn!("Invalid catalog config: {e}");
            std::ptr::null_mut()
        }
    }
}

fn open_session(config: CatalogConfig) -> *mut CatalogSession {
    info!("Opening catalog database '{}'", config.db_name);

    match CatalogSession::open(config) {
        Ok(session) => Box::into_raw(Box::new(session)),
        Err(e) => {
            warn!("❌ Failed to open catalog database: {e}");
            std::ptr::null_mut()
        }
    }
}

/// Closes a session and releases its LMDB environment.
///
/// The pointer must not be used afterwards.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn catalog_close(session: *mut CatalogSession) -> *const c_char {
    if session.is_null() {
        let error = AppResponse::BadRequest("Null session pointer passed to catalog_close".to_string());
        return response_to_c_string(&error);
    }

    drop(unsafe { Box::from_raw(session) });
    response_to_c_string(&AppResponse::Ok("Catalog session closed".to_string()))
}

/// Releases a string returned by any other `catalog_*` function.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn catalog_free_string(ptr: *const c_char) {
    if ptr.is_null() {
        return;
    }
    drop(unsafe { CString::from_raw(ptr as *mut c_char) });
}

/// Returns every product as a JSON array, in catalog order.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn catalog_get_all(session: *mut CatalogSession) -> *const c_char {
    with_session(session, "catalog_get_all", |s| {
        AppResponse::json(s.store.products())
    })
}

/// Returns the product with `id`, or a `NotFound` response.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn catalog_get_by_id(session: *mut CatalogSession, id: u64) -> *const c_char {
    with_session(session, "catalog_get_by_id", |s| match s.store.get_by_id(id) {
        Some(product) => AppResponse::json(&product),
        None => AppResponse::NotFound(format!("No product found with id: {id}")),
    })
}

/// Creates a product from a JSON draft and returns the stored record.
///
/// # JSON Format
///
/// ```json
/// {
///   "name": "Desk Lamp",
///   "price": 24.5,
///   "image": "/ProductImages/lamp.png",
///   "category": "home",
///   "rating": 4.2,
///   "description": "Adjustable LED lamp",
///   "inStock": true,
///   "featured": false,
///   "brand": "Lumo",
///   "tags": ["lighting", "desk"]
/// }
/// ```
///
/// `name`, `price`, `image` and `category` are required; a missing or invalid
/// field yields a `ValidationError` naming it. `id` and `dateAdded` are
/// assigned by the store.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn catalog_add(session: *mut CatalogSession, json_ptr: *const c_char) -> *const c_char {
    let json_str = match c_ptr_to_string(json_ptr, "JSON") {
        Ok(json) => json,
        Err(err) => return err,
    };

    with_session(session, "catalog_add", |s| {
        let draft: ProductDraft = match serde_json::from_str(&json_str) {
            Ok(d) => d,
            Err(e) => return AppResponse::SerializationError(format!("Invalid JSON: {e}")),
        };

        match s.store.add(draft) {
            Ok(product) => AppResponse::json(&product),
            Err(e) => AppResponse::from(e),
        }
    })
}

/// Applies a JSON patch to the product with `id`.
///
/// Only the keys present in the patch change. `id` and `dateAdded` in the
/// patch are ignored. Returns the updated record, or `NotFound`.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn catalog_update(
    session: *mut CatalogSession,
    id: u64,
    json_ptr: *const c_char,
) -> *const c_char {
    let json_str = match c_ptr_to_string(json_ptr, "JSON") {
        Ok(json) => json,
        Err(err) => return err,
    };

    with_session(session, "catalog_update", |s| {
        let patch: ProductPatch = match serde_json::from_str(&json_str) {
            Ok(p) => p,
            Err(e) => return AppResponse::SerializationError(format!("Error deserializing JSON: {e}")),
        };

        match s.store.update(id, patch) {
            Ok(Some(product)) => AppResponse::json(&product),
            Ok(None) => AppResponse::NotFound(format!("No product found with id: {id}")),
            Err(e) => AppResponse::from(e),
        }
    })
}

/// Deletes the product with `id` and returns the removed record.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn catalog_delete(session: *mut CatalogSession, id: u64) -> *const c_char {
    with_session(session, "catalog_delete", |s| match s.store.delete(id) {
        Ok(Some(product)) => AppResponse::json(&product),
        Ok(None) => AppResponse::NotFound(format!("No product found with id: {id}")),
        Err(e) => AppResponse::from(e),
    })
}

/// Replaces the whole catalog with the sample products.
///
/// This cannot be undone.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn catalog_reset_to_seed(session: *mut CatalogSession) -> *const c_char {
    with_session(session, "catalog_reset_to_seed", |s| match s.store.reset_to_seed() {
        Ok(()) => AppResponse::Ok(format!("Catalog reset to {} products", s.store.len())),
        Err(e) => AppResponse::from(e),
    })
}

/// Case-insensitive search over name, description and category.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn catalog_search(session: *mut CatalogSession, query: *const c_char) -> *const c_char {
    let query = match c_ptr_to_string(query, "query") {
        Ok(q) => q,
        Err(err) => return err,
    };

    with_session(session, "catalog_search", |s| {
        AppResponse::json(&s.store.search_by_text(&query))
    })
}

#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn catalog_filter_by_category(
    session: *mut CatalogSession,
    category: *const c_char,
) -> *const c_char {
    let category = match c_ptr_to_string(category, "category") {
        Ok(c) => c,
        Err(err) => return err,
    };

    with_session(session, "catalog_filter_by_category", |s| {
        AppResponse::json(&s.store.filter_by_category(&category))
    })
}

/// Runs the storefront filter pipeline described by a JSON [`ProductQuery`].
///
/// ```json
/// {
///   "search": "watch",
///   "priceRange": { "min": 0, "max": 2000 },
///   "rating": 4,
///   "category": "electronics",
///   "sortBy": "price-low"
/// }
/// ```
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn catalog_query(session: *mut CatalogSession, json_ptr: *const c_char) -> *const c_char {
    let json_str = match c_ptr_to_string(json_ptr, "JSON") {
        Ok(json) => json,
        Err(err) => return err,
    };

    with_session(session, "catalog_query", |s| {
        match serde_json::from_str::<ProductQuery>(&json_str) {
            Ok(query) => AppResponse::json(&s.store.query(&query)),
            Err(e) => AppResponse::SerializationError(format!("Invalid query JSON: {e}")),
        }
    })
}

#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn catalog_stats(session: *mut CatalogSession) -> *const c_char {
    with_session(session, "catalog_stats", |s| AppResponse::json(&s.store.stats()))
}

#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn catalog_categories(session: *mut CatalogSession) -> *const c_char {
    with_session(session, "catalog_categories", |s| {
        AppResponse::json(&s.store.categories())
    })
}

/// Polls storage for changes made by other sessions.
///
/// Intended for hosts without storage change events; call it from a timer.
/// Polls closer together than the configured interval are skipped. The `Ok`
/// payload is `true` when the catalog was reloaded.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn catalog_refresh(session: *mut CatalogSession) -> *const c_char {
    with_session(session, "catalog_refresh", |s| match s.poll() {
        Ok(changed) => AppResponse::json(&changed),
        Err(e) => AppResponse::from(e),
    })
}

/// Notifies the session that another writer changed `key`.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn catalog_storage_event(session: *mut CatalogSession, key: *const c_char) -> *const c_char {
    let key = match c_ptr_to_string(key, "key") {
        Ok(k) => k,
        Err(err) => return err,
    };

    with_session(session, "catalog_storage_event", |s| {
        match s.notify_storage_change(&key) {
            Ok(changed) => AppResponse::json(&changed),
            Err(e) => AppResponse::from(e),
        }
    })
}

#[derive(Serialize)]
struct CartView<'a> {
    items: &'a [cart_state::CartItem],
    count: u32,
    total: f64,
}

fn cart_view(session: &CatalogSession) -> AppResponse {
    AppResponse::json(&CartView {
        items: session.cart.items(),
        count: session.cart.item_count(),
        total: session.cart.total(),
    })
}

/// Returns `{"items": [...], "count": n, "total": x}`.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn catalog_cart_get(session: *mut CatalogSession) -> *const c_char {
    with_session(session, "catalog_cart_get", |s| cart_view(s))
}

/// Adds one unit of catalog product `id` to the cart and returns the cart.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn catalog_cart_add(session: *mut CatalogSession, id: u64) -> *const c_char {
    with_session(session, "catalog_cart_add", |s| {
        let Some(product) = s.store.get_by_id(id) else {
            return AppResponse::NotFound(format!("No product found with id: {id}"));
        };
        match s.cart.add_product(&product) {
            Ok(_) => cart_view(s),
            Err(e) => AppResponse::from(e),
        }
    })
}

/// Sets the quantity of product `id` in the cart; `0` removes it.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn catalog_cart_set_quantity(
    session: *mut CatalogSession,
    id: u64,
    quantity: u32,
) -> *const c_char {
    with_session(session, "catalog_cart_set_quantity", |s| {
        match s.cart.set_quantity(id, quantity) {
            Ok(_) => cart_view(s),
            Err(e) => AppResponse::from(e),
        }
    })
}

#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn catalog_cart_clear(session: *mut CatalogSession) -> *const c_char {
    with_session(session, "catalog_cart_clear", |s| match s.cart.clear() {
        Ok(()) => cart_view(s),
        Err(e) => AppResponse::from(e),
    })
}

/// Null-checks `session` and runs `f` against it.
fn with_session<F>(session: *mut CatalogSession, fn_name: &str, f: F) -> *const c_char
where
    F: FnOnce(&mut CatalogSession) -> AppResponse,
{
    match unsafe { session.as_mut() } {
        Some(s) => response_to_c_string(&f(s)),
        None => {
            let error = AppResponse::BadRequest(format!("Null session pointer passed to {fn_name}"));
            response_to_c_string(&error)
        }
    }
}

/// Serializes `response` into a C string owned by the caller.
///
/// Returns a null pointer if serialization or C string creation fails.
fn response_to_c_string(response: &AppResponse) -> *const c_char {
    let json = match serde_json::to_string(response) {
        Ok(j) => j,
        Err(e) => {
            warn!("Error serializing response: {e}");
            return std::ptr::null();
        }
    };

    match CString::new(json) {
        Ok(c_str) => c_str.into_raw(),
        Err(e) => {
            warn!("Error creating CString: {e}");
            std::ptr::null()
        }
    }
}

/// Converts a C string argument to a `String`.
///
/// On a null pointer or invalid UTF-8 the `Err` side carries a ready-made
/// `BadRequest` response naming `field_name`.
fn c_ptr_to_string(ptr: *const c_char, field_name: &str) -> Result<String, *const c_char> {
    if ptr.is_null() {
        let error = AppResponse::BadRequest(format!("Null {field_name} pointer"));
        return Err(response_to_c_string(&error));
    }

    match unsafe { CStr::from_ptr(ptr).to_str() } {
        Ok(s) => Ok(s.to_string()),
        Err(e) => {
            let error = AppResponse::BadRequest(format!("Invalid UTF-8 in {field_name}: {e}"));
            Err(response_to_c_string(&error))
        }
    }
}
