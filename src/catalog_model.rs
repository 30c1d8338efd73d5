//! Product records and the payloads used to create and modify them.
//!
//! [`Product`] is the persisted form. Its JSON field names (`inStock`,
//! `dateAdded`, ...) match what storefront front-ends already keep in local
//! storage, so existing blobs load without migration.
//!
//! [`ProductDraft`] and [`ProductPatch`] are the inputs to
//! [`CatalogStore::add`](crate::catalog_state::CatalogStore::add) and
//! [`CatalogStore::update`](crate::catalog_state::CatalogStore::update). Both
//! are validated before they touch the collection.

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::error::{CatalogError, CatalogResult};

pub const MIN_RATING: f64 = 0.0;
pub const MAX_RATING: f64 = 5.0;

/// Category id that disables category filtering.
pub const ALL_CATEGORIES: &str = "all";

/// A sellable item.
///
/// Fields other than `id` fall back to defaults when a stored record omits
/// them. Unknown fields are kept in `extra` and written back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_in_stock")]
    pub in_stock: bool,
    #[serde(default)]
    pub featured: bool,
    /// `YYYY-MM-DD`, set once when the record is created.
    #[serde(default)]
    pub date_added: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, JsonValue>,
}

fn default_in_stock() -> bool {
    true
}

impl Product {
    /// Case-insensitive substring match; `needle` must already be lowercase.
    pub(crate) fn field_contains(field: &str, needle: &str) -> bool {
        field.to_lowercase().contains(needle)
    }
}

/// Input for creating a product.
///
/// Required: `name`, `price`, `image`, `category`. Everything else is optional.
/// Missing strings deserialize as empty and are reported by [`validate`](Self::validate).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductDraft {
    pub name: String,
    pub price: Option<f64>,
    pub rating: Option<f64>,
    pub image: String,
    pub category: String,
    pub description: String,
    pub in_stock: Option<bool>,
    pub featured: Option<bool>,
    pub brand: Option<String>,
    pub tags: Vec<String>,
}

impl ProductDraft {
    pub fn new(
        name: impl Into<String>,
        price: f64,
        image: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            price: Some(price),
            image: image.into(),
            category: category.into(),
            ..Self::default()
        }
    }

    /// Checks required fields and value ranges, naming the first offending field.
    pub fn validate(&self) -> CatalogResult<()> {
        validate_name(&self.name)?;
        match self.price {
            Some(price) => validate_price(price)?,
            None => return Err(CatalogError::validation("price", "is required")),
        }
        validate_image(&self.image)?;
        validate_category(&self.category)?;
        if let Some(rating) = self.rating {
            validate_rating(rating)?;
        }
        Ok(())
    }

    /// Builds the stored record. Callers validate first.
    pub(crate) fn into_product(self, id: u64, date_added: String) -> Product {
        Product {
            id,
            name: self.name,
            price: self.price.unwrap_or_default(),
            rating: clamp_rating(self.rating.unwrap_or(MIN_RATING)),
            image: self.image,
            category: self.category,
            description: self.description,
            in_stock: self.in_stock.unwrap_or(true),
            featured: self.featured.unwrap_or(false),
            date_added,
            brand: self.brand.filter(|b| !b.trim().is_empty()),
            tags: normalize_tags(self.tags),
            extra: BTreeMap::new(),
        }
    }
}

/// A shallow update: every `Some` field overwrites the stored value.
///
/// `id` and `dateAdded` are not patchable; JSON patches that carry them are
/// accepted and those keys ignored. `brand: Some(None)` clears the brand.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub rating: Option<f64>,
    pub image: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub in_stock: Option<bool>,
    pub featured: Option<bool>,
    #[serde(deserialize_with = "deserialize_some")]
    pub brand: Option<Option<String>>,
    pub tags: Option<Vec<String>>,
}

// Distinguishes an explicit `null` (clear) from an absent key (keep).
fn deserialize_some<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

impl ProductPatch {
    pub fn price(price: f64) -> Self {
        Self {
            price: Some(price),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn validate(&self) -> CatalogResult<()> {
        if let Some(name) = &self.name {
            validate_name(name)?;
        }
        if let Some(price) = self.price {
            validate_price(price)?;
        }
        if let Some(image) = &self.image {
            validate_image(image)?;
        }
        if let Some(category) = &self.category {
            validate_category(category)?;
        }
        if let Some(rating) = self.rating {
            validate_rating(rating)?;
        }
        Ok(())
    }

    pub(crate) fn apply_to(self, product: &mut Product) {
        if let Some(name) = self.name {
            product.name = name;
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        if let Some(rating) = self.rating {
            product.rating = clamp_rating(rating);
        }
        if let Some(image) = self.image {
            product.image = image;
        }
        if let Some(category) = self.category {
            product.category = category;
        }
        if let Some(description) = self.description {
            product.description = description;
        }
        if let Some(in_stock) = self.in_stock {
            product.in_stock = in_stock;
        }
        if let Some(featured) = self.featured {
            product.featured = featured;
        }
        if let Some(brand) = self.brand {
            product.brand = brand.filter(|b| !b.trim().is_empty());
        }
        if let Some(tags) = self.tags {
            product.tags = normalize_tags(tags);
        }
    }
}

/// The fixed set of product categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Electronics,
    Clothing,
    Home,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Electronics, Category::Clothing, Category::Home];

    pub fn id(self) -> &'static str {
        match self {
            Category::Electronics => "electronics",
            Category::Clothing => "clothing",
            Category::Home => "home",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Category::Electronics => "Electronics",
            Category::Clothing => "Clothing & Fashion",
            Category::Home => "Home & Appliances",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Category::Electronics => "Phones, laptops, TVs, watches, and electronic gadgets",
            Category::Clothing => "Fashion apparel, shoes, and accessories",
            Category::Home => "Home appliances, decor, and household items",
        }
    }

    pub fn from_id(id: &str) -> Option<Category> {
        Category::ALL.into_iter().find(|c| c.id() == id)
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

pub fn clamp_rating(rating: f64) -> f64 {
    if rating.is_nan() {
        MIN_RATING
    } else {
        rating.clamp(MIN_RATING, MAX_RATING)
    }
}

fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    tags.into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

fn validate_name(name: &str) -> CatalogResult<()> {
    if name.trim().is_empty() {
        return Err(CatalogError::validation("name", "is required"));
    }
    Ok(())
}

fn validate_price(price: f64) -> CatalogResult<()> {
    if !price.is_finite() {
        return Err(CatalogError::validation("price", "must be a finite number"));
    }
    if price < 0.0 {
        return Err(CatalogError::validation(
            "price",
            format!("must not be negative, got {price}"),
        ));
    }
    Ok(())
}

// Out-of-range ratings are clamped, only non-numbers are rejected.
fn validate_rating(rating: f64) -> CatalogResult<()> {
    if rating.is_nan() {
        return Err(CatalogError::validation("rating", "must be a number"));
    }
    Ok(())
}

fn validate_image(image: &str) -> CatalogResult<()> {
    if image.trim().is_empty() {
        return Err(CatalogError::validation("image", "is required"));
    }
    Ok(())
}

fn validate_category(category: &str) -> CatalogResult<()> {
    if category.trim().is_empty() {
        return Err(CatalogError::validation("category", "is required"));
    }
    if Category::from_id(category).is_none() {
        return Err(CatalogError::validation(
            "category",
            format!("unknown category '{category}'"),
        ));
    }
    Ok(())
}
