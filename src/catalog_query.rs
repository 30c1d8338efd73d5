//! Storefront query composition.
//!
//! A [`ProductQuery`] narrows and orders a product list in a fixed sequence:
//!
//! 1. text search (fields chosen by [`SearchScope`])
//! 2. price range, inclusive on both ends
//! 3. minimum rating (skipped when the threshold is `0`)
//! 4. category (skipped for `"all"`)
//! 5. sort
//!
//! Sorting is stable, so ties keep their catalog order and
//! [`SortKey::Default`] leaves the order untouched.
//!
//! The query deserializes from the filter object storefront front-ends keep:
//!
//! ```
//! use storefront_catalog_core::catalog_query::{ProductQuery, SortKey};
//!
//! let query: ProductQuery = serde_json::from_str(
//!     r#"{"priceRange": {"min": 0, "max": 500}, "rating": 4, "sortBy": "price-high"}"#,
//! )?;
//! assert_eq!(query.sort_by, SortKey::PriceHigh);
//! assert_eq!(query.category, "all");
//! # Ok::<(), serde_json::Error>(())
//! ```

use std::cmp::Ordering;

use icu_collator::{Collator, CollatorOptions};
use log::warn;
use serde::{Deserialize, Serialize};

use crate::catalog_model::{Product, ALL_CATEGORIES};

/// Upper bound of the storefront's price slider.
pub const STOREFRONT_MAX_PRICE: f64 = 2000.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
}

impl PriceRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// The storefront's initial slider position, `[0, 2000]`.
    pub fn storefront_default() -> Self {
        Self::new(0.0, STOREFRONT_MAX_PRICE)
    }

    pub fn contains(&self, price: f64) -> bool {
        price >= self.min && price <= self.max
    }
}

impl Default for PriceRange {
    fn default() -> Self {
        Self::new(0.0, f64::INFINITY)
    }
}

/// Which fields the text stage matches against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchScope {
    /// Name only, as the storefront grid searches.
    #[default]
    Storefront,
    /// Name, description and category.
    Catalog,
    /// Name, description and brand, as the admin editor searches.
    Admin,
}

impl SearchScope {
    /// `needle` must already be lowercase.
    pub fn matches(self, product: &Product, needle: &str) -> bool {
        if needle.is_empty() {
            return true;
        }

        let name = Product::field_contains(&product.name, needle);
        match self {
            SearchScope::Storefront => name,
            SearchScope::Catalog => {
                name || Product::field_contains(&product.description, needle)
                    || Product::field_contains(&product.category, needle)
            }
            SearchScope::Admin => {
                name || Product::field_contains(&product.description, needle)
                    || product
                        .brand
                        .as_deref()
                        .is_some_and(|b| Product::field_contains(b, needle))
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortKey {
    #[serde(rename = "price-low")]
    PriceLow,
    #[serde(rename = "price-high")]
    PriceHigh,
    #[serde(rename = "rating")]
    Rating,
    #[serde(rename = "name")]
    Name,
    /// Catalog order. Unrecognized sort keys fall back to this.
    #[default]
    #[serde(rename = "default", other)]
    Default,
}

impl SortKey {
    pub fn sort(self, products: &mut [Product]) {
        match self {
            SortKey::PriceLow => products.sort_by(|a, b| cmp_f64(a.price, b.price)),
            SortKey::PriceHigh => products.sort_by(|a, b| cmp_f64(b.price, a.price)),
            SortKey::Rating => products.sort_by(|a, b| cmp_f64(b.rating, a.rating)),
            SortKey::Name => match root_collator() {
                Some(collator) => products.sort_by(|a, b| collator.compare(&a.name, &b.name)),
                None => products.sort_by(|a, b| fallback_compare(&a.name, &b.name)),
            },
            SortKey::Default => {}
        }
    }
}

fn cmp_f64(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

/// Orders names with the Unicode root collation: accents and case only break
/// ties, so `"Éclair"` sorts before `"Fan"` and `"apple"` before `"Apple"`.
pub fn locale_compare(a: &str, b: &str) -> Ordering {
    match root_collator() {
        Some(collator) => collator.compare(a, b),
        None => fallback_compare(a, b),
    }
}

fn root_collator() -> Option<Collator> {
    match Collator::try_new(&Default::default(), CollatorOptions::new()) {
        Ok(collator) => Some(collator),
        Err(e) => {
            warn!("Root collation unavailable, sorting names by code point: {e}");
            None
        }
    }
}

fn fallback_compare(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| b.cmp(a))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProductQuery {
    pub search: String,
    pub search_scope: SearchScope,
    pub price_range: PriceRange,
    /// Minimum rating; `0` disables the stage.
    pub rating: f64,
    pub category: String,
    pub sort_by: SortKey,
}

impl Default for ProductQuery {
    fn default() -> Self {
        Self {
            search: String::new(),
            search_scope: SearchScope::default(),
            price_range: PriceRange::default(),
            rating: 0.0,
            category: ALL_CATEGORIES.to_string(),
            sort_by: SortKey::default(),
        }
    }
}

impl ProductQuery {
    /// The filter state the storefront starts with.
    pub fn storefront() -> Self {
        Self {
            price_range: PriceRange::storefront_default(),
            ..Self::default()
        }
    }

    pub fn with_search(mut self, search: impl Into<String>, scope: SearchScope) -> Self {
        self.search = search.into();
        self.search_scope = scope;
        self
    }

    pub fn with_price_range(mut self, min: f64, max: f64) -> Self {
        self.price_range = PriceRange::new(min, max);
        self
    }

    pub fn with_min_rating(mut self, rating: f64) -> Self {
        self.rating = rating;
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn sorted_by(mut self, sort_by: SortKey) -> Self {
        self.sort_by = sort_by;
        self
    }

    /// True when the query differs from the storefront's initial filters.
    pub fn has_active_filters(&self) -> bool {
        let initial = Self::storefront();
        self.category != initial.category
            || self.rating > 0.0
            || self.sort_by != initial.sort_by
            || self.price_range.min > initial.price_range.min
            || self.price_range.max < initial.price_range.max
    }

    /// Runs every stage over `products` and returns the matching copies.
    pub fn apply(&self, products: &[Product]) -> Vec<Product> {
        let needle = self.search.to_lowercase();
        let mut result: Vec<Product> = products
            .iter()
            .filter(|p| self.search_scope.matches(p, &needle))
            .filter(|p| self.price_range.contains(p.price))
            .filter(|p| self.rating <= 0.0 || p.rating >= self.rating)
            .filter(|p| self.category == ALL_CATEGORIES || p.category == self.category)
            .cloned()
            .collect();

        self.sort_by.sort(&mut result);
        result
    }
}
