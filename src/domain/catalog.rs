//! Product catalog
//!
//! Read-only view over externally sourced product records. The catalog never
//! fetches anything itself; surrounding code hands it the raw JSON payload
//! and it either swaps in the parsed list or keeps the cached one.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Immutable product record, snapshot of what the catalog endpoint returned.
///
/// Prices are integer minor units (paise). `original_price`, when present,
/// is the pre-discount price and is expected to be >= `price`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: i64,
    #[serde(default)]
    pub original_price: Option<i64>,
    pub images: Vec<String>,
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub in_stock: bool,
    #[serde(default)]
    pub featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("product not found")]
    NotFound,
    #[error("catalog source unavailable")]
    Unavailable,
}

/// Read-only product listing with derived queries.
#[derive(Clone, Debug, Default)]
pub struct ProductCatalog {
    products: Vec<Product>,
}

impl ProductCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_products(products: Vec<Product>) -> Self {
        Self { products }
    }

    /// Replaces the product list with the parsed payload.
    ///
    /// A payload that fails to parse leaves the cached list untouched and
    /// reports `Unavailable`, so a flaky catalog endpoint degrades to stale
    /// data instead of an empty storefront.
    pub fn refresh_from_json(&mut self, payload: &str) -> Result<usize, CatalogError> {
        match serde_json::from_str::<Vec<Product>>(payload) {
            Ok(products) => {
                let count = products.len();
                self.products = products;
                tracing::debug!(count, "catalog refreshed");
                Ok(count)
            }
            Err(err) => {
                tracing::warn!(%err, "catalog payload unreadable, keeping cached list");
                Err(CatalogError::Unavailable)
            }
        }
    }

    /// All known products, stable insertion order.
    pub fn all(&self) -> &[Product] {
        &self.products
    }

    pub fn by_id(&self, id: &str) -> Result<&Product, CatalogError> {
        self.products
            .iter()
            .find(|p| p.id == id)
            .ok_or(CatalogError::NotFound)
    }

    /// Products created within the last `window_days` before `now`, newest
    /// first; ties keep catalog order. `now` is explicit to keep the query
    /// deterministic.
    pub fn new_arrivals(&self, window_days: i64, now: DateTime<Utc>) -> Vec<&Product> {
        let cutoff = now - Duration::days(window_days);
        let mut arrivals: Vec<&Product> = self
            .products
            .iter()
            .filter(|p| p.created_at >= cutoff)
            .collect();
        arrivals.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        arrivals
    }

    pub fn by_category(&self, category: &str) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|p| p.category == category)
            .collect()
    }

    pub fn featured(&self) -> Vec<&Product> {
        self.products.iter().filter(|p| p.featured).collect()
    }

    /// Same-category products excluding `product` itself, catalog order.
    pub fn related(&self, product: &Product, limit: usize) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|p| p.category == product.category && p.id != product.id)
            .take(limit)
            .collect()
    }
}
