//! Cart store
//!
//! Owns the shopper's cart for one session. Every mutation rewrites the
//! persisted payload before returning, so in-memory and stored state never
//! diverge within a process. Payloads read back from storage are untrusted:
//! corrupt or mismatched data degrades to an empty cart.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::domain::catalog::Product;
use crate::domain::events::{CartEvent, DomainEvent};
use crate::storage::StorageBackend;

pub const CART_STORAGE_KEY: &str = "cart";

const DEFAULT_MAX_PER_LINE: u32 = 10;

/// Identity of one cart line: the same product in a different size or
/// color is a separate line.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineKey {
    pub product_id: String,
    pub selected_size: String,
    pub selected_color: String,
}

/// One cart line, carrying a product snapshot taken at add time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineItem {
    pub product: Product,
    pub quantity: u32,
    pub selected_size: String,
    pub selected_color: String,
    pub added_at: DateTime<Utc>,
}

impl CartLineItem {
    pub fn key(&self) -> LineKey {
        LineKey {
            product_id: self.product.id.clone(),
            selected_size: self.selected_size.clone(),
            selected_color: self.selected_color.clone(),
        }
    }

    pub fn line_total(&self) -> i64 {
        self.product.price * i64::from(self.quantity)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CartTotals {
    pub item_count: u32,
    pub subtotal: i64,
    pub total_discount: i64,
}

#[derive(Debug, Error)]
pub enum CartError {
    #[error("quantity must be at least 1")]
    InvalidQuantity,
    #[error("product is out of stock")]
    OutOfStock,
    #[error("item not found in cart")]
    ItemNotFound,
}

/// Cart state machine bound to one storage backend.
///
/// Single-threaded by construction: the UI event loop serializes all
/// mutations, so there is no interior locking.
#[derive(Debug)]
pub struct CartStore<S: StorageBackend> {
    id: String,
    storage: S,
    items: Vec<CartLineItem>,
    max_per_line: u32,
    events: Vec<DomainEvent>,
}

impl<S: StorageBackend> CartStore<S> {
    /// Loads the cart from `storage`, treating anything unreadable as empty.
    pub fn new(storage: S) -> Self {
        Self::with_max_per_line(storage, DEFAULT_MAX_PER_LINE)
    }

    /// As [`CartStore::new`] with a custom per-line quantity ceiling.
    pub fn with_max_per_line(storage: S, max_per_line: u32) -> Self {
        let items = load_items(&storage);
        Self {
            id: Uuid::new_v4().to_string(),
            storage,
            items,
            max_per_line: max_per_line.max(1),
            events: vec![],
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Line items in `added_at` order (insertion order, preserved across
    /// persistence reloads).
    pub fn snapshot(&self) -> &[CartLineItem] {
        &self.items
    }

    /// Adds `quantity` of the product in the given size/color. An existing
    /// line with the same identity key is incremented rather than
    /// duplicated; quantities clamp to the per-line ceiling.
    pub fn add_item(
        &mut self,
        product: &Product,
        size: &str,
        color: &str,
        quantity: u32,
        now: DateTime<Utc>,
    ) -> Result<(), CartError> {
        if quantity < 1 {
            return Err(CartError::InvalidQuantity);
        }
        if !product.in_stock {
            return Err(CartError::OutOfStock);
        }

        let key = LineKey {
            product_id: product.id.clone(),
            selected_size: size.to_string(),
            selected_color: color.to_string(),
        };
        let line_quantity = if let Some(existing) = self.items.iter_mut().find(|i| i.key() == key) {
            existing.quantity = existing.quantity.saturating_add(quantity).min(self.max_per_line);
            existing.quantity
        } else {
            let line = CartLineItem {
                product: product.clone(),
                quantity: quantity.min(self.max_per_line),
                selected_size: size.to_string(),
                selected_color: color.to_string(),
                added_at: now,
            };
            let line_quantity = line.quantity;
            self.items.push(line);
            line_quantity
        };
        tracing::debug!(product_id = %key.product_id, quantity = line_quantity, "cart item added");
        self.raise_event(CartEvent::ItemAdded { key, quantity: line_quantity });
        self.persist();
        Ok(())
    }

    /// Sets the quantity of an existing line. Removal goes through
    /// [`CartStore::remove_item`], not a zero quantity.
    pub fn update_quantity(&mut self, key: &LineKey, quantity: u32) -> Result<(), CartError> {
        if quantity < 1 {
            return Err(CartError::InvalidQuantity);
        }
        let max = self.max_per_line;
        let item = self
            .items
            .iter_mut()
            .find(|i| i.key() == *key)
            .ok_or(CartError::ItemNotFound)?;
        item.quantity = quantity.min(max);
        let quantity = item.quantity;
        self.raise_event(CartEvent::QuantityUpdated { key: key.clone(), quantity });
        self.persist();
        Ok(())
    }

    /// Removes the line if present; absent keys are a no-op, not an error.
    pub fn remove_item(&mut self, key: &LineKey) {
        let before = self.items.len();
        self.items.retain(|i| i.key() != *key);
        if self.items.len() < before {
            self.raise_event(CartEvent::ItemRemoved { key: key.clone() });
            self.persist();
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.raise_event(CartEvent::Cleared);
        self.persist();
    }

    pub fn totals(&self) -> CartTotals {
        self.items.iter().fold(CartTotals::default(), |mut acc, item| {
            let quantity = i64::from(item.quantity);
            acc.item_count += item.quantity;
            acc.subtotal += item.product.price * quantity;
            if let Some(original) = item.product.original_price {
                if original > item.product.price {
                    acc.total_discount += (original - item.product.price) * quantity;
                }
            }
            acc
        })
    }

    /// Drains events raised since the last call.
    pub fn take_events(&mut self) -> Vec<DomainEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    fn raise_event(&mut self, event: CartEvent) {
        self.events.push(DomainEvent::Cart(event));
    }

    fn persist(&mut self) {
        match serde_json::to_string(&self.items) {
            Ok(payload) => self.storage.write(CART_STORAGE_KEY, &payload),
            Err(err) => tracing::warn!(%err, "failed to serialize cart"),
        }
    }
}

/// Deserializes the stored payload, dropping entries that do not match the
/// line-item schema or carry a zero quantity. A payload that is not a JSON
/// array at all yields an empty cart.
fn load_items<S: StorageBackend>(storage: &S) -> Vec<CartLineItem> {
    let Some(payload) = storage.read(CART_STORAGE_KEY) else {
        return vec![];
    };
    let entries: Vec<serde_json::Value> = match serde_json::from_str(&payload) {
        Ok(entries) => entries,
        Err(err) => {
            tracing::warn!(%err, "corrupt cart payload, starting empty");
            return vec![];
        }
    };
    let total = entries.len();
    let items: Vec<CartLineItem> = entries
        .into_iter()
        .filter_map(|entry| serde_json::from_value::<CartLineItem>(entry).ok())
        .filter(|item| item.quantity >= 1)
        .collect();
    if items.len() < total {
        tracing::warn!(dropped = total - items.len(), "dropped invalid cart entries");
    }
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn product(id: &str) -> Product {
        let now = Utc::now();
        Product {
            id: id.into(),
            name: format!("Product {id}"),
            description: String::new(),
            price: 1899,
            original_price: Some(2499),
            images: vec!["/images/products/kurti-1.jpg".into()],
            category: "traditional".into(),
            tags: vec![],
            in_stock: true,
            featured: false,
            created_at: now,
            updated_at: now,
        }
    }

    fn key(id: &str, size: &str, color: &str) -> LineKey {
        LineKey {
            product_id: id.into(),
            selected_size: size.into(),
            selected_color: color.into(),
        }
    }

    #[test]
    fn test_add_merges_on_identity_key() {
        let mut cart = CartStore::new(MemoryStorage::new());
        let now = Utc::now();
        let p = product("p-01");
        cart.add_item(&p, "M", "Red", 1, now).unwrap();
        cart.add_item(&p, "M", "Red", 2, now).unwrap();
        assert_eq!(cart.snapshot().len(), 1);
        assert_eq!(cart.snapshot()[0].quantity, 3);

        // A different size is a separate line.
        cart.add_item(&p, "L", "Red", 1, now).unwrap();
        assert_eq!(cart.snapshot().len(), 2);
    }

    #[test]
    fn test_add_rejects_bad_input() {
        let mut cart = CartStore::new(MemoryStorage::new());
        let now = Utc::now();
        assert!(matches!(
            cart.add_item(&product("p-01"), "M", "Red", 0, now),
            Err(CartError::InvalidQuantity)
        ));
        let mut sold_out = product("p-02");
        sold_out.in_stock = false;
        assert!(matches!(
            cart.add_item(&sold_out, "M", "Red", 1, now),
            Err(CartError::OutOfStock)
        ));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_quantity_clamps_to_ceiling() {
        let mut cart = CartStore::with_max_per_line(MemoryStorage::new(), 5);
        let now = Utc::now();
        let p = product("p-01");
        cart.add_item(&p, "M", "Red", 4, now).unwrap();
        cart.add_item(&p, "M", "Red", 4, now).unwrap();
        assert_eq!(cart.snapshot()[0].quantity, 5);
    }

    #[test]
    fn test_update_quantity() {
        let mut cart = CartStore::new(MemoryStorage::new());
        let now = Utc::now();
        cart.add_item(&product("p-01"), "M", "Red", 1, now).unwrap();
        let k = key("p-01", "M", "Red");
        cart.update_quantity(&k, 4).unwrap();
        assert_eq!(cart.snapshot()[0].quantity, 4);
        assert!(matches!(cart.update_quantity(&k, 0), Err(CartError::InvalidQuantity)));
        assert!(matches!(
            cart.update_quantity(&key("p-99", "M", "Red"), 2),
            Err(CartError::ItemNotFound)
        ));
    }

    #[test]
    fn test_remove_absent_key_is_noop() {
        let mut cart = CartStore::new(MemoryStorage::new());
        let now = Utc::now();
        cart.add_item(&product("p-01"), "M", "Red", 2, now).unwrap();
        cart.remove_item(&key("p-99", "M", "Red"));
        assert_eq!(cart.snapshot().len(), 1);
        cart.remove_item(&key("p-01", "M", "Red"));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_totals() {
        let mut cart = CartStore::new(MemoryStorage::new());
        let now = Utc::now();
        let discounted = product("p-01"); // 1899, was 2499
        let mut full_price = product("p-02");
        full_price.price = 999;
        full_price.original_price = None;
        cart.add_item(&discounted, "M", "Red", 2, now).unwrap();
        cart.add_item(&full_price, "S", "Blue", 1, now).unwrap();
        let totals = cart.totals();
        assert_eq!(totals.item_count, 3);
        assert_eq!(totals.subtotal, 2 * 1899 + 999);
        assert_eq!(totals.total_discount, 2 * 600);
    }

    #[test]
    fn test_persistence_roundtrip() {
        let mut cart = CartStore::new(MemoryStorage::new());
        let now = Utc::now();
        cart.add_item(&product("p-01"), "M", "Red", 2, now).unwrap();
        cart.add_item(&product("p-02"), "S", "Blue", 1, now).unwrap();
        let expected = cart.snapshot().to_vec();

        let reloaded = CartStore::new(cart.into_storage());
        assert_eq!(reloaded.snapshot(), expected.as_slice());
    }

    #[test]
    fn test_corrupt_payload_loads_empty() {
        let mut storage = MemoryStorage::new();
        storage.write(CART_STORAGE_KEY, "{definitely not json");
        let cart = CartStore::new(storage);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_invalid_entries_are_dropped() {
        let mut cart = CartStore::new(MemoryStorage::new());
        let now = Utc::now();
        cart.add_item(&product("p-01"), "M", "Red", 2, now).unwrap();
        let mut storage = cart.into_storage();

        // Splice a junk entry into the stored array.
        let payload = storage.read(CART_STORAGE_KEY).unwrap();
        let mut entries: Vec<serde_json::Value> = serde_json::from_str(&payload).unwrap();
        entries.push(serde_json::json!({"id": 7, "quantity": "lots"}));
        storage.write(CART_STORAGE_KEY, &serde_json::to_string(&entries).unwrap());

        let cart = CartStore::new(storage);
        assert_eq!(cart.snapshot().len(), 1);
        assert_eq!(cart.snapshot()[0].product.id, "p-01");
    }

    #[test]
    fn test_events_drain() {
        let mut cart = CartStore::new(MemoryStorage::new());
        let now = Utc::now();
        cart.add_item(&product("p-01"), "M", "Red", 1, now).unwrap();
        cart.clear();
        let events = cart.take_events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[1], DomainEvent::Cart(CartEvent::Cleared));
        assert!(cart.take_events().is_empty());
    }
}
