//! Wishlist store
//!
//! A persisted set of saved products keyed by product id. Entries carry the
//! few display fields the wishlist page needs so it renders without a
//! catalog round trip.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::catalog::Product;
use crate::domain::events::{DomainEvent, WishlistEvent};
use crate::storage::StorageBackend;

pub const WISHLIST_STORAGE_KEY: &str = "wishlist";

/// Denormalized snapshot captured at save time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistEntry {
    pub product_id: String,
    pub name: String,
    pub price: i64,
    pub image: String,
}

impl From<&Product> for WishlistEntry {
    fn from(product: &Product) -> Self {
        Self {
            product_id: product.id.clone(),
            name: product.name.clone(),
            price: product.price,
            image: product.images.first().cloned().unwrap_or_default(),
        }
    }
}

/// Wishlist state machine bound to one storage backend. Same persistence
/// contract as the cart, under its own key.
#[derive(Debug)]
pub struct WishlistStore<S: StorageBackend> {
    id: String,
    storage: S,
    entries: Vec<WishlistEntry>,
    events: Vec<DomainEvent>,
}

impl<S: StorageBackend> WishlistStore<S> {
    /// Loads the wishlist from `storage`, treating anything unreadable as
    /// empty.
    pub fn new(storage: S) -> Self {
        let entries = load_entries(&storage);
        Self {
            id: Uuid::new_v4().to_string(),
            storage,
            entries,
            events: vec![],
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, product_id: &str) -> bool {
        self.entries.iter().any(|e| e.product_id == product_id)
    }

    /// Entries in insertion order.
    pub fn snapshot(&self) -> &[WishlistEntry] {
        &self.entries
    }

    /// Adds the entry if absent, removes it if present. Returns the
    /// resulting membership, which is what a heart toggle renders.
    pub fn toggle(&mut self, entry: WishlistEntry) -> bool {
        let product_id = entry.product_id.clone();
        let member = if self.contains(&product_id) {
            self.entries.retain(|e| e.product_id != product_id);
            self.raise_event(WishlistEvent::Removed { product_id: product_id.clone() });
            false
        } else {
            self.entries.push(entry);
            self.raise_event(WishlistEvent::Added { product_id: product_id.clone() });
            true
        };
        tracing::debug!(%product_id, member, "wishlist toggled");
        self.persist();
        member
    }

    /// Removes the entry if present; absent ids are a no-op.
    pub fn remove(&mut self, product_id: &str) {
        let before = self.entries.len();
        self.entries.retain(|e| e.product_id != product_id);
        if self.entries.len() < before {
            self.raise_event(WishlistEvent::Removed { product_id: product_id.to_string() });
            self.persist();
        }
    }

    /// Drains events raised since the last call.
    pub fn take_events(&mut self) -> Vec<DomainEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    fn raise_event(&mut self, event: WishlistEvent) {
        self.events.push(DomainEvent::Wishlist(event));
    }

    fn persist(&mut self) {
        match serde_json::to_string(&self.entries) {
            Ok(payload) => self.storage.write(WISHLIST_STORAGE_KEY, &payload),
            Err(err) => tracing::warn!(%err, "failed to serialize wishlist"),
        }
    }
}

fn load_entries<S: StorageBackend>(storage: &S) -> Vec<WishlistEntry> {
    let Some(payload) = storage.read(WISHLIST_STORAGE_KEY) else {
        return vec![];
    };
    let entries: Vec<serde_json::Value> = match serde_json::from_str(&payload) {
        Ok(entries) => entries,
        Err(err) => {
            tracing::warn!(%err, "corrupt wishlist payload, starting empty");
            return vec![];
        }
    };
    let total = entries.len();
    let entries: Vec<WishlistEntry> = entries
        .into_iter()
        .filter_map(|entry| serde_json::from_value::<WishlistEntry>(entry).ok())
        .collect();
    if entries.len() < total {
        tracing::warn!(dropped = total - entries.len(), "dropped invalid wishlist entries");
    }
    entries
}
