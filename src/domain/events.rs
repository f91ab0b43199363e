//! Domain events
//!
//! Stores collect events on mutation; the UI shell drains them with
//! `take_events()` to refresh badges and listings.

use chrono::{DateTime, Utc};

use crate::domain::stores::cart::LineKey;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DomainEvent {
    Cart(CartEvent),
    Wishlist(WishlistEvent),
    Verification(VerificationEvent),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CartEvent {
    ItemAdded { key: LineKey, quantity: u32 },
    QuantityUpdated { key: LineKey, quantity: u32 },
    ItemRemoved { key: LineKey },
    Cleared,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WishlistEvent {
    Added { product_id: String },
    Removed { product_id: String },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VerificationEvent {
    CodeIssued { email: String, expires_at: DateTime<Utc> },
}
