//! Boutique Commerce Core
//!
//! Client-side commerce state for a boutique storefront.
//!
//! ## Features
//! - Product catalog queries (new arrivals, featured, by category)
//! - Discount and display-price derivation
//! - Persisted cart and wishlist stores with change events
//! - Email verification-code lifecycle
//!
//! The crate owns no I/O: storage is an injected [`storage::StorageBackend`],
//! the clock is an explicit `now` argument, and catalog/delivery collaborators
//! are driven by the surrounding shell.

use thiserror::Error;

pub mod domain;
pub mod storage;

pub use domain::{
    discount_percent, display_price, CartError, CartEvent, CartLineItem, CartStore, CartTotals,
    CatalogError, CodeSender, DeliveryError, DisplayPrice, DomainEvent, LineKey, NullSender,
    Product, ProductCatalog, VerificationCodeService, VerificationError, VerificationEvent,
    WishlistEntry, WishlistEvent, WishlistStore,
};
pub use storage::{MemoryStorage, StorageBackend};

/// Union of the component error taxonomies, for UI glue that funnels every
/// intent through one handler. All variants are recoverable by the caller.
#[derive(Debug, Error)]
pub enum CommerceError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Cart(#[from] CartError),
    #[error(transparent)]
    Verification(#[from] VerificationError),
}

pub type Result<T> = std::result::Result<T, CommerceError>;
