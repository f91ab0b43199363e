//! Persisted shopper-owned stores
pub mod cart;
pub mod wishlist;

pub use cart::{CartError, CartLineItem, CartStore, CartTotals, LineKey, CART_STORAGE_KEY};
pub use wishlist::{WishlistEntry, WishlistStore, WISHLIST_STORAGE_KEY};
