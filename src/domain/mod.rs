//! Commerce domain core
pub mod catalog;
pub mod events;
pub mod pricing;
pub mod stores;
pub mod verification;

pub use catalog::{CatalogError, Product, ProductCatalog};
pub use events::{CartEvent, DomainEvent, VerificationEvent, WishlistEvent};
pub use pricing::{discount_percent, display_price, DisplayPrice};
pub use stores::{CartError, CartLineItem, CartStore, CartTotals, LineKey, WishlistEntry, WishlistStore};
pub use verification::{CodeSender, DeliveryError, NullSender, VerificationCodeService, VerificationError};
