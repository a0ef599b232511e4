//! Persistent shopping-cart state for TurboCommerce clients.
//!
//! This crate keeps an ordered list of cart line items in memory and mirrors
//! it into a local Key-Value store on every change:
//!
//! - **Cart**: line items with the add / increment / decrement rules
//! - **Store**: load-once, write-through persistence with change notifications
//! - **Handle / Provider**: one shared store handed to every consumer
//! - **Config**: storage key, duplicate policy, file store location
//!
//! # Example
//!
//! ```rust,ignore
//! use turbo_cart::prelude::*;
//! use turbo_cache::FileStore;
//!
//! let (context, _) = CartProvider::new(FileStore::open("cart.json"))
//!     .mount()
//!     .await;
//!
//! let cart = context.use_cart()?;
//! cart.add_to_cart(NewCartItem::new("p1", "Mug", "https://cdn.example/mug.png", 10.0))
//!     .await;
//! cart.increment("p1").await;
//!
//! println!("{} item(s), total {:.2}", cart.cart().item_count(), cart.cart().total());
//! ```

pub mod cart;
pub mod config;
pub mod error;
pub mod handle;
pub mod ids;
pub mod item;
pub mod provider;
pub mod store;

pub use cart::Cart;
pub use config::{CartConfig, DuplicatePolicy, DEFAULT_STORAGE_KEY};
pub use error::CartError;
pub use handle::CartHandle;
pub use ids::ProductId;
pub use item::{CartItem, NewCartItem};
pub use provider::{CartContext, CartProvider};
pub use store::{CartStore, LoadOutcome, PersistErrorHook, StoreState};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::cart::Cart;
    pub use crate::config::{CartConfig, DuplicatePolicy};
    pub use crate::error::CartError;
    pub use crate::handle::CartHandle;
    pub use crate::ids::ProductId;
    pub use crate::item::{CartItem, NewCartItem};
    pub use crate::provider::{CartContext, CartProvider};
    pub use crate::store::{CartStore, LoadOutcome, StoreState};
}
