//! Key-Value persistence layer for TurboCart.
//!
//! Provides the string-keyed, string-valued store contract the cart persists
//! through, plus two backends:
//!
//! - [`MemoryStore`]: process-local map, used for tests and ephemeral sessions
//! - [`FileStore`]: a single JSON document on local disk, surviving restarts
//!
//! # Example
//!
//! ```rust,ignore
//! use turbo_cache::{KeyValueStore, MemoryStore};
//!
//! let store = MemoryStore::new();
//!
//! // Store a value
//! store.set("products", "[]".to_string()).await?;
//!
//! // Retrieve a value
//! let raw: Option<String> = store.get("products").await?;
//!
//! // Delete a value
//! store.delete("products").await?;
//! ```

mod error;
mod file;
mod kv;

pub use error::CacheError;
pub use file::FileStore;
pub use kv::{KeyValueStore, MemoryStore};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{CacheError, FileStore, KeyValueStore, MemoryStore};
}
