//! Cart error types.

use thiserror::Error;

/// Errors that can occur in cart operations.
#[derive(Error, Debug)]
pub enum CartError {
    /// The cart was requested outside of any provider scope.
    #[error("use_cart must be used within a CartProvider")]
    MissingProvider,

    /// Item rejected before it reached the cart.
    #[error("Invalid cart item: {0}")]
    InvalidItem(String),

    /// Persistence layer error.
    #[error("Storage error: {0}")]
    Storage(#[from] turbo_cache::CacheError),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration could not be read or is incomplete.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<toml::de::Error> for CartError {
    fn from(e: toml::de::Error) -> Self {
        CartError::Config(e.to_string())
    }
}
