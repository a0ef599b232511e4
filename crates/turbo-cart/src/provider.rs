//! Provider scope for handing the cart to UI consumers.
//!
//! A [`CartProvider`] builds the store, kicks off the one-time load and
//! yields a [`CartContext`]. Consumers call [`CartContext::use_cart`]; a
//! context that was not produced by a provider refuses with
//! [`CartError::MissingProvider`].

use turbo_cache::KeyValueStore;

use crate::config::CartConfig;
use crate::error::CartError;
use crate::handle::CartHandle;
use crate::store::{CartStore, LoadOutcome, PersistErrorHook};

/// Builder that mounts a cart store.
pub struct CartProvider<S> {
    storage: S,
    config: CartConfig,
    on_persist_error: Option<PersistErrorHook>,
}

impl<S: KeyValueStore> CartProvider<S> {
    /// Create a provider over `storage` with default configuration.
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            config: CartConfig::default(),
            on_persist_error: None,
        }
    }

    /// Set the configuration.
    pub fn with_config(mut self, config: CartConfig) -> Self {
        self.config = config;
        self
    }

    /// Register a callback for storage read/write failures.
    pub fn on_persist_error(mut self, hook: impl Fn(&CartError) + Send + Sync + 'static) -> Self {
        self.on_persist_error = Some(Box::new(hook));
        self
    }

    /// Build the store, load the persisted cart and return the scope.
    pub async fn mount(self) -> (CartContext<S>, LoadOutcome) {
        let mut store = CartStore::with_config(self.storage, self.config);
        if let Some(hook) = self.on_persist_error {
            store = store.on_persist_error(hook);
        }

        let handle = CartHandle::new(store);
        let outcome = handle.initialize().await;
        tracing::debug!(?outcome, "cart provider mounted");
        (CartContext::provide(handle), outcome)
    }
}

/// The cart as seen from a consumer.
pub struct CartContext<S> {
    cart: Option<CartHandle<S>>,
}

impl<S> Clone for CartContext<S> {
    fn clone(&self) -> Self {
        Self {
            cart: self.cart.clone(),
        }
    }
}

impl<S> Default for CartContext<S> {
    fn default() -> Self {
        Self { cart: None }
    }
}

impl<S> CartContext<S> {
    /// Scope exposing `handle`.
    pub fn provide(handle: CartHandle<S>) -> Self {
        Self { cart: Some(handle) }
    }

    /// Whether this context sits inside a provider.
    pub fn is_provided(&self) -> bool {
        self.cart.is_some()
    }

    /// Get the cart handle for this scope.
    pub fn use_cart(&self) -> Result<CartHandle<S>, CartError> {
        self.cart.clone().ok_or(CartError::MissingProvider)
    }
}
