//! Persistent cart store.

use tokio::sync::watch;
use turbo_cache::KeyValueStore;

use crate::cart::Cart;
use crate::config::CartConfig;
use crate::error::CartError;
use crate::ids::ProductId;
use crate::item::{CartItem, NewCartItem};

/// Callback invoked when the store cannot be read or written.
pub type PersistErrorHook = Box<dyn Fn(&CartError) + Send + Sync>;

/// Lifecycle of a [`CartStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreState {
    /// Created, persisted cart not read yet.
    Uninitialized,
    /// `initialize` has run.
    Loaded,
}

/// What `initialize` found in storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// A persisted cart with this many lines was restored.
    Restored(usize),
    /// Nothing was stored under the key.
    Empty,
    /// Stored data could not be parsed; the cart starts empty.
    Discarded,
    /// Storage could not be read; the cart starts empty and in-memory only.
    Unavailable,
    /// The store had already been initialized; nothing was read.
    AlreadyLoaded,
}

/// Cart state backed by a Key-Value store.
///
/// Every mutation writes the full post-mutation line list under the
/// configured key and then publishes the new cart to subscribers. Storage
/// failures are logged and reported through the error hook; the in-memory
/// cart stays authoritative.
pub struct CartStore<S> {
    storage: S,
    config: CartConfig,
    cart: Cart,
    state: StoreState,
    updates: watch::Sender<Cart>,
    on_persist_error: Option<PersistErrorHook>,
}

impl<S: KeyValueStore> CartStore<S> {
    /// Create an empty store with default configuration.
    pub fn new(storage: S) -> Self {
        Self::with_config(storage, CartConfig::default())
    }

    /// Create an empty store.
    pub fn with_config(storage: S, config: CartConfig) -> Self {
        let (updates, _) = watch::channel(Cart::new());
        Self {
            storage,
            config,
            cart: Cart::new(),
            state: StoreState::Uninitialized,
            updates,
            on_persist_error: None,
        }
    }

    /// Register a callback for storage read/write failures.
    pub fn on_persist_error(mut self, hook: impl Fn(&CartError) + Send + Sync + 'static) -> Self {
        self.on_persist_error = Some(Box::new(hook));
        self
    }

    /// Load the persisted cart, replacing the in-memory one.
    ///
    /// Missing, malformed, or unreadable data leaves the cart empty.
    pub async fn initialize(&mut self) -> LoadOutcome {
        if self.state == StoreState::Loaded {
            return LoadOutcome::AlreadyLoaded;
        }
        self.state = StoreState::Loaded;

        let key = self.config.storage_key.as_str();
        let raw = match self.storage.get(key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                tracing::debug!(key, "no persisted cart");
                return LoadOutcome::Empty;
            }
            Err(e) => {
                tracing::error!(key, error = %e, "failed to read persisted cart");
                self.report(&CartError::from(e));
                return LoadOutcome::Unavailable;
            }
        };

        let items: Vec<CartItem> = match serde_json::from_str(&raw) {
            Ok(items) => items,
            Err(e) => {
                tracing::warn!(key, error = %e, "persisted cart is malformed, starting empty");
                return LoadOutcome::Discarded;
            }
        };

        self.cart = Cart::from_items(items);
        let lines = self.cart.unique_item_count();
        tracing::info!(key, lines, "persisted cart restored");
        self.publish();
        LoadOutcome::Restored(lines)
    }

    /// Add a product with quantity 1.
    ///
    /// A product with a blank id or a non-finite price is rejected and nothing
    /// is written.
    pub async fn add_to_cart(&mut self, item: NewCartItem) {
        let product_id = item.id.clone();
        if let Err(e) = self.cart.add_item(item, self.config.duplicate_policy) {
            tracing::warn!(product_id = %product_id, error = %e, "add_to_cart rejected");
            return;
        }

        tracing::debug!(
            product_id = %product_id,
            lines = self.cart.unique_item_count(),
            "added to cart"
        );
        self.commit().await;
    }

    /// Increase the quantity of `id` by one. Unknown ids leave the cart unchanged.
    pub async fn increment(&mut self, id: &ProductId) {
        let matched = self.cart.increment(id);
        tracing::debug!(product_id = %id, matched, "increment");
        self.commit().await;
    }

    /// Decrease the quantity of `id` by one, removing it at zero. Unknown ids
    /// leave the cart unchanged.
    pub async fn decrement(&mut self, id: &ProductId) {
        let matched = self.cart.decrement(id);
        tracing::debug!(
            product_id = %id,
            matched,
            remaining = self.cart.contains(id),
            "decrement"
        );
        self.commit().await;
    }

    /// Current lines in display order.
    pub fn products(&self) -> &[CartItem] {
        self.cart.items()
    }

    /// Current cart.
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Lifecycle state.
    pub fn state(&self) -> StoreState {
        self.state
    }

    /// Active configuration.
    pub fn config(&self) -> &CartConfig {
        &self.config
    }

    /// Receive every cart published after a load or mutation.
    pub fn subscribe(&self) -> watch::Receiver<Cart> {
        self.updates.subscribe()
    }

    async fn commit(&mut self) {
        if let Err(e) = self.persist().await {
            tracing::error!(
                key = %self.config.storage_key,
                error = %e,
                "failed to persist cart, continuing in memory"
            );
            self.report(&e);
        }
        self.publish();
    }

    async fn persist(&self) -> Result<(), CartError> {
        let raw = serde_json::to_string(self.cart.items())?;
        self.storage.set(&self.config.storage_key, raw).await?;
        Ok(())
    }

    fn publish(&self) {
        self.updates.send_replace(self.cart.clone());
    }

    fn report(&self, error: &CartError) {
        if let Some(hook) = &self.on_persist_error {
            hook(error);
        }
    }
}
