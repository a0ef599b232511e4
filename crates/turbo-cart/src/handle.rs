//! Shared handle to a cart store.

use std::sync::Arc;

use tokio::sync::{watch, Mutex};
use turbo_cache::KeyValueStore;

use crate::cart::Cart;
use crate::ids::ProductId;
use crate::item::{CartItem, NewCartItem};
use crate::store::{CartStore, LoadOutcome};

/// Cheaply clonable handle to one [`CartStore`].
///
/// Construct once and hand clones to every consumer. Each operation holds
/// the store lock across its mutate, persist and publish steps, so two
/// increments issued back to back both land.
pub struct CartHandle<S> {
    store: Arc<Mutex<CartStore<S>>>,
    updates: watch::Receiver<Cart>,
}

impl<S> Clone for CartHandle<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            updates: self.updates.clone(),
        }
    }
}

impl<S: KeyValueStore> CartHandle<S> {
    /// Wrap a store.
    pub fn new(store: CartStore<S>) -> Self {
        let updates = store.subscribe();
        Self {
            store: Arc::new(Mutex::new(store)),
            updates,
        }
    }

    /// Load the persisted cart. See [`CartStore::initialize`].
    pub async fn initialize(&self) -> LoadOutcome {
        self.store.lock().await.initialize().await
    }

    /// Add a product with quantity 1.
    pub async fn add_to_cart(&self, item: NewCartItem) {
        self.store.lock().await.add_to_cart(item).await;
    }

    /// Increase the quantity of `id` by one.
    pub async fn increment(&self, id: impl Into<ProductId>) {
        let id = id.into();
        self.store.lock().await.increment(&id).await;
    }

    /// Decrease the quantity of `id` by one, removing it at zero.
    pub async fn decrement(&self, id: impl Into<ProductId>) {
        let id = id.into();
        self.store.lock().await.decrement(&id).await;
    }

    /// Snapshot of the last published lines.
    pub fn products(&self) -> Vec<CartItem> {
        self.updates.borrow().items().to_vec()
    }

    /// Snapshot of the last published cart.
    pub fn cart(&self) -> Cart {
        self.updates.borrow().clone()
    }

    /// Receive every cart published after a load or mutation.
    pub fn subscribe(&self) -> watch::Receiver<Cart> {
        self.updates.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use turbo_cache::MemoryStore;

    fn mug() -> NewCartItem {
        NewCartItem::new("p1", "Mug", "https://cdn.example/mug.png", 10.0)
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let handle = CartHandle::new(CartStore::new(MemoryStore::new()));
        let other = handle.clone();

        handle.add_to_cart(mug()).await;
        other.increment("p1").await;

        assert_eq!(handle.products()[0].quantity, 2);
        assert_eq!(other.cart().item_count(), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_increments_all_land() {
        let storage = MemoryStore::new();
        let handle = CartHandle::new(CartStore::new(storage.clone()));
        handle.add_to_cart(mug()).await;

        let tasks: Vec<_> = (0..50)
            .map(|_| {
                let handle = handle.clone();
                tokio::spawn(async move { handle.increment("p1").await })
            })
            .collect();
        for task in tasks {
            task.await.unwrap();
        }

        assert_eq!(handle.products()[0].quantity, 51);

        let raw = storage.get("products").await.unwrap().unwrap();
        let persisted: Vec<CartItem> = serde_json::from_str(&raw).unwrap();
        assert_eq!(persisted[0].quantity, 51);
    }
}
