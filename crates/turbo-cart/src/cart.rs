//! Cart line collection and its mutations.

use serde::{Deserialize, Serialize};

use crate::config::DuplicatePolicy;
use crate::error::CartError;
use crate::ids::ProductId;
use crate::item::{CartItem, NewCartItem};

/// An ordered list of line items.
///
/// Insertion order is display order. Every line has quantity >= 1; a line
/// decremented from 1 is removed rather than kept at zero.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Create an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a cart from persisted lines, dropping any with quantity 0.
    pub fn from_items(items: Vec<CartItem>) -> Self {
        let before = items.len();
        let items: Vec<CartItem> = items.into_iter().filter(|i| i.quantity > 0).collect();
        if items.len() < before {
            tracing::warn!(dropped = before - items.len(), "dropped zero-quantity cart lines");
        }
        Self { items }
    }

    /// Add a product with quantity 1.
    ///
    /// Returns an error if the product id is blank or the price is not a
    /// finite number (JSON cannot hold NaN or infinity).
    pub fn add_item(
        &mut self,
        item: NewCartItem,
        policy: DuplicatePolicy,
    ) -> Result<(), CartError> {
        if item.id.is_blank() {
            return Err(CartError::InvalidItem("product id must not be empty".to_string()));
        }
        if !item.price.is_finite() {
            return Err(CartError::InvalidItem(format!(
                "price for {} must be finite, got {}",
                item.id, item.price
            )));
        }

        if policy == DuplicatePolicy::MergeQuantity && self.contains(&item.id) {
            self.increment(&item.id);
            return Ok(());
        }

        self.items.push(item.with_quantity(1));
        Ok(())
    }

    /// Increase the quantity of every line matching `id` by one.
    ///
    /// Returns whether any line matched.
    pub fn increment(&mut self, id: &ProductId) -> bool {
        let mut matched = false;
        for item in self.items.iter_mut().filter(|i| &i.id == id) {
            item.quantity = item.quantity.saturating_add(1);
            matched = true;
        }
        matched
    }

    /// Decrease the quantity of every line matching `id` by one, removing
    /// lines that were at quantity 1.
    ///
    /// Returns whether any line matched.
    pub fn decrement(&mut self, id: &ProductId) -> bool {
        let mut matched = false;
        self.items.retain_mut(|item| {
            if &item.id != id {
                return true;
            }
            matched = true;
            if item.quantity > 1 {
                item.quantity -= 1;
                true
            } else {
                false
            }
        });
        matched
    }

    /// Items in display order.
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Consume and return the items.
    pub fn into_items(self) -> Vec<CartItem> {
        self.items
    }

    /// Get the first line for a product.
    pub fn get(&self, id: &ProductId) -> Option<&CartItem> {
        self.items.iter().find(|i| &i.id == id)
    }

    /// Check if a product has a line in the cart.
    pub fn contains(&self, id: &ProductId) -> bool {
        self.get(id).is_some()
    }

    /// Get total item count (sum of quantities).
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }

    /// Get number of lines.
    pub fn unique_item_count(&self) -> usize {
        self.items.len()
    }

    /// Check if cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of line subtotals.
    pub fn total(&self) -> f64 {
        self.items.iter().map(CartItem::subtotal).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mug() -> NewCartItem {
        NewCartItem::new("p1", "Mug", "https://cdn.example/mug.png", 10.0)
    }

    fn lamp() -> NewCartItem {
        NewCartItem::new("p2", "Lamp", "https://cdn.example/lamp.png", 25.0)
    }

    #[test]
    fn test_add_item() {
        let mut cart = Cart::new();
        cart.add_item(mug(), DuplicatePolicy::AppendLine).unwrap();

        assert_eq!(cart.unique_item_count(), 1);
        assert_eq!(cart.items()[0], mug().with_quantity(1));
    }

    #[test]
    fn test_blank_id_rejected() {
        let mut cart = Cart::new();
        let ghost = NewCartItem::new("", "Ghost", "", 1.0);
        let result = cart.add_item(ghost, DuplicatePolicy::AppendLine);

        assert!(matches!(result, Err(CartError::InvalidItem(_))));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_non_finite_price_rejected() {
        let mut cart = Cart::new();
        cart.add_item(mug(), DuplicatePolicy::AppendLine).unwrap();

        for price in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let item = NewCartItem::new("p2", "Lamp", "", price);
            let result = cart.add_item(item, DuplicatePolicy::AppendLine);
            assert!(matches!(result, Err(CartError::InvalidItem(_))));
        }
        assert_eq!(cart.unique_item_count(), 1);
    }

    #[test]
    fn test_append_line_keeps_duplicates() {
        let mut cart = Cart::new();
        cart.add_item(mug(), DuplicatePolicy::AppendLine).unwrap();
        cart.add_item(mug(), DuplicatePolicy::AppendLine).unwrap();

        assert_eq!(cart.unique_item_count(), 2);
        assert_eq!(cart.item_count(), 2);
    }

    #[test]
    fn test_merge_quantity_bumps_existing() {
        let mut cart = Cart::new();
        cart.add_item(mug(), DuplicatePolicy::MergeQuantity).unwrap();
        cart.add_item(lamp(), DuplicatePolicy::MergeQuantity).unwrap();
        cart.add_item(mug(), DuplicatePolicy::MergeQuantity).unwrap();

        assert_eq!(cart.unique_item_count(), 2);
        assert_eq!(cart.get(&"p1".into()).unwrap().quantity, 2);
    }

    #[test]
    fn test_increment_touches_only_matches() {
        let mut cart = Cart::new();
        cart.add_item(mug(), DuplicatePolicy::AppendLine).unwrap();
        cart.add_item(lamp(), DuplicatePolicy::AppendLine).unwrap();

        assert!(cart.increment(&"p1".into()));
        assert_eq!(cart.items()[0].quantity, 2);
        assert_eq!(cart.items()[1].quantity, 1);
    }

    #[test]
    fn test_increment_hits_every_duplicate_line() {
        let mut cart = Cart::new();
        cart.add_item(mug(), DuplicatePolicy::AppendLine).unwrap();
        cart.add_item(mug(), DuplicatePolicy::AppendLine).unwrap();

        cart.increment(&"p1".into());
        assert!(cart.items().iter().all(|i| i.quantity == 2));
    }

    #[test]
    fn test_decrement_hits_every_duplicate_line() {
        let mut cart = Cart::new();
        cart.add_item(mug(), DuplicatePolicy::AppendLine).unwrap();
        cart.add_item(lamp(), DuplicatePolicy::AppendLine).unwrap();
        cart.add_item(mug(), DuplicatePolicy::AppendLine).unwrap();
        cart.increment(&"p1".into());

        assert!(cart.decrement(&"p1".into()));
        let lines: Vec<(&str, u32)> = cart
            .items()
            .iter()
            .map(|i| (i.id.as_str(), i.quantity))
            .collect();
        assert_eq!(lines, vec![("p1", 1), ("p2", 1), ("p1", 1)]);

        assert!(cart.decrement(&"p1".into()));
        assert_eq!(cart.unique_item_count(), 1);
        assert_eq!(cart.items()[0].id.as_str(), "p2");
    }

    #[test]
    fn test_unknown_id_is_noop() {
        let mut cart = Cart::new();
        cart.add_item(mug(), DuplicatePolicy::AppendLine).unwrap();
        let before = cart.clone();

        assert!(!cart.increment(&"nope".into()));
        assert!(!cart.decrement(&"nope".into()));
        assert_eq!(cart, before);
    }

    #[test]
    fn test_decrement_removes_at_one() {
        let mut cart = Cart::new();
        cart.add_item(mug(), DuplicatePolicy::AppendLine).unwrap();
        cart.add_item(lamp(), DuplicatePolicy::AppendLine).unwrap();

        assert!(cart.decrement(&"p1".into()));
        assert_eq!(cart.unique_item_count(), 1);
        assert_eq!(cart.items()[0].id.as_str(), "p2");
    }

    #[test]
    fn test_decrement_preserves_order() {
        let mut cart = Cart::new();
        cart.add_item(mug(), DuplicatePolicy::AppendLine).unwrap();
        cart.add_item(lamp(), DuplicatePolicy::AppendLine).unwrap();
        cart.increment(&"p1".into());

        cart.decrement(&"p1".into());
        let ids: Vec<&str> = cart.items().iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["p1", "p2"]);
    }

    #[test]
    fn test_quantity_never_below_one() {
        let ops: [(&str, bool); 8] = [
            ("p1", true),
            ("p1", false),
            ("p1", false),
            ("p2", true),
            ("p2", true),
            ("p2", false),
            ("p1", false),
            ("p2", false),
        ];

        let mut cart = Cart::new();
        cart.add_item(mug(), DuplicatePolicy::AppendLine).unwrap();
        cart.add_item(lamp(), DuplicatePolicy::AppendLine).unwrap();

        for (id, up) in ops {
            let id = ProductId::new(id);
            if up {
                cart.increment(&id);
            } else {
                cart.decrement(&id);
            }
            assert!(cart.items().iter().all(|i| i.quantity >= 1));
        }
    }

    #[test]
    fn test_increment_then_decrement_restores() {
        let mut cart = Cart::new();
        cart.add_item(mug(), DuplicatePolicy::AppendLine).unwrap();
        cart.add_item(lamp(), DuplicatePolicy::AppendLine).unwrap();
        cart.increment(&"p2".into());
        let before = cart.clone();

        for id in ["p1", "p2"] {
            let id = ProductId::new(id);
            cart.increment(&id);
            cart.decrement(&id);
            assert_eq!(cart, before);
        }
    }

    #[test]
    fn test_from_items_drops_zero_quantity() {
        let cart = Cart::from_items(vec![mug().with_quantity(0), lamp().with_quantity(3)]);
        assert_eq!(cart.unique_item_count(), 1);
        assert_eq!(cart.item_count(), 3);
    }

    #[test]
    fn test_totals() {
        let mut cart = Cart::new();
        cart.add_item(mug(), DuplicatePolicy::AppendLine).unwrap();
        cart.add_item(lamp(), DuplicatePolicy::AppendLine).unwrap();
        cart.increment(&"p1".into());

        assert_eq!(cart.item_count(), 3);
        assert_eq!(cart.total(), 45.0);
    }
}
