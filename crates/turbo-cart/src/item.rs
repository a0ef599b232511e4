//! Cart line item types.

use serde::{Deserialize, Serialize};

use crate::ids::ProductId;

/// A line item in the cart.
///
/// Field names are the persisted wire format and must not be renamed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartItem {
    /// Product identifier.
    pub id: ProductId,
    /// Product title (denormalized for display).
    pub title: String,
    /// Product image.
    pub image_url: String,
    /// Unit price.
    pub price: f64,
    /// Quantity, at least 1 while the item is in a cart.
    pub quantity: u32,
}

impl CartItem {
    /// Line total (unit price * quantity).
    pub fn subtotal(&self) -> f64 {
        self.price * f64::from(self.quantity)
    }
}

/// A product being added to the cart; the cart assigns the quantity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewCartItem {
    pub id: ProductId,
    pub title: String,
    pub image_url: String,
    pub price: f64,
}

impl NewCartItem {
    pub fn new(
        id: impl Into<ProductId>,
        title: impl Into<String>,
        image_url: impl Into<String>,
        price: f64,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            image_url: image_url.into(),
            price,
        }
    }

    /// Turn into a line item with the given quantity.
    pub fn with_quantity(self, quantity: u32) -> CartItem {
        CartItem {
            id: self.id,
            title: self.title,
            image_url: self.image_url,
            price: self.price,
            quantity,
        }
    }
}
