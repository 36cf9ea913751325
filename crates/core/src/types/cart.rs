//! Session cart rules.
//!
//! The cart is a small mutable structure serialized into the caller's session
//! state. Lines hold a weak reference to a product (by ID only); product
//! name, price, and image are re-joined at read time by the site layer, never
//! cached here, since products can be deleted or deactivated between
//! requests.

use serde::{Deserialize, Serialize};

use super::id::ProductId;

/// Errors from cart mutations.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartError {
    /// An update targeted a product with no line in the cart.
    #[error("product is not in the cart")]
    NotInCart,
}

/// One product/quantity pair pending checkout.
///
/// Invariant: `quantity >= 1`. A line that would drop to zero is removed
/// from the cart instead of being stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// Weak reference to the product; the product may be deleted or
    /// deactivated independently of this line.
    pub product_id: ProductId,
    /// Quantity, always at least 1.
    pub quantity: u32,
}

/// Ordered collection of cart lines for one session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// The cart lines, in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Total number of items across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Add `quantity` of a product, merging with an existing line.
    ///
    /// Product existence/activity is the caller's responsibility; the cart
    /// only enforces quantity rules. A `quantity` of 0 is a no-op.
    ///
    /// Returns the updated total item count.
    pub fn add(&mut self, product_id: ProductId, quantity: u32) -> u32 {
        if quantity > 0 {
            match self.lines.iter_mut().find(|l| l.product_id == product_id) {
                Some(line) => line.quantity = line.quantity.saturating_add(quantity),
                None => self.lines.push(CartLine {
                    product_id,
                    quantity,
                }),
            }
        }
        self.item_count()
    }

    /// Set the quantity of an existing line; 0 removes the line.
    ///
    /// Returns the updated total item count.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::NotInCart`] if no line references `product_id`.
    pub fn update(&mut self, product_id: ProductId, quantity: u32) -> Result<u32, CartError> {
        let line = self
            .lines
            .iter_mut()
            .find(|l| l.product_id == product_id)
            .ok_or(CartError::NotInCart)?;

        if quantity == 0 {
            self.lines.retain(|l| l.product_id != product_id);
        } else {
            line.quantity = quantity;
        }

        Ok(self.item_count())
    }

    /// Empty the cart. Idempotent.
    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: ProductId = ProductId::new(1);
    const B: ProductId = ProductId::new(2);

    #[test]
    fn test_add_appends_and_counts() {
        let mut cart = Cart::new();
        assert_eq!(cart.add(A, 2), 2);
        assert_eq!(cart.add(B, 1), 3);
        assert_eq!(cart.lines().len(), 2);
        assert_eq!(cart.lines()[0].product_id, A);
    }

    #[test]
    fn test_add_merges_same_product() {
        let mut cart = Cart::new();
        cart.add(A, 2);
        let count = cart.add(A, 3);
        assert_eq!(count, 5);
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.lines()[0].quantity, 5);
    }

    #[test]
    fn test_add_zero_is_noop() {
        let mut cart = Cart::new();
        assert_eq!(cart.add(A, 0), 0);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_update_sets_quantity() {
        let mut cart = Cart::new();
        cart.add(A, 2);
        assert_eq!(cart.update(A, 7), Ok(7));
        assert_eq!(cart.lines()[0].quantity, 7);
    }

    #[test]
    fn test_update_zero_removes_line() {
        let mut cart = Cart::new();
        cart.add(A, 2);
        cart.add(B, 1);
        assert_eq!(cart.update(A, 0), Ok(1));
        assert!(cart.lines().iter().all(|l| l.product_id != A));
    }

    #[test]
    fn test_update_missing_line() {
        let mut cart = Cart::new();
        cart.add(A, 1);
        assert_eq!(cart.update(B, 3), Err(CartError::NotInCart));
        // Failed update mutates nothing
        assert_eq!(cart.item_count(), 1);
    }

    #[test]
    fn test_clear_is_idempotent() {
        let mut cart = Cart::new();
        cart.add(A, 2);
        cart.clear();
        assert!(cart.is_empty());
        cart.clear();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_serde_roundtrip() {
        let mut cart = Cart::new();
        cart.add(A, 2);
        let json = serde_json::to_string(&cart).expect("serialize");
        let back: Cart = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, cart);
    }
}
