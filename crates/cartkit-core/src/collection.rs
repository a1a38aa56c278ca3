//! # Cart Collection
//!
//! The ordered list of line items plus the cart-level discount.
//!
//! ## Invariants
//! - No two items share an [`Identity`]
//! - No stored item has quantity 0 (it is removed instead)
//! - `discount` stays within [0, 100]
//!
//! ## Totals
//! ```text
//! sub_total(p)      = round(Σ price × quantity, p)
//! discount_price(p) = round(sub_total(p) × discount / 100, p)
//! total(p)          = round(sub_total(p) − discount_price(p), p)
//!
//! e.g. 500×1 + 200×1 = 700.00, 10% off → 70.00 → total 630.00
//! ```
//!
//! Positions are derived by search on every call and never cached:
//! removing an item shifts everything after it.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CartError, CartResult};
use crate::item::LineItem;
use crate::money::{percent_of, round_half_away};
use crate::types::Identity;
use crate::validation::validate_discount;
use crate::MAX_DISCOUNT_PERCENT;

// =============================================================================
// Cart Collection
// =============================================================================

/// The shopping cart contents for one session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CartCollection {
    #[serde(default)]
    items: Vec<LineItem>,

    /// Cart-wide discount in percent.
    #[serde(default)]
    discount: u8,
}

/// What [`CartCollection::sanitize`] had to fix.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Sanitized {
    pub dropped_items: usize,
    pub discount_clamped: bool,
}

impl Sanitized {
    pub fn is_clean(&self) -> bool {
        self.dropped_items == 0 && !self.discount_clamped
    }
}

impl CartCollection {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LineItem> {
        self.items.iter()
    }

    // =========================================================================
    // Lookup
    // =========================================================================

    /// Current position of `identity`, by linear search.
    pub fn position(&self, identity: &Identity) -> Option<usize> {
        self.items.iter().position(|item| item.matches(identity))
    }

    pub fn find(&self, identity: &Identity) -> Option<&LineItem> {
        self.items.iter().find(|item| item.matches(identity))
    }

    pub fn find_mut(&mut self, identity: &Identity) -> Option<&mut LineItem> {
        self.items.iter_mut().find(|item| item.matches(identity))
    }

    pub fn contains(&self, identity: &Identity) -> bool {
        self.position(identity).is_some()
    }

    // =========================================================================
    // Mutation
    // =========================================================================

    /// Appends `item`.
    ///
    /// ## Errors
    /// - `DuplicateEntity` if an item with the same identity exists
    /// - `InvalidQuantity` if the item's quantity is not positive
    pub fn push(&mut self, item: LineItem) -> CartResult<()> {
        let identity = item.identity();
        if self.contains(&identity) {
            return Err(CartError::DuplicateEntity { identity });
        }
        crate::validation::validate_quantity(item.quantity()).map_err(|source| {
            CartError::InvalidQuantity {
                quantity: item.quantity(),
                identity,
                source,
            }
        })?;

        self.items.push(item);
        Ok(())
    }

    /// Removes and returns the item named by `identity`.
    pub fn remove(&mut self, identity: &Identity) -> CartResult<LineItem> {
        let index = self
            .position(identity)
            .ok_or_else(|| CartError::ItemNotFound {
                identity: identity.clone(),
            })?;
        Ok(self.items.remove(index))
    }

    /// Empties the cart and resets the discount.
    pub fn clear(&mut self) {
        self.items.clear();
        self.discount = 0;
    }

    /// Drops items that break the collection invariants.
    ///
    /// Used after hydrating from a session value that may have been written
    /// by something other than this crate. Keeps the first of any duplicate
    /// identities and clamps an out-of-range discount.
    pub fn sanitize(&mut self) -> Sanitized {
        let before = self.items.len();
        let mut seen: Vec<Identity> = Vec::with_capacity(before);
        self.items.retain(|item| {
            let identity = item.identity();
            if item.quantity() <= 0 || seen.contains(&identity) {
                return false;
            }
            seen.push(identity);
            true
        });

        let discount_clamped = i64::from(self.discount) > MAX_DISCOUNT_PERCENT;
        if discount_clamped {
            self.discount = MAX_DISCOUNT_PERCENT as u8;
        }

        Sanitized {
            dropped_items: before - self.items.len(),
            discount_clamped,
        }
    }

    // =========================================================================
    // Discount
    // =========================================================================

    pub fn discount(&self) -> u8 {
        self.discount
    }

    /// Sets the cart discount.
    ///
    /// ## Errors
    /// - `InvalidDiscount` outside [0, 100]; the discount is left unchanged
    pub fn set_discount(&mut self, percent: i64) -> CartResult<()> {
        self.discount = validate_discount(percent)
            .map_err(|source| CartError::InvalidDiscount { percent, source })?;
        Ok(())
    }

    // =========================================================================
    // Totals
    // =========================================================================

    /// Sum of all quantities, saturating at `i64::MAX`.
    pub fn total_quantity(&self) -> i64 {
        self.items
            .iter()
            .fold(0i64, |acc, item| acc.saturating_add(item.quantity()))
    }

    /// Σ price × quantity, rounded to `precision` digits.
    pub fn sub_total(&self, precision: u32) -> f64 {
        let sum: f64 = self.items.iter().map(LineItem::line_total).sum();
        round_half_away(sum, precision)
    }

    /// Amount taken off by the discount.
    pub fn discount_price(&self, precision: u32) -> f64 {
        percent_of(self.sub_total(precision), self.discount, precision)
    }

    /// Sub total minus discount.
    pub fn total(&self, precision: u32) -> f64 {
        round_half_away(
            self.sub_total(precision) - self.discount_price(precision),
            precision,
        )
    }

    /// Flat, serializable snapshot of the cart.
    pub fn summary(&self, precision: u32) -> CartSummary {
        CartSummary {
            count: self.len(),
            total_quantity: self.total_quantity(),
            sub_total: self.sub_total(precision),
            discount_percent: self.discount,
            discount_price: self.discount_price(precision),
            total: self.total(precision),
            items: self.items.clone(),
        }
    }
}

impl<'a> IntoIterator for &'a CartCollection {
    type Item = &'a LineItem;
    type IntoIter = std::slice::Iter<'a, LineItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

// =============================================================================
// Cart Summary
// =============================================================================

/// Cart summary for host responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartSummary {
    pub count: usize,
    #[ts(type = "number")]
    pub total_quantity: i64,
    pub sub_total: f64,
    pub discount_percent: u8,
    pub discount_price: f64,
    pub total: f64,
    pub items: Vec<LineItem>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EntityKey;
    use chrono::Utc;

    fn item(entity_type: &str, key: i64, price: f64, quantity: i64) -> LineItem {
        LineItem::new(Identity::new(entity_type, key), price, quantity, Utc::now())
    }

    fn two_items() -> CartCollection {
        let mut cart = CartCollection::new();
        cart.push(item("Product", 22, 500.0, 1)).unwrap();
        cart.push(item("BuyableProduct", 11, 200.0, 1)).unwrap();
        cart
    }

    #[test]
    fn test_push_and_find() {
        let cart = two_items();
        assert_eq!(cart.len(), 2);
        assert_eq!(cart.position(&Identity::new("BuyableProduct", 11)), Some(1));
        assert!(cart.find(&Identity::new("Product", 22)).is_some());
        // Same key, different type
        assert!(cart.find(&Identity::new("BuyableProduct", 22)).is_none());
    }

    #[test]
    fn test_push_rejects_duplicate() {
        let mut cart = two_items();
        let err = cart.push(item("Product", 22, 1.0, 1)).unwrap_err();
        assert!(matches!(err, CartError::DuplicateEntity { .. }));
        assert_eq!(cart.len(), 2);
    }

    #[test]
    fn test_push_rejects_zero_quantity() {
        let mut cart = CartCollection::new();
        assert!(matches!(
            cart.push(item("Product", 1, 1.0, 0)),
            Err(CartError::InvalidQuantity { .. })
        ));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_remove_shifts_positions() {
        let mut cart = two_items();
        let removed = cart.remove(&Identity::new("Product", 22)).unwrap();
        assert_eq!(removed.key(), &EntityKey::Int(22));
        assert_eq!(cart.position(&Identity::new("BuyableProduct", 11)), Some(0));

        assert!(matches!(
            cart.remove(&Identity::new("Product", 22)),
            Err(CartError::ItemNotFound { .. })
        ));
    }

    #[test]
    fn test_totals() {
        let mut cart = two_items();
        assert_eq!(cart.sub_total(2), 700.0);
        assert_eq!(cart.discount_price(2), 0.0);
        assert_eq!(cart.total(2), 700.0);

        cart.set_discount(10).unwrap();
        assert_eq!(cart.discount_price(2), 70.0);
        assert_eq!(cart.total(2), 630.0);
    }

    #[test]
    fn test_totals_round_half_away() {
        let mut cart = CartCollection::new();
        cart.push(item("Product", 1, 0.335, 3)).unwrap(); // 1.005
        assert_eq!(cart.sub_total(2), 1.01);

        cart.set_discount(50).unwrap(); // 0.505 → 0.51
        assert_eq!(cart.discount_price(2), 0.51);
        assert_eq!(cart.total(2), 0.5);
    }

    #[test]
    fn test_set_discount_bounds() {
        let mut cart = two_items();
        cart.set_discount(25).unwrap();

        assert!(matches!(
            cart.set_discount(101),
            Err(CartError::InvalidDiscount { percent: 101, .. })
        ));
        assert!(cart.set_discount(-5).is_err());
        assert_eq!(cart.discount(), 25);
    }

    #[test]
    fn test_clear_resets_discount() {
        let mut cart = two_items();
        cart.set_discount(10).unwrap();
        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.discount(), 0);
    }

    #[test]
    fn test_sanitize_drops_invalid_items() {
        let json = serde_json::json!({
            "items": [
                {"identity": 1, "entityType": "P", "quantity": 2, "price": 1.0,
                 "attributes": {}, "addedAt": "2024-01-15T10:30:00Z"},
                {"identity": 1, "entityType": "P", "quantity": 5, "price": 1.0,
                 "attributes": {}, "addedAt": "2024-01-15T10:30:00Z"},
                {"identity": 2, "entityType": "P", "quantity": 0, "price": 1.0,
                 "addedAt": "2024-01-15T10:30:00Z"}
            ],
            "discount": 150
        });
        let mut cart: CartCollection = serde_json::from_value(json).unwrap();

        let report = cart.sanitize();
        assert_eq!(report.dropped_items, 2);
        assert!(report.discount_clamped);
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.items()[0].quantity(), 2);
        assert_eq!(cart.discount(), 100);

        assert!(cart.sanitize().is_clean());
    }

    #[test]
    fn test_summary() {
        let mut cart = two_items();
        cart.set_discount(10).unwrap();

        let summary = cart.summary(2);
        assert_eq!(summary.count, 2);
        assert_eq!(summary.total_quantity, 2);
        assert_eq!(summary.sub_total, 700.0);
        assert_eq!(summary.discount_percent, 10);
        assert_eq!(summary.discount_price, 70.0);
        assert_eq!(summary.total, 630.0);

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["subTotal"], 700.0);
        assert_eq!(json["discountPercent"], 10);
        assert_eq!(json["items"].as_array().map(Vec::len), Some(2));
    }

    #[test]
    fn test_total_quantity_saturates() {
        let mut cart = CartCollection::new();
        cart.push(item("Product", 1, 1.0, i64::MAX)).unwrap();
        cart.push(item("Product", 2, 1.0, 1)).unwrap();

        assert_eq!(cart.total_quantity(), i64::MAX);
        let summary = cart.summary(2);
        assert_eq!(summary.count, 2);
        assert_eq!(summary.total_quantity, i64::MAX);
    }

    #[test]
    fn test_serde_round_trip() {
        let mut cart = two_items();
        cart.find_mut(&Identity::new("Product", 22))
            .unwrap()
            .set_attribute("name", "Product name")
            .unwrap();
        cart.set_discount(15).unwrap();

        let text = serde_json::to_string(&cart).unwrap();
        let back: CartCollection = serde_json::from_str(&text).unwrap();
        assert_eq!(back, cart);
    }
}
