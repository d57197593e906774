//! Cart
//!
//! The in-memory shopping cart. Lines are keyed by product and variant, and
//! the totals are refolded from the lines on every change.

use rustc_hash::FxHashMap;
use thiserror::Error;

pub mod line;
pub mod totals;

pub use line::{CartLine, LineKey};
pub use totals::CartTotals;

/// Errors raised by cart operations. The cart is left untouched when one is returned.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    /// The requested quantity is zero, or more than the line holds.
    #[error("cannot use a quantity of {requested}; the line holds {available}")]
    InvalidQuantity {
        /// Quantity the caller asked for.
        requested: u32,

        /// Quantity currently in the line (zero for a new line).
        available: u32,
    },

    /// No line with the given identity exists.
    #[error("no cart line for {0}")]
    LineNotFound(LineKey),

    /// Adding would push the line's quantity past what can be represented.
    #[error("quantity for {0} would overflow")]
    QuantityOverflow(LineKey),

    /// The lines' prices would push the cart total past what can be represented.
    #[error("cart total would overflow")]
    TotalOverflow,
}

/// Shopping cart.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    lines: Vec<CartLine>,
    totals: CartTotals,
}

impl Cart {
    /// An empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A cart holding exactly the given lines.
    ///
    /// See [`Cart::replace_all`] for how the lines are normalised.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::TotalOverflow`] if the lines' total does not fit.
    pub fn with_lines(lines: impl IntoIterator<Item = CartLine>) -> Result<Self, CartError> {
        let mut cart = Self::new();
        cart.replace_all(lines)?;

        Ok(cart)
    }

    /// Add `line.quantity` units of a line, returning the line's new quantity.
    ///
    /// An existing line with the same identity has its quantity increased;
    /// otherwise the line is appended. Stock is not checked here.
    ///
    /// # Errors
    ///
    /// - [`CartError::InvalidQuantity`]: the quantity is zero.
    /// - [`CartError::QuantityOverflow`]: the merged quantity does not fit.
    /// - [`CartError::TotalOverflow`]: the new cart total does not fit.
    pub fn add_line(&mut self, line: CartLine) -> Result<u32, CartError> {
        if line.quantity == 0 {
            return Err(CartError::InvalidQuantity {
                requested: 0,
                available: 0,
            });
        }

        let mut lines = self.lines.clone();

        let quantity = if let Some(existing) = lines.iter_mut().find(|l| l.same_line(&line)) {
            existing.quantity = existing
                .quantity
                .checked_add(line.quantity)
                .ok_or_else(|| CartError::QuantityOverflow(line.key()))?;

            existing.quantity
        } else {
            let quantity = line.quantity;
            lines.push(line);
            quantity
        };

        self.commit(lines)?;

        Ok(quantity)
    }

    /// Take `quantity` units off a line, removing it when none remain.
    ///
    /// Returns the quantity left in the line (zero when it was removed).
    ///
    /// # Errors
    ///
    /// - [`CartError::LineNotFound`]: no line has this identity.
    /// - [`CartError::InvalidQuantity`]: `quantity` is zero or larger than the line holds.
    /// - [`CartError::TotalOverflow`]: the remaining lines' total does not fit.
    pub fn decrement_line(&mut self, key: &LineKey, quantity: u32) -> Result<u32, CartError> {
        let index = self.position(key)?;

        let available = self.lines.get(index).map_or(0, |line| line.quantity);

        if quantity == 0 || quantity > available {
            return Err(CartError::InvalidQuantity {
                requested: quantity,
                available,
            });
        }

        let remaining = available - quantity;
        let mut lines = self.lines.clone();

        if remaining == 0 {
            lines.remove(index);
        } else if let Some(line) = lines.get_mut(index) {
            line.quantity = remaining;
        }

        self.commit(lines)?;

        Ok(remaining)
    }

    /// Remove a line outright, returning it.
    ///
    /// # Errors
    ///
    /// - [`CartError::LineNotFound`]: no line has this identity.
    /// - [`CartError::TotalOverflow`]: the remaining lines' total does not fit.
    pub fn remove_line(&mut self, key: &LineKey) -> Result<CartLine, CartError> {
        let index = self.position(key)?;
        let mut lines = self.lines.clone();
        let removed = lines.remove(index);

        self.commit(lines)?;

        Ok(removed)
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.totals = CartTotals::default();
    }

    /// Overwrite every line with `lines`.
    ///
    /// Nothing from the previous state survives. Lines with a zero quantity
    /// are dropped and lines sharing an identity are collapsed into one, in
    /// first-seen order, with their quantities summed.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::TotalOverflow`] if the lines' total does not fit;
    /// the cart is left as it was.
    pub fn replace_all(
        &mut self,
        lines: impl IntoIterator<Item = CartLine>,
    ) -> Result<(), CartError> {
        let mut merged: Vec<CartLine> = Vec::new();
        let mut seen: FxHashMap<LineKey, usize> = FxHashMap::default();

        for line in lines.into_iter().filter(|l| l.quantity > 0) {
            let key = line.key();

            if let Some(existing) = seen.get(&key).and_then(|&i| merged.get_mut(i)) {
                existing.quantity = existing.quantity.saturating_add(line.quantity);
            } else {
                seen.insert(key, merged.len());
                merged.push(line);
            }
        }

        self.commit(merged)
    }

    /// Look up a line by identity.
    #[must_use]
    pub fn get(&self, key: &LineKey) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.matches(key))
    }

    /// All lines, in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Iterate over the lines.
    pub fn iter(&self) -> impl Iterator<Item = &CartLine> {
        self.lines.iter()
    }

    /// Consume the cart, returning its lines.
    #[must_use]
    pub fn into_lines(self) -> Vec<CartLine> {
        self.lines
    }

    /// Current totals.
    #[must_use]
    pub fn totals(&self) -> CartTotals {
        self.totals
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Check if the cart is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    fn position(&self, key: &LineKey) -> Result<usize, CartError> {
        self.lines
            .iter()
            .position(|line| line.matches(key))
            .ok_or_else(|| CartError::LineNotFound(key.clone()))
    }

    fn commit(&mut self, lines: Vec<CartLine>) -> Result<(), CartError> {
        self.totals = CartTotals::from_lines(&lines).ok_or(CartError::TotalOverflow)?;
        self.lines = lines;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use testresult::TestResult;

    use crate::ids::ProductId;

    use super::*;

    fn line(id: &str, quantity: u32, price: i64) -> CartLine {
        CartLine::new(id, quantity, Decimal::from(price))
    }

    fn assert_totals_consistent(cart: &Cart) {
        let expected: Decimal = cart.iter().filter_map(CartLine::subtotal).sum();

        assert_eq!(cart.totals().grand_total(), expected, "grand total drifted");
        assert_eq!(cart.totals().line_count(), cart.len(), "line count drifted");
    }

    #[test]
    fn new_cart_is_empty() {
        let cart = Cart::new();

        assert!(cart.is_empty());
        assert_eq!(cart.totals(), CartTotals::default());
    }

    #[test]
    fn add_line_appends_new_identity() -> TestResult {
        let mut cart = Cart::new();

        cart.add_line(line("p1", 2, 10))?;
        cart.add_line(line("p2", 1, 5))?;

        assert_eq!(cart.len(), 2);
        assert_eq!(cart.totals().grand_total(), Decimal::from(25));
        assert_totals_consistent(&cart);

        Ok(())
    }

    #[test]
    fn add_line_increments_existing_identity() -> TestResult {
        let mut cart = Cart::new();

        cart.add_line(line("p1", 2, 10))?;
        let merged = cart.add_line(line("p1", 3, 10))?;

        assert_eq!(merged, 5);
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.totals().grand_total(), Decimal::from(50));

        Ok(())
    }

    #[test]
    fn add_line_keeps_variants_apart() -> TestResult {
        let mut cart = Cart::new();

        cart.add_line(line("p1", 1, 10).with_size("S").with_color("red"))?;
        cart.add_line(line("p1", 1, 10).with_size("S").with_color("blue"))?;

        assert_eq!(cart.len(), 2);
        assert_totals_consistent(&cart);

        Ok(())
    }

    #[test]
    fn add_line_rejects_zero_quantity() {
        let mut cart = Cart::new();

        let result = cart.add_line(line("p1", 0, 10));

        assert!(matches!(result, Err(CartError::InvalidQuantity { .. })));
        assert!(cart.is_empty());
    }

    #[test]
    fn add_line_rejects_overflowing_quantity() -> TestResult {
        let mut cart = Cart::new();
        cart.add_line(line("p1", u32::MAX, 1))?;

        let result = cart.add_line(line("p1", 1, 1));

        assert!(matches!(result, Err(CartError::QuantityOverflow(_))));
        assert_eq!(cart.lines().first().map(|l| l.quantity), Some(u32::MAX));

        Ok(())
    }

    #[test]
    fn decrement_line_subtracts_quantity() -> TestResult {
        let mut cart = Cart::with_lines([line("p1", 5, 10)])?;

        let remaining = cart.decrement_line(&LineKey::item("p1"), 2)?;

        assert_eq!(remaining, 3);
        assert_eq!(cart.totals().grand_total(), Decimal::from(30));
        assert_totals_consistent(&cart);

        Ok(())
    }

    #[test]
    fn decrement_to_zero_removes_line() -> TestResult {
        let mut cart = Cart::with_lines([line("p1", 2, 10), line("p2", 1, 4)])?;

        let remaining = cart.decrement_line(&LineKey::item("p1"), 2)?;

        assert_eq!(remaining, 0);
        assert!(cart.get(&LineKey::item("p1")).is_none());
        assert_eq!(cart.len(), 1);
        assert_totals_consistent(&cart);

        Ok(())
    }

    #[test]
    fn decrement_more_than_available_is_rejected_and_state_unchanged() -> TestResult {
        let mut cart = Cart::with_lines([line("p1", 2, 10), line("p2", 1, 4)])?;
        let before = cart.clone();

        let result = cart.decrement_line(&LineKey::item("p1"), 3);

        assert_eq!(
            result,
            Err(CartError::InvalidQuantity {
                requested: 3,
                available: 2
            })
        );
        assert_eq!(cart, before);

        Ok(())
    }

    #[test]
    fn decrement_by_zero_is_rejected() -> TestResult {
        let mut cart = Cart::with_lines([line("p1", 2, 10)])?;

        let result = cart.decrement_line(&LineKey::item("p1"), 0);

        assert!(matches!(result, Err(CartError::InvalidQuantity { .. })));

        Ok(())
    }

    #[test]
    fn decrement_unknown_line_is_not_found() {
        let mut cart = Cart::new();

        let result = cart.decrement_line(&LineKey::item("missing"), 1);

        assert_eq!(
            result,
            Err(CartError::LineNotFound(LineKey::item("missing")))
        );
    }

    #[test]
    fn add_then_decrement_restores_previous_state() -> TestResult {
        let mut cart = Cart::with_lines([line("p1", 2, 10)])?;
        let before = cart.clone();

        for quantity in [1, 4, 17] {
            cart.add_line(line("p1", quantity, 10))?;
            cart.decrement_line(&LineKey::item("p1"), quantity)?;
            assert_eq!(cart, before);

            cart.add_line(line("p9", quantity, 3).with_color("green"))?;
            cart.decrement_line(
                &LineKey::variant("p9", None::<String>, Some("green")),
                quantity,
            )?;
            assert_eq!(cart, before);
        }

        Ok(())
    }

    #[test]
    fn remove_line_returns_removed_line() -> TestResult {
        let mut cart = Cart::with_lines([line("p1", 2, 10), line("p2", 1, 4)])?;

        let removed = cart.remove_line(&LineKey::item("p1"))?;

        assert_eq!(removed.item_id, ProductId::new("p1"));
        assert_eq!(cart.totals().grand_total(), Decimal::from(4));
        assert_totals_consistent(&cart);

        Ok(())
    }

    #[test]
    fn remove_unknown_line_is_not_found() -> TestResult {
        let mut cart = Cart::with_lines([line("p1", 2, 10)])?;

        let result = cart.remove_line(&LineKey::item("p2"));

        assert!(matches!(result, Err(CartError::LineNotFound(_))));
        assert_eq!(cart.len(), 1);

        Ok(())
    }

    #[test]
    fn clear_empties_everything() -> TestResult {
        let mut cart = Cart::with_lines([line("p1", 2, 10), line("p2", 1, 4)])?;

        cart.clear();

        assert_eq!(cart.totals().line_count(), 0);
        assert_eq!(cart.totals().grand_total(), Decimal::ZERO);

        Ok(())
    }

    #[test]
    fn replace_all_overwrites_rather_than_merges() -> TestResult {
        let mut cart = Cart::with_lines([line("local", 2, 10)])?;

        cart.replace_all([line("server", 1, 7)])?;

        assert_eq!(cart.len(), 1);
        assert!(cart.get(&LineKey::item("local")).is_none());
        assert_eq!(cart.totals().grand_total(), Decimal::from(7));

        Ok(())
    }

    #[test]
    fn replace_all_drops_zero_quantities_and_collapses_duplicates() -> TestResult {
        let mut cart = Cart::new();

        cart.replace_all([
            line("p1", 1, 10),
            line("p2", 0, 10),
            line("p1", 2, 10),
        ])?;

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.get(&LineKey::item("p1")).map(|l| l.quantity), Some(3));
        assert_totals_consistent(&cart);

        Ok(())
    }

    #[test]
    fn add_line_rejects_overflowing_total_and_keeps_state() -> TestResult {
        let mut cart = Cart::new();
        cart.add_line(CartLine::new("p1", 1, Decimal::MAX))?;
        let before = cart.clone();

        let result = cart.add_line(CartLine::new("p2", 1, Decimal::MAX));

        assert_eq!(result, Err(CartError::TotalOverflow));
        assert_eq!(cart, before);

        Ok(())
    }

    #[test]
    fn add_line_rejects_overflowing_subtotal() {
        let mut cart = Cart::new();

        let result = cart.add_line(CartLine::new("p1", 2, Decimal::MAX));

        assert_eq!(result, Err(CartError::TotalOverflow));
        assert!(cart.is_empty());
    }

    #[test]
    fn replace_all_rejects_overflowing_total_and_keeps_state() -> TestResult {
        let mut cart = Cart::with_lines([line("p1", 2, 10)])?;
        let before = cart.clone();

        let result = cart.replace_all([
            CartLine::new("p1", 1, Decimal::MAX),
            CartLine::new("p2", 1, Decimal::MAX),
        ]);

        assert_eq!(result, Err(CartError::TotalOverflow));
        assert_eq!(cart, before);

        Ok(())
    }
}
