//! Cart Lines

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use crate::{
    catalog::Product,
    ids::ProductId,
    pricing::{PricingError, effective_price, line_total},
};

/// Identity of a cart line: the product plus its chosen variant.
///
/// Two lines for the same product in different sizes or colours are distinct.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LineKey {
    /// Product in the line.
    pub item_id: ProductId,

    /// Chosen size, if the product has sizes.
    pub size: Option<String>,

    /// Chosen colour, if the product has colours.
    pub color: Option<String>,
}

/// Borrowed view of a line's identity. Equality here is the one rule for
/// whether two lines are the same.
#[derive(PartialEq, Eq)]
struct Identity<'a> {
    item_id: &'a ProductId,
    size: Option<&'a str>,
    color: Option<&'a str>,
}

impl LineKey {
    fn identity(&self) -> Identity<'_> {
        Identity {
            item_id: &self.item_id,
            size: self.size.as_deref(),
            color: self.color.as_deref(),
        }
    }

    /// Key for a product with no variant selected.
    pub fn item(item_id: impl Into<ProductId>) -> Self {
        Self {
            item_id: item_id.into(),
            size: None,
            color: None,
        }
    }

    /// Key for a product in a specific size and colour.
    pub fn variant(
        item_id: impl Into<ProductId>,
        size: Option<impl Into<String>>,
        color: Option<impl Into<String>>,
    ) -> Self {
        Self {
            item_id: item_id.into(),
            size: size.map(Into::into),
            color: color.map(Into::into),
        }
    }
}

impl fmt::Display for LineKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.item_id)?;

        if let Some(size) = &self.size {
            write!(f, "/{size}")?;
        }

        if let Some(color) = &self.color {
            write!(f, "/{color}")?;
        }

        Ok(())
    }
}

/// A single line in the cart.
///
/// The serialized form matches the gateway's cart item and the guest cart
/// snapshot kept in local storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// Product in the line.
    #[serde(rename = "_id")]
    pub item_id: ProductId,

    /// Units in the line; always at least one while the line exists.
    pub quantity: u32,

    /// Price per unit after any discount.
    #[serde(rename = "price")]
    pub unit_price: Decimal,

    /// Discount that was applied to reach `unit_price`.
    #[serde(
        rename = "offer",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub discount_percent: Option<Decimal>,

    /// Chosen size.
    #[serde(
        default,
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub size: Option<String>,

    /// Chosen colour.
    #[serde(
        default,
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub color: Option<String>,
}

impl CartLine {
    /// A line with no discount or variant.
    pub fn new(item_id: impl Into<ProductId>, quantity: u32, unit_price: Decimal) -> Self {
        Self {
            item_id: item_id.into(),
            quantity,
            unit_price,
            discount_percent: None,
            size: None,
            color: None,
        }
    }

    /// Build a line for `quantity` units of `product`, priced after its discount.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if the product's price or discount is invalid.
    pub fn for_product(
        product: &Product,
        quantity: u32,
        size: Option<String>,
        color: Option<String>,
    ) -> Result<Self, PricingError> {
        let discount = product.discount_percent.filter(|d| !d.is_zero());
        let unit_price = effective_price(product.price, discount.unwrap_or_default())?;

        Ok(Self {
            item_id: product.id.clone(),
            quantity,
            unit_price,
            discount_percent: discount,
            size,
            color,
        })
    }

    /// Record the discount percentage behind `unit_price`.
    #[must_use]
    pub fn with_discount(mut self, discount_percent: Decimal) -> Self {
        self.discount_percent = Some(discount_percent);
        self
    }

    /// Set the chosen size.
    #[must_use]
    pub fn with_size(mut self, size: impl Into<String>) -> Self {
        self.size = Some(size.into());
        self
    }

    /// Set the chosen colour.
    #[must_use]
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Identity of this line.
    #[must_use]
    pub fn key(&self) -> LineKey {
        LineKey {
            item_id: self.item_id.clone(),
            size: self.size.clone(),
            color: self.color.clone(),
        }
    }

    fn identity(&self) -> Identity<'_> {
        Identity {
            item_id: &self.item_id,
            size: self.size.as_deref(),
            color: self.color.as_deref(),
        }
    }

    /// Whether this line has the given identity.
    #[must_use]
    pub fn matches(&self, key: &LineKey) -> bool {
        self.identity() == key.identity()
    }

    /// Whether two lines share an identity.
    #[must_use]
    pub fn same_line(&self, other: &Self) -> bool {
        self.identity() == other.identity()
    }

    /// What this line contributes to the cart total, or `None` if it is too
    /// large to represent.
    #[must_use]
    pub fn subtotal(&self) -> Option<Decimal> {
        line_total(self.unit_price, self.quantity)
    }
}

fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;

    Ok(value.filter(|v| !v.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn variants_of_same_product_are_different_lines() {
        let small = CartLine::new("p1", 1, Decimal::TEN).with_size("S");
        let large = CartLine::new("p1", 1, Decimal::TEN).with_size("L");

        assert!(!small.same_line(&large));
        assert!(small.matches(&LineKey::variant("p1", Some("S"), None::<String>)));
    }

    #[test]
    fn same_line_agrees_with_key_match() {
        let line = CartLine::new("p1", 1, Decimal::TEN).with_color("red");
        let other = CartLine::new("p1", 4, Decimal::ONE).with_color("red");

        assert!(line.same_line(&other));
        assert!(line.matches(&other.key()));
        assert!(!line.matches(&LineKey::item("p1")));
    }

    #[test]
    fn deserializes_gateway_cart_item() -> TestResult {
        let line: CartLine = serde_json::from_value(json!({
            "_id": "p1",
            "quantity": 2,
            "price": 7.5,
            "offer": 25,
            "size": "M",
            "color": "",
            "name": "ignored extra field"
        }))?;

        assert_eq!(line.item_id, ProductId::new("p1"));
        assert_eq!(line.quantity, 2);
        assert_eq!(line.unit_price, Decimal::new(75, 1));
        assert_eq!(line.discount_percent, Some(Decimal::from(25)));
        assert_eq!(line.size.as_deref(), Some("M"));
        assert_eq!(line.color, None);

        Ok(())
    }

    #[test]
    fn serializes_without_empty_variants() -> TestResult {
        let value = serde_json::to_value(CartLine::new("p1", 1, Decimal::TEN))?;

        assert_eq!(value.get("_id"), Some(&json!("p1")));
        assert!(value.get("size").is_none());
        assert!(value.get("offer").is_none());

        Ok(())
    }

    #[test]
    fn subtotal_is_price_times_quantity() {
        let line = CartLine::new("p1", 3, Decimal::new(250, 2));

        assert_eq!(line.subtotal(), Some(Decimal::new(750, 2)));
    }

    #[test]
    fn key_display_includes_variant() {
        let key = LineKey::variant("p1", Some("M"), Some("red"));

        assert_eq!(key.to_string(), "p1/M/red");
    }
}
