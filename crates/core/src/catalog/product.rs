//! Products

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::{
    ids::{CategoryId, ProductId},
    pricing::{PricingError, effective_price},
};

/// Denormalized reference from a product to its category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRef {
    /// Category id.
    #[serde(rename = "_id")]
    pub id: CategoryId,

    /// Category name at the time the product was fetched.
    #[serde(default)]
    pub name: String,
}

/// Product image as served by the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductImage {
    /// Image URL.
    pub img: String,

    /// Image id.
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

/// Product
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Product id
    #[serde(rename = "_id")]
    pub id: ProductId,

    /// Product name
    pub name: String,

    /// Product description
    #[serde(default)]
    pub description: String,

    /// List price, before discount
    pub price: Decimal,

    /// Units in stock
    #[serde(default)]
    pub quantity: u32,

    /// Category the product belongs to, if the gateway sent a usable one.
    #[serde(default, deserialize_with = "lenient_category")]
    pub category: Option<CategoryRef>,

    /// Discount percentage (0–100)
    #[serde(rename = "offer", default, skip_serializing_if = "Option::is_none")]
    pub discount_percent: Option<Decimal>,

    /// Available sizes
    #[serde(rename = "sizes", default)]
    pub variant_sizes: Vec<String>,

    /// Available colours
    #[serde(rename = "colors", default)]
    pub variant_colors: Vec<String>,

    /// Product images
    #[serde(rename = "productImages", default)]
    pub images: Vec<ProductImage>,

    /// URL slug
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
}

impl Product {
    /// Price after the product's discount.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if the price or discount is out of range.
    pub fn effective_price(&self) -> Result<Decimal, PricingError> {
        effective_price(self.price, self.discount_percent.unwrap_or_default())
    }

    /// Whether a positive discount applies.
    #[must_use]
    pub fn has_discount(&self) -> bool {
        self.discount_percent.is_some_and(|d| d > Decimal::ZERO)
    }

    /// Id of the product's category, when known.
    #[must_use]
    pub fn category_id(&self) -> Option<&CategoryId> {
        self.category
            .as_ref()
            .map(|category| &category.id)
            .filter(|id| !id.is_blank())
    }

    /// Whether `requested` units can be served from stock.
    #[must_use]
    pub fn has_stock_for(&self, requested: u32) -> bool {
        requested > 0 && requested <= self.quantity
    }

    /// Whether `size` is one of the product's sizes (or it has none).
    #[must_use]
    pub fn offers_size(&self, size: Option<&str>) -> bool {
        offers_variant(&self.variant_sizes, size)
    }

    /// Whether `color` is one of the product's colours (or it has none).
    #[must_use]
    pub fn offers_color(&self, color: Option<&str>) -> bool {
        offers_variant(&self.variant_colors, color)
    }
}

fn offers_variant(options: &[String], chosen: Option<&str>) -> bool {
    match chosen {
        None => options.is_empty(),
        Some(chosen) => options.iter().any(|option| option == chosen),
    }
}

fn lenient_category<'de, D>(deserializer: D) -> Result<Option<CategoryRef>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;

    Ok(serde_json::from_value(value).ok())
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use testresult::TestResult;

    use super::*;

    fn product_json(category: &Value) -> Value {
        json!({
            "_id": "p1",
            "name": "Linen shirt",
            "price": 40,
            "quantity": 3,
            "category": category,
            "offer": 25,
            "sizes": ["S", "M"],
            "colors": ["white"],
            "productImages": [{ "img": "https://cdn.example/p1.jpg", "_id": "i1" }]
        })
    }

    #[test]
    fn deserializes_gateway_product() -> TestResult {
        let product: Product =
            serde_json::from_value(product_json(&json!({ "_id": "c1", "name": "Shirts" })))?;

        assert_eq!(product.id, ProductId::new("p1"));
        assert_eq!(product.category_id(), Some(&CategoryId::new("c1")));
        assert_eq!(product.variant_sizes, vec!["S", "M"]);
        assert_eq!(product.images.len(), 1);

        Ok(())
    }

    #[test]
    fn malformed_category_becomes_none() -> TestResult {
        for category in [json!("c1"), json!(null), json!({ "name": "no id" }), json!(7)] {
            let product: Product = serde_json::from_value(product_json(&category))?;

            assert_eq!(product.category, None, "category {category} should be dropped");
        }

        Ok(())
    }

    #[test]
    fn missing_category_becomes_none() -> TestResult {
        let product: Product = serde_json::from_value(json!({
            "_id": "p2",
            "name": "Socks",
            "price": 5
        }))?;

        assert_eq!(product.category_id(), None);
        assert!(!product.has_discount());

        Ok(())
    }

    #[test]
    fn effective_price_applies_offer() -> TestResult {
        let product: Product = serde_json::from_value(product_json(&json!(null)))?;

        assert_eq!(product.effective_price()?, Decimal::from(30));

        Ok(())
    }

    #[test]
    fn stock_and_variant_checks() -> TestResult {
        let product: Product = serde_json::from_value(product_json(&json!(null)))?;

        assert!(product.has_stock_for(3));
        assert!(!product.has_stock_for(4));
        assert!(!product.has_stock_for(0));
        assert!(product.offers_size(Some("M")));
        assert!(!product.offers_size(Some("XL")));
        assert!(!product.offers_color(None));

        Ok(())
    }
}
