//! Orders

use std::fmt;

use jiff::Timestamp;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ids::{OrderId, ProductId, UserId};

/// Fulfilment stage of an order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    /// Payment received, not yet looked at.
    #[default]
    #[serde(rename = "Order Placed")]
    Placed,

    /// Accepted by the shop.
    #[serde(rename = "Order Accepted")]
    Accepted,

    /// Being packed.
    #[serde(rename = "Order Processing")]
    Processing,

    /// Handed to the carrier.
    #[serde(rename = "Order Shipped")]
    Shipped,

    /// Delivered to the customer.
    #[serde(rename = "Order Delivered")]
    Delivered,

    /// Cancelled.
    #[serde(rename = "Order Cancelled")]
    Cancelled,
}

impl OrderStatus {
    /// Every status, in fulfilment order.
    pub const ALL: [Self; 6] = [
        Self::Placed,
        Self::Accepted,
        Self::Processing,
        Self::Shipped,
        Self::Delivered,
        Self::Cancelled,
    ];

    /// Label used on the wire.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Placed => "Order Placed",
            Self::Accepted => "Order Accepted",
            Self::Processing => "Order Processing",
            Self::Shipped => "Order Shipped",
            Self::Delivered => "Order Delivered",
            Self::Cancelled => "Order Cancelled",
        }
    }

    /// Whether the order can no longer move.
    #[must_use]
    pub fn is_final(self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Shipping address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    /// City
    #[serde(default)]
    pub city: String,

    /// Country
    #[serde(default)]
    pub country: String,

    /// First address line
    #[serde(default)]
    pub line1: String,

    /// Second address line
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line2: Option<String>,

    /// Postal code
    #[serde(default)]
    pub postal_code: String,

    /// State or province
    #[serde(default)]
    pub state: String,
}

/// Product and quantity within an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderProduct {
    /// Ordered product
    pub product: ProductId,

    /// Units ordered
    pub quantity: u32,
}

/// Payment provider's record of the payment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentInfo {
    /// Provider payment id
    #[serde(default)]
    pub id: String,

    /// Provider payment status
    #[serde(default)]
    pub status: String,
}

/// Placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Order id
    #[serde(rename = "_id")]
    pub id: OrderId,

    /// Customer account, when the order was placed signed in
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<UserId>,

    /// Customer name
    #[serde(default)]
    pub name: String,

    /// Customer email
    #[serde(default)]
    pub email: String,

    /// Shipping address
    #[serde(default)]
    pub address: Address,

    /// Amount charged
    pub total_amount: Decimal,

    /// Ordered products
    #[serde(default)]
    pub products: Vec<OrderProduct>,

    /// Payment status as reported by the gateway
    #[serde(default)]
    pub payment_status: String,

    /// Payment method
    #[serde(default)]
    pub payment_type: String,

    /// Fulfilment stage
    #[serde(default)]
    pub order_status: OrderStatus,

    /// Provider payment record
    #[serde(default)]
    pub payment_info: PaymentInfo,

    /// Created
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,

    /// Last updated
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<Timestamp>,
}

impl Order {
    /// Total units across the order's products.
    #[must_use]
    pub fn unit_count(&self) -> u64 {
        self.products.iter().map(|p| u64::from(p.quantity)).sum()
    }
}

/// Back-office change to an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderUpdate {
    /// New fulfilment stage
    pub order_status: OrderStatus,

    /// New payment status, if it changes too
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_status: Option<String>,
}

impl OrderUpdate {
    /// Change only the fulfilment stage.
    #[must_use]
    pub fn status(order_status: OrderStatus) -> Self {
        Self {
            order_status,
            payment_status: None,
        }
    }

    /// Also change the payment status.
    #[must_use]
    pub fn with_payment_status(mut self, payment_status: impl Into<String>) -> Self {
        self.payment_status = Some(payment_status.into());
        self
    }
}

/// Replace the order sharing `updated`'s id, returning whether one was found.
pub fn replace_order(orders: &mut [Order], updated: Order) -> bool {
    match orders.iter_mut().find(|order| order.id == updated.id) {
        Some(order) => {
            *order = updated;
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use testresult::TestResult;

    use super::*;

    fn order_json(id: &str, status: &str) -> serde_json::Value {
        json!({
            "_id": id,
            "name": "Ada Lovelace",
            "email": "ada@example.com",
            "address": {
                "city": "London",
                "country": "GB",
                "line1": "12 St James's Square",
                "postal_code": "SW1Y 4LB",
                "state": "London"
            },
            "totalAmount": 59.5,
            "products": [{ "product": "p1", "quantity": 2 }, { "product": "p2", "quantity": 1 }],
            "paymentStatus": "approved",
            "paymentType": "card",
            "orderStatus": status,
            "paymentInfo": { "id": "pay_1", "status": "approved" },
            "createdAt": "2024-05-01T10:00:00Z",
            "updatedAt": "2024-05-01T10:05:00.000Z"
        })
    }

    #[test]
    fn deserializes_gateway_order() -> TestResult {
        let order: Order = serde_json::from_value(order_json("o1", "Order Shipped"))?;

        assert_eq!(order.order_status, OrderStatus::Shipped);
        assert_eq!(order.total_amount, Decimal::new(595, 1));
        assert_eq!(order.unit_count(), 3);
        assert!(order.created_at.is_some());
        assert_eq!(order.address.line2, None);

        Ok(())
    }

    #[test]
    fn update_serializes_wire_labels() -> TestResult {
        let update = OrderUpdate::status(OrderStatus::Delivered).with_payment_status("approved");

        assert_eq!(
            serde_json::to_value(&update)?,
            json!({ "orderStatus": "Order Delivered", "paymentStatus": "approved" })
        );
        assert_eq!(
            serde_json::to_value(OrderUpdate::status(OrderStatus::Placed))?,
            json!({ "orderStatus": "Order Placed" })
        );

        Ok(())
    }

    #[test]
    fn status_labels_match_serde() -> TestResult {
        for status in OrderStatus::ALL {
            assert_eq!(serde_json::to_value(status)?, json!(status.label()));
        }

        Ok(())
    }

    #[test]
    fn replace_order_swaps_matching_id() -> TestResult {
        let mut orders: Vec<Order> = vec![
            serde_json::from_value(order_json("o1", "Order Placed"))?,
            serde_json::from_value(order_json("o2", "Order Placed"))?,
        ];

        let updated: Order = serde_json::from_value(order_json("o2", "Order Cancelled"))?;

        assert!(replace_order(&mut orders, updated.clone()));
        assert_eq!(orders.get(1), Some(&updated));

        let stranger: Order = serde_json::from_value(order_json("o9", "Order Placed"))?;

        assert!(!replace_order(&mut orders, stranger));
        assert_eq!(orders.len(), 2);

        Ok(())
    }
}
