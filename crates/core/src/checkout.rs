//! Checkout
//!
//! Request bodies sent to the gateway before handing the shopper over to the
//! payment provider, and interpretation of the query string the provider
//! redirects back with.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    cart::Cart,
    ids::{ProductId, UserId},
};

/// Product and quantity sent for stock verification and payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutItem {
    /// Product
    #[serde(rename = "_id")]
    pub id: ProductId,

    /// Units
    pub quantity: u32,
}

/// Items of a cart, in line order.
pub fn checkout_items(cart: &Cart) -> Vec<CheckoutItem> {
    cart.iter()
        .map(|line| CheckoutItem {
            id: line.item_id.clone(),
            quantity: line.quantity,
        })
        .collect()
}

/// Body of the stock verification request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockCheckRequest {
    /// Items to verify
    pub cart_items: Vec<CheckoutItem>,

    /// Cart total the shopper saw
    pub total_amount: Decimal,
}

impl From<&Cart> for StockCheckRequest {
    fn from(cart: &Cart) -> Self {
        Self {
            cart_items: checkout_items(cart),
            total_amount: cart.totals().grand_total(),
        }
    }
}

/// Gateway's answer to a stock verification request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockCheck {
    /// Whether every item can be served
    #[serde(default)]
    pub check_status: bool,

    /// Message for the shopper
    #[serde(default)]
    pub message: String,
}

/// Body of the payment preference request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferenceRequest {
    /// Items to charge for
    pub items: Vec<CheckoutItem>,

    /// Signed-in buyer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
}

/// Payment status reported on the return redirect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentStatus {
    /// Payment went through.
    Approved,

    /// Awaiting confirmation.
    Pending,

    /// Declined or abandoned.
    Rejected,

    /// Any other status string.
    Other(String),
}

impl PaymentStatus {
    /// Parse the provider's status string.
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "approved" => Self::Approved,
            "pending" | "in_process" => Self::Pending,
            "rejected" | "cancelled" | "null" => Self::Rejected,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Approved => f.write_str("approved"),
            Self::Pending => f.write_str("pending"),
            Self::Rejected => f.write_str("rejected"),
            Self::Other(status) => f.write_str(status),
        }
    }
}

/// What the provider's return redirect says happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutOutcome {
    /// Payment status, if the redirect carried one
    pub status: Option<PaymentStatus>,

    /// Provider payment id
    pub payment_id: Option<String>,
}

impl CheckoutOutcome {
    /// Read the outcome from the redirect's query pairs.
    ///
    /// `collection_status` wins over `status` when both are present. Empty
    /// values count as absent.
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut collection_status = None;
        let mut status = None;
        let mut payment_id = None;

        for (key, value) in pairs {
            if value.trim().is_empty() {
                continue;
            }

            match key {
                "collection_status" => collection_status = Some(value),
                "status" => status = Some(value),
                "payment_id" => payment_id = Some(value.to_string()),
                _ => {}
            }
        }

        Self {
            status: collection_status.or(status).map(PaymentStatus::parse),
            payment_id,
        }
    }

    /// Whether the payment was approved, so the cart should be emptied.
    #[must_use]
    pub fn should_clear_cart(&self) -> bool {
        self.status == Some(PaymentStatus::Approved)
    }
}
