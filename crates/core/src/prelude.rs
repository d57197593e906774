//! Storefront prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{Cart, CartError, CartLine, CartTotals, LineKey},
    catalog::{
        Category, CategoryRef, CategorySelection, CategoryTree, Product, ProductImage,
        filter_products,
    },
    checkout::{
        CheckoutItem, CheckoutOutcome, PaymentStatus, PreferenceRequest, StockCheck,
        StockCheckRequest, checkout_items,
    },
    home_sections::{HomeSection, sort_by_order},
    ids::{CategoryId, HomeSectionId, OrderId, ProductId, TypedId, UserId},
    orders::{Address, Order, OrderProduct, OrderStatus, OrderUpdate, PaymentInfo, replace_order},
    pricing::{PricingError, effective_price, line_total, to_money},
    session::{BearerToken, Role, Session, SessionError, SessionState, User},
};
