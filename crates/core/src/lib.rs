//! Storefront
//!
//! Client-side state for a storefront: the shopping cart, the product catalog
//! and its category tree, pricing, the session, and the order and home page
//! models the back-office works with. Everything here is synchronous and free
//! of I/O; `storefront-app` wires it to the gateway.

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod home_sections;
pub mod ids;
pub mod orders;
pub mod prelude;
pub mod pricing;
pub mod session;
