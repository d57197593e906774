//! Checkout

mod service;

pub use service::CheckoutService;
