//! Shopping cart

mod service;

pub use service::{CartService, ReconcileReport};
