//! Storefront client store: cart, session, catalog and back-office services
//! over a remote HTTP gateway.

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod context;
pub mod errors;
pub mod gateway;
pub mod home_sections;
pub mod orders;
pub mod session;
pub mod state;
pub mod storage;

pub use context::{AppContext, Gateways};
pub use errors::StoreError;

#[cfg(test)]
mod test;
