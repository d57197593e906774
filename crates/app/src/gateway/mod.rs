//! Gateway
//!
//! The remote REST API that owns all durable data. Each concern gets its own
//! trait so services can be tested against mocks; [`HttpGateway`] implements
//! all of them over HTTP.

use thiserror::Error;

pub mod auth;
pub mod cart;
pub mod catalog;
pub mod checkout;
mod client;
pub mod form;
pub mod home_sections;
pub mod orders;
mod routes;

pub use auth::{AuthGateway, AuthSession, Credentials, MockAuthGateway, SignUpError, SignUpForm};
pub use cart::{CartGateway, MockCartGateway};
pub use catalog::{CatalogGateway, MockCatalogGateway};
pub use checkout::{CheckoutGateway, MockCheckoutGateway};
pub use client::{HttpGateway, HttpGatewayConfig};
pub use form::{FilePart, MultipartPayload};
pub use home_sections::{HomeSectionsGateway, MockHomeSectionsGateway};
pub use orders::{MockOrdersGateway, OrdersGateway};

/// Errors returned by gateway calls.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// An authenticated call was answered with 400 or 401.
    #[error("gateway rejected the session credential")]
    Unauthorized,

    /// The resource does not exist.
    #[error("resource not found")]
    NotFound,

    /// Sign-in or sign-up was refused.
    #[error("request rejected: {0}")]
    Rejected(String),

    /// An HTTP transport error occurred.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Any other non-2xx response, or a body missing an expected field.
    #[error("unexpected response from gateway: {0}")]
    UnexpectedResponse(String),

    /// The response body could not be decoded.
    #[error("failed to decode gateway response")]
    Decode(#[from] serde_json::Error),
}
