//! Store errors.

use storefront::{cart::CartError, pricing::PricingError, session::SessionError};
use thiserror::Error;

use crate::{
    gateway::{GatewayError, SignUpError},
    storage::StorageError,
};

/// Errors surfaced by the store's services.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A cart operation was rejected; nothing changed.
    #[error("invalid cart operation")]
    Validation(#[from] CartError),

    /// A product's price or discount is out of range.
    #[error("invalid product pricing")]
    Pricing(#[from] PricingError),

    /// A sign-up form broke a password rule.
    #[error("invalid sign-up form")]
    SignUp(#[from] SignUpError),

    /// The gateway handed back an unusable credential.
    #[error("invalid session")]
    Session(#[from] SessionError),

    /// The session credential was refused; the store has signed out.
    #[error("session expired, please sign in again")]
    SessionExpired,

    /// The operation needs a signed-in session.
    #[error("not signed in")]
    NotSignedIn,

    /// The resource does not exist.
    #[error("not found")]
    NotFound,

    /// The local change was applied but the gateway did not confirm it.
    #[error("local change applied but the server did not confirm it")]
    SyncFailed(#[source] GatewayError),

    /// A gateway call failed.
    #[error("gateway error")]
    Gateway(#[source] GatewayError),

    /// Local persistence failed.
    #[error("storage error")]
    Storage(#[from] StorageError),

    /// Checkout was attempted with nothing in the cart.
    #[error("the cart is empty")]
    EmptyCart,
}

impl From<GatewayError> for StoreError {
    fn from(error: GatewayError) -> Self {
        match error {
            GatewayError::NotFound => Self::NotFound,
            error => Self::Gateway(error),
        }
    }
}
