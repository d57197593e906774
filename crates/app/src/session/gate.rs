//! Session gate
//!
//! Every authenticated gateway call goes through here: it hands out the
//! credential and turns an authorization failure into a sign-out.

use std::fmt;

use storefront::session::BearerToken;
use tracing::{info, warn};

use crate::{
    errors::StoreError,
    gateway::GatewayError,
    state::StoreState,
    storage::{GUEST_CART_KEY, TOKEN_KEY, USER_KEY},
};

/// Credential access and sign-out shared by the services.
#[derive(Clone)]
pub struct SessionGate {
    state: StoreState,
}

impl SessionGate {
    /// Gate over `state`.
    pub fn new(state: StoreState) -> Self {
        Self { state }
    }

    /// The credential, when signed in.
    pub fn current_token(&self) -> Option<BearerToken> {
        self.state.session().token().cloned()
    }

    /// Whether `token` is still the session's credential.
    ///
    /// A response to a call made with an older credential must not be applied
    /// once this is false.
    pub fn is_current(&self, token: &BearerToken) -> bool {
        self.state.session().token() == Some(token)
    }

    /// The credential.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotSignedIn`] for a guest session.
    pub fn token(&self) -> Result<BearerToken, StoreError> {
        self.current_token().ok_or(StoreError::NotSignedIn)
    }

    /// End the session.
    ///
    /// Clears the credential, the profile and the cart, and deletes the
    /// persisted token, user and guest cart. The emptied cart is not saved as
    /// a new guest cart.
    ///
    /// # Errors
    ///
    /// Returns a storage error if a persisted key cannot be deleted; the
    /// in-memory session and cart are cleared regardless.
    pub async fn sign_out(&self) -> Result<(), StoreError> {
        self.state.session_mut().sign_out();
        self.state.cart().clear();

        let storage = self.state.storage();

        storage.remove(TOKEN_KEY).await?;
        storage.remove(USER_KEY).await?;
        storage.remove(GUEST_CART_KEY).await?;

        info!("signed out");

        Ok(())
    }

    /// Handle a refused credential: sign out and report the expiry.
    pub async fn on_unauthorized(&self) -> StoreError {
        warn!("gateway refused the session credential, signing out");

        if let Err(error) = self.sign_out().await {
            warn!(%error, "failed to clear persisted session after expiry");
        }

        StoreError::SessionExpired
    }

    /// Map the outcome of an authenticated gateway call.
    ///
    /// # Errors
    ///
    /// - [`StoreError::SessionExpired`]: the credential was refused; the store
    ///   has signed out.
    /// - [`StoreError::NotFound`]: the resource does not exist.
    /// - [`StoreError::Gateway`]: any other failure.
    pub async fn check<T>(&self, result: Result<T, GatewayError>) -> Result<T, StoreError> {
        match result {
            Ok(value) => Ok(value),
            Err(GatewayError::Unauthorized) => Err(self.on_unauthorized().await),
            Err(error) => Err(error.into()),
        }
    }
}

impl fmt::Debug for SessionGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionGate")
            .field("authenticated", &self.state.session().is_authenticated())
            .finish()
    }
}
