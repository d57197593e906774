//! Checkout service
//!
//! Verifies stock and opens a payment preference for the current cart, and
//! settles the cart once the payment provider redirects back.

use std::{fmt, sync::Arc};

use storefront::checkout::{
    CheckoutOutcome, PreferenceRequest, StockCheck, StockCheckRequest, checkout_items,
};
use tracing::info;

use crate::{cart::CartService, errors::StoreError, gateway::CheckoutGateway, state::StoreState};

/// Hand-off between the cart and the payment provider.
#[derive(Clone)]
pub struct CheckoutService {
    state: StoreState,
    cart: CartService,
    gateway: Arc<dyn CheckoutGateway>,
}

impl CheckoutService {
    /// Service over the shared state.
    pub fn new(state: StoreState, cart: CartService, gateway: Arc<dyn CheckoutGateway>) -> Self {
        Self {
            state,
            cart,
            gateway,
        }
    }

    /// Ask the gateway whether every line of the cart can be served.
    ///
    /// # Errors
    ///
    /// - [`StoreError::EmptyCart`]: there is nothing to check.
    /// - [`StoreError::Gateway`]: the gateway could not answer.
    #[tracing::instrument(name = "checkout.service.verify_stock", skip(self), err)]
    pub async fn verify_stock(&self) -> Result<StockCheck, StoreError> {
        let cart = self.state.cart_snapshot();

        if cart.is_empty() {
            return Err(StoreError::EmptyCart);
        }

        Ok(self.gateway.verify_stock(StockCheckRequest::from(&cart)).await?)
    }

    /// Open a payment preference for the cart, returning the provider URL to
    /// send the shopper to.
    ///
    /// # Errors
    ///
    /// As [`CheckoutService::verify_stock`].
    #[tracing::instrument(name = "checkout.service.create_preference", skip(self), err)]
    pub async fn create_preference(&self) -> Result<String, StoreError> {
        let cart = self.state.cart_snapshot();

        if cart.is_empty() {
            return Err(StoreError::EmptyCart);
        }

        let request = PreferenceRequest {
            items: checkout_items(&cart),
            user_id: self.state.session().user().map(|user| user.id.clone()),
        };

        Ok(self.gateway.create_preference(request).await?)
    }

    /// Settle the cart after the provider's redirect, returning whether it
    /// was emptied.
    ///
    /// Only an approved payment empties the cart.
    ///
    /// # Errors
    ///
    /// As [`CartService::clear`].
    #[tracing::instrument(name = "checkout.service.complete", skip(self), fields(status = ?outcome.status), err)]
    pub async fn complete(&self, outcome: &CheckoutOutcome) -> Result<bool, StoreError> {
        if !outcome.should_clear_cart() {
            return Ok(false);
        }

        self.cart.clear().await?;

        info!(payment = ?outcome.payment_id, "payment approved, cart cleared");

        Ok(true)
    }
}

impl fmt::Debug for CheckoutService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckoutService")
            .field("cart", &self.cart)
            .finish_non_exhaustive()
    }
}
