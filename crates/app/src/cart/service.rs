//! Cart service
//!
//! Local mutations are applied first and are visible immediately. A guest
//! cart is then saved to local storage; an authenticated cart is sent to the
//! gateway through a per-cart queue so server calls go out in order. The
//! server's answer, when it carries the resulting cart, overwrites the local
//! copy.

use std::{fmt, sync::Arc};

use storefront::{
    cart::{Cart, CartLine, CartTotals, LineKey},
    session::BearerToken,
};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::{
    errors::StoreError,
    gateway::{CartGateway, GatewayError},
    session::SessionGate,
    state::StoreState,
    storage::{GUEST_CART_KEY, StorageError},
};

/// Outcome of handing a guest cart to the server.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Lines the gateway accepted.
    pub delivered: Vec<CartLine>,

    /// Lines the gateway failed to accept. They are not retried.
    pub failed: Vec<CartLine>,
}

impl ReconcileReport {
    /// Whether every guest line reached the server.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Cart operations over the shared state.
#[derive(Clone)]
pub struct CartService {
    state: StoreState,
    gate: SessionGate,
    gateway: Arc<dyn CartGateway>,
    queue: Arc<Mutex<()>>,
}

impl CartService {
    /// Service over the shared state.
    pub fn new(state: StoreState, gate: SessionGate, gateway: Arc<dyn CartGateway>) -> Self {
        Self {
            state,
            gate,
            gateway,
            queue: Arc::new(Mutex::new(())),
        }
    }

    /// Copy of the cart.
    pub fn snapshot(&self) -> Cart {
        self.state.cart_snapshot()
    }

    /// Current totals.
    pub fn totals(&self) -> CartTotals {
        self.state.cart().totals()
    }

    /// Add a line, returning the line's new quantity.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Validation`]: the quantity is zero, or the cart total
    ///   would overflow; nothing changed.
    /// - [`StoreError::SyncFailed`]: the local change stands but the gateway
    ///   did not confirm it.
    /// - [`StoreError::SessionExpired`]: the credential was refused.
    /// - [`StoreError::Storage`]: the guest cart could not be saved.
    #[tracing::instrument(
        name = "cart.service.add_line",
        skip(self, line),
        fields(item = %line.item_id, quantity = line.quantity),
        err
    )]
    pub async fn add_line(&self, line: CartLine) -> Result<u32, StoreError> {
        let quantity = self.state.cart().add_line(line.clone())?;

        match self.gate.current_token() {
            None => self.save_guest_cart().await?,
            Some(token) => {
                let _turn = self.queue.lock().await;
                let result = self.gateway.add_item(token.clone(), line).await;

                self.apply_server_cart(&token, result).await?;
            }
        }

        Ok(quantity)
    }

    /// Take units off a line, returning what remains (zero once removed).
    ///
    /// # Errors
    ///
    /// - [`StoreError::Validation`]: unknown line, or a quantity of zero or
    ///   more than the line holds; nothing changed.
    /// - Otherwise as [`CartService::add_line`].
    #[tracing::instrument(name = "cart.service.decrement_line", skip(self), fields(item = %key), err)]
    pub async fn decrement_line(&self, key: LineKey, quantity: u32) -> Result<u32, StoreError> {
        let remaining = self.state.cart().decrement_line(&key, quantity)?;

        match self.gate.current_token() {
            None => self.save_guest_cart().await?,
            Some(token) => {
                let _turn = self.queue.lock().await;
                let result = self.gateway.subtract_item(token.clone(), key, quantity).await;

                self.apply_server_cart(&token, result).await?;
            }
        }

        Ok(remaining)
    }

    /// Remove a line outright, returning it.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Validation`]: unknown line; nothing changed.
    /// - Otherwise as [`CartService::add_line`].
    #[tracing::instrument(name = "cart.service.remove_line", skip(self), fields(item = %key), err)]
    pub async fn remove_line(&self, key: LineKey) -> Result<CartLine, StoreError> {
        let removed = self.state.cart().remove_line(&key)?;

        match self.gate.current_token() {
            None => self.save_guest_cart().await?,
            Some(token) => {
                let _turn = self.queue.lock().await;
                let result = self.gateway.remove_item(token.clone(), key).await;

                self.apply_server_cart(&token, result).await?;
            }
        }

        Ok(removed)
    }

    /// Empty the cart.
    ///
    /// The local cart is emptied first and stays empty whatever the gateway
    /// answers. Network failures of the server clear are logged, not
    /// returned.
    ///
    /// # Errors
    ///
    /// - [`StoreError::SessionExpired`]: the credential was refused.
    /// - [`StoreError::Storage`]: the guest cart could not be saved.
    #[tracing::instrument(name = "cart.service.clear", skip(self), err)]
    pub async fn clear(&self) -> Result<(), StoreError> {
        self.state.cart().clear();

        let Some(token) = self.gate.current_token() else {
            return self.save_guest_cart().await;
        };

        let _turn = self.queue.lock().await;

        match self.gateway.clear(token).await {
            Ok(()) => Ok(()),
            Err(GatewayError::Unauthorized) => Err(self.gate.on_unauthorized().await),
            Err(error) => {
                warn!(%error, "server cart clear failed; local cart already empty");

                Ok(())
            }
        }
    }

    /// Overwrite the local cart with `lines`.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Validation`]: the lines' total does not fit; nothing changed.
    /// - [`StoreError::Storage`]: the guest cart could not be saved.
    pub async fn replace_all(&self, lines: Vec<CartLine>) -> Result<(), StoreError> {
        self.state.cart().replace_all(lines)?;

        if self.gate.current_token().is_none() {
            self.save_guest_cart().await?;
        }

        Ok(())
    }

    /// Reload the cart from the server. A guest cart is returned as is, and
    /// so is the local cart if the session changed while the server was
    /// answering.
    ///
    /// # Errors
    ///
    /// - [`StoreError::SessionExpired`]: the credential was refused.
    /// - [`StoreError::Gateway`]: the cart could not be fetched.
    /// - [`StoreError::Validation`]: the server cart's total does not fit.
    #[tracing::instrument(name = "cart.service.refresh", skip(self), err)]
    pub async fn refresh(&self) -> Result<Cart, StoreError> {
        let Some(token) = self.gate.current_token() else {
            return Ok(self.snapshot());
        };

        let lines = {
            let _turn = self.queue.lock().await;
            self.gate.check(self.gateway.items(token.clone()).await).await?
        };

        if !self.gate.is_current(&token) {
            debug!("session changed during refresh, dropping server cart");

            return Ok(self.snapshot());
        }

        let mut cart = self.state.cart();
        cart.replace_all(lines)?;

        Ok(cart.clone())
    }

    /// Load the guest cart saved by a previous run, returning how many lines
    /// it held.
    ///
    /// Does nothing for a signed-in session. A malformed snapshot is logged
    /// and ignored.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the snapshot cannot be read.
    #[tracing::instrument(name = "cart.service.restore_guest_cart", skip(self), err)]
    pub async fn restore_guest_cart(&self) -> Result<usize, StoreError> {
        if self.gate.current_token().is_some() {
            return Ok(0);
        }

        let Some(snapshot) = self.state.storage().get(GUEST_CART_KEY).await? else {
            return Ok(0);
        };

        let lines = match serde_json::from_str::<Vec<CartLine>>(&snapshot) {
            Ok(lines) => lines,
            Err(error) => {
                warn!(%error, "ignoring malformed guest cart snapshot");

                return Ok(0);
            }
        };

        let mut cart = self.state.cart();

        if let Err(error) = cart.replace_all(lines) {
            warn!(%error, "ignoring unusable guest cart snapshot");

            return Ok(0);
        }

        debug!(lines = cart.len(), "restored guest cart");

        Ok(cart.len())
    }

    /// Send each guest line to the server, in order, then adopt the server's
    /// cart.
    ///
    /// Lines go out one at a time; a line the gateway fails to accept is
    /// logged and reported, never rolled back or retried. The saved guest
    /// cart is deleted once the server's cart has been adopted.
    ///
    /// # Errors
    ///
    /// - [`StoreError::SessionExpired`]: the credential was refused; the store
    ///   has signed out.
    /// - [`StoreError::SyncFailed`]: the server's cart could not be fetched
    ///   afterwards.
    /// - [`StoreError::Validation`]: the server cart's total does not fit.
    /// - [`StoreError::Storage`]: the saved guest cart could not be deleted.
    #[tracing::instrument(
        name = "cart.service.reconcile_guest_cart_with_server",
        skip_all,
        fields(guest_lines = guest_lines.len()),
        err
    )]
    pub async fn reconcile_guest_cart_with_server(
        &self,
        guest_lines: Vec<CartLine>,
        token: BearerToken,
    ) -> Result<ReconcileReport, StoreError> {
        let _turn = self.queue.lock().await;

        let mut report = ReconcileReport::default();

        for line in guest_lines {
            match self.gateway.add_item(token.clone(), line.clone()).await {
                Ok(_) => report.delivered.push(line),
                Err(GatewayError::Unauthorized) => return Err(self.gate.on_unauthorized().await),
                Err(error) => {
                    warn!(%error, item = %line.item_id, "guest cart line was not accepted");

                    report.failed.push(line);
                }
            }
        }

        let lines = match self.gateway.items(token.clone()).await {
            Ok(lines) => lines,
            Err(GatewayError::Unauthorized) => return Err(self.gate.on_unauthorized().await),
            Err(error) => return Err(StoreError::SyncFailed(error)),
        };

        if !self.gate.is_current(&token) {
            debug!("session changed during reconciliation, dropping server cart");

            return Ok(report);
        }

        self.state.cart().replace_all(lines)?;
        self.state.storage().remove(GUEST_CART_KEY).await?;

        info!(
            delivered = report.delivered.len(),
            failed = report.failed.len(),
            "reconciled guest cart with server"
        );

        Ok(report)
    }

    /// Adopt the server's answer to a call made with `token`. An answer that
    /// arrives after the session has changed is dropped.
    async fn apply_server_cart(
        &self,
        token: &BearerToken,
        result: Result<Option<Vec<CartLine>>, GatewayError>,
    ) -> Result<(), StoreError> {
        match result {
            Ok(Some(_)) if !self.gate.is_current(token) => {
                debug!("session changed while the server answered, dropping server cart");

                Ok(())
            }
            Ok(Some(lines)) => {
                self.state.cart().replace_all(lines)?;

                Ok(())
            }
            Ok(None) => Ok(()),
            Err(GatewayError::Unauthorized) => Err(self.gate.on_unauthorized().await),
            Err(error) => Err(StoreError::SyncFailed(error)),
        }
    }

    async fn save_guest_cart(&self) -> Result<(), StoreError> {
        let snapshot =
            serde_json::to_string(self.state.cart().lines()).map_err(StorageError::from)?;

        self.state.storage().set(GUEST_CART_KEY, snapshot).await?;

        Ok(())
    }
}

impl fmt::Debug for CartService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartService")
            .field("cart", &*self.state.cart())
            .finish_non_exhaustive()
    }
}
