//! Orders service.

use std::{
    fmt,
    sync::{Arc, Mutex},
};

use storefront::{
    ids::OrderId,
    orders::{Order, OrderUpdate, replace_order},
};
use tracing::{debug, warn};

use crate::{errors::StoreError, gateway::OrdersGateway, session::SessionGate, state::lock};

/// Lists orders and moves them through fulfilment.
#[derive(Clone)]
pub struct OrdersService {
    gate: SessionGate,
    gateway: Arc<dyn OrdersGateway>,
    orders: Arc<Mutex<Vec<Order>>>,
}

impl OrdersService {
    /// Service with no orders loaded.
    pub fn new(gate: SessionGate, gateway: Arc<dyn OrdersGateway>) -> Self {
        Self {
            gate,
            gateway,
            orders: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Orders fetched so far.
    pub fn orders(&self) -> Vec<Order> {
        lock(&self.orders).clone()
    }

    /// Fetch the orders visible to the signed-in user.
    ///
    /// # Errors
    ///
    /// - [`StoreError::NotSignedIn`]: no credential is held.
    /// - [`StoreError::SessionExpired`]: the credential was refused.
    /// - [`StoreError::Gateway`]: any other failure.
    #[tracing::instrument(name = "orders.service.load", skip(self), err)]
    pub async fn load(&self) -> Result<Vec<Order>, StoreError> {
        let token = self.gate.token()?;
        let orders = self.gate.check(self.gateway.orders(token).await).await?;

        debug!(orders = orders.len(), "loaded orders");

        *lock(&self.orders) = orders.clone();

        Ok(orders)
    }

    /// Change an order's status and replace the local copy.
    ///
    /// # Errors
    ///
    /// - [`StoreError::NotFound`]: no order has this id; nothing changed.
    /// - Otherwise as [`OrdersService::load`].
    #[tracing::instrument(
        name = "orders.service.update_status",
        skip(self, update),
        fields(order = %id, status = %update.order_status),
        err
    )]
    pub async fn update_status(&self, id: OrderId, update: OrderUpdate) -> Result<Order, StoreError> {
        let token = self.gate.token()?;
        let updated = self
            .gate
            .check(self.gateway.update_order(token, id, update).await)
            .await?;

        if !replace_order(&mut lock(&self.orders), updated.clone()) {
            warn!(order = %updated.id, "updated order was not in the local list");
        }

        Ok(updated)
    }
}

impl fmt::Debug for OrdersService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrdersService")
            .field("orders", &lock(&self.orders).len())
            .finish_non_exhaustive()
    }
}
