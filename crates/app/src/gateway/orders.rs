//! Orders.

use async_trait::async_trait;
use mockall::automock;
use reqwest::Method;
use serde::Deserialize;
use storefront::{
    ids::OrderId,
    orders::{Order, OrderUpdate},
    session::BearerToken,
};

use super::{
    GatewayError, HttpGateway,
    client::Access,
    routes::{ORDERS, order},
};

/// Order endpoints, all authenticated.
#[automock]
#[async_trait]
pub trait OrdersGateway: Send + Sync {
    /// Orders visible to the credential.
    async fn orders(&self, token: BearerToken) -> Result<Vec<Order>, GatewayError>;

    /// Change an order's status, returning the updated order.
    async fn update_order(
        &self,
        token: BearerToken,
        id: OrderId,
        update: OrderUpdate,
    ) -> Result<Order, GatewayError>;
}

#[derive(Debug, Deserialize)]
struct OrdersEnvelope {
    #[serde(default)]
    orders: Vec<Order>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdatedOrderEnvelope {
    updated_order: Order,
}

#[async_trait]
impl OrdersGateway for HttpGateway {
    #[tracing::instrument(name = "gateway.orders.orders", skip_all, err)]
    async fn orders(&self, token: BearerToken) -> Result<Vec<Order>, GatewayError> {
        let request = self.request(Method::GET, ORDERS, Some(&token));

        let envelope: OrdersEnvelope = self.send(request, Access::Authenticated).await?;

        Ok(envelope.orders)
    }

    #[tracing::instrument(
        name = "gateway.orders.update_order",
        skip(self, token, update),
        fields(order = %id, status = %update.order_status),
        err
    )]
    async fn update_order(
        &self,
        token: BearerToken,
        id: OrderId,
        update: OrderUpdate,
    ) -> Result<Order, GatewayError> {
        let request = self
            .request(Method::PUT, &order(&id), Some(&token))
            .json(&update);

        let envelope: UpdatedOrderEnvelope = self.send(request, Access::Authenticated).await?;

        Ok(envelope.updated_order)
    }
}
