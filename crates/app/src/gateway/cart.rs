//! Server-side cart.

use async_trait::async_trait;
use mockall::automock;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use storefront::{
    cart::{CartLine, LineKey},
    session::BearerToken,
};

use super::{
    GatewayError, HttpGateway,
    client::Access,
    routes::{CART_ADD, CART_CLEAR, CART_ITEMS, CART_SUBTRACT, cart_remove},
};

/// Cart endpoints. Every call is authenticated.
///
/// Mutations answer with the server's resulting cart when the gateway
/// includes one; callers overwrite their local copy with it.
#[automock]
#[async_trait]
pub trait CartGateway: Send + Sync {
    /// Add a line, merging with an existing one server-side.
    async fn add_item(
        &self,
        token: BearerToken,
        line: CartLine,
    ) -> Result<Option<Vec<CartLine>>, GatewayError>;

    /// Take units off a line.
    async fn subtract_item(
        &self,
        token: BearerToken,
        key: LineKey,
        quantity: u32,
    ) -> Result<Option<Vec<CartLine>>, GatewayError>;

    /// Remove a product's line.
    async fn remove_item(
        &self,
        token: BearerToken,
        key: LineKey,
    ) -> Result<Option<Vec<CartLine>>, GatewayError>;

    /// Empty the cart.
    async fn clear(&self, token: BearerToken) -> Result<(), GatewayError>;

    /// Fetch the cart.
    async fn items(&self, token: BearerToken) -> Result<Vec<CartLine>, GatewayError>;
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AddItemBody<'a> {
    cart_item: &'a CartLine,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SubtractBody<'a> {
    product_id: &'a str,
    quantity: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    size: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    color: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CartItemsEnvelope {
    #[serde(default)]
    cart_items: Option<Vec<CartLine>>,
}

/// Pull `cartItems` out of a mutation response, if present and well formed.
fn resulting_cart(body: Value) -> Option<Vec<CartLine>> {
    serde_json::from_value::<CartItemsEnvelope>(body)
        .ok()
        .and_then(|envelope| envelope.cart_items)
}

#[async_trait]
impl CartGateway for HttpGateway {
    #[tracing::instrument(name = "gateway.cart.add_item", skip(self, token), fields(item = %line.item_id), err)]
    async fn add_item(
        &self,
        token: BearerToken,
        line: CartLine,
    ) -> Result<Option<Vec<CartLine>>, GatewayError> {
        let request = self
            .request(Method::POST, CART_ADD, Some(&token))
            .json(&AddItemBody { cart_item: &line });

        let body: Value = self.send(request, Access::Authenticated).await?;

        Ok(resulting_cart(body))
    }

    #[tracing::instrument(name = "gateway.cart.subtract_item", skip(self, token), fields(item = %key), err)]
    async fn subtract_item(
        &self,
        token: BearerToken,
        key: LineKey,
        quantity: u32,
    ) -> Result<Option<Vec<CartLine>>, GatewayError> {
        let request = self
            .request(Method::POST, CART_SUBTRACT, Some(&token))
            .json(&SubtractBody {
                product_id: key.item_id.as_str(),
                quantity,
                size: key.size.as_deref(),
                color: key.color.as_deref(),
            });

        let body: Value = self.send(request, Access::Authenticated).await?;

        Ok(resulting_cart(body))
    }

    #[tracing::instrument(name = "gateway.cart.remove_item", skip(self, token), fields(item = %key), err)]
    async fn remove_item(
        &self,
        token: BearerToken,
        key: LineKey,
    ) -> Result<Option<Vec<CartLine>>, GatewayError> {
        let request = self.request(Method::DELETE, &cart_remove(&key.item_id), Some(&token));

        let body: Value = self.send(request, Access::Authenticated).await?;

        Ok(resulting_cart(body))
    }

    #[tracing::instrument(name = "gateway.cart.clear", skip_all, err)]
    async fn clear(&self, token: BearerToken) -> Result<(), GatewayError> {
        let request = self.request(Method::DELETE, CART_CLEAR, Some(&token));

        self.send_discarding(request, Access::Authenticated).await
    }

    #[tracing::instrument(name = "gateway.cart.items", skip_all, err)]
    async fn items(&self, token: BearerToken) -> Result<Vec<CartLine>, GatewayError> {
        let request = self.request(Method::GET, CART_ITEMS, Some(&token));

        let envelope: CartItemsEnvelope = self.send(request, Access::Authenticated).await?;

        Ok(envelope.cart_items.unwrap_or_default())
    }
}
