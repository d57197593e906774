//! Stock verification and payment preferences.

use async_trait::async_trait;
use mockall::automock;
use reqwest::Method;
use serde::Deserialize;
use storefront::checkout::{PreferenceRequest, StockCheck, StockCheckRequest};

use super::{
    GatewayError, HttpGateway,
    client::Access,
    routes::{CART_CHECKOUT, CREATE_PREFERENCE},
};

/// Checkout endpoints. Neither needs a credential.
#[automock]
#[async_trait]
pub trait CheckoutGateway: Send + Sync {
    /// Ask whether every item can be served.
    async fn verify_stock(&self, request: StockCheckRequest) -> Result<StockCheck, GatewayError>;

    /// Create a hosted payment preference, returning its redirect URL.
    async fn create_preference(&self, request: PreferenceRequest) -> Result<String, GatewayError>;
}

#[derive(Debug, Deserialize)]
struct SessionUrl {
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PreferenceResponse {
    #[serde(default)]
    init_point: Option<String>,

    #[serde(default)]
    url: Option<String>,

    #[serde(default)]
    session: Option<SessionUrl>,
}

impl PreferenceResponse {
    fn redirect_url(self) -> Option<String> {
        self.init_point
            .or(self.url)
            .or_else(|| self.session.and_then(|session| session.url))
            .filter(|url| !url.trim().is_empty())
    }
}

#[async_trait]
impl CheckoutGateway for HttpGateway {
    #[tracing::instrument(
        name = "gateway.checkout.verify_stock",
        skip_all,
        fields(items = request.cart_items.len()),
        err
    )]
    async fn verify_stock(&self, request: StockCheckRequest) -> Result<StockCheck, GatewayError> {
        let request = self.request(Method::POST, CART_CHECKOUT, None).json(&request);

        self.send(request, Access::Public).await
    }

    #[tracing::instrument(
        name = "gateway.checkout.create_preference",
        skip_all,
        fields(items = request.items.len()),
        err
    )]
    async fn create_preference(&self, request: PreferenceRequest) -> Result<String, GatewayError> {
        let request = self
            .request(Method::POST, CREATE_PREFERENCE, None)
            .json(&request);

        let response: PreferenceResponse = self.send(request, Access::Public).await?;

        response.redirect_url().ok_or_else(|| {
            GatewayError::UnexpectedResponse("payment preference has no redirect url".to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use testresult::TestResult;

    use super::*;

    fn redirect(body: serde_json::Value) -> TestResult<Option<String>> {
        Ok(serde_json::from_value::<PreferenceResponse>(body)?.redirect_url())
    }

    #[test]
    fn init_point_wins() -> TestResult {
        let url = redirect(json!({
            "init_point": "https://pay.example/init",
            "url": "https://pay.example/url"
        }))?;

        assert_eq!(url.as_deref(), Some("https://pay.example/init"));

        Ok(())
    }

    #[test]
    fn falls_back_to_url_then_session_url() -> TestResult {
        assert_eq!(
            redirect(json!({ "url": "https://pay.example/url" }))?.as_deref(),
            Some("https://pay.example/url")
        );
        assert_eq!(
            redirect(json!({ "session": { "url": "https://pay.example/session" } }))?.as_deref(),
            Some("https://pay.example/session")
        );

        Ok(())
    }

    #[test]
    fn missing_url_is_none() -> TestResult {
        assert_eq!(redirect(json!({ "id": "pref_1" }))?, None);

        Ok(())
    }
}
