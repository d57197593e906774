//! HTTP client for the gateway.

use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::{Deserialize, de::DeserializeOwned};
use storefront::session::BearerToken;
use tracing::debug;

use super::GatewayError;

/// Configuration for connecting to the gateway.
#[derive(Debug, Clone)]
pub struct HttpGatewayConfig {
    /// API base URL, e.g. `"https://api.example.com/api"`.
    pub base_url: String,

    /// Per-request timeout.
    pub timeout: Duration,
}

/// HTTP implementation of every gateway trait.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    base_url: String,
    http: Client,
}

/// How an error status should be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Access {
    /// Anonymous request; 400/401 mean the request itself was refused.
    Public,

    /// Request carrying the session credential; 400/401 mean the credential
    /// is no longer accepted.
    Authenticated,
}

impl HttpGateway {
    /// Create a new client from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: HttpGatewayConfig) -> Result<Self, GatewayError> {
        let http = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    /// Absolute URL of `path`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub(crate) fn request(
        &self,
        method: Method,
        path: &str,
        token: Option<&BearerToken>,
    ) -> RequestBuilder {
        let request = self.http.request(method, self.url(path));

        match token {
            Some(token) => request.bearer_auth(token.expose()),
            None => request,
        }
    }

    /// Send a request and decode its JSON body.
    pub(crate) async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        access: Access,
    ) -> Result<T, GatewayError> {
        let bytes = self.send_raw(request, access).await?;

        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Send a request whose body is not needed.
    pub(crate) async fn send_discarding(
        &self,
        request: RequestBuilder,
        access: Access,
    ) -> Result<(), GatewayError> {
        self.send_raw(request, access).await.map(drop)
    }

    async fn send_raw(
        &self,
        request: RequestBuilder,
        access: Access,
    ) -> Result<Vec<u8>, GatewayError> {
        let response = request.send().await?;
        let status = response.status();
        let url = response.url().path().to_string();
        let bytes = response.bytes().await?;

        debug!(%status, url = %url, bytes = bytes.len(), "gateway response");

        classify(status, &bytes, access)?;

        Ok(bytes.to_vec())
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Map a response status onto the gateway's error model.
pub(crate) fn classify(status: StatusCode, body: &[u8], access: Access) -> Result<(), GatewayError> {
    if status.is_success() {
        return Ok(());
    }

    if status == StatusCode::NOT_FOUND {
        return Err(GatewayError::NotFound);
    }

    if status == StatusCode::BAD_REQUEST || status == StatusCode::UNAUTHORIZED {
        return match access {
            Access::Authenticated => Err(GatewayError::Unauthorized),
            Access::Public => Err(GatewayError::Rejected(
                error_message(body).unwrap_or_else(|| status.to_string()),
            )),
        };
    }

    Err(GatewayError::UnexpectedResponse(format!(
        "request failed with status {status}: {}",
        String::from_utf8_lossy(body)
    )))
}

fn error_message(body: &[u8]) -> Option<String> {
    serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|body| body.message)
        .filter(|message| !message.trim().is_empty())
}
