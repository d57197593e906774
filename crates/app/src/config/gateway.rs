//! Gateway Config

use std::time::Duration;

use clap::Args;
use storefront_app::gateway::HttpGatewayConfig;

/// Gateway connection settings.
#[derive(Debug, Args)]
pub(crate) struct GatewayConfig {
    /// Base URL of the storefront API
    #[arg(long, env = "STOREFRONT_API_URL", default_value = "http://localhost:4000/api")]
    pub api_url: String,

    /// Per-request timeout in seconds
    #[arg(long, env = "STOREFRONT_REQUEST_TIMEOUT_SECONDS", default_value_t = 10_u64)]
    pub request_timeout_seconds: u64,
}

impl GatewayConfig {
    /// Settings for the HTTP gateway client.
    #[must_use]
    pub(crate) fn http_config(&self) -> HttpGatewayConfig {
        HttpGatewayConfig {
            base_url: self.api_url.clone(),
            timeout: Duration::from_secs(self.request_timeout_seconds),
        }
    }
}
