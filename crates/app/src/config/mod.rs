//! Storefront configuration

use clap::Parser;
use rusty_money::iso::Currency;

use crate::{
    cli::Command,
    config::{
        display::parse_currency, gateway::GatewayConfig, observability::LoggingConfig,
        storage::StorageConfig,
    },
};

pub(crate) mod display;
pub(crate) mod gateway;
pub(crate) mod observability;
pub(crate) mod storage;

/// Storefront client configuration
#[derive(Debug, Parser)]
#[command(name = "storefront", about = "Storefront client", long_about = None)]
pub(crate) struct StorefrontConfig {
    /// Gateway connection settings.
    #[command(flatten)]
    pub gateway: GatewayConfig,

    /// Local persistence settings.
    #[command(flatten)]
    pub storage: StorageConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    /// ISO currency code used to print prices
    #[arg(long, env = "STOREFRONT_CURRENCY", default_value = "USD", value_parser = parse_currency)]
    pub currency: &'static Currency,

    #[command(subcommand)]
    pub command: Command,
}

impl StorefrontConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub(crate) fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use testresult::TestResult;

    use super::*;

    #[test]
    fn defaults_apply_without_flags() -> TestResult {
        let config = StorefrontConfig::try_parse_from(["storefront", "categories"])?;

        assert_eq!(config.currency.iso_alpha_code, "USD");
        assert_eq!(
            config.gateway.http_config().timeout,
            Duration::from_secs(10)
        );
        assert!(matches!(config.command, Command::Categories));

        Ok(())
    }

    #[test]
    fn flags_override_defaults() -> TestResult {
        let config = StorefrontConfig::try_parse_from([
            "storefront",
            "--api-url",
            "https://shop.example/api/",
            "--currency",
            "eur",
            "--state-file",
            "/tmp/store.json",
            "products",
            "--category",
            "c1",
        ])?;

        assert_eq!(config.gateway.api_url, "https://shop.example/api/");
        assert_eq!(config.currency.iso_alpha_code, "EUR");
        assert_eq!(config.storage.state_file.to_str(), Some("/tmp/store.json"));

        Ok(())
    }

    #[test]
    fn unknown_currency_is_rejected() {
        let result = StorefrontConfig::try_parse_from(["storefront", "--currency", "ZZZ", "categories"]);

        assert!(result.is_err());
    }
}
