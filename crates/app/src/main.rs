//! Storefront CLI

use std::{io, process, sync::Arc};

use storefront_app::{
    AppContext, Gateways,
    gateway::HttpGateway,
    storage::FileStore,
};
use tracing::debug;

use crate::{cli::Output, config::StorefrontConfig};

mod cli;
mod config;
mod observability;

#[tokio::main]
pub async fn main() {
    let config = StorefrontConfig::load().unwrap_or_else(|error| error.exit());

    if let Err(error) = observability::init(&config.logging) {
        #[expect(
            clippy::print_stderr,
            reason = "logging not initialized, must use eprintln for setup errors"
        )]
        {
            eprintln!("{error}");
        }

        process::exit(1);
    }

    if let Err(message) = run(config).await {
        #[expect(clippy::print_stderr, reason = "command failures are reported to the user")]
        {
            eprintln!("{message}");
        }

        process::exit(1);
    }
}

async fn run(config: StorefrontConfig) -> Result<(), String> {
    let gateway = HttpGateway::new(config.gateway.http_config())
        .map_err(|error| format!("failed to build gateway client: {}", cli::report(&error)))?;

    let storage = Arc::new(FileStore::new(&config.storage.state_file));
    let context = AppContext::new(storage, Gateways::http(gateway));

    let session = context
        .restore()
        .await
        .map_err(|error| format!("failed to restore session: {}", cli::report(&error)))?;

    debug!(?session, state_file = %config.storage.state_file.display(), "restored session");

    let mut out = Output::new(io::stdout().lock(), config.currency);

    config.command.run(&context, &mut out).await
}
