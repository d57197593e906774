//! Storage Config

use std::path::PathBuf;

use clap::Args;

/// Local persistence settings.
#[derive(Debug, Args)]
pub(crate) struct StorageConfig {
    /// JSON file holding the session and guest cart between runs
    #[arg(long, env = "STOREFRONT_STATE_FILE", default_value = ".storefront/state.json")]
    pub state_file: PathBuf,
}
