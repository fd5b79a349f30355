//! CLI subcommands.

pub mod migrate;
pub mod products;
pub mod seed;

use shopfront_api::config::{ApiConfig, StoreBackend};
use shopfront_api::db::{self, Store};

/// A command was pointed at a store that does not outlive the process.
#[derive(Debug, thiserror::Error)]
#[error("{command} requires a postgres:// database URL; memory:// contents are lost on exit")]
pub struct NotPersistent {
    pub command: &'static str,
}

/// Reject configurations whose store would vanish when the CLI exits.
///
/// # Errors
///
/// Returns `NotPersistent` for the in-memory backend.
pub fn ensure_persistent(config: &ApiConfig, command: &'static str) -> Result<(), NotPersistent> {
    match config.store_backend {
        StoreBackend::Postgres => Ok(()),
        StoreBackend::Memory => Err(NotPersistent { command }),
    }
}

/// Load configuration and connect to a persistent store.
///
/// # Errors
///
/// Returns an error if configuration is missing, the backend is in-memory,
/// or the store cannot be reached.
pub async fn connect_persistent(command: &'static str) -> Result<Store, Box<dyn std::error::Error>> {
    let config = ApiConfig::from_env()?;
    ensure_persistent(&config, command)?;
    Ok(db::connect(&config).await?)
}
