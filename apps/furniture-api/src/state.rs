//! Shared application state.

use mongodb::{Client, Database};

/// Cloned into each router; both MongoDB handles share one connection pool.
#[derive(Clone)]
pub struct AppState {
    pub config: crate::config::Config,
    pub mongo_client: Client,
    /// Handle to the configured database (`furniture` by default)
    pub db: Database,
}
