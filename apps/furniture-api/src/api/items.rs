//! Wires the items domain to the `products` collection.

use axum::Router;
use domain_items::{ItemService, MongoItemRepository, handlers};

use crate::state::AppState;

pub fn router(state: &AppState) -> Router {
    let repository = MongoItemRepository::new(state.db.clone());
    handlers::router(ItemService::new(repository))
}

/// Ensures the lookup indexes exist before serving traffic.
pub async fn init_indexes(state: &AppState) -> eyre::Result<()> {
    MongoItemRepository::new(state.db.clone())
        .init_indexes()
        .await
        .map_err(|e| eyre::eyre!("Failed to create item indexes: {}", e))
}
