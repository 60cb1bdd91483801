//! Cars API routes
//!
//! This module wires up the cars domain to HTTP routes.

use axum::Router;
use domain_cars::{handlers, CarService, MongoCarRepository};
use mongodb::Database;

use crate::state::AppState;

/// Create cars router
pub fn router(state: &AppState) -> Router {
    // Create the MongoDB repository
    let repository = MongoCarRepository::new(state.db.clone());

    // Create the service with the shared image store
    let service = CarService::new(repository, state.storage.clone());

    // Return the domain's router
    handlers::router(service)
}

/// Create the car collection indexes at startup
pub async fn init_indexes(db: &Database) -> eyre::Result<()> {
    MongoCarRepository::new(db.clone())
        .init_indexes()
        .await
        .map_err(|e| eyre::eyre!("Failed to create car indexes: {}", e))
}
