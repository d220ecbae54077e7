//! HTTP+JSON pet directory service. Every route maps to exactly one
//! statement against the pooled SQLite store.

use axum::middleware::from_fn;
use axum::routing::get;
use axum::Router;
use petdir_core::PetPool;

pub mod config;
pub mod error;
pub mod handlers;
mod middleware;

pub use config::ServerConfig;
pub use error::{ApiError, ApiResult};
pub use handlers::{AverageAge, JsonBody, ListParams, PetId};

#[derive(Clone)]
pub struct AppState {
    pub pool: PetPool,
}

impl AppState {
    pub fn new(pool: PetPool) -> Self {
        Self { pool }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route(
            "/pets",
            get(handlers::list_pets).post(handlers::create_pet),
        )
        .route("/pets/stats/average-age", get(handlers::average_age))
        .route(
            "/pets/:id",
            get(handlers::get_pet)
                .put(handlers::update_pet)
                .delete(handlers::delete_pet),
        )
        .layer(from_fn(middleware::cors))
        .layer(from_fn(middleware::request_logging))
        .with_state(state)
}
