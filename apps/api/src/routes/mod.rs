pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::documents::handlers as documents;
use crate::generation::handlers as generation;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Generation API
        .route("/api/v1/generate/ingest", post(generation::handle_ingest))
        .route("/api/v1/generate/tailor", post(generation::handle_tailor))
        .route(
            "/api/v1/generate/cover-letter",
            post(generation::handle_cover_letter),
        )
        // Document API
        .route(
            "/api/v1/documents",
            get(documents::handle_list).post(documents::handle_create),
        )
        .route(
            "/api/v1/documents/:id",
            get(documents::handle_get)
                .put(documents::handle_update)
                .delete(documents::handle_delete),
        )
        .route(
            "/api/v1/documents/:id/photo",
            post(documents::handle_store_photo)
                .get(documents::handle_get_photo)
                .delete(documents::handle_delete_photo),
        )
        .with_state(state)
}
