pub mod config;
pub mod presenter;
pub mod prober;
pub mod routes_datasets;
pub mod routes_pages;
pub mod state;
pub mod types;

use axum::{routing::get, Router};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

pub use state::{AppState, SharedState};

/// Full HTTP surface: listing page, dataset API, and the static asset tree
/// the local dataset urls point into.
pub fn router(state: SharedState) -> Router {
    let assets = ServeDir::new(&state.config.static_root);

    Router::new()
        .route("/", get(routes_pages::index))
        .route("/healthz", get(routes_pages::healthz))
        .route("/api/datasets", get(routes_datasets::list_datasets))
        .route("/api/datasets/:id/metadata", get(routes_datasets::get_metadata))
        .fallback_service(assets)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
