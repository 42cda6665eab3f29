// Presentation layer - HTTP routes over the statistics use cases
pub mod app_state;
pub mod error_response;
pub mod handlers;
pub mod params;

use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{countries, health_check, historical, overview, top_countries};
use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub fn router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .route("/historical", get(historical))
        .route("/countries", get(countries))
        .route("/top-countries", get(top_countries))
        .route("/overview", get(overview));

    Router::new()
        .route("/healthz", get(health_check))
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
