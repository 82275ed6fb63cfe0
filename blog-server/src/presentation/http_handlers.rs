use std::path::Path;

use axum::{Json, Router, routing::get};
use serde::Serialize;
use tower_http::services::ServeDir;

use super::{AppState, routes};

pub(crate) fn routes(state: AppState, uploads_dir: &Path) -> Router {
    Router::new()
        .route("/healthz", get(health_handler))
        .merge(routes::router(state.clone()))
        .nest_service("/uploads", ServeDir::new(uploads_dir))
        .with_state(state)
}

#[derive(Debug, Serialize)]
struct HealthzResponse {
    status: &'static str,
}

async fn health_handler() -> Json<HealthzResponse> {
    Json(HealthzResponse { status: "ok" })
}
