use anyhow::{Context, Result};
use axum::Router;
use axum::extract::DefaultBodyLimit;
use tokio::net::TcpListener;
use tower_http::limit::RequestBodyLimitLayer;
use tracing::{info, warn};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::infrastructure::settings::Settings;
use crate::presentation::middleware::cors::apply_cors;
use crate::presentation::middleware::trace::apply_trace;
use crate::presentation::openapi::ApiDoc;
use crate::presentation::{AppState, http_handlers};

pub(crate) async fn run_http(settings: &Settings, state: AppState) -> Result<()> {
    let app = build_app(settings, state)?;

    let listener = TcpListener::bind(&settings.http_addr)
        .await
        .with_context(|| format!("failed to bind {}", settings.http_addr))?;

    info!(addr = %settings.http_addr, "HTTP server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("HTTP server stopped");
    Ok(())
}

/// Routes plus the outer layers: body limit, request tracing, CORS.
pub(crate) fn build_app(settings: &Settings, state: AppState) -> Result<Router> {
    let app = build_router(state, settings)
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(
            settings.http_request_body_limit_bytes,
        ));
    let app = apply_trace(app);
    apply_cors(app, &settings.cors_origins)
}

pub(crate) fn build_router(state: AppState, settings: &Settings) -> Router {
    http_handlers::routes(state, &settings.uploads_dir)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for ctrl-c, shutting down");
    }
    info!("shutdown signal received");
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{Method, Request, StatusCode, header},
    };
    use tower::ServiceExt;

    use super::build_app;
    use crate::data::repositories::Repositories;
    use crate::infrastructure::jwt::JwtService;
    use crate::infrastructure::settings::Settings;
    use crate::presentation::AppState;

    fn settings(body_limit: &str) -> Settings {
        let vars = [
            ("JWT_SECRET", "0123456789abcdef0123456789abcdef"),
            ("HTTP_REQUEST_BODY_LIMIT_BYTES", body_limit),
        ];
        Settings::from_lookup(|key| {
            vars.iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| value.to_string())
        })
        .expect("settings must parse")
    }

    fn state() -> AppState {
        let jwt = Arc::new(JwtService::new("0123456789abcdef0123456789abcdef", 3600));
        AppState::new(Repositories::in_memory(), jwt)
    }

    #[tokio::test]
    async fn oversized_body_is_rejected() {
        let app = build_app(&settings("64"), state()).expect("app must build");
        let body = format!(r#"{{"title":"t","content":"{}"}}"#, "x".repeat(256));

        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/api/posts")
                    .header(header::CONTENT_TYPE, "application/json")
                    .header(header::CONTENT_LENGTH, body.len())
                    .body(Body::from(body))
                    .expect("request must build"),
            )
            .await
            .expect("router is infallible");

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn openapi_document_is_served() {
        let app = build_app(&settings("1024"), state()).expect("app must build");

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api-docs/openapi.json")
                    .body(Body::empty())
                    .expect("request must build"),
            )
            .await
            .expect("router is infallible");

        assert_eq!(response.status(), StatusCode::OK);
    }
}
