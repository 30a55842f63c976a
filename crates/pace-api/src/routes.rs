//! API routes.

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::handler::HandlerWithoutStateExt;
use axum::http::StatusCode;
use axum::middleware;
use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::services::ServeDir;

use crate::handlers::{analyze, health};
use crate::middleware::{
    rate_limit_middleware, request_id, request_logging, security_headers, AnalyzeRateLimit,
};
use crate::state::AppState;

/// Slack on top of the file cap for multipart framing and the small
/// confirmation field.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Create the API router.
pub fn create_router(state: AppState) -> Router {
    let rate_limiter = Arc::new(AnalyzeRateLimit::new(state.config.rate_limit_per_minute));

    let analyze_routes = Router::new()
        .route("/analyze", post(analyze))
        .layer(DefaultBodyLimit::max(
            state.config.max_upload_bytes + MULTIPART_OVERHEAD,
        ))
        .layer(middleware::from_fn_with_state(
            rate_limiter,
            rate_limit_middleware,
        ));

    let api_routes = Router::new()
        .merge(analyze_routes)
        .route("/health", get(health));

    let static_site =
        ServeDir::new(&state.config.public_dir).not_found_service(not_found.into_service());

    Router::new()
        .nest("/api", api_routes)
        .fallback_service(static_site)
        .layer(middleware::from_fn(security_headers))
        .layer(middleware::from_fn(request_id))
        .layer(middleware::from_fn(request_logging))
        .with_state(state)
}

async fn not_found() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({ "error": "Not found." })),
    )
}
