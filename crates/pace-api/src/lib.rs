//! Axum HTTP API server.
//!
//! This crate provides:
//! - `POST /api/analyze` — multipart video upload, analyzed by the provider
//! - `GET /api/health` — liveness probe with process uptime
//! - Per-IP rate limiting and security headers
//! - Static file serving for the browser UI

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::AppState;
