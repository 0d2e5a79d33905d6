// src/handlers/mod.rs

pub mod certification;
pub mod judge;
pub mod questions;

use axum::{http::StatusCode, response::IntoResponse};

/// GET /api/health - liveness probe.
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
