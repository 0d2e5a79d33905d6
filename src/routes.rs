// src/routes.rs

use axum::{
    Router, http::Method,
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers::{self, certification, judge, questions};
use crate::state::AppState;

/// Assembles the main application router.
///
/// * Merges all sub-routers (judge, certification, questions, admin).
/// * Applies global middleware (Trace, CORS).
/// * Injects global state (pool, config, execution backend).
pub fn create_router(state: AppState) -> Router {
    let origins = [
        "http://localhost:3000".parse().unwrap(),
        "http://127.0.0.1:3000".parse().unwrap(),
    ];

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
        ]);

    let judge_routes = Router::new()
        .route("/execute", post(judge::execute))
        .route("/run-tests", post(judge::run_tests));

    let certification_routes = Router::new()
        .route("/submit", post(certification::submit_certification))
        .route("/{user_id}", get(certification::list_certifications));

    let question_routes = Router::new()
        .route("/{id}", get(questions::get_question))
        .route("/{id}/stats", get(questions::get_question_stats))
        .route("/{id}/runs", get(questions::get_question_runs));

    // Admin routes; authentication/authorization enforced by the gateway.
    let admin_routes = Router::new().route("/questions", post(questions::create_question));

    Router::new()
        .nest("/api", judge_routes)
        .nest("/api/certification", certification_routes)
        .nest("/api/questions", question_routes)
        .nest("/api/admin", admin_routes)
        .route("/api/health", get(handlers::health_check))
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
