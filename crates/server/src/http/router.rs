use super::handlers::{admin, hooks, summary};
use crate::state::AppState;
use axum::{
    http::{HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub fn build_router(state: AppState, allowed_origins: &str) -> Router {
    let cors = if allowed_origins == "*" {
        CorsLayer::new()
            .allow_methods([Method::GET, Method::POST])
            .allow_origin(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<HeaderValue> = allowed_origins
            .split(',')
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .filter_map(|s| s.parse::<HeaderValue>().ok())
            .collect();

        if origins.is_empty() {
            tracing::warn!("CORS config is invalid or empty, falling back to allow ANY.");
            CorsLayer::new()
                .allow_methods([Method::GET, Method::POST])
                .allow_origin(Any)
                .allow_headers(Any)
        } else {
            tracing::info!("CORS enabled for origins: {:?}", origins);
            CorsLayer::new()
                .allow_methods([Method::GET, Method::POST])
                .allow_origin(origins)
                .allow_headers(Any)
        }
    };

    Router::new()
        .route("/hooks/comments", post(hooks::receive_comment_event))
        .route("/api/threads/:thread_id/summary", get(summary::get_summary))
        .route("/api/threads/:thread_id/summary/sse", get(summary::summary_sse))
        .route(
            "/api/admin/threads/:thread_id/solution",
            get(admin::show_solution_key),
        )
        .route(
            "/api/admin/threads/:thread_id/duplicate",
            post(admin::duplicate_thread),
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
