use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers;

/// All application routes
pub fn configure_routes() -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        // ========================================
        // U508 IMPORTANT EVENTS
        // ========================================
        .route(
            "/important-events/basic-data",
            get(handlers::u508_important_events::get_basic_data),
        )
        .route(
            "/important-events/data/:code_number",
            get(handlers::u508_important_events::get_saved),
        )
        .route(
            "/important-events/link/:code_number",
            get(handlers::u508_important_events::get_link),
        )
        .route(
            "/important-events/save",
            post(handlers::u508_important_events::save),
        )
}
