use crate::{handlers, AppState};
use axum::{routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(handlers::health))
        // Insights
        .route("/api/insights", get(handlers::get_insights))
        .route("/api/insights/{type}", get(handlers::get_insight))
        // Graph queries
        .route("/api/graph/path", get(handlers::find_path))
        .route("/api/graph/stats", get(handlers::graph_stats))
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any),
        )
        .layer(TraceLayer::new_for_http())
}
