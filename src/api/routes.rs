//! API Routes
//!
//! Configures the Axum router with all diagnostics endpoints.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    cache_stats_handler, clear_handler, health_handler, purge_handler, stats_overview_handler,
    AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /stats` - Statistics of every named cache
/// - `GET /stats/:name` - Statistics of one cache
/// - `POST /caches/:name/clear` - Empty one cache
/// - `POST /caches/:name/purge` - Remove expired entries of one cache
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/stats", get(stats_overview_handler))
        .route("/stats/:name", get(cache_stats_handler))
        .route("/caches/:name/clear", post(clear_handler))
        .route("/caches/:name/purge", post(purge_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::util::ServiceExt;

    fn create_test_app() -> Router {
        create_router(AppState::from_config(&Config::default()).unwrap())
    }

    async fn status_of(request: Request<Body>) -> StatusCode {
        create_test_app().oneshot(request).await.unwrap().status()
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        assert_eq!(status_of(request).await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_stats_endpoint() {
        let request = Request::builder().uri("/stats").body(Body::empty()).unwrap();
        assert_eq!(status_of(request).await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_cache_stats_not_found() {
        let request = Request::builder()
            .uri("/stats/nonexistent")
            .body(Body::empty())
            .unwrap();
        assert_eq!(status_of(request).await, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_clear_endpoint() {
        let request = Request::builder()
            .method("POST")
            .uri("/caches/session/clear")
            .body(Body::empty())
            .unwrap();
        assert_eq!(status_of(request).await, StatusCode::OK);
    }
}
