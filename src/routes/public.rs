use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Public Router Module
///
/// Endpoints outside the page guard. They carry no personal data.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // Liveness probe for the load balancer.
        .route("/health", get(|| async { "ok" }))
        // GET /api/weather
        // Current conditions at the office for the dashboard widget.
        .route("/api/weather", get(handlers::get_weather))
}
