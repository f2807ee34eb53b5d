//! Router construction: a health surface plus the one `RequestHandler`.

use std::time::Duration;

use axum::Router;
use axum::http::Method;
use axum::routing::{get, post};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;

use crate::state::AppState;
use crate::web::middleware::request_id::RequestIdLayer;
use crate::web::middleware::security_headers::SecurityHeadersLayer;
use crate::web::{schedules, status};

/// Headroom added on top of `AppState::search_deadline` for the outer HTTP
/// timeout layer, so the connection is never severed before
/// `SearchDriver::generate` has a chance to return its own well-defined
/// `Outcome::TimedOut` body (§4.5, §7.3).
const TIMEOUT_LAYER_HEADROOM: Duration = Duration::from_secs(30);

/// Builds the application router: `/health`, `/status`, and
/// `POST /api/schedules`, wrapped in the same middleware stack the rest of
/// the codebase uses for every route.
pub fn create_router(app_state: AppState) -> Router {
    // Derived from the configured search deadline rather than a literal
    // constant -- a deployment that raises `SEARCH_DEADLINE_SECS` must not
    // have this layer cut the connection before the driver's own timeout
    // fires.
    let request_timeout = app_state.search_deadline + TIMEOUT_LAYER_HEADROOM;

    Router::new()
        .route("/health", get(status::health))
        .route("/status", get(status::status))
        .route("/api/schedules", post(schedules::generate_schedules))
        .with_state(app_state)
        .layer((
            // Outermost: per-request ID span + severity-proportional response logging.
            RequestIdLayer,
            // Security headers on every response (HSTS is prod-only).
            SecurityHeadersLayer,
            // This API has no cookies or other ambient credentials to leak,
            // so any origin may call it.
            CorsLayer::new()
                .allow_methods([Method::GET, Method::POST])
                .allow_headers(Any)
                .allow_origin(Any),
            // The search response can run to a few hundred KB of JSON for a
            // large `K`; compress it like any other API payload.
            CompressionLayer::new()
                .zstd(true)
                .br(true)
                .gzip(true)
                .quality(tower_http::CompressionLevel::Fastest),
            TimeoutLayer::new(request_timeout),
        ))
}
