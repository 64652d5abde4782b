//! mfl-proxy - forwards browser requests to the MyFantasyLeague export API
//!
//! League id, season and JSON mode are filled in server-side, so clients only
//! pick the export `type` and week `w`.

use axum::Router;
use axum::http::{HeaderValue, header};
use std::sync::Arc;
use std::time::Duration;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

pub mod config;
pub mod routes;

pub use config::{ConfigError, ProxySettings};

/// Upstream request timeout.
pub const UPSTREAM_TIMEOUT: Duration = Duration::from_secs(10);

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<ProxySettings>,
    pub client: reqwest::Client,
}

impl AppState {
    pub fn new(settings: ProxySettings) -> Self {
        let client = reqwest::Client::builder()
            .user_agent("mfl-proxy/0.1")
            .timeout(UPSTREAM_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self { settings: Arc::new(settings), client }
    }
}

/// Build application router
///
/// Every response, errors included, allows any origin and must not be cached.
pub fn build_router(state: AppState) -> Router {
    use axum::routing::get;

    Router::new()
        .route(mfl_api::client::PROXY_EXPORT_PATH, get(routes::mfl_export))
        .route("/health", get(routes::health))
        .with_state(state)
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
        .layer(TraceLayer::new_for_http())
}
