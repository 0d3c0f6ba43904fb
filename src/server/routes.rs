use axum::http::{HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::error::ApiError;
use crate::handlers::{export, insights, readings, stats};
use health_dashboard::store::ReadingStore;
use health_dashboard::time::Clock;

/// Shared state injected into every handler
///
/// The store is constructed once at startup and passed here explicitly;
/// no handler reaches for ambient/global state.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<ReadingStore>,
    pub clock: Arc<dyn Clock>,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(store: Arc<ReadingStore>, config: Arc<ServerConfig>) -> Self {
        let clock = store.clock().clone();
        Self {
            store,
            clock,
            config,
        }
    }
}

/// Build the application router
pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors_allowed_origin);

    Router::new()
        .route("/health", get(readings::health))
        .route(
            "/readings",
            get(readings::list_readings)
                .post(readings::add_reading)
                .delete(readings::clear_readings),
        )
        .route("/readings/recent", get(readings::recent_readings))
        .route("/readings/type/:device_type", get(readings::readings_by_type))
        .route("/readings/import", post(readings::import_readings))
        .route("/dashboard", get(stats::dashboard))
        .route("/statistics", get(stats::statistics))
        .route("/analytics", get(stats::analytics))
        .route("/export/json", get(export::export_json))
        .route("/export/xml", get(export::export_xml))
        .route(
            "/insights",
            get(insights::stored_insights).post(insights::analyze_batch),
        )
        .fallback(not_found)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Fallback for unregistered paths, so 404s carry the standard error body
async fn not_found() -> ApiError {
    ApiError::NotFound(String::from("Resource not found"))
}

fn cors_layer(allowed_origin: &str) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers(Any);

    if allowed_origin == "*" {
        layer.allow_origin(Any)
    } else {
        match allowed_origin.parse::<HeaderValue>() {
            Ok(origin) => layer.allow_origin(origin),
            Err(_) => {
                tracing::warn!(
                    origin = %allowed_origin,
                    "Invalid CORS_ALLOWED_ORIGIN, falling back to any origin"
                );
                layer.allow_origin(Any)
            }
        }
    }
}
