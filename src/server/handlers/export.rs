use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use tracing::info;

use crate::error::ApiError;
use crate::routes::AppState;
use health_dashboard::export::readings_to_xml;

/// Handler for GET /export/json
///
/// Pretty-printed JSON document of every stored reading.
pub async fn export_json(State(state): State<AppState>) -> Result<Response, ApiError> {
    let readings = state.store.all_readings();

    let body = serde_json::to_string_pretty(&readings)
        .map_err(|e| ApiError::Internal(format!("Failed to serialize readings: {}", e)))?;

    info!(count = readings.len(), "Exported readings as JSON");

    Ok((
        [(header::CONTENT_TYPE, "application/json")],
        body,
    )
        .into_response())
}

/// Handler for GET /export/xml
///
/// XML document with one `Reading` element per stored reading.
pub async fn export_xml(State(state): State<AppState>) -> Result<Response, ApiError> {
    let readings = state.store.all_readings();

    let body = readings_to_xml(&readings)
        .map_err(|e| ApiError::Internal(format!("Failed to serialize readings: {}", e)))?;

    info!(count = readings.len(), "Exported readings as XML");

    Ok(([(header::CONTENT_TYPE, "application/xml")], body).into_response())
}
