use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{ApiError, ValidationError};
use crate::routes::AppState;
use health_dashboard::domain::{Reading, ReadingInput};
use health_dashboard::store::DEFAULT_RECENT_COUNT;
use health_dashboard::validators::validate_reading_input;

use super::StatusResponse;

/// Response payload for POST /readings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddReadingResponse {
    pub success: bool,
    pub message: String,
    /// Server-assigned id of the stored reading
    pub id: u64,
}

/// Query parameters for GET /readings/recent
#[derive(Debug, Deserialize)]
pub struct RecentParams {
    pub count: Option<usize>,
}

/// Handler for POST /readings
///
/// Validates the candidate reading and appends it to the store. The store
/// assigns id and timestamp; any client-supplied values for those fields
/// were already discarded by the input schema.
pub async fn add_reading(
    State(state): State<AppState>,
    payload: Result<Json<ReadingInput>, JsonRejection>,
) -> Result<Json<AddReadingResponse>, ApiError> {
    let Json(input) = payload.map_err(ValidationError::from_rejection)?;

    validate_reading_input(&input)?;

    let reading = state.store.add_reading(input);

    info!(
        id = reading.id,
        device_id = %reading.device_id,
        device_type = %reading.device_type,
        value = reading.value,
        "Reading added"
    );

    Ok(Json(AddReadingResponse {
        success: true,
        message: String::from("Reading added successfully"),
        id: reading.id,
    }))
}

/// Handler for GET /readings
///
/// Returns every stored reading, most recent first.
pub async fn list_readings(State(state): State<AppState>) -> Json<Vec<Reading>> {
    Json(state.store.all_readings())
}

/// Handler for GET /readings/recent?count=N (default 10)
pub async fn recent_readings(
    State(state): State<AppState>,
    Query(params): Query<RecentParams>,
) -> Json<Vec<Reading>> {
    let count = params.count.unwrap_or(DEFAULT_RECENT_COUNT);
    Json(state.store.recent_readings(count))
}

/// Handler for GET /readings/type/{device_type}
///
/// Case-insensitive match on device type.
pub async fn readings_by_type(
    State(state): State<AppState>,
    Path(device_type): Path<String>,
) -> Json<Vec<Reading>> {
    Json(state.store.readings_by_device_type(&device_type))
}

/// Handler for POST /readings/import
///
/// Bulk import is all-or-nothing: an empty array or any structurally
/// invalid entry imports zero readings and reports a flagged failure.
/// Oversized batches are rejected outright.
pub async fn import_readings(
    State(state): State<AppState>,
    payload: Result<Json<Vec<ReadingInput>>, JsonRejection>,
) -> Result<Json<StatusResponse>, ApiError> {
    let Json(inputs) = payload.map_err(ValidationError::from_rejection)?;

    if inputs.len() > state.config.max_import_batch {
        return Err(ValidationError::BatchSizeExceeded(
            inputs.len(),
            state.config.max_import_batch,
        )
        .into());
    }

    if inputs.is_empty() {
        warn!("Import request with no readings");
        return Ok(Json(StatusResponse::failed("No valid readings provided")));
    }

    // Validate everything before mutating the store
    for input in &inputs {
        if let Err(e) = validate_reading_input(input) {
            warn!(error = %e, "Import rejected, zero readings imported");
            return Ok(Json(StatusResponse::failed("No valid readings provided")));
        }
    }

    let count = inputs.len();
    for input in inputs {
        state.store.add_reading(input);
    }

    info!(count = count, "Imported readings");

    Ok(Json(StatusResponse::ok(format!(
        "Imported {} readings",
        count
    ))))
}

/// Handler for DELETE /readings
///
/// Removes every stored reading and resets the id sequence.
pub async fn clear_readings(State(state): State<AppState>) -> Json<StatusResponse> {
    state.store.clear_all();
    info!("All readings cleared");
    Json(StatusResponse::ok("All readings cleared"))
}

/// Handler for GET /health
///
/// Liveness probe; requires no store access.
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "health-dashboard",
    }))
}
