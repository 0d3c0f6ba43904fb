use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{ApiError, ValidationError};
use crate::routes::AppState;
use health_dashboard::domain::ReadingInput;
use health_dashboard::insights::{analyze, analyze_readings, ReadingAnalysis};
use health_dashboard::validators::{normalize_device_type, validate_reading_input};

/// Request payload for POST /insights
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    pub readings: Vec<ReadingInput>,
}

/// Response payload for the insights endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightsResponse {
    pub status: String,
    pub message: String,
    pub analysis: ReadingAnalysis,
    pub processed_at: DateTime<Utc>,
}

impl InsightsResponse {
    fn new(message: &str, analysis: ReadingAnalysis, processed_at: DateTime<Utc>) -> Self {
        Self {
            status: String::from("success"),
            message: String::from(message),
            analysis,
            processed_at,
        }
    }
}

/// Handler for GET /insights
///
/// Classification analysis over the stored readings.
pub async fn stored_insights(State(state): State<AppState>) -> Json<InsightsResponse> {
    let readings = state.store.all_readings();
    let analysis = analyze_readings(&readings);

    info!(count = readings.len(), "Analyzed stored readings");

    Json(InsightsResponse::new(
        "Health data processed successfully",
        analysis,
        state.clock.now(),
    ))
}

/// Handler for POST /insights
///
/// Same analysis over a submitted batch; the store is not touched.
pub async fn analyze_batch(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<InsightsResponse>, ApiError> {
    let Json(request) = payload.map_err(ValidationError::from_rejection)?;

    for input in &request.readings {
        validate_reading_input(input)?;
    }

    // Normalize types so "HEART_RATE" classifies the same as "heart_rate"
    let normalized: Vec<(String, f64)> = request
        .readings
        .iter()
        .map(|r| (normalize_device_type(&r.device_type), r.value))
        .collect();
    let analysis = analyze(normalized.iter().map(|(t, v)| (t.as_str(), *v)));

    info!(count = request.readings.len(), "Analyzed submitted batch");

    Ok(Json(InsightsResponse::new(
        "Data analyzed successfully",
        analysis,
        state.clock.now(),
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analyze_request_deserialization() {
        let json = r#"{
            "readings": [
                {"deviceId": "polar-h10", "deviceType": "heart_rate", "value": 72, "unit": "BPM"},
                {"deviceId": "thermo-1", "deviceType": "thermometer", "value": 36.8, "unit": "°C"}
            ]
        }"#;

        let request: AnalyzeRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.readings.len(), 2);
        assert_eq!(request.readings[0].device_type, "heart_rate");
        assert_eq!(request.readings[1].value, 36.8);
    }

    #[test]
    fn test_insights_response_serialization() {
        let analysis = analyze(vec![("heart_rate", 72.0)]);
        let response = InsightsResponse::new(
            "Data analyzed successfully",
            analysis,
            Utc::now(),
        );

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"status\":\"success\""));
        assert!(json.contains("Data analyzed successfully"));
        assert!(json.contains("\"analysis\""));
        assert!(json.contains("processedAt"));
    }
}
