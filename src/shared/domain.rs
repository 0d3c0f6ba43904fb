use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single stored health sensor observation
///
/// The `id` and `timestamp` fields are assigned by the store at insertion
/// time; clients never supply them. Field names follow the camelCase wire
/// format of the JSON API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Reading {
    /// Unique identifier, monotonically increasing from 1
    pub id: u64,
    /// Free-text source identifier (e.g. "polar-h10", "esp32-kitchen")
    pub device_id: String,
    /// Category label, normalized to lowercase at ingestion
    pub device_type: String,
    /// Measured value
    pub value: f64,
    /// Unit label (e.g. "BPM", "°C")
    pub unit: String,
    /// Server-assigned insertion time
    pub timestamp: DateTime<Utc>,
    /// Optional free-text annotation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Candidate reading submitted by a client
///
/// Deliberately lacks `id` and `timestamp`: both are server-assigned.
/// Clients that echo them back anyway are tolerated; unknown fields are
/// dropped during deserialization.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReadingInput {
    pub device_id: String,
    pub device_type: String,
    pub value: f64,
    pub unit: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Composite view backing the dashboard page
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardData {
    /// Most recent readings (up to 20), timestamp descending
    pub recent_readings: Vec<Reading>,
    /// All readings partitioned by device id, each partition descending
    pub readings_by_device: HashMap<String, Vec<Reading>>,
    /// Arithmetic mean of value per device type
    pub averages_by_type: HashMap<String, f64>,
    /// Total number of stored readings
    pub total_readings: usize,
    /// Maximum timestamp across all readings, absent when the store is empty
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_reading_time: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_reading() -> Reading {
        Reading {
            id: 1,
            device_id: String::from("polar-h10"),
            device_type: String::from("heart_rate"),
            value: 72.0,
            unit: String::from("BPM"),
            timestamp: Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap(),
            notes: Some(String::from("after coffee")),
        }
    }

    #[test]
    fn test_reading_serializes_camel_case() {
        let json = serde_json::to_string(&sample_reading()).unwrap();
        assert!(json.contains("\"deviceId\":\"polar-h10\""));
        assert!(json.contains("\"deviceType\":\"heart_rate\""));
        assert!(json.contains("\"value\":72.0"));
        assert!(json.contains("\"unit\":\"BPM\""));
        assert!(json.contains("\"timestamp\""));
        assert!(json.contains("\"notes\":\"after coffee\""));

        // Snake_case variants must not leak onto the wire
        assert!(!json.contains("device_id"));
        assert!(!json.contains("device_type"));
    }

    #[test]
    fn test_reading_omits_absent_notes() {
        let mut reading = sample_reading();
        reading.notes = None;

        let json = serde_json::to_string(&reading).unwrap();
        assert!(!json.contains("notes"));
    }

    #[test]
    fn test_reading_roundtrip() {
        let reading = sample_reading();
        let json = serde_json::to_string(&reading).unwrap();
        let back: Reading = serde_json::from_str(&json).unwrap();
        assert_eq!(back, reading);
    }

    #[test]
    fn test_reading_input_ignores_client_id_and_timestamp() {
        // Clients may echo back full readings; server-assigned fields are dropped
        let json = r#"{
            "id": 999,
            "deviceId": "thermo-1",
            "deviceType": "thermometer",
            "value": 36.8,
            "unit": "°C",
            "timestamp": "2020-01-01T00:00:00Z"
        }"#;

        let input: ReadingInput = serde_json::from_str(json).unwrap();
        assert_eq!(input.device_id, "thermo-1");
        assert_eq!(input.device_type, "thermometer");
        assert_eq!(input.value, 36.8);
        assert_eq!(input.unit, "°C");
        assert_eq!(input.notes, None);
    }

    #[test]
    fn test_reading_input_missing_required_field_rejected() {
        let json = r#"{"deviceId": "thermo-1", "value": 36.8, "unit": "C"}"#;
        let result: Result<ReadingInput, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_dashboard_data_empty_store_shape() {
        let data = DashboardData {
            recent_readings: vec![],
            readings_by_device: HashMap::new(),
            averages_by_type: HashMap::new(),
            total_readings: 0,
            last_reading_time: None,
        };

        let json = serde_json::to_string(&data).unwrap();
        assert!(json.contains("\"recentReadings\":[]"));
        assert!(json.contains("\"totalReadings\":0"));
        // Absent when empty
        assert!(!json.contains("lastReadingTime"));
    }
}
