use axum::extract::State;
use axum::Json;
use chrono::{Duration, Timelike};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::routes::AppState;
use health_dashboard::domain::{DashboardData, Reading};

/// Response payload for GET /statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsResponse {
    pub total_readings: usize,
    /// Distinct device types, sorted for stable output
    pub device_types: Vec<String>,
    pub averages_by_type: HashMap<String, f64>,
    /// Readings within 24 hours of the current clock time
    pub readings_last_24_hours: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_value: Option<f64>,
}

/// Response payload for GET /analytics
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsResponse {
    /// Hour-of-day histogram over hours that have readings, ascending
    pub readings_by_hour: Vec<HourBucket>,
    /// Per-device reading counts, descending by count
    pub readings_by_device: Vec<DeviceCount>,
    /// Per-type trend over the last 24 hours
    pub recent_trends: Vec<TypeTrend>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HourBucket {
    pub hour: u32,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceCount {
    pub device: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeTrend {
    pub device_type: String,
    pub average: f64,
    pub count: usize,
    /// Value of the most recent reading of this type in the window
    pub latest: f64,
}

/// Handler for GET /statistics
///
/// Pure transformation over a store snapshot; nothing here is cached or
/// stored.
pub async fn statistics(State(state): State<AppState>) -> Json<StatisticsResponse> {
    let readings = state.store.all_readings();
    let cutoff = state.clock.now() - Duration::hours(24);

    let mut device_types: Vec<String> = readings
        .iter()
        .map(|r| r.device_type.clone())
        .collect::<std::collections::HashSet<_>>()
        .into_iter()
        .collect();
    device_types.sort();

    let readings_last_24_hours = readings.iter().filter(|r| r.timestamp >= cutoff).count();

    let max_value = readings.iter().map(|r| r.value).fold(None, |acc, v| {
        Some(acc.map_or(v, |m: f64| m.max(v)))
    });
    let min_value = readings.iter().map(|r| r.value).fold(None, |acc, v| {
        Some(acc.map_or(v, |m: f64| m.min(v)))
    });

    Json(StatisticsResponse {
        total_readings: readings.len(),
        device_types,
        averages_by_type: state.store.averages_by_type(),
        readings_last_24_hours,
        max_value,
        min_value,
    })
}

/// Handler for GET /analytics
pub async fn analytics(State(state): State<AppState>) -> Json<AnalyticsResponse> {
    let readings = state.store.all_readings();
    let cutoff = state.clock.now() - Duration::hours(24);

    Json(AnalyticsResponse {
        readings_by_hour: readings_by_hour(&readings),
        readings_by_device: readings_by_device(&readings),
        recent_trends: recent_trends(&readings, cutoff),
    })
}

/// Handler for GET /dashboard
pub async fn dashboard(State(state): State<AppState>) -> Json<DashboardData> {
    Json(state.store.dashboard_data())
}

fn readings_by_hour(readings: &[Reading]) -> Vec<HourBucket> {
    let mut counts: HashMap<u32, usize> = HashMap::new();
    for reading in readings {
        *counts.entry(reading.timestamp.hour()).or_insert(0) += 1;
    }

    let mut buckets: Vec<HourBucket> = counts
        .into_iter()
        .map(|(hour, count)| HourBucket { hour, count })
        .collect();
    buckets.sort_by_key(|b| b.hour);
    buckets
}

fn readings_by_device(readings: &[Reading]) -> Vec<DeviceCount> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for reading in readings {
        *counts.entry(reading.device_id.as_str()).or_insert(0) += 1;
    }

    let mut devices: Vec<DeviceCount> = counts
        .into_iter()
        .map(|(device, count)| DeviceCount {
            device: device.to_string(),
            count,
        })
        .collect();
    // Descending by count; ties broken by device id for stable output
    devices.sort_by(|a, b| b.count.cmp(&a.count).then(a.device.cmp(&b.device)));
    devices
}

fn recent_trends(readings: &[Reading], cutoff: chrono::DateTime<chrono::Utc>) -> Vec<TypeTrend> {
    // Readings arrive sorted descending, so the first of each type is the latest
    let mut trends: HashMap<&str, (f64, usize, f64)> = HashMap::new();
    for reading in readings.iter().filter(|r| r.timestamp >= cutoff) {
        let entry = trends
            .entry(reading.device_type.as_str())
            .or_insert((0.0, 0, reading.value));
        entry.0 += reading.value;
        entry.1 += 1;
    }

    let mut result: Vec<TypeTrend> = trends
        .into_iter()
        .map(|(device_type, (sum, count, latest))| TypeTrend {
            device_type: device_type.to_string(),
            average: sum / count as f64,
            count,
            latest,
        })
        .collect();
    result.sort_by(|a, b| a.device_type.cmp(&b.device_type));
    result
}
