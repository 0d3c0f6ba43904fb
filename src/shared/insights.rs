use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::domain::Reading;

/// Default age used for heart-rate zone classification when none is supplied
pub const DEFAULT_AGE_YEARS: u32 = 30;

/// Heart-rate zone relative to age-predicted maximum (220 - age)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum HeartRateZone {
    Resting,
    VeryLight,
    Light,
    Moderate,
    Hard,
    Maximum,
}

impl HeartRateZone {
    pub fn as_str(&self) -> &'static str {
        match self {
            HeartRateZone::Resting => "Resting",
            HeartRateZone::VeryLight => "Very Light",
            HeartRateZone::Light => "Light",
            HeartRateZone::Moderate => "Moderate",
            HeartRateZone::Hard => "Hard",
            HeartRateZone::Maximum => "Maximum",
        }
    }
}

/// Body temperature category in degrees Celsius
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TemperatureCategory {
    Low,
    Normal,
    SlightlyElevated,
    Fever,
    HighFever,
}

impl TemperatureCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            TemperatureCategory::Low => "Low (Hypothermia risk)",
            TemperatureCategory::Normal => "Normal",
            TemperatureCategory::SlightlyElevated => "Slightly Elevated",
            TemperatureCategory::Fever => "Fever",
            TemperatureCategory::HighFever => "High Fever",
        }
    }
}

/// Classify a heart rate against the age-predicted maximum (220 - age)
pub fn classify_heart_rate(bpm: f64, age_years: u32) -> HeartRateZone {
    let max_hr = (220u32.saturating_sub(age_years)) as f64;
    let percentage = if max_hr > 0.0 {
        (bpm / max_hr) * 100.0
    } else {
        100.0
    };

    if percentage < 50.0 {
        HeartRateZone::Resting
    } else if percentage < 60.0 {
        HeartRateZone::VeryLight
    } else if percentage < 70.0 {
        HeartRateZone::Light
    } else if percentage < 80.0 {
        HeartRateZone::Moderate
    } else if percentage < 90.0 {
        HeartRateZone::Hard
    } else {
        HeartRateZone::Maximum
    }
}

/// Classify a body temperature reading in degrees Celsius
pub fn classify_temperature(temp_c: f64) -> TemperatureCategory {
    if temp_c < 36.1 {
        TemperatureCategory::Low
    } else if temp_c <= 37.2 {
        TemperatureCategory::Normal
    } else if temp_c < 38.0 {
        TemperatureCategory::SlightlyElevated
    } else if temp_c < 39.0 {
        TemperatureCategory::Fever
    } else {
        TemperatureCategory::HighFever
    }
}

/// Aggregate analysis over a set of readings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReadingAnalysis {
    pub total_readings: usize,
    pub average_value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_value: Option<f64>,
    /// Reading count per device type
    pub device_types: HashMap<String, usize>,
    /// Human-readable classifications for recognized device types
    pub recommendations: Vec<String>,
}

/// Analyze (device type, value) pairs into counts, extremes, and
/// per-reading recommendations
///
/// Heart-rate and thermometer readings get zone/category classifications;
/// other device types only contribute to the counts and aggregates.
pub fn analyze<'a, I>(items: I) -> ReadingAnalysis
where
    I: IntoIterator<Item = (&'a str, f64)>,
{
    let mut total = 0usize;
    let mut sum = 0.0f64;
    let mut min_value: Option<f64> = None;
    let mut max_value: Option<f64> = None;
    let mut device_types: HashMap<String, usize> = HashMap::new();
    let mut recommendations = Vec::new();

    for (device_type, value) in items {
        total += 1;
        sum += value;
        min_value = Some(min_value.map_or(value, |m| m.min(value)));
        max_value = Some(max_value.map_or(value, |m| m.max(value)));
        *device_types.entry(device_type.to_string()).or_insert(0) += 1;

        match device_type {
            "heart_rate" => {
                let zone = classify_heart_rate(value, DEFAULT_AGE_YEARS);
                recommendations.push(format!("Heart Rate: {} BPM - {}", value, zone.as_str()));
            }
            "thermometer" => {
                let category = classify_temperature(value);
                recommendations.push(format!("Temperature: {}°C - {}", value, category.as_str()));
            }
            _ => {}
        }
    }

    ReadingAnalysis {
        total_readings: total,
        average_value: if total > 0 { sum / total as f64 } else { 0.0 },
        min_value,
        max_value,
        device_types,
        recommendations,
    }
}

/// Analyze stored readings
pub fn analyze_readings(readings: &[Reading]) -> ReadingAnalysis {
    analyze(readings.iter().map(|r| (r.device_type.as_str(), r.value)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_heart_rate_zones() {
        // Age 30 -> max HR 190
        assert_eq!(classify_heart_rate(72.0, 30), HeartRateZone::Resting);
        assert_eq!(classify_heart_rate(100.0, 30), HeartRateZone::VeryLight);
        assert_eq!(classify_heart_rate(120.0, 30), HeartRateZone::Light);
        assert_eq!(classify_heart_rate(140.0, 30), HeartRateZone::Moderate);
        assert_eq!(classify_heart_rate(160.0, 30), HeartRateZone::Hard);
        assert_eq!(classify_heart_rate(180.0, 30), HeartRateZone::Maximum);
    }

    #[test]
    fn test_classify_heart_rate_zone_boundaries() {
        // Exactly 50% of max HR 190 is 95 BPM -> Very Light, just below stays Resting
        assert_eq!(classify_heart_rate(94.9, 30), HeartRateZone::Resting);
        assert_eq!(classify_heart_rate(95.0, 30), HeartRateZone::VeryLight);
        // 90% of 190 is 171
        assert_eq!(classify_heart_rate(171.0, 30), HeartRateZone::Maximum);
    }

    #[test]
    fn test_classify_heart_rate_extreme_age() {
        // Saturating subtraction keeps the classifier total
        assert_eq!(classify_heart_rate(60.0, 220), HeartRateZone::Maximum);
    }

    #[test]
    fn test_classify_temperature_categories() {
        assert_eq!(classify_temperature(35.5), TemperatureCategory::Low);
        assert_eq!(classify_temperature(36.1), TemperatureCategory::Normal);
        assert_eq!(classify_temperature(37.2), TemperatureCategory::Normal);
        assert_eq!(
            classify_temperature(37.5),
            TemperatureCategory::SlightlyElevated
        );
        assert_eq!(classify_temperature(38.5), TemperatureCategory::Fever);
        assert_eq!(classify_temperature(39.0), TemperatureCategory::HighFever);
        assert_eq!(classify_temperature(40.2), TemperatureCategory::HighFever);
    }

    #[test]
    fn test_analyze_empty() {
        let analysis = analyze(std::iter::empty::<(&str, f64)>());
        assert_eq!(analysis.total_readings, 0);
        assert_eq!(analysis.average_value, 0.0);
        assert_eq!(analysis.min_value, None);
        assert_eq!(analysis.max_value, None);
        assert!(analysis.device_types.is_empty());
        assert!(analysis.recommendations.is_empty());
    }

    #[test]
    fn test_analyze_aggregates() {
        let items = vec![
            ("heart_rate", 72.0),
            ("thermometer", 36.8),
            ("esp32", 75.5),
        ];

        let analysis = analyze(items);
        assert_eq!(analysis.total_readings, 3);
        assert!((analysis.average_value - (72.0 + 36.8 + 75.5) / 3.0).abs() < 1e-9);
        assert_eq!(analysis.min_value, Some(36.8));
        assert_eq!(analysis.max_value, Some(75.5));
        assert_eq!(analysis.device_types["heart_rate"], 1);
        assert_eq!(analysis.device_types["thermometer"], 1);
        assert_eq!(analysis.device_types["esp32"], 1);

        // Recommendations only for recognized types
        assert_eq!(analysis.recommendations.len(), 2);
        assert!(analysis.recommendations[0].contains("Heart Rate: 72 BPM"));
        assert!(analysis.recommendations[0].contains("Resting"));
        assert!(analysis.recommendations[1].contains("Temperature: 36.8°C"));
        assert!(analysis.recommendations[1].contains("Normal"));
    }

    #[test]
    fn test_analysis_serializes_camel_case() {
        let analysis = analyze(vec![("heart_rate", 72.0)]);
        let json = serde_json::to_string(&analysis).unwrap();

        assert!(json.contains("totalReadings"));
        assert!(json.contains("averageValue"));
        assert!(json.contains("minValue"));
        assert!(json.contains("maxValue"));
        assert!(json.contains("deviceTypes"));
        assert!(json.contains("recommendations"));
    }
}
