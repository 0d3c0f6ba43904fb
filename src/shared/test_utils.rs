//! Test utilities for property-based testing
//!
//! This module provides proptest generators for domain types: device ids,
//! device type labels, finite measurement values, and complete candidate
//! readings. It is compiled unconditionally so integration tests under
//! `tests/` can use the same generators as unit tests.

pub mod generators {
    use proptest::prelude::*;

    use crate::domain::ReadingInput;

    /// Generate a valid device id (printable ASCII, 1-32 chars)
    pub fn device_id() -> impl Strategy<Value = String> {
        prop::string::string_regex("[A-Za-z0-9][A-Za-z0-9_:.-]{0,31}")
            .expect("valid regex for device_id")
    }

    /// Generate a valid device type label
    pub fn device_type() -> impl Strategy<Value = String> {
        prop_oneof![
            Just(String::from("heart_rate")),
            Just(String::from("thermometer")),
            Just(String::from("esp32")),
            prop::string::string_regex("[a-z][a-z0-9_-]{0,15}").expect("valid regex"),
        ]
    }

    /// Generate a device type with mixed casing of a known label
    pub fn mixed_case_device_type() -> impl Strategy<Value = String> {
        prop_oneof![
            Just(String::from("heart_rate")),
            Just(String::from("HEART_RATE")),
            Just(String::from("Heart_Rate")),
            Just(String::from("hEaRt_RaTe")),
        ]
    }

    /// Generate a finite measurement value in a plausible sensor range
    pub fn reading_value() -> impl Strategy<Value = f64> {
        -500.0f64..500.0f64
    }

    /// Generate an invalid (non-finite) measurement value
    pub fn non_finite_value() -> impl Strategy<Value = f64> {
        prop_oneof![
            Just(f64::NAN),
            Just(f64::INFINITY),
            Just(f64::NEG_INFINITY),
        ]
    }

    /// Generate a unit label
    pub fn unit() -> impl Strategy<Value = String> {
        prop_oneof![
            Just(String::from("BPM")),
            Just(String::from("°C")),
            Just(String::from("mmHg")),
            Just(String::from("units")),
        ]
    }

    /// Generate optional notes, never empty or whitespace-padded
    pub fn notes() -> impl Strategy<Value = Option<String>> {
        prop::option::of(
            prop::string::string_regex("[A-Za-z0-9]|[A-Za-z0-9][A-Za-z0-9 ]{0,61}[A-Za-z0-9]")
                .expect("valid regex for notes"),
        )
    }

    /// Generate a complete valid candidate reading
    pub fn reading_input() -> impl Strategy<Value = ReadingInput> {
        (device_id(), device_type(), reading_value(), unit(), notes()).prop_map(
            |(device_id, device_type, value, unit, notes)| ReadingInput {
                device_id,
                device_type,
                value,
                unit,
                notes,
            },
        )
    }

    /// Generate a vector of 1..=max candidate readings
    pub fn reading_inputs(max: usize) -> impl Strategy<Value = Vec<ReadingInput>> {
        prop::collection::vec(reading_input(), 1..=max)
    }
}
