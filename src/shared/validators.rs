use regex::Regex;
use std::sync::OnceLock;

use crate::domain::ReadingInput;

/// Validation error type
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Validation error for field '{}': {}",
            self.field, self.message
        )
    }
}

impl std::error::Error for ValidationError {}

const MAX_DEVICE_ID_LEN: usize = 128;
const MAX_DEVICE_TYPE_LEN: usize = 64;
const MAX_UNIT_LEN: usize = 32;
const MAX_NOTES_LEN: usize = 512;

/// Validate device id (non-empty, max 128 chars, printable ASCII)
pub fn validate_device_id(device_id: &str) -> Result<(), ValidationError> {
    if device_id.trim().is_empty() {
        return Err(ValidationError::new(
            "deviceId",
            "Device ID cannot be empty",
        ));
    }

    if device_id.len() > MAX_DEVICE_ID_LEN {
        return Err(ValidationError::new(
            "deviceId",
            format!(
                "Device ID length {} exceeds maximum of {} characters",
                device_id.len(),
                MAX_DEVICE_ID_LEN
            ),
        ));
    }

    // Printable ASCII (0x20-0x7E), no control characters
    if !device_id
        .chars()
        .all(|c| c.is_ascii() && (' '..='~').contains(&c))
    {
        return Err(ValidationError::new(
            "deviceId",
            "Device ID must contain only printable ASCII characters",
        ));
    }

    Ok(())
}

/// Validate device type label (non-empty, max 64 chars, [A-Za-z0-9_.-])
///
/// Case is not checked here; callers canonicalize with
/// [`normalize_device_type`] before storing or comparing.
pub fn validate_device_type(device_type: &str) -> Result<(), ValidationError> {
    static TYPE_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = TYPE_REGEX.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9_.-]+$").expect("device type regex is valid")
    });

    if device_type.is_empty() {
        return Err(ValidationError::new(
            "deviceType",
            "Device type cannot be empty",
        ));
    }

    if device_type.len() > MAX_DEVICE_TYPE_LEN {
        return Err(ValidationError::new(
            "deviceType",
            format!(
                "Device type length {} exceeds maximum of {} characters",
                device_type.len(),
                MAX_DEVICE_TYPE_LEN
            ),
        ));
    }

    if !regex.is_match(device_type) {
        return Err(ValidationError::new(
            "deviceType",
            "Device type must contain only alphanumerics, underscore, dot, or hyphen",
        ));
    }

    Ok(())
}

/// Validate measurement value (must be a finite number)
pub fn validate_value(value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::new(
            "value",
            "Value must be a finite number",
        ));
    }

    Ok(())
}

/// Validate unit label (non-empty, max 32 chars, no control characters)
///
/// Units may be non-ASCII ("°C"), so only control characters are rejected.
pub fn validate_unit(unit: &str) -> Result<(), ValidationError> {
    if unit.trim().is_empty() {
        return Err(ValidationError::new("unit", "Unit cannot be empty"));
    }

    if unit.chars().count() > MAX_UNIT_LEN {
        return Err(ValidationError::new(
            "unit",
            format!("Unit exceeds maximum of {} characters", MAX_UNIT_LEN),
        ));
    }

    if unit.chars().any(|c| c.is_control()) {
        return Err(ValidationError::new(
            "unit",
            "Unit must not contain control characters",
        ));
    }

    Ok(())
}

/// Validate optional notes (max 512 chars)
pub fn validate_notes(notes: Option<&str>) -> Result<(), ValidationError> {
    if let Some(notes) = notes {
        if notes.chars().count() > MAX_NOTES_LEN {
            return Err(ValidationError::new(
                "notes",
                format!("Notes exceed maximum of {} characters", MAX_NOTES_LEN),
            ));
        }
    }

    Ok(())
}

/// Validate a complete candidate reading
pub fn validate_reading_input(input: &ReadingInput) -> Result<(), ValidationError> {
    validate_device_id(&input.device_id)?;
    validate_device_type(&input.device_type)?;
    validate_value(input.value)?;
    validate_unit(&input.unit)?;
    validate_notes(input.notes.as_deref())?;
    Ok(())
}

/// Canonicalize a device type label for storage and grouping
///
/// Trims surrounding whitespace and lowercases, so "HEART_RATE" and
/// "heart_rate" group and filter identically.
pub fn normalize_device_type(device_type: &str) -> String {
    device_type.trim().to_ascii_lowercase()
}
