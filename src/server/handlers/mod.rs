pub mod export;
pub mod insights;
pub mod readings;
pub mod stats;

use serde::{Deserialize, Serialize};

/// Flagged acknowledgment used by mutation endpoints
///
/// Soft failures (e.g. an import with no valid readings) are reported with
/// `success: false` rather than a protocol-level fault.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub success: bool,
    pub message: String,
}

impl StatusResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}
