use chrono::{DateTime, TimeZone, Utc};
use std::sync::atomic::{AtomicI64, Ordering};

/// Clock trait for abstracting time operations
///
/// The store stamps every reading with `now()`; routing all time reads
/// through this trait keeps timestamp-sensitive behavior (ordering,
/// 24-hour windows) deterministic under test.
pub trait Clock: Send + Sync {
    /// Get current time as a UTC datetime
    fn now(&self) -> DateTime<Utc>;

    /// Get current time as RFC3339 string (for log/export timestamps)
    /// Format: "2024-01-15T10:30:00+00:00"
    fn now_rfc3339(&self) -> String {
        self.now().to_rfc3339()
    }
}

/// Production implementation of Clock using system time
#[derive(Debug, Clone, Default)]
pub struct SystemClock;

impl SystemClock {
    pub fn new() -> Self {
        Self
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Test implementation of Clock with fixed/controllable time
///
/// Stores epoch milliseconds in an atomic so tests can advance time through
/// a shared `Arc<FixedClock>` handle while the store holds the same clock.
#[derive(Debug)]
pub struct FixedClock {
    epoch_ms: AtomicI64,
}

impl FixedClock {
    /// Create a new FixedClock at the given UTC datetime
    pub fn new(timestamp: DateTime<Utc>) -> Self {
        Self {
            epoch_ms: AtomicI64::new(timestamp.timestamp_millis()),
        }
    }

    /// Create a FixedClock from an RFC3339 string
    pub fn from_rfc3339(timestamp_str: &str) -> Result<Self, chrono::ParseError> {
        let timestamp = DateTime::parse_from_rfc3339(timestamp_str)?.with_timezone(&Utc);
        Ok(Self::new(timestamp))
    }

    /// Create a FixedClock from epoch seconds
    pub fn from_epoch_seconds(seconds: i64) -> Self {
        Self {
            epoch_ms: AtomicI64::new(seconds * 1000),
        }
    }

    /// Replace the fixed time
    pub fn set_time(&self, timestamp: DateTime<Utc>) {
        self.epoch_ms
            .store(timestamp.timestamp_millis(), Ordering::SeqCst);
    }

    /// Advance time by the given number of seconds
    pub fn advance_seconds(&self, seconds: i64) {
        self.epoch_ms.fetch_add(seconds * 1000, Ordering::SeqCst);
    }

    /// Advance time by the given number of hours
    pub fn advance_hours(&self, hours: i64) {
        self.advance_seconds(hours * 3600);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        let ms = self.epoch_ms.load(Ordering::SeqCst);
        Utc.timestamp_millis_opt(ms)
            .single()
            .unwrap_or_else(|| DateTime::<Utc>::MIN_UTC)
    }
}
