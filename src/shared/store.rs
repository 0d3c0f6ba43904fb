use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use crate::domain::{DashboardData, Reading, ReadingInput};
use crate::time::Clock;
use crate::validators::normalize_device_type;

/// Default number of entries returned by [`ReadingStore::recent_readings`]
pub const DEFAULT_RECENT_COUNT: usize = 10;

/// Number of recent readings included in the dashboard view
pub const DASHBOARD_RECENT_COUNT: usize = 20;

/// In-memory store for health sensor readings
///
/// Owns the full reading collection for the process lifetime. A single
/// instance is constructed at startup and shared via `Arc` with every
/// request handler; it is never accessed as global state.
///
/// The internal mutex guards the id-assign-and-append sequence so that ids
/// stay unique and monotonically increasing under concurrent ingestion.
/// Read operations clone a snapshot and release the lock before sorting or
/// serializing.
pub struct ReadingStore {
    clock: Arc<dyn Clock>,
    inner: Mutex<StoreInner>,
}

struct StoreInner {
    readings: Vec<Reading>,
    next_id: u64,
}

impl ReadingStore {
    /// Create an empty store stamping timestamps from the given clock
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            inner: Mutex::new(StoreInner {
                readings: Vec::new(),
                next_id: 1,
            }),
        }
    }

    /// The clock this store stamps insertion times from
    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, StoreInner> {
        // A poisoned lock only means a panic elsewhere; the data itself
        // is never left in a torn state by any store operation.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn snapshot(&self) -> Vec<Reading> {
        self.lock().readings.clone()
    }

    /// Append a new reading
    ///
    /// Assigns the next id, stamps the current clock time (any
    /// client-supplied timestamp was already discarded at the schema level),
    /// and normalizes the device type to its canonical lowercase form.
    /// Total: always succeeds for well-formed input.
    pub fn add_reading(&self, input: ReadingInput) -> Reading {
        let timestamp = self.clock.now();

        let mut inner = self.lock();
        let reading = Reading {
            id: inner.next_id,
            device_id: input.device_id,
            device_type: normalize_device_type(&input.device_type),
            value: input.value,
            unit: input.unit,
            timestamp,
            notes: input.notes,
        };
        inner.next_id += 1;
        inner.readings.push(reading.clone());
        reading
    }

    /// All readings ordered by timestamp descending (most recent first)
    ///
    /// Ties in timestamp keep insertion order (stable sort), but callers
    /// must not rely on tie order.
    pub fn all_readings(&self) -> Vec<Reading> {
        let mut readings = self.snapshot();
        readings.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        readings
    }

    /// The most recent `count` readings, timestamp descending
    pub fn recent_readings(&self, count: usize) -> Vec<Reading> {
        let mut readings = self.all_readings();
        readings.truncate(count);
        readings
    }

    /// All readings partitioned by device id, each partition descending
    pub fn readings_grouped_by_device(&self) -> HashMap<String, Vec<Reading>> {
        let mut groups: HashMap<String, Vec<Reading>> = HashMap::new();
        for reading in self.all_readings() {
            groups
                .entry(reading.device_id.clone())
                .or_default()
                .push(reading);
        }
        groups
    }

    /// Arithmetic mean of value per device type
    ///
    /// Grouping keys are the canonical lowercase types assigned at
    /// ingestion, so grouping and type filtering agree on case. An empty
    /// store yields an empty map.
    pub fn averages_by_type(&self) -> HashMap<String, f64> {
        let mut sums: HashMap<String, (f64, usize)> = HashMap::new();
        for reading in self.lock().readings.iter() {
            let entry = sums.entry(reading.device_type.clone()).or_insert((0.0, 0));
            entry.0 += reading.value;
            entry.1 += 1;
        }

        sums.into_iter()
            .map(|(device_type, (sum, count))| (device_type, sum / count as f64))
            .collect()
    }

    /// All readings whose device type matches case-insensitively, descending
    pub fn readings_by_device_type(&self, device_type: &str) -> Vec<Reading> {
        let wanted = normalize_device_type(device_type);
        let mut readings: Vec<Reading> = self
            .snapshot()
            .into_iter()
            .filter(|r| r.device_type == wanted)
            .collect();
        readings.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        readings
    }

    /// Composite dashboard view
    pub fn dashboard_data(&self) -> DashboardData {
        DashboardData {
            recent_readings: self.recent_readings(DASHBOARD_RECENT_COUNT),
            readings_by_device: self.readings_grouped_by_device(),
            averages_by_type: self.averages_by_type(),
            total_readings: self.total_readings(),
            last_reading_time: self.last_reading_time(),
        }
    }

    /// Maximum timestamp across all readings, `None` when empty
    pub fn last_reading_time(&self) -> Option<DateTime<Utc>> {
        self.lock().readings.iter().map(|r| r.timestamp).max()
    }

    /// Number of stored readings
    pub fn total_readings(&self) -> usize {
        self.lock().readings.len()
    }

    /// Remove every reading and reset the id counter to 1
    pub fn clear_all(&self) {
        let mut inner = self.lock();
        inner.readings.clear();
        inner.next_id = 1;
    }
}
