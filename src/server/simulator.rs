use rand::Rng;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::config::SimulatorConfig;
use health_dashboard::domain::ReadingInput;
use health_dashboard::store::ReadingStore;
use health_dashboard::validators::validate_reading_input;

/// Synthetic device profiles the simulator cycles through
const PROFILES: &[SyntheticProfile] = &[
    SyntheticProfile {
        device_type: "heart_rate",
        unit: "BPM",
        min: 55.0,
        max: 110.0,
    },
    SyntheticProfile {
        device_type: "thermometer",
        unit: "°C",
        min: 36.0,
        max: 38.5,
    },
    SyntheticProfile {
        device_type: "esp32",
        unit: "units",
        min: 0.0,
        max: 100.0,
    },
];

struct SyntheticProfile {
    device_type: &'static str,
    unit: &'static str,
    min: f64,
    max: f64,
}

/// Spawn the simulated device task
///
/// Stands in for a real device bridge: on a fixed interval it emits one
/// synthetic reading through the same validation path HTTP ingestion uses.
/// Generation failures are logged and the loop moves on to the next tick.
pub fn spawn(store: Arc<ReadingStore>, config: SimulatorConfig) -> tokio::task::JoinHandle<()> {
    info!(
        device_id = %config.device_id,
        interval_seconds = config.interval_seconds,
        "Starting device simulator"
    );

    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(config.interval_seconds));
        let mut tick = 0usize;

        loop {
            interval.tick().await;

            let input = synthetic_input(&config.device_id, tick);
            tick = tick.wrapping_add(1);

            match validate_reading_input(&input) {
                Ok(()) => {
                    let reading = store.add_reading(input);
                    info!(
                        id = reading.id,
                        device_type = %reading.device_type,
                        value = reading.value,
                        "Simulated reading ingested"
                    );
                }
                Err(e) => {
                    warn!(error = %e, "Simulated reading rejected");
                }
            }
        }
    })
}

/// Build one synthetic reading, cycling through the device profiles
fn synthetic_input(device_id: &str, tick: usize) -> ReadingInput {
    let profile = &PROFILES[tick % PROFILES.len()];
    let value = rand::thread_rng().gen_range(profile.min..=profile.max);

    ReadingInput {
        device_id: String::from(device_id),
        device_type: String::from(profile.device_type),
        value: (value * 10.0).round() / 10.0,
        unit: String::from(profile.unit),
        notes: Some(String::from("simulated")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synthetic_input_cycles_profiles() {
        let a = synthetic_input("sim-1", 0);
        let b = synthetic_input("sim-1", 1);
        let c = synthetic_input("sim-1", 2);
        let d = synthetic_input("sim-1", 3);

        assert_eq!(a.device_type, "heart_rate");
        assert_eq!(b.device_type, "thermometer");
        assert_eq!(c.device_type, "esp32");
        assert_eq!(d.device_type, "heart_rate");
    }

    #[test]
    fn test_synthetic_input_in_profile_range() {
        for tick in 0..30 {
            let input = synthetic_input("sim-1", tick);
            let profile = &PROFILES[tick % PROFILES.len()];
            assert!(input.value >= profile.min - 0.05);
            assert!(input.value <= profile.max + 0.05);
            assert_eq!(input.unit, profile.unit);
        }
    }

    #[test]
    fn test_synthetic_input_passes_validation() {
        for tick in 0..10 {
            let input = synthetic_input("sim-1", tick);
            assert!(validate_reading_input(&input).is_ok());
        }
    }
}
