use thiserror::Error;

/// Default maximum number of readings accepted in one import request
pub const DEFAULT_MAX_IMPORT_BATCH: usize = 100;

/// Configuration for the dashboard server
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Socket address the server listens on
    pub bind_addr: String,
    /// Allowed CORS origin ("*" allows all)
    pub cors_allowed_origin: String,
    /// Maximum readings per import request
    pub max_import_batch: usize,
    /// Simulated device settings
    pub simulator: SimulatorConfig,
}

/// Settings for the in-process simulated device
#[derive(Debug, Clone)]
pub struct SimulatorConfig {
    /// Whether the simulator task is spawned at startup
    pub enabled: bool,
    /// Seconds between synthetic readings
    pub interval_seconds: u64,
    /// Device id attached to synthetic readings
    pub device_id: String,
}

impl ServerConfig {
    /// Create a new ServerConfig instance from environment variables
    ///
    /// All variables are optional; sensible defaults apply when unset.
    /// Variables that are set but unparseable are configuration errors.
    pub fn from_env() -> Result<Self, ConfigError> {
        let bind_addr =
            std::env::var("BIND_ADDR").unwrap_or_else(|_| String::from("0.0.0.0:3000"));

        let cors_allowed_origin =
            std::env::var("CORS_ALLOWED_ORIGIN").unwrap_or_else(|_| String::from("*"));

        let max_import_batch = parse_env("MAX_IMPORT_BATCH", DEFAULT_MAX_IMPORT_BATCH)?;

        let simulator = SimulatorConfig {
            enabled: parse_env("SIMULATOR_ENABLED", false)?,
            interval_seconds: parse_env("SIMULATOR_INTERVAL_SECONDS", 15)?,
            device_id: std::env::var("SIMULATOR_DEVICE_ID")
                .unwrap_or_else(|_| String::from("simulator-01")),
        };

        // A zero interval would panic inside tokio::time::interval
        if simulator.interval_seconds == 0 {
            return Err(ConfigError::InvalidEnvVar {
                name: "SIMULATOR_INTERVAL_SECONDS",
                value: String::from("0"),
            });
        }

        Ok(ServerConfig {
            bind_addr,
            cors_allowed_origin,
            max_import_batch,
            simulator,
        })
    }

    /// Create a test configuration with defaults and the simulator disabled
    pub fn for_test() -> Self {
        ServerConfig {
            bind_addr: String::from("127.0.0.1:0"),
            cors_allowed_origin: String::from("*"),
            max_import_batch: DEFAULT_MAX_IMPORT_BATCH,
            simulator: SimulatorConfig {
                enabled: false,
                interval_seconds: 15,
                device_id: String::from("simulator-test"),
            },
        }
    }
}

fn parse_env<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match std::env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|_| ConfigError::InvalidEnvVar { name, value: raw }),
        Err(_) => Ok(default),
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable {name}: {value}")]
    InvalidEnvVar { name: &'static str, value: String },
}
