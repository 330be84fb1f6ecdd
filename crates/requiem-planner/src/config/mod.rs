use crate::planner::clamp_level;
use std::env;
use std::fmt;
use std::num::ParseIntError;
use std::path::PathBuf;

/// Distinguishes runtime behavior for different stages of the planner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlannerEnvironment {
    Development,
    Test,
    Production,
}

impl PlannerEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Test => "test",
            Self::Production => "production",
        }
    }
}

/// Top-level configuration, read from the process environment and `.env`.
#[derive(Debug, Clone)]
pub struct PlannerConfig {
    pub environment: PlannerEnvironment,
    pub catalog: CatalogConfig,
    /// Character level a new session starts at, already clamped to `1..=90`.
    pub default_level: u32,
    pub telemetry: TelemetryConfig,
}

impl PlannerConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = PlannerEnvironment::from_str(
            &env::var("PLANNER_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let path = env::var("PLANNER_CATALOG").unwrap_or_else(|_| "data.json".to_string());

        let raw_level = env::var("PLANNER_LEVEL").unwrap_or_else(|_| "1".to_string());
        let default_level = raw_level
            .trim()
            .parse::<i64>()
            .map(clamp_level)
            .map_err(|source| ConfigError::InvalidLevel {
                value: raw_level.clone(),
                source,
            })?;

        let log_level = env::var("PLANNER_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            catalog: CatalogConfig {
                path: PathBuf::from(path),
            },
            default_level,
            telemetry: TelemetryConfig { log_level },
        })
    }
}

/// Where the skill/DNA catalog is read from.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    pub path: PathBuf,
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidLevel { value: String, source: ParseIntError },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidLevel { value, .. } => {
                write!(f, "PLANNER_LEVEL must be an integer, got '{value}'")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidLevel { source, .. } => Some(source),
        }
    }
}
