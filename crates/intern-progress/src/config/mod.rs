use std::env;
use std::fmt;

const DEFAULT_SAVE_ATTEMPTS: u8 = 3;
const DEFAULT_TOTAL_LESSONS: u32 = 20;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub progress: ProgressConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let save_attempts = match env::var("PROGRESS_SAVE_ATTEMPTS") {
            Ok(raw) => raw
                .trim()
                .parse::<u8>()
                .ok()
                .filter(|attempts| *attempts > 0)
                .ok_or(ConfigError::InvalidSaveAttempts)?,
            Err(_) => DEFAULT_SAVE_ATTEMPTS,
        };

        let default_total_lessons = match env::var("PROGRESS_DEFAULT_TOTAL_LESSONS") {
            Ok(raw) => raw
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|lessons| *lessons > 0)
                .ok_or(ConfigError::InvalidTotalLessons)?,
            Err(_) => DEFAULT_TOTAL_LESSONS,
        };

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            progress: ProgressConfig {
                save_attempts,
                default_total_lessons,
            },
            telemetry: TelemetryConfig { log_level },
        })
    }
}

/// Knobs for the progress service and its storage collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressConfig {
    /// How many times a snapshot save is attempted before the error surfaces.
    pub save_attempts: u8,
    /// Lesson count assigned to a skill the first time it is tracked.
    pub default_total_lessons: u32,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            save_attempts: DEFAULT_SAVE_ATTEMPTS,
            default_total_lessons: DEFAULT_TOTAL_LESSONS,
        }
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidSaveAttempts,
    InvalidTotalLessons,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidSaveAttempts => {
                write!(f, "PROGRESS_SAVE_ATTEMPTS must be an integer between 1 and 255")
            }
            ConfigError::InvalidTotalLessons => {
                write!(f, "PROGRESS_DEFAULT_TOTAL_LESSONS must be a positive integer")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
