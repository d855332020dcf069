//! Configuration model for the candidacy engine.

use serde::{Deserialize, Serialize};

/// Top-level configuration, merged from defaults, YAML files, and
/// environment variables.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Database settings
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Batch creation settings
    #[serde(default)]
    pub batch: BatchConfig,

    /// Event bus settings
    #[serde(default)]
    pub events: EventsConfig,
}

/// SQLite database settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DatabaseConfig {
    /// Path to the database file
    #[serde(default = "default_database_path")]
    pub path: String,

    /// Maximum connections in the pool
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
            max_connections: default_max_connections(),
        }
    }
}

fn default_database_path() -> String {
    ".candidacy/candidacy.db".to_string()
}

const fn default_max_connections() -> u32 {
    5
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: pretty or json
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

/// Limits applied to batch application creation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BatchConfig {
    /// Hard cap on (student, job) pairs per batch request
    #[serde(default = "default_max_pairs")]
    pub max_pairs: usize,

    /// How many colliding pairs duplicate errors report
    #[serde(default = "default_duplicate_sample_size")]
    pub duplicate_sample_size: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_pairs: default_max_pairs(),
            duplicate_sample_size: default_duplicate_sample_size(),
        }
    }
}

const fn default_max_pairs() -> usize {
    5000
}

const fn default_duplicate_sample_size() -> usize {
    5
}

/// Event bus settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EventsConfig {
    /// Broadcast channel capacity before slow subscribers lag
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            channel_capacity: default_channel_capacity(),
        }
    }
}

const fn default_channel_capacity() -> usize {
    1024
}
