// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Background specializer configuration.
//!
//! Supports both programmatic and file-based configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Name of the background worker thread.
pub const THREAD_NAME: &str = "fieldjit-specializer";

/// How long `shutdown_all` waits for queued jobs to drain (milliseconds).
pub const SHUTDOWN_DELAY_MS: u64 = 2000;

/// Default capacity of the job queue.
pub const DEFAULT_QUEUE_CAPACITY: usize = 256;

/// Naming pattern of synthesized types, `{target}$Specialized_{id}` with the
/// id rendered as eight hex digits.
pub const GENERATED_TYPE_FORMAT: &str = "{target}$Specialized_{id}";

/// Name of the `id`-th synthesized type for `target`, per
/// [`GENERATED_TYPE_FORMAT`].
pub fn generated_type_name(target: &str, id: u64) -> String {
    GENERATED_TYPE_FORMAT
        .replace("{target}", target)
        .replace("{id}", &format!("{:08x}", id))
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Background specializer configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecializerConfig {
    /// Worker thread name.
    #[serde(default = "default_thread_name")]
    pub thread_name: String,

    /// Maximum number of queued jobs; submissions beyond it are rejected.
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,

    /// Shutdown drain delay (milliseconds).
    #[serde(default = "default_shutdown_delay_ms")]
    pub shutdown_delay_ms: u64,

    /// Whether the scheduler accepts jobs when created.
    #[serde(default = "default_true")]
    pub enabled: bool,
}

fn default_thread_name() -> String {
    THREAD_NAME.to_string()
}

fn default_queue_capacity() -> usize {
    DEFAULT_QUEUE_CAPACITY
}

fn default_shutdown_delay_ms() -> u64 {
    SHUTDOWN_DELAY_MS
}

fn default_true() -> bool {
    true
}

impl Default for SpecializerConfig {
    fn default() -> Self {
        Self {
            thread_name: default_thread_name(),
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            shutdown_delay_ms: SHUTDOWN_DELAY_MS,
            enabled: true,
        }
    }
}

impl SpecializerConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.thread_name.trim().is_empty() {
            return Err(ConfigError::Invalid("Worker thread name is empty".into()));
        }
        if self.queue_capacity == 0 {
            return Err(ConfigError::Invalid(
                "Queue capacity must be at least 1".into(),
            ));
        }
        Ok(())
    }

    pub fn shutdown_delay(&self) -> Duration {
        Duration::from_millis(self.shutdown_delay_ms)
    }

    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    pub fn with_shutdown_delay(mut self, delay: Duration) -> Self {
        self.shutdown_delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_generated_type_name() {
        assert_eq!(generated_type_name("game.Player", 0), "game.Player$Specialized_00000000");
        assert_eq!(generated_type_name("Root", 0xbeef), "Root$Specialized_0000beef");
    }

    #[test]
    fn test_default_config() {
        let config = SpecializerConfig::default();
        assert_eq!(config.thread_name, THREAD_NAME);
        assert_eq!(config.queue_capacity, DEFAULT_QUEUE_CAPACITY);
        assert_eq!(config.shutdown_delay(), Duration::from_millis(2000));
        assert!(config.enabled);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_partial_toml() {
        let config = SpecializerConfig::from_toml_str(
            r#"
            queue_capacity = 8
            shutdown_delay_ms = 50
            "#,
        )
        .expect("parse");

        assert_eq!(config.queue_capacity, 8);
        assert_eq!(config.shutdown_delay_ms, 50);
        assert_eq!(config.thread_name, THREAD_NAME);
        assert!(config.enabled);
    }

    #[test]
    fn test_validate_rejects_zero_capacity() {
        let err = SpecializerConfig::from_toml_str("queue_capacity = 0").expect_err("invalid");
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_validate_rejects_blank_thread_name() {
        let config = SpecializerConfig {
            thread_name: "  ".into(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        writeln!(file, "thread_name = \"jit-worker\"\nenabled = false").expect("write");

        let config = SpecializerConfig::from_file(file.path()).expect("load");
        assert_eq!(config.thread_name, "jit-worker");
        assert!(!config.enabled);
    }

    #[test]
    fn test_from_missing_file() {
        let err = SpecializerConfig::from_file("/nonexistent/fieldjit.toml").expect_err("missing");
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
