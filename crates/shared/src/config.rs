//! Configuration types for VESTA
//!
//! Everything the pipeline treats as policy — controller endpoint, session
//! limits, validation bounds, climate range, table locations — is loaded
//! once at process start, never per request.

use crate::error::{Result, VestaError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Home-automation controller endpoint configuration.
///
/// The bearer token is sourced from the environment (an external secret
/// store populates it), never from the config file on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControllerConfig {
    /// Base URL of the controller's REST surface
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Environment variable holding the bearer token
    #[serde(default = "default_token_env")]
    pub token_env: String,

    /// Outbound request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://homeassistant.local:8123".to_string()
}

fn default_token_env() -> String {
    "VESTA_CONTROLLER_TOKEN".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            token_env: default_token_env(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ControllerConfig {
    /// Read the bearer token from the configured environment variable
    pub fn token(&self) -> Result<String> {
        std::env::var(&self.token_env).map_err(|_| {
            VestaError::Config(format!(
                "controller token not found; set the {} environment variable",
                self.token_env
            ))
        })
    }
}

/// Per-session quota and expiry policy
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SessionPolicy {
    /// Commands accepted per session before throttling
    #[serde(default = "default_max_commands")]
    pub max_commands: u32,

    /// Idle window in seconds; a quiet session past this is expired
    #[serde(default = "default_idle_timeout_secs")]
    pub idle_timeout_secs: i64,

    /// Total session lifetime cap in seconds
    #[serde(default = "default_max_duration_secs")]
    pub max_duration_secs: i64,
}

fn default_max_commands() -> u32 {
    100
}

fn default_idle_timeout_secs() -> i64 {
    300
}

fn default_max_duration_secs() -> i64 {
    3600
}

impl Default for SessionPolicy {
    fn default() -> Self {
        Self {
            max_commands: default_max_commands(),
            idle_timeout_secs: default_idle_timeout_secs(),
            max_duration_secs: default_max_duration_secs(),
        }
    }
}

impl SessionPolicy {
    pub fn idle_timeout(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.idle_timeout_secs)
    }

    pub fn max_duration(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.max_duration_secs)
    }
}

/// Bounds applied by the input validator
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ValidationLimits {
    #[serde(default = "default_max_command_length")]
    pub max_command_length: usize,
}

fn default_max_command_length() -> usize {
    5000
}

impl Default for ValidationLimits {
    fn default() -> Self {
        Self {
            max_command_length: default_max_command_length(),
        }
    }
}

/// Valid target range for thermostat commands, in the household's unit
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ClimateBounds {
    #[serde(default = "default_min_temperature")]
    pub min_temperature: f64,

    #[serde(default = "default_max_temperature")]
    pub max_temperature: f64,
}

fn default_min_temperature() -> f64 {
    50.0
}

fn default_max_temperature() -> f64 {
    90.0
}

impl Default for ClimateBounds {
    fn default() -> Self {
        Self {
            min_temperature: default_min_temperature(),
            max_temperature: default_max_temperature(),
        }
    }
}

/// Top-level VESTA configuration (vesta.yaml)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VestaConfig {
    #[serde(default)]
    pub controller: ControllerConfig,

    #[serde(default)]
    pub session: SessionPolicy,

    #[serde(default)]
    pub validation: ValidationLimits,

    #[serde(default)]
    pub climate: ClimateBounds,

    /// Optional rule table override; builtin rules are used when absent
    #[serde(default)]
    pub rules_path: Option<PathBuf>,

    /// Optional lexicon override; builtin lexicon is used when absent
    #[serde(default)]
    pub lexicon_path: Option<PathBuf>,
}

impl VestaConfig {
    /// Load configuration from a YAML file
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content)?;
        Ok(config)
    }
}

/// Logger interface for dependency injection
pub trait Logger: Send + Sync {
    fn debug(&self, message: &str, meta: Option<&HashMap<String, String>>);
    fn info(&self, message: &str, meta: Option<&HashMap<String, String>>);
    fn warn(&self, message: &str, meta: Option<&HashMap<String, String>>);
    fn error(&self, message: &str, meta: Option<&HashMap<String, String>>);
}

/// Simple console logger implementation
#[derive(Debug, Clone, Default)]
pub struct ConsoleLogger;

impl Logger for ConsoleLogger {
    fn debug(&self, message: &str, _meta: Option<&HashMap<String, String>>) {
        eprintln!("[DEBUG] {}", message);
    }

    fn info(&self, message: &str, _meta: Option<&HashMap<String, String>>) {
        eprintln!("[INFO] {}", message);
    }

    fn warn(&self, message: &str, _meta: Option<&HashMap<String, String>>) {
        eprintln!("[WARN] {}", message);
    }

    fn error(&self, message: &str, _meta: Option<&HashMap<String, String>>) {
        eprintln!("[ERROR] {}", message);
    }
}

/// No-op logger for testing
#[derive(Debug, Clone, Default)]
pub struct NullLogger;

impl Logger for NullLogger {
    fn debug(&self, _message: &str, _meta: Option<&HashMap<String, String>>) {}
    fn info(&self, _message: &str, _meta: Option<&HashMap<String, String>>) {}
    fn warn(&self, _message: &str, _meta: Option<&HashMap<String, String>>) {}
    fn error(&self, _message: &str, _meta: Option<&HashMap<String, String>>) {}
}
