//! Configuration management for nbforge
//!
//! Settings are loaded from environment variables with sensible defaults.
//!
//! # Environment Variables
//!
//! - `NBFORGE_API_BASE`: GitHub API base URL - default: "https://api.github.com"
//! - `NBFORGE_API_TIMEOUT`: metadata/listing request timeout in seconds - default: "10"
//! - `NBFORGE_CLONE_TIMEOUT`: git clone timeout in seconds - default: "60"
//! - `NBFORGE_GIT_BIN`: git executable to invoke - default: "git"
//! - `NBFORGE_OUTPUT_DIR`: directory for generated artifacts - default: "generated_notebooks"
//! - `NBFORGE_LOG_LEVEL`: logging level - default: "info"

use std::env;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_API_BASE: &str = "https://api.github.com";
const DEFAULT_API_TIMEOUT_SECS: u64 = 10;
const DEFAULT_CLONE_TIMEOUT_SECS: u64 = 60;
const DEFAULT_GIT_BIN: &str = "git";
const DEFAULT_OUTPUT_DIR: &str = "generated_notebooks";
const DEFAULT_LOG_LEVEL: &str = "info";

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration validation failed
    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),
}

/// Main configuration structure for nbforge
///
/// Constructed via `Default::default()`, which reads `NBFORGE_*` environment
/// variables and falls back to defaults for anything missing.
#[derive(Debug, Clone)]
pub struct NbforgeConfig {
    /// GitHub API base URL (overridable for tests and proxies)
    pub api_base: String,

    /// Timeout for metadata and listing requests, in seconds
    pub api_timeout_secs: u64,

    /// Timeout for the clone subprocess, in seconds
    pub clone_timeout_secs: u64,

    /// Git executable name or path
    pub git_bin: String,

    /// Directory where generated artifacts are written
    pub output_dir: PathBuf,

    /// Logging level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for NbforgeConfig {
    fn default() -> Self {
        let api_base = env::var("NBFORGE_API_BASE").unwrap_or_else(|_| DEFAULT_API_BASE.to_string());

        let api_timeout_secs = env::var("NBFORGE_API_TIMEOUT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_API_TIMEOUT_SECS);

        let clone_timeout_secs = env::var("NBFORGE_CLONE_TIMEOUT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_CLONE_TIMEOUT_SECS);

        let git_bin = env::var("NBFORGE_GIT_BIN").unwrap_or_else(|_| DEFAULT_GIT_BIN.to_string());

        let output_dir = env::var("NBFORGE_OUTPUT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_OUTPUT_DIR));

        let log_level =
            env::var("NBFORGE_LOG_LEVEL").unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string());

        Self {
            api_base,
            api_timeout_secs,
            clone_timeout_secs,
            git_bin,
            output_dir,
            log_level,
        }
    }
}

impl NbforgeConfig {
    /// Validates the configuration for internal coherence
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_base.trim().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "API base URL cannot be empty".to_string(),
            ));
        }
        if self.api_timeout_secs == 0 {
            return Err(ConfigError::ValidationFailed(
                "API timeout must be greater than zero".to_string(),
            ));
        }
        if self.clone_timeout_secs == 0 {
            return Err(ConfigError::ValidationFailed(
                "clone timeout must be greater than zero".to_string(),
            ));
        }
        if self.git_bin.trim().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "git executable cannot be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn api_timeout(&self) -> Duration {
        Duration::from_secs(self.api_timeout_secs)
    }

    pub fn clone_timeout(&self) -> Duration {
        Duration::from_secs(self.clone_timeout_secs)
    }
}
