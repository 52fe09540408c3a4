//! Configuration file handling
//!
//! The file is JSON. Only `store_dir` is required:
//!
//! ```json
//! { "store_dir": "/var/lib/policyvet", "log_severity": "INFO", "log_target": "stderr" }
//! ```

use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::errors::{CliError, CliResult};
use crate::observability::{null_log, Event, JsonLogger, Severity, SharedLog};

/// Configuration file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Root of the entity directory store (required)
    pub store_dir: String,

    /// Minimum severity written (optional, default "WARN")
    #[serde(default = "default_log_severity")]
    pub log_severity: String,

    /// Where log lines go: "stderr", "stdout" or "none" (optional, default "stderr")
    #[serde(default = "default_log_target")]
    pub log_target: String,
}

fn default_log_severity() -> String {
    "WARN".to_string()
}
fn default_log_target() -> String {
    "stderr".to_string()
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        Self::parse(&content)
    }

    /// Parse and validate configuration text
    pub fn parse(content: &str) -> CliResult<Self> {
        let config: Config = serde_json::from_str(content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> CliResult<()> {
        if self.store_dir.trim().is_empty() {
            return Err(CliError::config_error("store_dir must not be empty"));
        }

        self.severity()?;

        match self.log_target.as_str() {
            "stderr" | "stdout" | "none" => Ok(()),
            other => Err(CliError::config_error(format!(
                "Invalid log_target: '{}'. Expected 'stderr', 'stdout' or 'none'.",
                other
            ))),
        }
    }

    /// Parsed minimum severity
    pub fn severity(&self) -> CliResult<Severity> {
        self.log_severity.parse().map_err(|_| {
            CliError::config_error(format!(
                "Invalid log_severity: '{}'. Expected TRACE, INFO, WARN or ERROR.",
                self.log_severity
            ))
        })
    }

    /// Build the sink described by this configuration and record the load.
    pub fn open_log(&self) -> CliResult<SharedLog> {
        let severity = self.severity()?;
        let log: SharedLog = match self.log_target.as_str() {
            "stdout" => Arc::new(JsonLogger::stdout(severity)),
            "none" => null_log(),
            _ => Arc::new(JsonLogger::stderr(severity)),
        };

        log.log(
            Event::ConfigLoaded,
            &[
                ("log_severity", severity.as_str()),
                ("store_dir", &self.store_dir),
            ],
        );
        Ok(log)
    }
}
