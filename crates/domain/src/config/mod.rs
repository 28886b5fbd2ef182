mod assistants;
mod observability;
mod runs;
mod server;
mod store;

pub use assistants::*;
pub use observability::*;
pub use runs::*;
pub use server::*;
pub use store::*;

use serde::{Deserialize, Serialize};
use std::fmt;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Top-level config
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub assistants: AssistantsConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub runs: RunsConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Config validation
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Severity level for a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSeverity {
    Error,
    Warning,
}

/// A single configuration validation issue.
#[derive(Debug, Clone)]
pub struct ConfigError {
    pub severity: ConfigSeverity,
    pub field: String,
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.severity {
            ConfigSeverity::Error => "ERROR",
            ConfigSeverity::Warning => "WARN",
        };
        write!(f, "[{tag}] {}: {}", self.field, self.message)
    }
}

impl ConfigError {
    fn error(field: &str, message: impl Into<String>) -> Self {
        Self {
            severity: ConfigSeverity::Error,
            field: field.into(),
            message: message.into(),
        }
    }

    fn warning(field: &str, message: impl Into<String>) -> Self {
        Self {
            severity: ConfigSeverity::Warning,
            field: field.into(),
            message: message.into(),
        }
    }
}

impl Config {
    /// Validate the configuration and return a list of issues.
    ///
    /// Returns an empty vec when everything looks good.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if self.server.port == 0 {
            errors.push(ConfigError::error("server.port", "port must be greater than 0"));
        }
        if self.server.host.is_empty() {
            errors.push(ConfigError::error("server.host", "host must not be empty"));
        }
        if self.server.max_concurrent_requests == 0 {
            errors.push(ConfigError::error(
                "server.max_concurrent_requests",
                "must be greater than 0",
            ));
        }

        if self.assistants.base_url.is_empty() {
            errors.push(ConfigError::error(
                "assistants.base_url",
                "base_url must not be empty",
            ));
        }
        if self.assistants.model.is_empty() {
            errors.push(ConfigError::error("assistants.model", "model must not be empty"));
        }
        if self.assistants.tools.is_empty() {
            errors.push(ConfigError::warning(
                "assistants.tools",
                "no tools configured; uploaded documents will not be searchable",
            ));
        }

        if self.store.transport == StoreTransport::Rest && self.store.base_url.is_empty() {
            errors.push(ConfigError::error(
                "store.base_url",
                "base_url must not be empty for the rest transport",
            ));
        }
        if self.store.transport == StoreTransport::Memory {
            errors.push(ConfigError::warning(
                "store.transport",
                "memory transport trusts access tokens as user ids (development only)",
            ));
        }

        if self.runs.poll_interval_ms == 0 {
            errors.push(ConfigError::error(
                "runs.poll_interval_ms",
                "poll interval must be greater than 0",
            ));
        }
        if self.runs.max_polls == 0 {
            errors.push(ConfigError::error("runs.max_polls", "max_polls must be greater than 0"));
        }
        if self.runs.timeout_ms < self.runs.poll_interval_ms {
            errors.push(ConfigError::warning(
                "runs.timeout_ms",
                "timeout is shorter than one poll interval",
            ));
        }
        if self.runs.relay_page_size == 0 || self.runs.relay_page_size > 100 {
            errors.push(ConfigError::error(
                "runs.relay_page_size",
                "page size must be between 1 and 100",
            ));
        }

        if self.server.cors.allowed_origins.len() == 1
            && self.server.cors.allowed_origins[0] == "*"
        {
            errors.push(ConfigError::warning(
                "server.cors.allowed_origins",
                "wildcard \"*\" allows all origins (not recommended for production)",
            ));
        }

        errors
    }
}
