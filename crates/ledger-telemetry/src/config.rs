//! Telemetry configuration from environment variables.

use serde::{Deserialize, Serialize};
use std::env;

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Service name attached to every event
    pub service_name: String,

    /// Component emitting the events (dispatch, deployment, ...)
    pub component: Option<String>,

    /// Filter directive (trace, debug, info, warn, error or a full
    /// `EnvFilter` expression)
    pub log_level: String,

    /// Whether to write events to stdout at all
    pub console_output: bool,

    /// JSON lines instead of human-readable output
    pub json_logs: bool,

    /// Network identifier (testnet, mainnet)
    pub network: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "ledger-distributor".to_string(),
            component: None,
            log_level: "info".to_string(),
            console_output: true,
            json_logs: false,
            network: "testnet".to_string(),
        }
    }
}

impl TelemetryConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `LD_SERVICE_NAME`: Service name (default: ledger-distributor)
    /// - `LD_LOG_LEVEL` or `RUST_LOG`: Log filter (default: info)
    /// - `LD_CONSOLE_OUTPUT`: Enable console output (default: true)
    /// - `LD_JSON_LOGS`: Enable JSON logs (default: false, true in containers)
    /// - `LD_NETWORK`: Network name (default: testnet)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with a custom variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let is_container =
            lookup("KUBERNETES_SERVICE_HOST").is_some() || lookup("DOCKER_CONTAINER").is_some();

        Self {
            service_name: lookup("LD_SERVICE_NAME")
                .unwrap_or_else(|| "ledger-distributor".to_string()),

            component: None,

            log_level: lookup("LD_LOG_LEVEL")
                .or_else(|| lookup("RUST_LOG"))
                .unwrap_or_else(|| "info".to_string()),

            console_output: lookup("LD_CONSOLE_OUTPUT")
                .map(|v| v.to_lowercase() != "false" && v != "0")
                .unwrap_or(true),

            json_logs: lookup("LD_JSON_LOGS")
                .map(|v| v.to_lowercase() == "true" || v == "1")
                .unwrap_or(is_container),

            network: lookup("LD_NETWORK").unwrap_or_else(|| "testnet".to_string()),
        }
    }

    /// Configuration for a named component.
    pub fn for_component(component: &str) -> Self {
        let mut config = Self::from_env();
        config.component = Some(component.to_string());
        config
    }

    /// Service name including the component, if any.
    pub fn full_service_name(&self) -> String {
        match &self.component {
            Some(component) => format!("{}-{}", self.service_name, component),
            None => self.service_name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = TelemetryConfig::default();
        assert_eq!(config.service_name, "ledger-distributor");
        assert_eq!(config.log_level, "info");
        assert!(!config.json_logs);
    }

    #[test]
    fn test_from_lookup() {
        let config = TelemetryConfig::from_lookup(lookup(&[
            ("LD_LOG_LEVEL", "debug"),
            ("LD_JSON_LOGS", "1"),
            ("LD_NETWORK", "mainnet"),
        ]));
        assert_eq!(config.log_level, "debug");
        assert!(config.json_logs);
        assert_eq!(config.network, "mainnet");
    }

    #[test]
    fn test_rust_log_fallback() {
        let config = TelemetryConfig::from_lookup(lookup(&[("RUST_LOG", "warn")]));
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn test_container_defaults_to_json() {
        let config = TelemetryConfig::from_lookup(lookup(&[("DOCKER_CONTAINER", "1")]));
        assert!(config.json_logs);
    }

    #[test]
    fn test_full_service_name() {
        let mut config = TelemetryConfig::default();
        assert_eq!(config.full_service_name(), "ledger-distributor");

        config.component = Some("dispatch".to_string());
        assert_eq!(config.full_service_name(), "ledger-distributor-dispatch");
    }
}
