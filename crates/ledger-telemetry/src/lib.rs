//! # Ledger Telemetry
//!
//! Structured logging for the distributor crates.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ledger_telemetry::{init_logging, TelemetryConfig};
//!
//! let config = TelemetryConfig::for_component("dispatch");
//! let _guard = init_logging(&config)?;
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `LD_SERVICE_NAME` | `ledger-distributor` | Service name |
//! | `LD_LOG_LEVEL` | `info` | Log filter (falls back to `RUST_LOG`) |
//! | `LD_CONSOLE_OUTPUT` | `true` | Write events to stdout |
//! | `LD_JSON_LOGS` | `false` | JSON lines output |
//! | `LD_NETWORK` | `testnet` | Network name |

pub mod config;
pub mod logging;

pub use config::TelemetryConfig;
pub use logging::{build_filter, init_logging, LoggingGuard};

use thiserror::Error;

/// Telemetry errors.
#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("Failed to initialize logging: {0}")]
    LoggingInit(String),

    #[error("Configuration error: {0}")]
    Config(String),
}
