//! Structured logging setup.
//!
//! Events carry consistent fields so batch and deployment activity can be
//! filtered per sender:
//! - `component`: emitting component (dispatch, deployment, ...)
//! - `sender`: raw address of the submitting wallet
//! - `seqno`, `batch_index`: position within a dispatch
//! - `address`: target of a deployment

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::{TelemetryConfig, TelemetryError};

/// Returned by [`init_logging`]; logging stays installed for the process.
#[derive(Debug)]
pub struct LoggingGuard {
    service: String,
}

impl LoggingGuard {
    pub fn service(&self) -> &str {
        &self.service
    }
}

/// Build the event filter for `config`.
///
/// `RUST_LOG` wins over the configured level when set and valid.
pub fn build_filter(config: &TelemetryConfig) -> Result<EnvFilter, TelemetryError> {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .map_err(|e| TelemetryError::Config(format!("invalid log filter '{}': {e}", config.log_level)))
}

/// Install the global subscriber.
///
/// Fails if a subscriber is already installed.
pub fn init_logging(config: &TelemetryConfig) -> Result<LoggingGuard, TelemetryError> {
    let filter = build_filter(config)?;

    if !config.console_output {
        tracing_subscriber::registry()
            .with(filter)
            .try_init()
            .map_err(|e| TelemetryError::LoggingInit(e.to_string()))?;
    } else if config.json_logs {
        let json_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true);

        tracing_subscriber::registry()
            .with(filter)
            .with(json_layer)
            .try_init()
            .map_err(|e| TelemetryError::LoggingInit(e.to_string()))?;
    } else {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .with_ansi(true);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .try_init()
            .map_err(|e| TelemetryError::LoggingInit(e.to_string()))?;
    }

    tracing::info!(
        service = %config.full_service_name(),
        network = %config.network,
        json = config.json_logs,
        "Logging initialized"
    );

    Ok(LoggingGuard {
        service: config.full_service_name(),
    })
}

/// Helper to create structured log entries with consistent formatting.
#[macro_export]
macro_rules! log_event {
    (info, $component:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::info!(
            component = $component,
            $($($field)*,)?
            $msg
        )
    };

    (warn, $component:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::warn!(
            component = $component,
            $($($field)*,)?
            $msg
        )
    };

    (error, $component:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::error!(
            component = $component,
            $($($field)*,)?
            $msg
        )
    };

    (debug, $component:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::debug!(
            component = $component,
            $($($field)*,)?
            $msg
        )
    };
}

/// Log a batch-related event with standard fields.
#[macro_export]
macro_rules! log_batch_event {
    ($level:ident, $msg:expr, $sender:expr, $batch_index:expr, $seqno:expr $(, $($field:tt)*)?) => {
        tracing::$level!(
            component = "dispatch",
            sender = %$sender,
            batch_index = $batch_index,
            seqno = $seqno,
            $($($field)*,)?
            $msg
        )
    };
}

/// Log a deployment-related event with standard fields.
#[macro_export]
macro_rules! log_deploy_event {
    ($level:ident, $msg:expr, $address:expr $(, $($field:tt)*)?) => {
        tracing::$level!(
            component = "deployment",
            address = %$address,
            $($($field)*,)?
            $msg
        )
    };
}
