//! # Distributor Runtime
//!
//! Composition layer of the distribution engine.
//!
//! ## Modules
//!
//! - `config/` - `RuntimeConfig` loaded from `LD_*` environment variables
//! - `credentials/` - mnemonic or key file → signing seed
//! - `signer/` - Ed25519 [`Signer`](shared_types::Signer) over the seed
//! - `context/` - [`EngineContext`]: init → use → drop, no globals
//! - `operations/` - deploy, compute-and-log, compute-and-submit, mint
//! - `adapters/` - in-memory ledger and holder index
//!
//! ## Startup
//!
//! ```rust,ignore
//! let telemetry = TelemetryConfig::from_env();
//! let _logging = ledger_telemetry::init_logging(&telemetry)?;
//! let ctx = EngineContext::bootstrap_from_env(ledger)?;
//! let table = ctx.compute_and_log(&snapshot, pool)?;
//! ```

pub mod adapters;
pub mod config;
pub mod context;
pub mod credentials;
pub mod errors;
pub mod operations;
pub mod signer;

pub use config::{
    ConfigError, CredentialConfig, CredentialSource, Network, NetworkConfig, RuntimeConfig,
    DEFAULT_WALLET_ID,
};
pub use context::EngineContext;
pub use credentials::{mnemonic_to_seed, resolve_seed, CredentialError, SecretSeed};
pub use errors::RuntimeError;
pub use operations::DistributionRun;
pub use signer::Ed25519Signer;
