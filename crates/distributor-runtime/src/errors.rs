//! Runtime error type wrapping every component error.

use thiserror::Error;

use ld_01_content_encoding::EncodingError;
use ld_02_address_derivation::AddressError;
use ld_03_distribution::DistributionError;
use ld_04_batch_dispatch::DispatchError;
use ld_05_deployment::DeploymentError;
use shared_types::{Amount, CellError, LedgerError};

use crate::config::ConfigError;
use crate::credentials::CredentialError;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Credential(#[from] CredentialError),

    #[error(transparent)]
    Encoding(#[from] EncodingError),

    #[error(transparent)]
    Address(#[from] AddressError),

    #[error(transparent)]
    Distribution(#[from] DistributionError),

    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    #[error(transparent)]
    Deployment(#[from] DeploymentError),

    #[error("Ledger read failed: {0}")]
    Ledger(#[from] LedgerError),

    #[error("Failed to encode transfer message: {0}")]
    Message(#[from] CellError),

    /// The sender cannot attach the per-message value to every message.
    #[error("Insufficient balance for {messages} messages: required {required}, available {available}")]
    InsufficientGasBalance {
        messages: usize,
        required: Amount,
        available: Amount,
    },
}
