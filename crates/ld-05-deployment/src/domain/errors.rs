//! Error types for deployment

use ld_02_address_derivation::AddressError;
use shared_types::{Address, CellError, LedgerError, SignerError};
use thiserror::Error;

/// Deployment errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeploymentError {
    /// Derivation failed or the derived address is not the expected one
    #[error(transparent)]
    Address(#[from] AddressError),

    /// Deployment message could not be built
    #[error("Failed to build deployment to {address}: {source}")]
    Build {
        address: Address,
        #[source]
        source: CellError,
    },

    /// Sender sequence number could not be read
    #[error("Failed to read sequence number of {sender}: {source}")]
    SequenceRead {
        sender: Address,
        #[source]
        source: LedgerError,
    },

    /// The sender's previous submission never advanced its seqno
    #[error("Sequence number of {sender} stuck at {observed} (last used {last_used})")]
    SequenceStalled {
        sender: Address,
        last_used: u32,
        observed: u32,
    },

    /// The signer refused or failed
    #[error("Signing deployment to {address} failed: {source}")]
    Signing {
        address: Address,
        #[source]
        source: SignerError,
    },

    /// The ledger rejected the deployment transaction
    #[error("Submission of deployment to {address} failed (seqno {seqno}, sender {sender}): {source}")]
    Submission {
        address: Address,
        seqno: u32,
        sender: Address,
        #[source]
        source: LedgerError,
    },

    /// The program never appeared at its address
    #[error("Program not deployed at {address} after {attempts} attempts")]
    DeploymentTimeout { address: Address, attempts: u32 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_display() {
        let err = DeploymentError::DeploymentTimeout {
            address: Address::new(0, [0x01; 32]),
            attempts: 30,
        };
        assert!(err.to_string().ends_with("after 30 attempts"));
    }
}
