//! # Ledger Ports
//!
//! Driven ports implemented by the transport layer. The engine only ever
//! talks to the ledger through [`LedgerClient`] and only ever signs through
//! [`Signer`].

use async_trait::async_trait;

use crate::address::Address;
use crate::entities::{AccountState, SequenceNumber};
use crate::errors::{LedgerError, SignerError};
use crate::messages::SignedTransfer;

/// Access to the ledger: sequence numbers, submission and state reads.
///
/// Implementations may be shared across senders; submissions for a single
/// sender must be serialized by the caller (see
/// [`SenderLocks`](crate::sender_locks::SenderLocks)).
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Current sequence number of `account`.
    async fn get_sequence_number(&self, account: &Address) -> Result<SequenceNumber, LedgerError>;

    /// Submit a signed wallet transaction. Success means the ledger accepted
    /// it for processing, not that it executed.
    async fn submit_transaction(&self, transfer: &SignedTransfer) -> Result<(), LedgerError>;

    /// Read account state.
    async fn read_account_state(&self, address: &Address) -> Result<AccountState, LedgerError>;

    /// Whether code and data are installed at `address`.
    async fn is_contract_deployed(&self, address: &Address) -> Result<bool, LedgerError>;
}

/// Produces signatures over transfer payloads.
pub trait Signer: Send + Sync {
    /// Public key matching the signatures.
    fn public_key(&self) -> [u8; 32];

    /// Sign `payload`.
    fn sign(&self, payload: &[u8]) -> Result<Vec<u8>, SignerError>;
}

/// Mock implementations for testing
#[cfg(any(test, feature = "mocks"))]
pub mod mocks {
    use super::*;

    /// Signer producing a deterministic, non-cryptographic signature.
    pub struct MockSigner;

    impl Signer for MockSigner {
        fn public_key(&self) -> [u8; 32] {
            [0x42; 32]
        }

        fn sign(&self, payload: &[u8]) -> Result<Vec<u8>, SignerError> {
            let mut sig = payload.to_vec();
            sig.resize(64, 0);
            Ok(sig)
        }
    }
}
