//! # Deployment Poller
//!
//! Sends one message carrying a program's StateInit to its derived address,
//! then checks the ledger at a fixed interval until the program shows up or
//! the attempts run out.
//!
//! Submission is never retried. Poll-time ledger errors count as a failed
//! check and polling continues.
//!
//! The deployment takes the sender's lock for its submission only, and waits
//! for the sender's previous submission to land before reading a seqno.

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use ld_02_address_derivation::{predict, verify_address};
use shared_types::{
    Address, Amount, Cell, Hash, InitPayload, LedgerClient, OutboundMessage, SendMode,
    SenderLocks, SeqnoWaitError, SequenceNumber, SignedTransfer, TransferRequest, WalletAccount,
};

use crate::config::DeploymentConfig;
use crate::domain::{DeploymentError, DeploymentState, DeploymentTracker};

/// Outcome of a confirmed deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentReceipt {
    pub address: Address,
    /// Sender seqno used by the deployment transaction
    pub seqno: SequenceNumber,
    /// Checks issued until the program was seen
    pub attempts: u32,
    /// Hash of the StateInit cell, equal to `address.hash`
    pub state_init_hash: Hash,
    pub history: Vec<DeploymentState>,
}

/// Deploys programs and waits for them to appear.
pub struct DeploymentPoller {
    ledger: Arc<dyn LedgerClient>,
    locks: Arc<SenderLocks>,
    config: DeploymentConfig,
}

impl DeploymentPoller {
    pub fn new(
        ledger: Arc<dyn LedgerClient>,
        locks: Arc<SenderLocks>,
        config: DeploymentConfig,
    ) -> Self {
        Self {
            ledger,
            locks,
            config,
        }
    }

    pub fn config(&self) -> &DeploymentConfig {
        &self.config
    }

    /// Deploy `init` with `value` attached and an optional `body`, then wait
    /// up to `timeout` for it to appear.
    pub async fn deploy_and_confirm(
        &self,
        sender: &WalletAccount,
        init: &InitPayload,
        value: Amount,
        body: Option<Cell>,
        timeout: Duration,
    ) -> Result<DeploymentReceipt, DeploymentError> {
        let derived = predict(self.config.workchain, init)?;
        let address = derived.address;
        let mut tracker = DeploymentTracker::new();

        info!(
            sender = %sender.address,
            address = %address,
            value,
            "Deploying program"
        );

        let mut message = OutboundMessage::new(address, value)
            .with_state_init(derived.state_init.clone())
            .with_bounce(self.config.bounce);
        if let Some(body) = body {
            message = message.with_body(body);
        }

        let seqno = self.submit(sender, address, message).await?;
        tracker.advance(DeploymentState::Submitted);

        let attempts = self.poll(address, timeout, &mut tracker).await?;

        Ok(DeploymentReceipt {
            address,
            seqno,
            attempts,
            state_init_hash: derived.state_init.hash(),
            history: tracker.history().to_vec(),
        })
    }

    /// Like [`deploy_and_confirm`](Self::deploy_and_confirm), but refuses to
    /// send anything unless `init` derives to `expected`.
    pub async fn deploy_to_expected(
        &self,
        sender: &WalletAccount,
        init: &InitPayload,
        expected: &Address,
        value: Amount,
        body: Option<Cell>,
        timeout: Duration,
    ) -> Result<DeploymentReceipt, DeploymentError> {
        verify_address(self.config.workchain, init, expected)?;
        self.deploy_and_confirm(sender, init, value, body, timeout)
            .await
    }

    /// Poll until `address` holds a program. Returns the number of checks.
    pub async fn confirm(&self, address: Address, timeout: Duration) -> Result<u32, DeploymentError> {
        let mut tracker = DeploymentTracker::new();
        tracker.advance(DeploymentState::Submitted);
        self.poll(address, timeout, &mut tracker).await
    }

    async fn submit(
        &self,
        sender: &WalletAccount,
        address: Address,
        message: OutboundMessage,
    ) -> Result<SequenceNumber, DeploymentError> {
        let mut guard = self.locks.acquire(&sender.address).await;

        let seqno = guard
            .fresh_seqno(self.ledger.as_ref(), self.config.seqno_polling)
            .await
            .map_err(|e| match e {
                SeqnoWaitError::Read(source) => DeploymentError::SequenceRead {
                    sender: sender.address,
                    source,
                },
                SeqnoWaitError::Stalled {
                    last_used,
                    observed,
                } => DeploymentError::SequenceStalled {
                    sender: sender.address,
                    last_used: last_used.value(),
                    observed: observed.value(),
                },
            })?;

        let request = TransferRequest {
            sender: sender.address,
            wallet_id: sender.wallet_id,
            seqno,
            valid_until: TransferRequest::expiry_after(self.config.valid_for),
            send_mode: SendMode::PAY_GAS_SEPARATELY,
            messages: vec![message],
        };
        let payload = request
            .signing_payload()
            .map_err(|source| DeploymentError::Build { address, source })?;
        let signature = sender
            .signer
            .sign(&payload)
            .map_err(|source| DeploymentError::Signing { address, source })?;

        self.ledger
            .submit_transaction(&SignedTransfer { request, signature })
            .await
            .map_err(|source| DeploymentError::Submission {
                address,
                seqno: seqno.value(),
                sender: sender.address,
                source,
            })?;
        guard.record(seqno);

        debug!(address = %address, seqno = seqno.value(), "Deployment submitted");
        Ok(seqno)
    }

    async fn poll(
        &self,
        address: Address,
        timeout: Duration,
        tracker: &mut DeploymentTracker,
    ) -> Result<u32, DeploymentError> {
        let attempts = self.config.attempts_for(timeout);

        for attempt in 1..=attempts {
            tracker.advance(DeploymentState::Polling(attempt));

            match self.ledger.is_contract_deployed(&address).await {
                Ok(true) => {
                    tracker.advance(DeploymentState::Deployed);
                    info!(address = %address, attempt, "Program deployed");
                    return Ok(attempt);
                }
                Ok(false) => {
                    debug!(address = %address, attempt, attempts, "Not deployed yet");
                }
                Err(e) => {
                    warn!(address = %address, attempt, error = %e, "Deployment check failed");
                }
            }

            if attempt < attempts {
                tokio::time::sleep(self.config.poll_interval).await;
            }
        }

        tracker.advance(DeploymentState::TimedOut);
        warn!(address = %address, attempts, "Deployment timed out");
        Err(DeploymentError::DeploymentTimeout { address, attempts })
    }
}
