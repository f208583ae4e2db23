//! # Batch Dispatcher
//!
//! Submits a transfer list as a sequence of multi-message wallet
//! transactions, one per batch, strictly in sequence-number order.
//!
//! ## Flow per batch
//!
//! ```text
//! [delay] → read seqno → (wait until seqno > last used) → build → sign → submit
//! ```
//!
//! [`BatchDispatch`] is lazy: nothing touches the ledger until the first
//! [`BatchDispatch::next`] call, which also takes the sender's lock. The
//! lock is held until the dispatch finishes, fails or is dropped, so two
//! dispatches for one sender never interleave. The lock remembers the last
//! seqno any holder used, so a dispatch that starts right after another
//! submission waits for that submission to land first. After the first
//! error the dispatch is fused and yields `None`.
//!
//! A batch leaves the queue only once the ledger accepted it. Dropping a
//! `next()` future before submission keeps the batch for the next call.

use std::collections::VecDeque;
use std::sync::Arc;
use tracing::{info, warn};

use shared_types::{
    await_seqno_after, Address, LedgerClient, SenderGuard, SenderLocks, SeqnoWaitError,
    SequenceNumber, SignedTransfer, TransferRequest, WalletAccount,
};

use crate::algorithms::partition;
use crate::config::DispatchConfig;
use crate::domain::{BatchResult, DispatchError, DispatchSummary, TransferBatch, TransferEntry};
use crate::ports::TransferEncoder;

/// Creates dispatches against a shared ledger client.
pub struct BatchDispatcher {
    ledger: Arc<dyn LedgerClient>,
    locks: Arc<SenderLocks>,
    config: DispatchConfig,
}

impl BatchDispatcher {
    pub fn new(
        ledger: Arc<dyn LedgerClient>,
        locks: Arc<SenderLocks>,
        config: DispatchConfig,
    ) -> Result<Self, DispatchError> {
        config.validate()?;
        Ok(Self {
            ledger,
            locks,
            config,
        })
    }

    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    /// Prepare a dispatch of `transfers` from `sender`.
    ///
    /// Partitioning happens here; ledger I/O starts on the first `next()`.
    pub fn dispatch(
        &self,
        sender: WalletAccount,
        transfers: Vec<TransferEntry>,
        encoder: Arc<dyn TransferEncoder>,
    ) -> Result<BatchDispatch, DispatchError> {
        let recipients = transfers.len();
        let batches: VecDeque<_> = partition(transfers, self.config.batch_size)?.into();

        info!(
            sender = %sender.address,
            recipients,
            batches = batches.len(),
            batch_size = self.config.batch_size,
            mode = ?self.config.mode,
            "Prepared batch dispatch"
        );

        Ok(BatchDispatch {
            ledger: self.ledger.clone(),
            locks: self.locks.clone(),
            config: self.config.clone(),
            sender,
            encoder,
            total_batches: batches.len(),
            batches,
            guard: None,
            last_used: None,
            fused: false,
        })
    }
}

/// A running dispatch. Finite and not restartable.
pub struct BatchDispatch {
    ledger: Arc<dyn LedgerClient>,
    locks: Arc<SenderLocks>,
    config: DispatchConfig,
    sender: WalletAccount,
    encoder: Arc<dyn TransferEncoder>,
    batches: VecDeque<TransferBatch>,
    total_batches: usize,
    guard: Option<SenderGuard>,
    last_used: Option<SequenceNumber>,
    fused: bool,
}

impl BatchDispatch {
    pub fn sender(&self) -> &Address {
        &self.sender.address
    }

    pub fn total_batches(&self) -> usize {
        self.total_batches
    }

    /// Batches not yet submitted.
    pub fn remaining(&self) -> usize {
        if self.fused {
            0
        } else {
            self.batches.len()
        }
    }

    /// Sequence number used by the most recent submission.
    pub fn last_used(&self) -> Option<SequenceNumber> {
        self.last_used
    }

    /// Submit the next batch.
    ///
    /// Returns `None` once every batch went out or after an error.
    pub async fn next(&mut self) -> Option<Result<BatchResult, DispatchError>> {
        if self.fused {
            return None;
        }
        if self.batches.is_empty() {
            self.guard = None;
            return None;
        }

        if self.guard.is_none() {
            self.guard = Some(self.locks.acquire(&self.sender.address).await);
        } else {
            tokio::time::sleep(self.config.inter_batch_delay).await;
        }

        let result = match (self.batches.front(), self.guard.as_ref()) {
            (Some(batch), Some(guard)) => self.submit(batch, guard).await,
            _ => return None,
        };

        match &result {
            Ok(done) => {
                self.batches.pop_front();
                self.last_used = Some(done.seqno);
                if let Some(guard) = self.guard.as_mut() {
                    guard.record(done.seqno);
                }
                if self.batches.is_empty() {
                    self.guard = None;
                }
            }
            Err(e) => {
                warn!(
                    sender = %self.sender.address,
                    batch_index = ?e.batch_index(),
                    remaining = self.batches.len(),
                    error = %e,
                    "Batch dispatch aborted"
                );
                self.fused = true;
                self.guard = None;
            }
        }
        Some(result)
    }

    async fn submit(
        &self,
        batch: &TransferBatch,
        guard: &SenderGuard,
    ) -> Result<BatchResult, DispatchError> {
        let sender = self.sender.address;
        let batch_index = batch.index;
        let seqno = guard
            .fresh_seqno(self.ledger.as_ref(), self.config.seqno_polling())
            .await
            .map_err(|e| self.seqno_error(batch_index, e))?;

        let messages = batch
            .entries
            .iter()
            .map(|entry| self.encoder.encode(entry, self.config.gas_per_transfer))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|source| DispatchError::Build {
                batch_index,
                source,
            })?;

        let request = TransferRequest {
            sender,
            wallet_id: self.sender.wallet_id,
            seqno,
            valid_until: TransferRequest::expiry_after(self.config.valid_for),
            send_mode: self.config.mode.send_mode(),
            messages,
        };

        let payload = request
            .signing_payload()
            .map_err(|source| DispatchError::Build {
                batch_index,
                source,
            })?;
        let signature = self
            .sender
            .signer
            .sign(&payload)
            .map_err(|source| DispatchError::Signing {
                batch_index,
                seqno: seqno.value(),
                sender,
                source,
            })?;

        let transfer = SignedTransfer { request, signature };
        self.ledger
            .submit_transaction(&transfer)
            .await
            .map_err(|source| DispatchError::Submission {
                batch_index,
                seqno: seqno.value(),
                sender,
                source,
            })?;

        let result = BatchResult {
            batch_index,
            seqno,
            recipients: batch.len(),
            total_amount: batch.total_amount(),
            body_hash: payload,
        };

        info!(
            sender = %sender,
            batch_index,
            seqno = seqno.value(),
            recipients = result.recipients,
            total_batches = self.total_batches,
            "Batch submitted"
        );
        Ok(result)
    }

    fn seqno_error(&self, batch_index: usize, error: SeqnoWaitError) -> DispatchError {
        let sender = self.sender.address;
        match error {
            SeqnoWaitError::Read(source) => DispatchError::SequenceRead {
                batch_index,
                sender,
                source,
            },
            SeqnoWaitError::Stalled {
                last_used,
                observed,
            } => DispatchError::SequenceStalled {
                batch_index,
                sender,
                last_used: last_used.value(),
                observed: observed.value(),
            },
        }
    }

    /// Wait until the last submission is reflected in the sender's seqno.
    pub async fn await_confirmation(&self) -> Result<Option<SequenceNumber>, DispatchError> {
        if self.last_used.is_none() {
            return Ok(None);
        }
        let seqno = await_seqno_after(
            self.ledger.as_ref(),
            &self.sender.address,
            self.last_used,
            self.config.seqno_polling(),
        )
        .await
        .map_err(|e| self.seqno_error(self.total_batches, e))?;
        info!(
            sender = %self.sender.address,
            seqno = seqno.value(),
            "Final batch confirmed"
        );
        Ok(Some(seqno))
    }

    /// Drive the dispatch to completion.
    ///
    /// With `confirm_final`, also waits until the last batch advanced the
    /// sender's sequence number.
    pub async fn run(mut self, confirm_final: bool) -> Result<DispatchSummary, DispatchError> {
        let mut summary = DispatchSummary::default();
        while let Some(result) = self.next().await {
            summary.record(result?);
        }
        if confirm_final {
            summary.confirmed_seqno = self.await_confirmation().await?;
        }
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{JettonTransferEncoder, NativeTransferEncoder};
    use crate::domain::BatchMode;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use shared_types::ports::mocks::MockSigner;
    use shared_types::{AccountState, LedgerError, SendMode};
    use std::time::Duration;

    /// Ledger double with one wallet. Accepted transactions become visible
    /// in the seqno immediately, or after `land_after_reads` seqno reads.
    struct ScriptedLedger {
        state: Mutex<ScriptState>,
    }

    struct ScriptState {
        seqno: u32,
        advance_on_submit: bool,
        land_after_reads: u32,
        in_flight: Vec<u32>,
        fail_submission: Option<usize>,
        submissions: Vec<SignedTransfer>,
        seqno_reads: usize,
    }

    impl ScriptedLedger {
        fn new(seqno: u32) -> Arc<Self> {
            Arc::new(Self {
                state: Mutex::new(ScriptState {
                    seqno,
                    advance_on_submit: true,
                    land_after_reads: 0,
                    in_flight: Vec::new(),
                    fail_submission: None,
                    submissions: Vec::new(),
                    seqno_reads: 0,
                }),
            })
        }

        fn landing_after(seqno: u32, reads: u32) -> Arc<Self> {
            let ledger = Self::new(seqno);
            ledger.state.lock().land_after_reads = reads;
            ledger
        }

        fn submitted_seqnos(&self) -> Vec<u32> {
            self.submissions()
                .iter()
                .map(|t| t.request.seqno.value())
                .collect()
        }

        fn submissions(&self) -> Vec<SignedTransfer> {
            self.state.lock().submissions.clone()
        }
    }

    #[async_trait]
    impl LedgerClient for ScriptedLedger {
        async fn get_sequence_number(
            &self,
            _account: &Address,
        ) -> Result<SequenceNumber, LedgerError> {
            let mut state = self.state.lock();
            state.seqno_reads += 1;
            for left in state.in_flight.iter_mut() {
                *left -= 1;
            }
            let before = state.in_flight.len();
            state.in_flight.retain(|left| *left > 0);
            state.seqno += (before - state.in_flight.len()) as u32;
            Ok(SequenceNumber::new(state.seqno))
        }

        async fn submit_transaction(&self, transfer: &SignedTransfer) -> Result<(), LedgerError> {
            let mut state = self.state.lock();
            if state.fail_submission == Some(state.submissions.len()) {
                return Err(LedgerError::Rejected("out of gas".into()));
            }
            let expected = state.seqno + state.in_flight.len() as u32;
            if transfer.request.seqno.value() != expected {
                return Err(LedgerError::SequenceMismatch {
                    expected,
                    got: transfer.request.seqno.value(),
                });
            }
            state.submissions.push(transfer.clone());
            if state.advance_on_submit {
                if state.land_after_reads == 0 {
                    state.seqno += 1;
                } else {
                    let reads = state.land_after_reads;
                    state.in_flight.push(reads);
                }
            }
            Ok(())
        }

        async fn read_account_state(&self, _address: &Address) -> Result<AccountState, LedgerError> {
            Ok(AccountState::default())
        }

        async fn is_contract_deployed(&self, _address: &Address) -> Result<bool, LedgerError> {
            Ok(false)
        }
    }

    fn addr(byte: u8) -> Address {
        Address::new(0, [byte; 32])
    }

    fn wallet() -> WalletAccount {
        WalletAccount::new(addr(0xAA), 698_983_191, Arc::new(MockSigner))
    }

    fn entries(n: usize) -> Vec<TransferEntry> {
        (0..n)
            .map(|i| TransferEntry::new(addr((i % 200) as u8), 10))
            .collect()
    }

    fn dispatcher(ledger: Arc<ScriptedLedger>, config: DispatchConfig) -> (BatchDispatcher, Arc<SenderLocks>) {
        let locks = Arc::new(SenderLocks::new());
        (
            BatchDispatcher::new(ledger, locks.clone(), config).unwrap(),
            locks,
        )
    }

    fn jetton() -> Arc<dyn TransferEncoder> {
        Arc::new(JettonTransferEncoder::new(addr(0xEE)))
    }

    #[tokio::test(start_paused = true)]
    async fn test_257_recipients_two_batches_increasing_seqno() {
        let ledger = ScriptedLedger::new(5);
        let (dispatcher, _) = dispatcher(ledger.clone(), DispatchConfig::default());
        let mut dispatch = dispatcher.dispatch(wallet(), entries(257), jetton()).unwrap();
        assert_eq!(dispatch.total_batches(), 2);

        let first = dispatch.next().await.unwrap().unwrap();
        let second = dispatch.next().await.unwrap().unwrap();
        assert!(dispatch.next().await.is_none());

        assert_eq!((first.batch_index, first.recipients), (0, 255));
        assert_eq!((second.batch_index, second.recipients), (1, 2));
        assert_eq!(first.seqno, SequenceNumber::new(5));
        assert_eq!(second.seqno, SequenceNumber::new(6));

        let submitted = ledger.submissions();
        assert_eq!(submitted.len(), 2);
        assert_eq!(submitted[0].request.messages.len(), 255);
        assert_eq!(submitted[1].request.messages.len(), 2);
        assert!(submitted[0].request.seqno < submitted[1].request.seqno);
    }

    #[tokio::test(start_paused = true)]
    async fn test_lazy_until_first_next() {
        let ledger = ScriptedLedger::new(0);
        let (dispatcher, locks) = dispatcher(ledger.clone(), DispatchConfig::default());
        let mut dispatch = dispatcher.dispatch(wallet(), entries(3), jetton()).unwrap();

        assert_eq!(ledger.state.lock().seqno_reads, 0);
        assert!(locks.try_acquire(&addr(0xAA)).is_some());

        dispatch.next().await.unwrap().unwrap();
        assert_eq!(ledger.submissions().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_lock_held_between_batches() {
        let ledger = ScriptedLedger::new(0);
        let config = DispatchConfig {
            batch_size: 2,
            ..Default::default()
        };
        let (dispatcher, locks) = dispatcher(ledger, config);
        let mut dispatch = dispatcher.dispatch(wallet(), entries(4), jetton()).unwrap();

        dispatch.next().await.unwrap().unwrap();
        assert!(locks.try_acquire(&addr(0xAA)).is_none());

        dispatch.next().await.unwrap().unwrap();
        assert!(locks.try_acquire(&addr(0xAA)).is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_inter_batch_delay() {
        let ledger = ScriptedLedger::new(0);
        let config = DispatchConfig {
            batch_size: 1,
            inter_batch_delay: Duration::from_millis(1500),
            ..Default::default()
        };
        let (dispatcher, _) = dispatcher(ledger, config);
        let dispatch = dispatcher.dispatch(wallet(), entries(3), jetton()).unwrap();

        let start = tokio::time::Instant::now();
        dispatch.run(false).await.unwrap();
        assert_eq!(start.elapsed(), Duration::from_millis(3000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_send_mode_follows_batch_mode() {
        for (mode, ignore) in [(BatchMode::Strict, false), (BatchMode::BestEffort, true)] {
            let ledger = ScriptedLedger::new(0);
            let config = DispatchConfig {
                mode,
                ..Default::default()
            };
            let (dispatcher, _) = dispatcher(ledger.clone(), config);
            dispatcher
                .dispatch(wallet(), entries(2), jetton())
                .unwrap()
                .run(false)
                .await
                .unwrap();

            let send_mode = ledger.submissions()[0].request.send_mode;
            assert_eq!(send_mode.contains(SendMode::IGNORE_ERRORS), ignore);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_submission_failure_fuses_and_releases() {
        let ledger = ScriptedLedger::new(9);
        ledger.state.lock().fail_submission = Some(1);
        let config = DispatchConfig {
            batch_size: 2,
            ..Default::default()
        };
        let (dispatcher, locks) = dispatcher(ledger.clone(), config);
        let mut dispatch = dispatcher.dispatch(wallet(), entries(6), jetton()).unwrap();

        assert!(dispatch.next().await.unwrap().is_ok());
        let err = dispatch.next().await.unwrap().unwrap_err();
        assert_eq!(
            err,
            DispatchError::Submission {
                batch_index: 1,
                seqno: 10,
                sender: addr(0xAA),
                source: LedgerError::Rejected("out of gas".into()),
            }
        );

        assert!(dispatch.next().await.is_none());
        assert_eq!(dispatch.remaining(), 0);
        assert_eq!(ledger.submissions().len(), 1);
        assert!(locks.try_acquire(&addr(0xAA)).is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stalled_sequence_number() {
        let ledger = ScriptedLedger::new(3);
        ledger.state.lock().advance_on_submit = false;
        let config = DispatchConfig {
            batch_size: 1,
            seqno_poll_attempts: 5,
            ..Default::default()
        };
        let (dispatcher, _) = dispatcher(ledger.clone(), config);
        let mut dispatch = dispatcher.dispatch(wallet(), entries(2), jetton()).unwrap();

        dispatch.next().await.unwrap().unwrap();
        let reads_before = ledger.state.lock().seqno_reads;
        let err = dispatch.next().await.unwrap().unwrap_err();

        assert_eq!(
            err,
            DispatchError::SequenceStalled {
                batch_index: 1,
                sender: addr(0xAA),
                last_used: 3,
                observed: 3,
            }
        );
        assert_eq!(ledger.state.lock().seqno_reads - reads_before, 5);
        // Never resubmitted with the same seqno
        assert_eq!(ledger.submissions().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_with_confirmation() {
        let ledger = ScriptedLedger::new(0);
        let config = DispatchConfig {
            batch_size: 100,
            ..Default::default()
        };
        let (dispatcher, _) = dispatcher(ledger, config);
        let summary = dispatcher
            .dispatch(wallet(), entries(250), Arc::new(NativeTransferEncoder::default()))
            .unwrap()
            .run(true)
            .await
            .unwrap();

        assert_eq!(summary.batches.len(), 3);
        assert_eq!(summary.recipients, 250);
        assert_eq!(summary.total_amount, 2500);
        assert_eq!(summary.confirmed_seqno, Some(SequenceNumber::new(3)));
    }

    #[tokio::test]
    async fn test_empty_transfer_list() {
        let ledger = ScriptedLedger::new(0);
        let (dispatcher, _) = dispatcher(ledger.clone(), DispatchConfig::default());
        let summary = dispatcher
            .dispatch(wallet(), Vec::new(), jetton())
            .unwrap()
            .run(true)
            .await
            .unwrap();
        assert!(summary.batches.is_empty());
        assert_eq!(summary.confirmed_seqno, None);
        assert_eq!(ledger.state.lock().seqno_reads, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_signature_covers_body() {
        let ledger = ScriptedLedger::new(0);
        let (dispatcher, _) = dispatcher(ledger.clone(), DispatchConfig::default());
        let result = dispatcher
            .dispatch(wallet(), entries(1), jetton())
            .unwrap()
            .run(false)
            .await
            .unwrap();

        let submitted = &ledger.submissions()[0];
        let payload = submitted.request.signing_payload().unwrap();
        assert_eq!(result.batches[0].body_hash, payload);
        assert_eq!(&submitted.signature[..32], &payload[..]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_back_to_back_dispatches_wait_for_landing() {
        let ledger = ScriptedLedger::landing_after(7, 2);
        let (dispatcher, _) = dispatcher(ledger.clone(), DispatchConfig::default());
        let first = dispatcher.dispatch(wallet(), entries(1), jetton()).unwrap();
        let second = dispatcher.dispatch(wallet(), entries(1), jetton()).unwrap();

        let (a, b) = tokio::join!(first.run(false), second.run(false));
        a.unwrap();
        b.unwrap();

        assert_eq!(ledger.submitted_seqnos(), vec![7, 8]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_inflight_batches_within_dispatch() {
        let ledger = ScriptedLedger::landing_after(0, 3);
        let config = DispatchConfig {
            batch_size: 1,
            ..Default::default()
        };
        let (dispatcher, _) = dispatcher(ledger.clone(), config);
        let summary = dispatcher
            .dispatch(wallet(), entries(3), jetton())
            .unwrap()
            .run(true)
            .await
            .unwrap();

        assert_eq!(ledger.submitted_seqnos(), vec![0, 1, 2]);
        assert_eq!(summary.confirmed_seqno, Some(SequenceNumber::new(3)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_next_keeps_batch() {
        let ledger = ScriptedLedger::new(0);
        let config = DispatchConfig {
            batch_size: 1,
            ..Default::default()
        };
        let (dispatcher, locks) = dispatcher(ledger.clone(), config);
        let mut dispatch = dispatcher.dispatch(wallet(), entries(3), jetton()).unwrap();

        let held = locks.acquire(&addr(0xAA)).await;
        let cancelled = tokio::time::timeout(Duration::from_millis(10), dispatch.next()).await;
        assert!(cancelled.is_err());
        assert_eq!(dispatch.remaining(), 3);
        drop(held);

        let mut indices = Vec::new();
        while let Some(result) = dispatch.next().await {
            indices.push(result.unwrap().batch_index);
        }
        assert_eq!(indices, vec![0, 1, 2]);
        assert_eq!(ledger.submissions().len(), 3);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let ledger = ScriptedLedger::new(0);
        let config = DispatchConfig {
            batch_size: 300,
            ..Default::default()
        };
        assert!(BatchDispatcher::new(ledger, Arc::new(SenderLocks::new()), config).is_err());
    }
}
