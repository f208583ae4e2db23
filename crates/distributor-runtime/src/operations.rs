//! # Engine Operations
//!
//! The named operations an operator runs against an [`EngineContext`].
//!
//! - `compute_and_log` computes a payout table and only logs it.
//! - `compute_and_submit` computes the same table and dispatches it.
//! - `deploy` / `deploy_to_expected` put a program on the ledger and wait
//!   for it.
//! - `mint_batch` sends one mint request per item to a collection.

use std::sync::Arc;
use tracing::{debug, info, warn};

use ld_01_content_encoding::{ContentEncodingApi, MetadataPayload};
use ld_02_address_derivation::derive_address;
use ld_03_distribution::{
    calculate, is_due, next_distribution_time, CaptureReport, DistributionTable, HolderIndex,
    HolderSnapshot, SnapshotCapture,
};
use ld_04_batch_dispatch::{
    DispatchSummary, NativeTransferEncoder, TransferEncoder, TransferEntry,
};
use ld_05_deployment::DeploymentReceipt;
use ledger_telemetry::{log_batch_event, log_deploy_event, log_event};
use shared_types::{Address, Amount, Cell, InitPayload};

use crate::context::EngineContext;
use crate::errors::RuntimeError;

/// Result of `compute_and_submit`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistributionRun {
    pub table: DistributionTable,
    /// `None` when nobody had anything to receive.
    pub summary: Option<DispatchSummary>,
}

impl EngineContext {
    /// Encode token or collection metadata as on-chain content.
    pub fn encode_content(&self, payload: &MetadataPayload) -> Result<Cell, RuntimeError> {
        Ok(self.encoder.encode_metadata(payload)?)
    }

    /// Address `init` will occupy on the configured workchain.
    pub fn predict_address(&self, init: &InitPayload) -> Result<Address, RuntimeError> {
        Ok(derive_address(self.config.deployment.workchain, init)?)
    }

    /// Deploy `init` from the operator wallet and wait for it.
    pub async fn deploy(
        &self,
        init: &InitPayload,
        value: Amount,
        body: Option<Cell>,
    ) -> Result<DeploymentReceipt, RuntimeError> {
        let receipt = self
            .poller
            .deploy_and_confirm(&self.wallet, init, value, body, self.config.deployment.timeout)
            .await?;
        log_deploy_event!(
            info,
            "Program deployed",
            receipt.address,
            seqno = receipt.seqno.value(),
            attempts = receipt.attempts
        );
        Ok(receipt)
    }

    /// Deploy only if `init` derives to `expected`.
    pub async fn deploy_to_expected(
        &self,
        init: &InitPayload,
        expected: &Address,
        value: Amount,
        body: Option<Cell>,
    ) -> Result<DeploymentReceipt, RuntimeError> {
        let receipt = self
            .poller
            .deploy_to_expected(
                &self.wallet,
                init,
                expected,
                value,
                body,
                self.config.deployment.timeout,
            )
            .await?;
        log_deploy_event!(
            info,
            "Program deployed at expected address",
            receipt.address,
            seqno = receipt.seqno.value(),
            attempts = receipt.attempts
        );
        Ok(receipt)
    }

    /// Page through `collection` and count items per owner.
    pub async fn capture_holders(
        &self,
        index: Arc<dyn HolderIndex>,
        collection: &Address,
    ) -> Result<CaptureReport, RuntimeError> {
        let report = SnapshotCapture::new(index, &self.config.distribution)
            .capture(collection)
            .await?;
        log_event!(
            info,
            "distribution",
            "Holder snapshot captured",
            holders = report.snapshot.len(),
            items = report.items_seen,
            unowned = report.unowned
        );
        Ok(report)
    }

    /// Earliest start of the next distribution, in Unix milliseconds.
    pub fn next_distribution_time(&self, last_run_ms: u64, now_ms: u64) -> u64 {
        next_distribution_time(last_run_ms, self.config.distribution.period, now_ms)
    }

    pub fn distribution_due(&self, last_run_ms: u64, now_ms: u64) -> bool {
        is_due(last_run_ms, self.config.distribution.period, now_ms)
    }

    /// Compute the payout table for `snapshot` and log it. Touches no ledger.
    pub fn compute_and_log(
        &self,
        snapshot: &HolderSnapshot,
        pool: Amount,
    ) -> Result<DistributionTable, RuntimeError> {
        let table = calculate(snapshot, pool, self.config.distribution.allocation)?;

        log_event!(
            info,
            "distribution",
            "Distribution table computed",
            pool = %pool,
            to_distribute = %table.to_distribute,
            total_units = %table.total_units,
            per_unit = %table.per_unit,
            recipients = table.len(),
            remainder = %table.remainder()
        );
        for (recipient, amount) in &table.entries {
            debug!(recipient = %recipient, amount = %amount, units = snapshot.get(recipient), "Payout");
        }

        if table.is_all_zero() {
            warn!(
                to_distribute = %table.to_distribute,
                total_units = %table.total_units,
                "Pool share too small, every payout is zero"
            );
        } else if table.per_unit < self.config.distribution.min_per_unit {
            warn!(
                per_unit = %table.per_unit,
                floor = %self.config.distribution.min_per_unit,
                "Per-unit payout below floor, consider distributing the rest manually"
            );
        }

        Ok(table)
    }

    /// Compute the payout table and dispatch it from the operator wallet.
    ///
    /// Refuses to start when the wallet cannot cover the value of every
    /// message `encoder` produces.
    pub async fn compute_and_submit(
        &self,
        snapshot: &HolderSnapshot,
        pool: Amount,
        encoder: Arc<dyn TransferEncoder>,
    ) -> Result<DistributionRun, RuntimeError> {
        let table = self.compute_and_log(snapshot, pool)?;

        let transfers: Vec<TransferEntry> = table
            .payouts()
            .map(|(recipient, amount)| TransferEntry::new(recipient, amount))
            .collect();
        if transfers.is_empty() {
            warn!("Nothing to submit");
            return Ok(DistributionRun {
                table,
                summary: None,
            });
        }

        self.ensure_balance(&transfers, encoder.as_ref()).await?;

        let summary = self.drive(transfers, encoder).await?;
        Ok(DistributionRun {
            table,
            summary: Some(summary),
        })
    }

    /// Send `count` mint requests to `collection`, each carrying
    /// `value_per_item` plus gas and `mint_body`.
    pub async fn mint_batch(
        &self,
        collection: Address,
        count: usize,
        value_per_item: Amount,
        mint_body: Cell,
    ) -> Result<DispatchSummary, RuntimeError> {
        let requests: Vec<TransferEntry> = (0..count)
            .map(|_| TransferEntry::new(collection, value_per_item).with_forward_data(mint_body.clone()))
            .collect();
        let encoder: Arc<dyn TransferEncoder> = Arc::new(NativeTransferEncoder::default());
        self.ensure_balance(&requests, encoder.as_ref()).await?;

        self.drive(requests, encoder).await
    }

    /// Check the wallet holds the summed value of every encoded message.
    async fn ensure_balance(
        &self,
        transfers: &[TransferEntry],
        encoder: &dyn TransferEncoder,
    ) -> Result<(), RuntimeError> {
        let gas = self.dispatcher.config().gas_per_transfer;
        let mut required: Amount = 0;
        for entry in transfers {
            required = required.saturating_add(encoder.encode(entry, gas)?.value);
        }
        let messages = transfers.len();

        let available = self.ledger.read_account_state(&self.wallet.address).await?.balance;
        if available < required {
            warn!(
                sender = %self.wallet.address,
                required = %required,
                available = %available,
                "Not enough native balance for the batch"
            );
            return Err(RuntimeError::InsufficientGasBalance {
                messages,
                required,
                available,
            });
        }
        Ok(())
    }

    async fn drive(
        &self,
        transfers: Vec<TransferEntry>,
        encoder: Arc<dyn TransferEncoder>,
    ) -> Result<DispatchSummary, RuntimeError> {
        let mut dispatch = self
            .dispatcher
            .dispatch(self.wallet.clone(), transfers, encoder)?;
        let mut summary = DispatchSummary::default();

        while let Some(result) = dispatch.next().await {
            let batch = result?;
            log_batch_event!(
                info,
                "Batch accepted",
                self.wallet.address,
                batch.batch_index,
                batch.seqno.value(),
                recipients = batch.recipients,
                amount = %batch.total_amount
            );
            summary.record(batch);
        }
        summary.confirmed_seqno = dispatch.await_confirmation().await?;

        info!(
            sender = %self.wallet.address,
            batches = summary.batches.len(),
            recipients = summary.recipients,
            total = %summary.total_amount,
            "Dispatch complete"
        );
        Ok(summary)
    }
}
