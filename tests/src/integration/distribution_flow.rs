//! # Distribution Flow
//!
//! Holder index → snapshot → payout table → batched token transfers, run
//! through the engine context against the in-memory ledger.

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use distributor_runtime::adapters::{InMemoryHolderIndex, InMemoryLedger};
    use distributor_runtime::{RuntimeConfig, RuntimeError};
    use ld_03_distribution::{Allocation, HolderSnapshot, IndexedItem};
    use ld_04_batch_dispatch::{BatchMode, DispatchError, JettonTransfer, JettonTransferEncoder};
    use shared_types::{
        AccountState, Address, LedgerClient, LedgerError, SequenceNumber, SignedTransfer,
        NANO_PER_COIN,
    };
    use std::collections::BTreeMap;
    use std::sync::Arc;

    use super::super::fixtures::{address, context_with, WALLET};

    const COLLECTION: Address = Address::new(0, [0xC0; 32]);
    const JETTON_WALLET: Address = Address::new(0, [0xEE; 32]);

    fn config(mode: BatchMode) -> RuntimeConfig {
        let mut config = RuntimeConfig::default();
        config.dispatch.mode = mode;
        config.distribution.allocation = Allocation::new(1, 10);
        config.distribution.page_size = 100;
        config
    }

    /// Items 0..514 owned two each by 257 holders, plus three unowned items.
    fn index() -> Arc<InMemoryHolderIndex> {
        let mut owners: Vec<Option<Address>> =
            (0..514u32).map(|i| Some(address(i / 2 + 1))).collect();
        owners.extend([None, None, None]);
        Arc::new(InMemoryHolderIndex::with_owners(COLLECTION, &owners))
    }

    #[tokio::test(start_paused = true)]
    async fn test_every_holder_paid_exactly_once() {
        let ledger = Arc::new(InMemoryLedger::new());
        ledger.fund(WALLET, 100 * NANO_PER_COIN);
        let ctx = context_with(ledger.clone(), config(BatchMode::BestEffort));

        let report = ctx.capture_holders(index(), &COLLECTION).await.unwrap();
        assert_eq!(report.snapshot.len(), 257);
        assert_eq!(report.unowned, 3);
        assert_eq!(report.pages, 7);

        // 5_140_000 / 10 = 514_000 over 514 units
        let run = ctx
            .compute_and_submit(
                &report.snapshot,
                5_140_000,
                Arc::new(JettonTransferEncoder::new(JETTON_WALLET)),
            )
            .await
            .unwrap();
        assert_eq!(run.table.per_unit, 1000);

        let accepted = ledger.accepted();
        assert_eq!(accepted.len(), 2);
        assert_eq!(accepted[0].request.messages.len(), 255);
        assert_eq!(accepted[1].request.messages.len(), 2);
        assert!(accepted[0].request.seqno < accepted[1].request.seqno);

        let mut paid: BTreeMap<Address, u128> = BTreeMap::new();
        for transfer in &accepted {
            assert_eq!(transfer.request.send_mode.bits(), 3);
            for message in &transfer.request.messages {
                assert_eq!(message.destination, JETTON_WALLET);
                let body = JettonTransfer::from_cell(message.body.as_ref().unwrap()).unwrap();
                assert!(paid.insert(body.destination, body.amount).is_none());
            }
        }
        assert_eq!(paid, run.table.entries);
        assert!(paid.values().all(|&amount| amount == 2000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_strict_mode_send_flags() {
        let ledger = Arc::new(InMemoryLedger::new());
        ledger.fund(WALLET, 100 * NANO_PER_COIN);
        let ctx = context_with(ledger.clone(), config(BatchMode::Strict));
        let snapshot: HolderSnapshot = [(address(1), 1), (address(2), 3)].into_iter().collect();

        ctx.compute_and_submit(
            &snapshot,
            4000,
            Arc::new(JettonTransferEncoder::new(JETTON_WALLET)),
        )
        .await
        .unwrap();

        assert_eq!(ledger.accepted()[0].request.send_mode.bits(), 1);
    }

    /// Rejects submissions that use one particular sequence number.
    struct RejectingLedger {
        inner: InMemoryLedger,
        reject_seqno: u32,
    }

    #[async_trait]
    impl LedgerClient for RejectingLedger {
        async fn get_sequence_number(
            &self,
            account: &Address,
        ) -> Result<SequenceNumber, LedgerError> {
            self.inner.get_sequence_number(account).await
        }

        async fn submit_transaction(&self, transfer: &SignedTransfer) -> Result<(), LedgerError> {
            if transfer.request.seqno.value() == self.reject_seqno {
                return Err(LedgerError::Rejected("out of gas".to_string()));
            }
            self.inner.submit_transaction(transfer).await
        }

        async fn read_account_state(&self, address: &Address) -> Result<AccountState, LedgerError> {
            self.inner.read_account_state(address).await
        }

        async fn is_contract_deployed(&self, address: &Address) -> Result<bool, LedgerError> {
            self.inner.is_contract_deployed(address).await
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_rejected_batch_surfaces_position() {
        let inner = InMemoryLedger::new();
        inner.fund(WALLET, 100 * NANO_PER_COIN);
        let ledger = Arc::new(RejectingLedger {
            inner,
            reject_seqno: 1,
        });

        let mut runtime_config = config(BatchMode::BestEffort);
        runtime_config.network.wallet_address = Some(WALLET);
        let ctx = distributor_runtime::EngineContext::init(
            runtime_config,
            ledger.clone(),
            Arc::new(shared_types::SenderLocks::new()),
            &distributor_runtime::SecretSeed::from_bytes([0x11; 32]),
        )
        .unwrap();

        let snapshot: HolderSnapshot = (1..=600u32).map(|i| (address(i), 1)).collect();
        let err = ctx
            .compute_and_submit(
                &snapshot,
                6_000_000,
                Arc::new(JettonTransferEncoder::new(JETTON_WALLET)),
            )
            .await
            .unwrap_err();

        match err {
            RuntimeError::Dispatch(DispatchError::Submission {
                batch_index,
                seqno,
                sender,
                ..
            }) => {
                assert_eq!(batch_index, 1);
                assert_eq!(seqno, 1);
                assert_eq!(sender, WALLET);
            }
            other => panic!("unexpected error: {other}"),
        }
        // Batch 0 landed, batch 2 was never attempted
        assert_eq!(ledger.inner.accepted().len(), 1);
        assert_eq!(ledger.inner.seqno_of(&WALLET), 1);
    }

    #[tokio::test]
    async fn test_empty_collection_is_zero_holders() {
        let ledger = Arc::new(InMemoryLedger::new());
        let ctx = context_with(ledger, config(BatchMode::BestEffort));
        let index = Arc::new(InMemoryHolderIndex::new());
        index.set_items(
            COLLECTION,
            vec![IndexedItem {
                index: 0,
                owner: None,
            }],
        );

        let report = ctx.capture_holders(index, &COLLECTION).await.unwrap();
        assert!(report.snapshot.is_empty());

        let err = ctx.compute_and_log(&report.snapshot, 1000).unwrap_err();
        assert!(matches!(
            err,
            RuntimeError::Distribution(ld_03_distribution::DistributionError::ZeroHolders)
        ));
    }
}
