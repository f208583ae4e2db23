//! # Deployment Flow
//!
//! Deploy through the engine context against the in-memory ledger:
//! successful confirmation, timeout and interaction with batch dispatch on
//! the same wallet.

#[cfg(test)]
mod tests {
    use distributor_runtime::adapters::InMemoryLedger;
    use distributor_runtime::RuntimeError;
    use ld_05_deployment::{DeploymentError, DeploymentState};
    use shared_types::{InitPayload, LedgerClient, SequenceNumber, NANO_PER_COIN};
    use std::sync::atomic::Ordering;
    use std::sync::Arc;

    use super::super::fixtures::{address, cell, context, WALLET};

    #[tokio::test(start_paused = true)]
    async fn test_deploy_records_full_history() {
        let ledger = Arc::new(InMemoryLedger::with_deploy_delay(Some(2)));
        ledger.fund(WALLET, NANO_PER_COIN);
        let ctx = context(ledger.clone());
        let init = InitPayload::new(cell(1), cell(2));

        let receipt = ctx.deploy(&init, 50_000_000, Some(cell(3))).await.unwrap();

        assert_eq!(
            receipt.history,
            vec![
                DeploymentState::PendingSubmit,
                DeploymentState::Submitted,
                DeploymentState::Polling(1),
                DeploymentState::Polling(2),
                DeploymentState::Deployed,
            ]
        );
        assert_eq!(receipt.state_init_hash, receipt.address.hash);

        let message = &ledger.accepted()[0].request.messages[0];
        assert_eq!(message.destination, receipt.address);
        assert!(message.state_init.is_some());
        assert_eq!(message.body, Some(cell(3)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_stops_all_ledger_calls() {
        let ledger = Arc::new(InMemoryLedger::with_deploy_delay(None));
        let ctx = context(ledger.clone());
        let init = InitPayload::new(cell(1), cell(2));

        let started = tokio::time::Instant::now();
        let err = ctx.deploy(&init, 1, None).await.unwrap_err();

        assert!(matches!(
            err,
            RuntimeError::Deployment(DeploymentError::DeploymentTimeout { attempts: 30, .. })
        ));
        assert_eq!(ledger.calls.deployment_checks.load(Ordering::SeqCst), 30);
        assert!(started.elapsed() < std::time::Duration::from_secs(30));

        let calls_after = ledger.calls.total();
        tokio::time::sleep(std::time::Duration::from_secs(60)).await;
        assert_eq!(ledger.calls.total(), calls_after);
    }

    fn accepted_seqnos(ledger: &InMemoryLedger) -> Vec<u32> {
        let mut seqnos: Vec<u32> = ledger
            .accepted()
            .iter()
            .map(|t| t.request.seqno.value())
            .collect();
        seqnos.sort_unstable();
        seqnos
    }

    #[tokio::test(start_paused = true)]
    async fn test_deploy_then_dispatch_share_sequence() {
        // Accepted transactions stay invisible for two seqno reads
        let ledger = Arc::new(InMemoryLedger::new().with_inclusion_after_reads(2));
        ledger.fund(WALLET, 100 * NANO_PER_COIN);
        let ctx = Arc::new(context(ledger.clone()));

        let deploy = {
            let ctx = ctx.clone();
            tokio::spawn(async move {
                ctx.deploy(&InitPayload::new(cell(1), cell(2)), 1, None).await
            })
        };
        let mint = {
            let ctx = ctx.clone();
            tokio::spawn(async move { ctx.mint_batch(address(0xC0), 10, 1, cell(4)).await })
        };

        deploy.await.unwrap().unwrap();
        mint.await.unwrap().unwrap();

        assert_eq!(accepted_seqnos(&ledger), vec![0, 1]);
        ledger.get_sequence_number(&WALLET).await.unwrap();
        let settled = ledger.get_sequence_number(&WALLET).await.unwrap();
        assert_eq!(settled, SequenceNumber::new(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_mints_never_reuse_seqno() {
        let ledger = Arc::new(InMemoryLedger::new().with_inclusion_after_reads(3));
        ledger.fund(WALLET, 1_000 * NANO_PER_COIN);
        let ctx = context(ledger.clone());

        let (large, small) = tokio::join!(
            ctx.mint_batch(address(0xC0), 300, 1, cell(4)),
            ctx.mint_batch(address(0xC1), 10, 1, cell(5)),
        );

        assert_eq!(large.unwrap().batches.len(), 2);
        assert_eq!(small.unwrap().batches.len(), 1);
        assert_eq!(accepted_seqnos(&ledger), vec![0, 1, 2]);
    }
}
