//! Cross-crate integration scenarios.

pub mod content_to_address;
pub mod deployment_flow;
pub mod distribution_flow;

#[cfg(test)]
pub(crate) mod fixtures {
    use distributor_runtime::adapters::InMemoryLedger;
    use distributor_runtime::{EngineContext, RuntimeConfig, SecretSeed};
    use shared_types::{Address, Cell, CellBuilder, SenderLocks};
    use std::sync::Arc;

    pub const WALLET: Address = Address::new(0, [0xAA; 32]);

    pub fn address(n: u32) -> Address {
        let mut hash = [0u8; 32];
        hash[..4].copy_from_slice(&n.to_be_bytes());
        Address::new(0, hash)
    }

    pub fn cell(tag: u32) -> Cell {
        let mut b = CellBuilder::new();
        b.store_uint(u128::from(tag), 32).unwrap();
        b.build().unwrap()
    }

    pub fn context_with(ledger: Arc<InMemoryLedger>, config: RuntimeConfig) -> EngineContext {
        let mut config = config;
        config.network.wallet_address = Some(WALLET);
        EngineContext::init(
            config,
            ledger,
            Arc::new(SenderLocks::new()),
            &SecretSeed::from_bytes([0x11; 32]),
        )
        .unwrap()
    }

    pub fn context(ledger: Arc<InMemoryLedger>) -> EngineContext {
        context_with(ledger, RuntimeConfig::default())
    }
}
