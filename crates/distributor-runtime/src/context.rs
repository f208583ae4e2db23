//! # Engine Context
//!
//! Owns everything an operation needs: validated configuration, the shared
//! ledger client, per-sender locks, the operator wallet and the component
//! services built on top of them.
//!
//! ```text
//! init (validate config, build signer, wire services) → use → drop
//! ```
//!
//! There is no global state; two contexts over the same ledger client must
//! share one [`SenderLocks`] if they use the same wallet.

use anyhow::Context as _;
use std::sync::Arc;
use tracing::info;

use ld_01_content_encoding::MetadataEncoder;
use ld_04_batch_dispatch::BatchDispatcher;
use ld_05_deployment::DeploymentPoller;
use shared_types::{LedgerClient, SenderLocks, WalletAccount};

use crate::config::{ConfigError, RuntimeConfig};
use crate::credentials::{resolve_seed, SecretSeed};
use crate::errors::RuntimeError;
use crate::signer::Ed25519Signer;

pub struct EngineContext {
    pub(crate) config: RuntimeConfig,
    pub(crate) ledger: Arc<dyn LedgerClient>,
    pub(crate) wallet: WalletAccount,
    pub(crate) encoder: MetadataEncoder,
    pub(crate) dispatcher: BatchDispatcher,
    pub(crate) poller: DeploymentPoller,
}

impl EngineContext {
    /// Wire a context from explicit parts.
    pub fn init(
        config: RuntimeConfig,
        ledger: Arc<dyn LedgerClient>,
        locks: Arc<SenderLocks>,
        seed: &SecretSeed,
    ) -> Result<Self, RuntimeError> {
        config.validate()?;
        let wallet_address = config
            .network
            .wallet_address
            .ok_or(ConfigError::Missing("LD_WALLET_ADDRESS"))?;

        let signer = Ed25519Signer::from_seed(seed);
        info!(
            network = %config.network.network,
            wallet = %wallet_address,
            public_key = %hex::encode(signer.verifying_key().to_bytes()),
            "Operator wallet loaded"
        );
        let wallet = WalletAccount::new(wallet_address, config.network.wallet_id, Arc::new(signer));

        let dispatcher = BatchDispatcher::new(ledger.clone(), locks.clone(), config.dispatch.clone())?;
        let poller = DeploymentPoller::new(ledger.clone(), locks, config.deployment.clone());

        Ok(Self {
            config,
            ledger,
            wallet,
            encoder: MetadataEncoder::default(),
            dispatcher,
            poller,
        })
    }

    /// Load configuration and credentials from the environment.
    pub fn bootstrap_from_env(ledger: Arc<dyn LedgerClient>) -> anyhow::Result<Self> {
        let config = RuntimeConfig::from_env().context("Invalid runtime configuration")?;
        let seed = resolve_seed(&config.credentials, config.network.network, |key| {
            std::env::var(key).ok()
        })
        .context("Failed to resolve operator credentials")?;

        Self::init(config, ledger, Arc::new(SenderLocks::new()), &seed)
            .context("Failed to initialize engine context")
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn wallet(&self) -> &WalletAccount {
        &self.wallet
    }

    pub fn ledger(&self) -> &Arc<dyn LedgerClient> {
        &self.ledger
    }

    pub fn encoder(&self) -> &MetadataEncoder {
        &self.encoder
    }

    pub fn dispatcher(&self) -> &BatchDispatcher {
        &self.dispatcher
    }

    pub fn poller(&self) -> &DeploymentPoller {
        &self.poller
    }
}
