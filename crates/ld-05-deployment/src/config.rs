//! Configuration for deployment

use serde::{Deserialize, Serialize};
use shared_types::{SeqnoPolling, BASECHAIN};
use std::time::Duration;

/// Deployment configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentConfig {
    /// Workchain programs are deployed to
    pub workchain: i32,
    /// Pause between deployment checks
    pub poll_interval: Duration,
    /// Default time to wait for the program to appear
    pub timeout: Duration,
    /// Lifetime of the signed deployment transaction
    pub valid_for: Duration,
    /// Bounce flag of the deployment message
    pub bounce: bool,
    /// Wait for the sender's previous submission before reading a seqno
    pub seqno_polling: SeqnoPolling,
}

impl Default for DeploymentConfig {
    fn default() -> Self {
        Self {
            workchain: BASECHAIN,
            poll_interval: Duration::from_secs(1),
            timeout: Duration::from_secs(30),
            valid_for: Duration::from_secs(60),
            bounce: true,
            seqno_polling: SeqnoPolling::default(),
        }
    }
}

impl DeploymentConfig {
    /// Number of checks that fit in `timeout`, at least one.
    pub fn attempts_for(&self, timeout: Duration) -> u32 {
        if self.poll_interval.is_zero() {
            return 1;
        }
        let attempts = timeout.as_millis() / self.poll_interval.as_millis().max(1);
        u32::try_from(attempts).unwrap_or(u32::MAX).max(1)
    }
}
