//! Configuration for the distribution subsystem

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::domain::Allocation;

/// One week.
pub const DEFAULT_DISTRIBUTION_PERIOD: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Holder index page size.
pub const DEFAULT_PAGE_SIZE: usize = 1000;

/// Distribution configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionConfig {
    /// Share of the pool paid out per run
    pub allocation: Allocation,
    /// Minimum time between two runs
    pub period: Duration,
    /// Items requested per holder index page
    pub page_size: usize,
    /// Pause between holder index pages
    pub page_delay: Duration,
    /// Per-unit payout below which the operator is warned
    pub min_per_unit: u128,
}

impl Default for DistributionConfig {
    fn default() -> Self {
        Self {
            allocation: Allocation::default(),
            period: DEFAULT_DISTRIBUTION_PERIOD,
            page_size: DEFAULT_PAGE_SIZE,
            page_delay: Duration::from_secs(1),
            min_per_unit: 100,
        }
    }
}
