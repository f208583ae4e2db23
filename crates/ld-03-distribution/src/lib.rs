//! # Distribution Subsystem
//!
//! Turns a holder snapshot and a pool balance into a proportional payout
//! table.
//!
//! ## Pipeline
//!
//! ```text
//! HolderIndex ──pages──→ SnapshotCapture ──→ HolderSnapshot
//!                                                 │
//!                         pool, Allocation ──→ calculate() ──→ DistributionTable
//! ```
//!
//! ## Guarantees
//!
//! - Integer arithmetic only, widened to 256 bits for `pool * numerator`
//! - `table.total() <= to_distribute`
//! - More units never means a smaller payout
//! - Identical inputs give identical tables (ordered maps throughout)

pub mod algorithms;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

pub use algorithms::{calculate, is_due, next_distribution_time, share_of};
pub use application::{CaptureReport, SnapshotCapture};
pub use config::{DistributionConfig, DEFAULT_DISTRIBUTION_PERIOD, DEFAULT_PAGE_SIZE};
pub use domain::{Allocation, DistributionError, DistributionTable, HolderSnapshot};
pub use ports::{HolderIndex, IndexedItem};
