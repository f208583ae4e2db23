//! # Holder Snapshot Capture
//!
//! Walks a collection through the [`HolderIndex`] page by page and counts
//! items per owner. Unowned items are skipped but reported.

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use shared_types::Address;

use crate::config::DistributionConfig;
use crate::domain::{DistributionError, HolderSnapshot};
use crate::ports::HolderIndex;

/// Result of one capture run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureReport {
    pub snapshot: HolderSnapshot,
    /// Items returned by the index across all pages
    pub items_seen: usize,
    /// Items without an owner, left out of the snapshot
    pub unowned: usize,
    /// Page requests issued, including the final empty one
    pub pages: usize,
}

/// Builds holder snapshots from a paginated index.
pub struct SnapshotCapture {
    index: Arc<dyn HolderIndex>,
    page_size: usize,
    page_delay: Duration,
}

impl SnapshotCapture {
    pub fn new(index: Arc<dyn HolderIndex>, config: &DistributionConfig) -> Self {
        Self {
            index,
            page_size: config.page_size.max(1),
            page_delay: config.page_delay,
        }
    }

    /// Read every item of `collection` and fold owners into a snapshot.
    pub async fn capture(&self, collection: &Address) -> Result<CaptureReport, DistributionError> {
        let mut snapshot = HolderSnapshot::new();
        let mut offset = 0usize;
        let mut unowned = 0usize;
        let mut pages = 0usize;

        loop {
            let page = self
                .index
                .items_page(collection, offset, self.page_size)
                .await
                .map_err(|source| DistributionError::Index { offset, source })?;
            pages += 1;

            if page.is_empty() {
                break;
            }

            debug!(
                collection = %collection,
                offset,
                items = page.len(),
                "Fetched holder index page"
            );

            offset += page.len();
            for item in page {
                match item.owner {
                    Some(owner) => snapshot.add(owner, 1),
                    None => unowned += 1,
                }
            }

            tokio::time::sleep(self.page_delay).await;
        }

        info!(
            collection = %collection,
            holders = snapshot.len(),
            items = offset,
            unowned,
            "Captured holder snapshot"
        );

        Ok(CaptureReport {
            snapshot,
            items_seen: offset,
            unowned,
            pages,
        })
    }
}
