//! Outbound ports for the distribution subsystem

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use shared_types::{Address, LedgerError};

/// One collection item as reported by the index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexedItem {
    pub index: u64,
    /// `None` while the item is unowned (e.g. not yet sold).
    pub owner: Option<Address>,
}

/// Paginated read access to a collection's items.
#[async_trait]
pub trait HolderIndex: Send + Sync {
    /// Items `offset..offset + limit` of `collection`. An empty page means
    /// the end was reached.
    async fn items_page(
        &self,
        collection: &Address,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<IndexedItem>, LedgerError>;
}
