use async_trait::async_trait;
use std::fmt::Debug;

use crate::error::Result;
use crate::transaction::TransactionId;
use crate::transaction::TransactionKind;
use crate::transaction::TransactionRow;
use crate::types::Item;

/// Backend holding the item catalog. Items are keyed by [`Item::id`].
#[async_trait]
pub trait CatalogStore: Debug + Send + Sync + 'static {
    /// All items, ordered by name.
    async fn list(&self) -> Result<Vec<Item>>;
    /// Insert or overwrite by id.
    async fn upsert(&self, items: &[Item]) -> Result<()>;
    /// Plain insert used to seed an empty catalog. Fails on conflicting ids.
    async fn insert_initial(&self, items: &[Item]) -> Result<()>;
}

/// Backend holding the transaction log.
#[async_trait]
pub trait LedgerStore: Debug + Send + Sync + 'static {
    /// Up to `limit` rows, newest first.
    async fn list_recent(&self, limit: u64) -> Result<Vec<TransactionRow>>;
    async fn insert(&self, row: TransactionRow) -> Result<()>;
    async fn update_kind(&self, id: &TransactionId, kind: TransactionKind) -> Result<()>;
}
