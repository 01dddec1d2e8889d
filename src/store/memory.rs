use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;

use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::instrument;

use crate::error::LedgerError;
use crate::error::Result;
use crate::traits::CatalogStore;
use crate::traits::LedgerStore;
use crate::transaction::TransactionId;
use crate::transaction::TransactionKind;
use crate::transaction::TransactionRow;
use crate::types::Item;

/// Both stores kept in process memory. Availability can be switched off to simulate a backend outage.
#[derive(Debug)]
pub struct MemoryStore {
    items:     Mutex<Vec<Item>>,
    rows:      Mutex<Vec<TransactionRow>>,
    available: AtomicBool,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            items:     Mutex::new(Vec::new()),
            rows:      Mutex::new(Vec::new()),
            available: AtomicBool::new(true),
        }
    }

    pub fn with_items(items: Vec<Item>) -> Self {
        let store = Self::new();
        *store.items.lock() = items;
        store
    }

    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Current catalog content, in insertion order.
    pub fn items(&self) -> Vec<Item> {
        self.items.lock().clone()
    }

    /// Current ledger content, in insertion order.
    pub fn rows(&self) -> Vec<TransactionRow> {
        self.rows.lock().clone()
    }

    pub fn push_row(&self, row: TransactionRow) {
        self.rows.lock().push(row);
    }

    fn check(&self) -> Result<()> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        }
        else {
            Err(LedgerError::Unavailable("memory store is switched off".to_string()))
        }
    }
}

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn list(&self) -> Result<Vec<Item>> {
        self.check()?;
        let mut items = self.items();
        items.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(items)
    }

    #[instrument(level = "trace", skip(self, items), fields(count = items.len()))]
    async fn upsert(&self, items: &[Item]) -> Result<()> {
        self.check()?;
        let mut stored = self.items.lock();
        for item in items {
            match stored.iter_mut().find(|i| i.id == item.id) {
                Some(existing) => *existing = item.clone(),
                None => stored.push(item.clone()),
            }
        }
        Ok(())
    }

    async fn insert_initial(&self, items: &[Item]) -> Result<()> {
        self.check()?;
        let mut stored = self.items.lock();
        if let Some(dup) = items.iter().find(|i| stored.iter().any(|s| s.id == i.id)) {
            return Err(LedgerError::DuplicateItem(dup.id.to_string()));
        }
        stored.extend(items.iter().cloned());
        Ok(())
    }
}

#[async_trait]
impl LedgerStore for MemoryStore {
    async fn list_recent(&self, limit: u64) -> Result<Vec<TransactionRow>> {
        self.check()?;
        let mut rows = self.rows();
        // Stable sort keeps insertion order for equal timestamps, reversed to put the later insert first.
        rows.reverse();
        rows.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        rows.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        Ok(rows)
    }

    async fn insert(&self, row: TransactionRow) -> Result<()> {
        self.check()?;
        self.rows.lock().push(row);
        Ok(())
    }

    async fn update_kind(&self, id: &TransactionId, kind: TransactionKind) -> Result<()> {
        self.check()?;
        if let Some(row) = self.rows.lock().iter_mut().find(|r| r.id == id.as_str()) {
            row.kind = kind.to_string();
        }
        Ok(())
    }
}
