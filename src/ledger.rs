//! The in-memory mirror of the catalog and the transaction log, and the rules by which stock operations change
//! them.
//!
//! Operations never touch a backend. Each returns [`Changes`]: the transactions it appended and the
//! [`Persist`](crate::persist::Persist) commands that would bring a backend in line with the new state.
//! Whoever owns the ledger decides when, and whether, to send those commands on.

use std::collections::HashMap;
use std::collections::VecDeque;

use tracing::debug;

use crate::persist::Changes;
use crate::transaction::Transaction;
use crate::transaction::TransactionKind;
use crate::types::Item;
use crate::types::ItemId;
use crate::types::ReturnMode;
use crate::types::StockOutEntry;
use crate::types::Summary;

/// Catalog used when the Catalog Store turns out to be empty.
pub fn default_catalog() -> Vec<Item> {
    [
        ("Joto", "1kg", 100),
        ("Joto", "2kg", 80),
        ("Stocklick", "1kg", 50),
        ("Stocklick", "2kg", 50),
        ("Stocklick", "5kg", 50),
        ("Stocklick", "10kg", 50),
        ("Stocklick", "20kg", 30),
        ("Stocklick", "50kg", 20),
        ("Maziwa", "1kg", 150),
        ("Maziwa", "2kg", 120),
        ("Maziwa", "5kg", 100),
        ("Maziwa", "10kg", 60),
        ("Maziwa", "20kg", 40),
        ("Magadi", "2kg", 150),
    ]
    .into_iter()
    .map(|(name, size, quantity)| Item::new(name, size, quantity))
    .collect()
}

#[derive(Clone, Debug, Default)]
pub struct Ledger {
    // Display order is the order of first appearance. Ids are unique.
    items:       Vec<Item>,
    // Newest first.
    log:         VecDeque<Transaction>,
    return_mode: ReturnMode,
}

impl Ledger {
    pub fn new(return_mode: ReturnMode) -> Self {
        Self {
            items: Vec::new(),
            log: VecDeque::new(),
            return_mode,
        }
    }

    /// Build a ledger from stored state. Items with an id already seen are dropped, the first one wins. `log` is
    /// expected newest first.
    pub fn from_parts(items: Vec<Item>, log: Vec<Transaction>, return_mode: ReturnMode) -> Self {
        let mut ledger = Self::new(return_mode);
        ledger.replace_items(items);
        ledger.log = log.into();
        ledger
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn log(&self) -> impl ExactSizeIterator<Item = &Transaction> + DoubleEndedIterator {
        self.log.iter()
    }

    pub fn return_mode(&self) -> ReturnMode {
        self.return_mode
    }

    pub fn get(&self, id: &ItemId) -> Option<&Item> {
        self.items.iter().find(|item| &item.id == id)
    }

    fn get_mut(&mut self, id: &ItemId) -> Option<&mut Item> {
        self.items.iter_mut().find(|item| &item.id == id)
    }

    pub(crate) fn replace_items(&mut self, items: Vec<Item>) {
        self.items.clear();
        for item in items {
            if self.get(&item.id).is_some() {
                debug!("dropping duplicate item '{}'", item.id);
                continue;
            }
            self.items.push(item);
        }
    }

    pub(crate) fn replace_log(&mut self, log: Vec<Transaction>) {
        self.log = log.into();
    }

    /// The `n` newest transactions.
    pub fn recent(&self, n: usize) -> Vec<Transaction> {
        self.log.iter().take(n).cloned().collect()
    }

    pub fn summary(&self) -> Summary {
        let mut names = self.items.iter().map(|i| i.name.as_str()).collect::<Vec<_>>();
        names.sort_unstable();
        names.dedup();

        Summary {
            total_units:   self.items.iter().map(|i| u64::from(i.quantity)).sum(),
            product_names: names.len(),
            out_of_stock:  self.items.iter().filter(|i| i.quantity == 0).count(),
        }
    }

    pub fn search_items(&self, query: &str) -> Vec<Item> {
        self.items.iter().filter(|i| i.matches(query)).cloned().collect()
    }

    pub fn search_log(&self, query: &str) -> Vec<Transaction> {
        self.log.iter().filter(|t| t.matches(query)).cloned().collect()
    }

    fn append(&mut self, changes: &mut Changes, tx: Transaction) {
        debug!(
            "recording {} of {} {} ({})",
            tx.kind, tx.quantity, tx.item_name, tx.item_size
        );
        self.log.push_front(tx.clone());
        changes.record(tx);
    }

    // Shared by stock-in and returns.
    fn receive(&mut self, name: &str, size: &str, quantity: u32) {
        let id = ItemId::derive(name, size);
        if let Some(item) = self.get_mut(&id) {
            item.quantity = item.quantity.saturating_add(quantity);
        }
        else {
            self.items.push(Item {
                id,
                name: name.to_string(),
                size: size.to_string(),
                quantity,
            });
        }
    }

    pub fn stock_in(&mut self, name: &str, size: &str, quantity: u32) -> Changes {
        let mut changes = Changes::none();
        self.receive(name, size, quantity);
        changes.upsert(&self.items);
        self.append(
            &mut changes,
            Transaction::record_for(TransactionKind::StockIn, name, size, quantity),
        );
        changes
    }

    pub fn batch_stock_out(&mut self, entries: &[StockOutEntry]) -> Changes {
        let mut changes = Changes::none();

        // Name and size are taken before anything is modified.
        let originals = entries
            .iter()
            .filter_map(|e| self.get(&e.item_id).map(|i| (e.item_id.clone(), (i.name.clone(), i.size.clone()))))
            .collect::<HashMap<_, _>>();

        let mut applied = Vec::with_capacity(entries.len());
        for entry in entries {
            if entry.quantity == 0 {
                continue;
            }
            let Some(item) = self.get_mut(&entry.item_id)
            else {
                debug!("stock-out skips unknown item '{}'", entry.item_id);
                continue;
            };
            item.quantity = item.quantity.saturating_sub(entry.quantity);
            applied.push(entry);
        }

        changes.upsert(&self.items);

        for entry in applied {
            if let Some((name, size)) = originals.get(&entry.item_id) {
                self.append(
                    &mut changes,
                    Transaction::record_for(TransactionKind::StockOut, name, size, entry.quantity),
                );
            }
        }

        changes
    }

    pub fn process_return(&mut self, name: &str, size: &str, quantity: u32) -> Changes {
        match self.return_mode {
            ReturnMode::FirstClass => {
                let mut changes = Changes::none();
                self.receive(name, size, quantity);
                changes.upsert(&self.items);
                self.append(
                    &mut changes,
                    Transaction::record_for(TransactionKind::Return, name, size, quantity),
                );
                changes
            }
            ReturnMode::Relabel => {
                let mut changes = self.stock_in(name, size, quantity);
                let latest = self
                    .log
                    .iter_mut()
                    .find(|tx| tx.kind == TransactionKind::StockIn && tx.is_for(name, size));
                if let Some(tx) = latest {
                    tx.kind = TransactionKind::Return;
                    let id = tx.id.clone();
                    changes.relabel(id, TransactionKind::Return);
                }
                changes
            }
        }
    }

    pub fn adjust_stock(&mut self, item_id: &ItemId, quantity_to_remove: u32) -> Changes {
        let mut changes = Changes::none();

        let Some(item) = self.get_mut(item_id)
        else {
            debug!("adjustment of unknown item '{item_id}' ignored");
            return changes;
        };
        item.quantity = item.quantity.saturating_sub(quantity_to_remove);
        let (name, size) = (item.name.clone(), item.size.clone());

        changes.upsert(&self.items);

        if quantity_to_remove > 0 {
            self.append(
                &mut changes,
                Transaction::record_for(TransactionKind::Adjustment, &name, &size, quantity_to_remove),
            );
        }

        changes
    }
}
