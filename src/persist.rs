use crate::transaction::Transaction;
use crate::transaction::TransactionId;
use crate::transaction::TransactionKind;
use crate::types::Item;

/// A single write the reducer wants to see in the backend. Produced by [`Ledger`](crate::ledger::Ledger)
/// operations, consumed by [`WriteBehind`](crate::write_behind::WriteBehind).
#[derive(Clone, Debug, PartialEq)]
pub enum Persist {
    UpsertItems(Vec<Item>),
    InsertTransaction(Transaction),
    UpdateTransactionKind { id: TransactionId, kind: TransactionKind },
}

impl Persist {
    pub fn is_catalog(&self) -> bool {
        matches!(self, Persist::UpsertItems(_))
    }
}

/// Outcome of a reducer operation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Changes {
    /// Transactions recorded by the operation, in the order they were appended.
    pub recorded: Vec<Transaction>,
    pub persist:  Vec<Persist>,
}

impl Changes {
    pub fn none() -> Self {
        Self::default()
    }

    pub(crate) fn upsert(&mut self, items: &[Item]) {
        self.persist.push(Persist::UpsertItems(items.to_vec()));
    }

    pub(crate) fn record(&mut self, tx: Transaction) {
        self.persist.push(Persist::InsertTransaction(tx.clone()));
        self.recorded.push(tx);
    }

    pub(crate) fn relabel(&mut self, id: TransactionId, kind: TransactionKind) {
        if let Some(tx) = self.recorded.iter_mut().find(|tx| tx.id == id) {
            tx.kind = kind;
        }
        self.persist.push(Persist::UpdateTransactionKind { id, kind });
    }

    pub fn is_empty(&self) -> bool {
        self.recorded.is_empty() && self.persist.is_empty()
    }
}
