//! # stock-ledger
//!
//! Inventory ledger for a small catalog of goods, with write-behind persistence.
//!
//! The authoritative state lives in memory: a list of [`Item`](types::Item)s, each with an on-hand quantity, and
//! a log of [`Transaction`](transaction::Transaction)s, newest first. Four operations change it:
//!
//! | Operation | Quantity | Logged as |
//! | --------- | -------- | --------- |
//! | stock-in | increased, new items created on the fly | `Stock In` |
//! | batch stock-out | decreased per entry, clamped at zero | `Stock Out`, one per entry |
//! | return | increased | `Return` |
//! | adjustment | decreased, clamped at zero | `Stock Correction` |
//!
//! # The Basics
//!
//! - [`Ledger`](ledger::Ledger) is a plain reducer. Its operations never touch a backend; they return the
//!   [`Persist`](persist::Persist) commands that would bring one in line.
//! - [`WriteBehind`](write_behind::WriteBehind) carries those commands to a
//!   [`CatalogStore`](traits::CatalogStore) and a [`LedgerStore`](traits::LedgerStore) from a background task.
//!   Item upserts of a round are coalesced; ledger writes keep their order. Failures are logged and counted, never
//!   retried.
//! - [`Inventory`](inventory::Inventory) ties both together and reconciles the in-memory state with the stores at
//!   startup, seeding an empty catalog with defaults.
//! - Two store implementations are included: [`MemoryStore`](store::memory::MemoryStore) and the SeaORM backed
//!   [`DbStore`](store::db::DbStore) for SQLite and PostgreSQL.
//!
//! ```ignore
//! let store = Arc::new(MemoryStore::new());
//! let inventory = Inventory::open(store.clone(), store, LedgerOptions::builder().build()?).await?;
//! inventory.stock_in("Joto", "1kg", 25);
//! inventory.batch_stock_out(&[StockOutEntry::new("joto-1kg", 10)]);
//! inventory.flush().await?;
//! ```

pub mod app;
pub mod error;
pub mod insight;
pub mod inventory;
pub mod ledger;
pub mod persist;
pub mod store;
pub mod traits;
pub mod transaction;
pub mod types;
pub mod write_behind;

#[doc(inline)]
pub use inventory::Inventory;
#[doc(inline)]
pub use ledger::Ledger;

pub mod prelude {
    pub use crate::error::LedgerError;
    pub use crate::error::Result;
    pub use crate::inventory::Inventory;
    pub use crate::inventory::LedgerOptions;
    pub use crate::ledger::Ledger;
    pub use crate::persist::Changes;
    pub use crate::persist::Persist;
    pub use crate::traits::CatalogStore;
    pub use crate::traits::LedgerStore;
    pub use crate::transaction::*;
    pub use crate::types::*;
}
