//! [`CatalogStore`](crate::traits::CatalogStore) and [`LedgerStore`](crate::traits::LedgerStore) implementations.
pub mod db;
pub mod memory;
