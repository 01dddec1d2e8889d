pub mod item;
pub mod transaction;

pub use item::Entity as Items;
pub use transaction::Entity as Transactions;
