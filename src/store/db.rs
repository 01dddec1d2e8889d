//! SeaORM backed stores. The catalog lives in the `inventory` table, the ledger in `transactions`.
pub mod driver;
pub mod entity;
pub mod migrations;

use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::sea_query::OnConflict;
use sea_orm::ColumnTrait;
use sea_orm::EntityTrait;
use sea_orm::QueryFilter;
use sea_orm::QueryOrder;
use sea_orm::QuerySelect;
use sea_orm::TransactionTrait;
use sea_orm_migration::MigratorTrait;
use tracing::debug;
use tracing::instrument;

use crate::error::Result;
use crate::traits::CatalogStore;
use crate::traits::LedgerStore;
use crate::transaction::TransactionId;
use crate::transaction::TransactionKind;
use crate::transaction::TransactionRow;
use crate::types::Item;

use driver::DatabaseDriver;
use entity::item;
use entity::transaction;
use entity::Items;
use entity::Transactions;
use migrations::Migrator;

// Keeps multi-row statements below backend parameter limits.
const CHUNK_SIZE: usize = 500;

#[derive(Debug)]
pub struct DbStore<D: DatabaseDriver> {
    driver: Arc<D>,
}

impl<D: DatabaseDriver> DbStore<D> {
    pub fn new(driver: Arc<D>) -> Self {
        Self { driver }
    }

    /// Configure the connection and bring the schema up to date.
    pub async fn prepare(&self) -> Result<()> {
        self.driver.configure().await?;
        Migrator::up(&self.driver.connection(), None).await?;
        debug!("{} schema is up to date", self.driver.name());
        Ok(())
    }

    pub async fn checkpoint(&self) -> Result<()> {
        self.driver.checkpoint().await
    }

    fn active_items(items: &[Item]) -> Vec<item::ActiveModel> {
        items.iter().map(|i| item::ActiveModel::from(item::Model::from(i))).collect()
    }
}

#[async_trait]
impl<D: DatabaseDriver> CatalogStore for DbStore<D> {
    async fn list(&self) -> Result<Vec<Item>> {
        Ok(Items::find()
            .order_by_asc(item::Column::Name)
            .all(&self.driver.connection())
            .await?
            .into_iter()
            .map(Item::from)
            .collect())
    }

    #[instrument(level = "trace", skip(self, items), fields(count = items.len()))]
    async fn upsert(&self, items: &[Item]) -> Result<()> {
        if items.is_empty() {
            return Ok(());
        }

        let db_conn = self.driver.connection();
        let transaction = db_conn.begin().await?;

        for chunk in items.chunks(CHUNK_SIZE) {
            Items::insert_many(Self::active_items(chunk))
                .on_conflict(
                    OnConflict::column(item::Column::Id)
                        .update_columns([item::Column::Name, item::Column::Size, item::Column::Quantity])
                        .to_owned(),
                )
                .exec_without_returning(&transaction)
                .await?;
        }

        transaction.commit().await?;
        Ok(())
    }

    #[instrument(level = "trace", skip(self, items), fields(count = items.len()))]
    async fn insert_initial(&self, items: &[Item]) -> Result<()> {
        if items.is_empty() {
            return Ok(());
        }

        let db_conn = self.driver.connection();
        let transaction = db_conn.begin().await?;

        for chunk in items.chunks(CHUNK_SIZE) {
            Items::insert_many(Self::active_items(chunk))
                .exec_without_returning(&transaction)
                .await?;
        }

        transaction.commit().await?;
        Ok(())
    }
}

#[async_trait]
impl<D: DatabaseDriver> LedgerStore for DbStore<D> {
    async fn list_recent(&self, limit: u64) -> Result<Vec<TransactionRow>> {
        Ok(Transactions::find()
            .order_by_desc(transaction::Column::Timestamp)
            .limit(limit)
            .all(&self.driver.connection())
            .await?
            .into_iter()
            .map(TransactionRow::from)
            .collect())
    }

    #[instrument(level = "trace", skip(self, row), fields(id = %row.id))]
    async fn insert(&self, row: TransactionRow) -> Result<()> {
        Transactions::insert(transaction::ActiveModel::from(transaction::Model::from(row)))
            .exec_without_returning(&self.driver.connection())
            .await?;
        Ok(())
    }

    #[instrument(level = "trace", skip(self))]
    async fn update_kind(&self, id: &TransactionId, kind: TransactionKind) -> Result<()> {
        Transactions::update_many()
            .col_expr(transaction::Column::Kind, Expr::value(kind.to_string()))
            .filter(transaction::Column::Id.eq(id.as_str()))
            .exec(&self.driver.connection())
            .await?;
        Ok(())
    }
}
