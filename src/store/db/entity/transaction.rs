use sea_orm::entity::prelude::*;
use serde::Deserialize;
use serde::Serialize;

use crate::transaction::TransactionRow;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "transactions")]
#[serde(deny_unknown_fields)]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id:        String,
    // Kept as plain text so that rows with unexpected values can still be read and reported.
    #[sea_orm(column_name = "type")]
    #[serde(rename = "type")]
    pub kind:      String,
    pub item_name: String,
    pub item_size: String,
    pub quantity:  i64,
    pub timestamp: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<TransactionRow> for Model {
    fn from(row: TransactionRow) -> Self {
        Self {
            id:        row.id,
            kind:      row.kind,
            item_name: row.item_name,
            item_size: row.item_size,
            quantity:  row.quantity,
            timestamp: row.timestamp,
        }
    }
}

impl From<Model> for TransactionRow {
    fn from(model: Model) -> Self {
        Self {
            id:        model.id,
            kind:      model.kind,
            item_name: model.item_name,
            item_size: model.item_size,
            quantity:  model.quantity,
            timestamp: model.timestamp,
        }
    }
}
