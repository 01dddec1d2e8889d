use sea_orm::entity::prelude::*;
use serde::Deserialize;
use serde::Serialize;

use crate::types::Item;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "inventory")]
#[serde(deny_unknown_fields)]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id:       String,
    pub name:     String,
    pub size:     String,
    pub quantity: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Item> for Model {
    fn from(item: &Item) -> Self {
        Self {
            id:       item.id.to_string(),
            name:     item.name.clone(),
            size:     item.size.clone(),
            quantity: i64::from(item.quantity),
        }
    }
}

// Stored quantities outside of u32 range are clamped.
impl From<Model> for Item {
    fn from(model: Model) -> Self {
        Self {
            id:       model.id.into(),
            name:     model.name,
            size:     model.size,
            quantity: u32::try_from(model.quantity.max(0)).unwrap_or(u32::MAX),
        }
    }
}
