use std::fmt::Display;

use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use crate::error::LedgerError;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(String);

impl TransactionId {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for TransactionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TransactionId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for TransactionId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// The four kinds of quantity-changing events. String forms are the ones stored in the `type` column.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::AsRefStr,
)]
pub enum TransactionKind {
    #[strum(serialize = "Stock In")]
    #[serde(rename = "Stock In")]
    StockIn,
    #[strum(serialize = "Stock Out")]
    #[serde(rename = "Stock Out")]
    StockOut,
    #[strum(serialize = "Return")]
    #[serde(rename = "Return")]
    Return,
    #[strum(serialize = "Stock Correction")]
    #[serde(rename = "Stock Correction")]
    Adjustment,
}

/// An audit record. Serializes with the field names the insight prompt uses.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id:        TransactionId,
    #[serde(rename = "type")]
    pub kind:      TransactionKind,
    pub item_name: String,
    pub item_size: String,
    pub quantity:  u32,
    pub timestamp: DateTime<Utc>,
}

impl Transaction {
    pub fn record_for(kind: TransactionKind, name: &str, size: &str, quantity: u32) -> Self {
        Self {
            id: TransactionId::generate(),
            kind,
            item_name: name.to_string(),
            item_size: size.to_string(),
            quantity,
            timestamp: Utc::now(),
        }
    }

    pub fn is_for(&self, name: &str, size: &str) -> bool {
        self.item_name == name && self.item_size == size
    }

    pub fn matches(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.item_name.to_lowercase().contains(&query) || self.item_size.to_lowercase().contains(&query)
    }
}

/// Ledger Store row. Field names follow the table's column names.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRow {
    pub id:        String,
    #[serde(rename = "type")]
    pub kind:      String,
    pub item_name: String,
    pub item_size: String,
    pub quantity:  i64,
    pub timestamp: DateTime<Utc>,
}

impl From<&Transaction> for TransactionRow {
    fn from(tx: &Transaction) -> Self {
        Self {
            id:        tx.id.to_string(),
            kind:      tx.kind.to_string(),
            item_name: tx.item_name.clone(),
            item_size: tx.item_size.clone(),
            quantity:  i64::from(tx.quantity),
            timestamp: tx.timestamp,
        }
    }
}

impl TryFrom<TransactionRow> for Transaction {
    type Error = LedgerError;

    fn try_from(row: TransactionRow) -> Result<Self, Self::Error> {
        let kind = row.kind.parse::<TransactionKind>().map_err(|_| LedgerError::MalformedRow {
            id:     row.id.clone(),
            reason: format!("unknown type '{}'", row.kind),
        })?;
        let quantity = u32::try_from(row.quantity).map_err(|_| LedgerError::MalformedRow {
            id:     row.id.clone(),
            reason: format!("quantity {} out of range", row.quantity),
        })?;

        Ok(Self {
            id: row.id.into(),
            kind,
            item_name: row.item_name,
            item_size: row.item_size,
            quantity,
            timestamp: row.timestamp,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn kind_strings() {
        assert_eq!(TransactionKind::StockIn.to_string(), "Stock In");
        assert_eq!(TransactionKind::Adjustment.to_string(), "Stock Correction");
        for kind in TransactionKind::iter() {
            assert_eq!(kind.to_string().parse::<TransactionKind>().expect("parses back"), kind);
        }
        assert!("Stock Sideways".parse::<TransactionKind>().is_err());
    }

    #[test]
    fn row_translation() {
        let tx = Transaction::record_for(TransactionKind::Return, "Maziwa", "2kg", 5);
        let row = TransactionRow::from(&tx);
        assert_eq!(row.kind, "Return");
        assert_eq!(row.item_name, "Maziwa");

        let json = serde_json::to_value(&row).expect("row serializes");
        assert!(json.get("item_name").is_some());
        assert_eq!(json["type"], "Return");

        let back = Transaction::try_from(row).expect("row converts");
        assert_eq!(back, tx);

        let json = serde_json::to_value(&back).expect("transaction serializes");
        assert!(json.get("itemName").is_some());
        assert_eq!(json["type"], "Return");
    }

    #[test]
    fn malformed_rows_are_rejected() {
        let mut row = TransactionRow::from(&Transaction::record_for(TransactionKind::StockIn, "Joto", "1kg", 1));
        row.kind = "Teleported".to_string();
        assert!(matches!(
            Transaction::try_from(row.clone()),
            Err(LedgerError::MalformedRow { .. })
        ));

        row.kind = "Stock In".to_string();
        row.quantity = -3;
        assert!(matches!(Transaction::try_from(row), Err(LedgerError::MalformedRow { .. })));
    }

    #[test]
    fn ids_are_unique() {
        let a = Transaction::record_for(TransactionKind::StockIn, "Joto", "1kg", 1);
        let b = Transaction::record_for(TransactionKind::StockIn, "Joto", "1kg", 1);
        assert_ne!(a.id, b.id);
    }
}
