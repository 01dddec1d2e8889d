use std::fmt::Display;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;

use crate::error::LedgerError;

/// Natural key of an [`Item`], derived from its name and size.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    /// Build the identifier the same way for every caller: lower-case both parts, collapse whitespace runs into
    /// a single hyphen, join with a hyphen.
    ///
    /// ```
    /// # use stock_ledger::types::ItemId;
    /// assert_eq!(ItemId::derive("Joto", "1kg").as_str(), "joto-1kg");
    /// assert_eq!(ItemId::derive("Big  Bag", "5 kg").as_str(), "big-bag-5-kg");
    /// ```
    pub fn derive(name: &str, size: &str) -> Self {
        Self(format!("{}-{}", normalize(name), normalize(size)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ItemId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

fn normalize(part: &str) -> String {
    // Leading and trailing whitespace is kept as a hyphen.
    let mut out = String::with_capacity(part.len());
    let mut in_space = false;
    for ch in part.chars() {
        if ch.is_whitespace() {
            if !in_space {
                out.push('-');
                in_space = true;
            }
        }
        else {
            out.extend(ch.to_lowercase());
            in_space = false;
        }
    }
    out
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id:       ItemId,
    pub name:     String,
    pub size:     String,
    pub quantity: u32,
}

impl Item {
    pub fn new<N: ToString, S: ToString>(name: N, size: S, quantity: u32) -> Self {
        let name = name.to_string();
        let size = size.to_string();
        Self {
            id: ItemId::derive(&name, &size),
            name,
            size,
            quantity,
        }
    }

    /// Case-insensitive substring match against name or size.
    pub fn matches(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.name.to_lowercase().contains(&query) || self.size.to_lowercase().contains(&query)
    }
}

/// One line of a batch stock-out request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockOutEntry {
    pub item_id:  ItemId,
    pub quantity: u32,
}

impl StockOutEntry {
    pub fn new<I: Into<ItemId>>(item_id: I, quantity: u32) -> Self {
        Self {
            item_id: item_id.into(),
            quantity,
        }
    }
}

// Command-line form: `joto-1kg=5`.
impl FromStr for StockOutEntry {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (id, qty) = s
            .rsplit_once('=')
            .ok_or_else(|| LedgerError::Invalid(format!("expected ITEM=QUANTITY, got '{s}'")))?;
        let id = id.trim();
        if id.is_empty() {
            return Err(LedgerError::Invalid(format!("missing item id in '{s}'")));
        }
        let quantity = qty
            .trim()
            .parse::<u32>()
            .map_err(|e| LedgerError::Invalid(format!("bad quantity in '{s}': {e}")))?;
        Ok(Self::new(id, quantity))
    }
}

/// Dashboard figures.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total_units:   u64,
    pub product_names: usize,
    pub out_of_stock:  usize,
}

/// How a return is written into the log.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum, strum::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum ReturnMode {
    /// A single `Return` transaction is recorded.
    #[default]
    FirstClass,
    /// A `StockIn` is recorded and then the newest matching `StockIn` is relabeled as `Return`.
    Relabel,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_derivation() {
        assert_eq!(ItemId::derive("Joto", "1kg").as_str(), "joto-1kg");
        assert_eq!(ItemId::derive("MAZIWA", "2KG").as_str(), "maziwa-2kg");
        assert_eq!(ItemId::derive("Big \t Bag", "5 kg").as_str(), "big-bag-5-kg");
        assert_eq!(Item::new("Joto", "1kg", 3).id, ItemId::derive("joto", "1KG"));
    }

    #[test]
    fn stock_out_entry_parsing() {
        let entry: StockOutEntry = "joto-1kg=15".parse().expect("valid entry");
        assert_eq!(entry, StockOutEntry::new("joto-1kg", 15));
        assert!("joto-1kg".parse::<StockOutEntry>().is_err());
        assert!("=5".parse::<StockOutEntry>().is_err());
        assert!("joto-1kg=-5".parse::<StockOutEntry>().is_err());
    }

    #[test]
    fn item_search() {
        let item = Item::new("Stocklick", "20kg", 1);
        assert!(item.matches("LICK"));
        assert!(item.matches("20"));
        assert!(!item.matches("maziwa"));
    }
}
