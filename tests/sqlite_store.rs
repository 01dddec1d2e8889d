#![cfg(feature = "sqlite")]

use std::sync::Arc;

use stock_ledger::prelude::*;
use stock_ledger::store::db::driver::sqlite::Sqlite;
use stock_ledger::store::db::DbStore;

async fn store(dir: &tempfile::TempDir) -> Arc<DbStore<Sqlite>> {
    let driver = Sqlite::connect(&dir.path().join("ledger.db"))
        .await
        .expect("database opens");
    let store = Arc::new(DbStore::new(Arc::new(driver)));
    store.prepare().await.expect("schema is created");
    store
}

async fn open(store: &Arc<DbStore<Sqlite>>, return_mode: ReturnMode) -> Inventory {
    let options = LedgerOptions::builder()
        .return_mode(return_mode)
        .build()
        .expect("options build");
    Inventory::open(store.clone(), store.clone(), options)
        .await
        .expect("inventory opens")
}

#[tokio::test]
async fn catalog_upsert_and_seed() -> Result<(), Box<dyn std::error::Error>> {
    let store = DbStore::new(Arc::new(Sqlite::in_memory().await?));
    store.prepare().await?;

    assert!(store.list().await?.is_empty());
    store.insert_initial(&[Item::new("Joto", "1kg", 100)]).await?;
    assert!(store.insert_initial(&[Item::new("Joto", "1kg", 1)]).await.is_err());

    store
        .upsert(&[Item::new("Joto", "1kg", 60), Item::new("Magadi", "2kg", 3)])
        .await?;
    assert_eq!(
        store.list().await?,
        vec![Item::new("Joto", "1kg", 60), Item::new("Magadi", "2kg", 3)]
    );

    Ok(())
}

#[tokio::test]
async fn ledger_rows() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::Builder::new().prefix("stock-ledger").tempdir()?;
    let store = store(&dir).await;

    let mut last = None;
    for q in 1..=5 {
        let mut tx = Transaction::record_for(TransactionKind::StockIn, "Joto", "1kg", q);
        tx.timestamp += chrono::Duration::seconds(i64::from(q));
        store.insert(TransactionRow::from(&tx)).await?;
        last = Some(tx);
    }
    let last = last.expect("rows inserted");
    store.update_kind(&last.id, TransactionKind::Return).await?;

    let rows = store.list_recent(3).await?;
    assert_eq!(rows.iter().map(|r| r.quantity).collect::<Vec<_>>(), vec![5, 4, 3]);
    assert_eq!(rows[0].kind, "Return");
    assert_eq!(rows[1].kind, "Stock In");

    let back = Transaction::try_from(rows[0].clone())?;
    assert_eq!(back.id, last.id);
    assert_eq!(back.kind, TransactionKind::Return);
    assert_eq!(back.item_name, "Joto");

    Ok(())
}

#[tokio::test]
async fn inventory_round_trip() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::Builder::new().prefix("stock-ledger").tempdir()?;

    {
        let store = store(&dir).await;
        let inventory = open(&store, ReturnMode::Relabel).await;
        assert_eq!(store.list().await?.len(), 14);

        inventory.stock_in("Joto", "1kg", 20);
        inventory.batch_stock_out(&[
            StockOutEntry::new("joto-1kg", 200),
            StockOutEntry::new("stocklick-50kg", 5),
        ]);
        inventory.process_return("Stocklick", "50kg", 1);
        inventory.adjust_stock(&ItemId::from("maziwa-1kg"), 50);
        inventory.close().await;
        assert_eq!(inventory.failed_writes(), 0);
        store.checkpoint().await?;
    }

    let store = store(&dir).await;
    let inventory = open(&store, ReturnMode::Relabel).await;
    let quantity = |id: &str| inventory.get(&ItemId::from(id)).map(|i| i.quantity);

    assert_eq!(quantity("joto-1kg"), Some(0));
    assert_eq!(quantity("stocklick-50kg"), Some(16));
    assert_eq!(quantity("maziwa-1kg"), Some(100));

    let kinds = inventory.log().into_iter().map(|t| t.kind).collect::<Vec<_>>();
    assert_eq!(kinds.len(), 5);
    assert_eq!(kinds.iter().filter(|k| **k == TransactionKind::Return).count(), 1);
    assert_eq!(kinds.iter().filter(|k| **k == TransactionKind::StockOut).count(), 2);
    assert_eq!(kinds.iter().filter(|k| **k == TransactionKind::Adjustment).count(), 1);

    Ok(())
}
