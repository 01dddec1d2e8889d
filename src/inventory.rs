//! [`Ledger`] wired to its stores.
//!
//! `Inventory` owns the in-memory ledger and a [`WriteBehind`] queue. Every operation runs the reducer under a
//! write lock and hands the resulting [`Persist`](crate::persist::Persist) commands to the queue before releasing
//! it. Callers never wait for the backend, except explicitly through [`Inventory::flush`].

use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use fieldx::fxstruct;
use parking_lot::RwLock;
use tracing::debug;
use tracing::info;
use tracing::instrument;
use tracing::warn;

use crate::error::Result;
use crate::insight::build_prompt;
use crate::insight::check_question;
use crate::insight::InsightError;
use crate::insight::InsightGenerator;
use crate::ledger::default_catalog;
use crate::ledger::Ledger;
use crate::persist::Changes;
use crate::traits::CatalogStore;
use crate::traits::LedgerStore;
use crate::transaction::Transaction;
use crate::types::Item;
use crate::types::ItemId;
use crate::types::ReturnMode;
use crate::types::StockOutEntry;
use crate::types::Summary;
use crate::write_behind::WriteBehind;
use crate::write_behind::WriteBehindOptions;

#[derive(Clone, Debug)]
#[fxstruct(no_new, builder, get(copy))]
pub struct LedgerOptions {
    /// How many transactions are loaded from the Ledger Store at startup.
    #[fieldx(default(1000))]
    history_limit: u64,

    /// How many of the newest transactions are sent along with an insight question.
    #[fieldx(default(20))]
    insight_window: usize,

    #[fieldx(default(ReturnMode::FirstClass))]
    return_mode: ReturnMode,

    #[fieldx(default(100))]
    max_batch: usize,

    #[fieldx(default(Duration::ZERO))]
    flush_interval: Duration,
}

#[derive(Debug)]
pub struct Inventory {
    ledger:  RwLock<Ledger>,
    loading: AtomicBool,
    catalog: Arc<dyn CatalogStore>,
    history: Arc<dyn LedgerStore>,
    writer:  WriteBehind,
    options: LedgerOptions,
}

impl Inventory {
    /// Create an empty inventory in loading state. Must be called from within a tokio runtime.
    pub fn new(catalog: Arc<dyn CatalogStore>, history: Arc<dyn LedgerStore>, options: LedgerOptions) -> Result<Self> {
        let writer = WriteBehind::spawn(
            Arc::clone(&catalog),
            Arc::clone(&history),
            WriteBehindOptions::builder()
                .max_batch(options.max_batch())
                .flush_interval(options.flush_interval())
                .build()?,
        );

        Ok(Self {
            ledger: RwLock::new(Ledger::new(options.return_mode())),
            loading: AtomicBool::new(true),
            catalog,
            history,
            writer,
            options,
        })
    }

    /// Create and reconcile in one go.
    pub async fn open(
        catalog: Arc<dyn CatalogStore>,
        history: Arc<dyn LedgerStore>,
        options: LedgerOptions,
    ) -> Result<Self> {
        let inventory = Self::new(catalog, history, options)?;
        inventory.reconcile().await;
        Ok(inventory)
    }

    /// Load the catalog and the transaction history from the stores. Never fails: whatever cannot be read is
    /// logged and replaced with defaults.
    #[instrument(level = "debug", skip(self))]
    pub async fn reconcile(&self) {
        let items = match self.catalog.list().await {
            Ok(items) if !items.is_empty() => items,
            outcome => {
                if let Err(err) = outcome {
                    warn!("catalog could not be read, using the default catalog: {err}");
                }
                else {
                    info!("catalog is empty, seeding the default catalog");
                }
                let defaults = default_catalog();
                if let Err(err) = self.catalog.insert_initial(&defaults).await {
                    warn!("seeding the catalog failed: {err}");
                }
                defaults
            }
        };

        let log = match self.history.list_recent(self.options.history_limit()).await {
            Ok(rows) => rows
                .into_iter()
                .filter_map(|row| {
                    Transaction::try_from(row)
                        .inspect_err(|err| warn!("skipping transaction: {err}"))
                        .ok()
                })
                .collect::<Vec<_>>(),
            Err(err) => {
                warn!("transaction history could not be read: {err}");
                Vec::new()
            }
        };

        debug!("loaded {} item(s) and {} transaction(s)", items.len(), log.len());

        {
            let mut ledger = self.ledger.write();
            ledger.replace_items(items);
            ledger.replace_log(log);
        }
        self.loading.store(false, Ordering::SeqCst);
    }

    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    fn apply<F>(&self, op: F) -> Vec<Transaction>
    where
        F: FnOnce(&mut Ledger) -> Changes,
    {
        let mut ledger = self.ledger.write();
        let changes = op(&mut ledger);

        // Enqueue under the lock so the queue sees snapshots in the order they were produced.
        if self.is_loading() {
            debug!("still loading, {} write(s) not persisted", changes.persist.len());
        }
        else {
            self.writer.enqueue_all(changes.persist);
        }
        drop(ledger);

        changes.recorded
    }

    pub fn stock_in(&self, name: &str, size: &str, quantity: u32) -> Vec<Transaction> {
        self.apply(|ledger| ledger.stock_in(name, size, quantity))
    }

    pub fn batch_stock_out(&self, entries: &[StockOutEntry]) -> Vec<Transaction> {
        self.apply(|ledger| ledger.batch_stock_out(entries))
    }

    pub fn process_return(&self, name: &str, size: &str, quantity: u32) -> Vec<Transaction> {
        self.apply(|ledger| ledger.process_return(name, size, quantity))
    }

    pub fn adjust_stock(&self, item_id: &ItemId, quantity_to_remove: u32) -> Vec<Transaction> {
        self.apply(|ledger| ledger.adjust_stock(item_id, quantity_to_remove))
    }

    pub fn items(&self) -> Vec<Item> {
        self.ledger.read().items().to_vec()
    }

    pub fn log(&self) -> Vec<Transaction> {
        self.ledger.read().log().cloned().collect()
    }

    pub fn get(&self, id: &ItemId) -> Option<Item> {
        self.ledger.read().get(id).cloned()
    }

    pub fn recent(&self, n: usize) -> Vec<Transaction> {
        self.ledger.read().recent(n)
    }

    pub fn summary(&self) -> Summary {
        self.ledger.read().summary()
    }

    pub fn search_items(&self, query: &str) -> Vec<Item> {
        self.ledger.read().search_items(query)
    }

    pub fn search_log(&self, query: &str) -> Vec<Transaction> {
        self.ledger.read().search_log(query)
    }

    /// Ask a question about the current state.
    pub async fn ask(&self, generator: &dyn InsightGenerator, question: &str) -> Result<String, InsightError> {
        let question = check_question(question)?;
        let prompt = {
            let ledger = self.ledger.read();
            build_prompt(
                ledger.items(),
                &ledger.recent(self.options.insight_window()),
                self.options.insight_window(),
                question,
            )
        };
        generator.generate(&prompt).await
    }

    pub async fn flush(&self) -> Result<()> {
        self.writer.flush().await
    }

    pub async fn close(&self) {
        self.writer.close().await
    }

    pub fn pending_writes(&self) -> u64 {
        self.writer.pending()
    }

    pub fn failed_writes(&self) -> u64 {
        self.writer.failed()
    }

    pub fn written(&self) -> u64 {
        self.writer.written()
    }
}
