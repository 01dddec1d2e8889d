//! Background writer that carries [`Persist`] commands from the in-memory ledger to the stores.
//!
//! Commands are queued in the order the ledger produced them. A single tokio task takes them off the queue in
//! rounds of up to `max_batch` commands. Within a round every catalog upsert is merged into one write, the last
//! snapshot of an item wins; ledger commands are executed one by one in queue order. A failed write is logged and
//! counted and the round moves on. Nothing is retried: the in-memory state stays authoritative until the next
//! reload.
//!
//! ```ignore
//! let writer = WriteBehind::spawn(catalog, ledger_store, WriteBehindOptions::builder().max_batch(50).build()?);
//! writer.enqueue_all(changes.persist);
//! writer.flush().await?;
//! assert_eq!(writer.pending(), 0);
//! ```

use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use fieldx::fxstruct;
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::debug;
use tracing::error;
use tracing::instrument;
use tracing::warn;

use crate::error::LedgerError;
use crate::error::Result;
use crate::persist::Persist;
use crate::traits::CatalogStore;
use crate::traits::LedgerStore;
use crate::transaction::TransactionId;
use crate::transaction::TransactionKind;
use crate::transaction::TransactionRow;
use crate::types::Item;

#[derive(Clone, Debug)]
#[fxstruct(no_new, builder, get(copy))]
pub struct WriteBehindOptions {
    /// The maximum number of commands taken off the queue in one round.
    #[fieldx(default(100))]
    max_batch: usize,

    /// Pause before each round so that bursts of commands coalesce. Zero writes as soon as possible.
    #[fieldx(default(Duration::ZERO))]
    flush_interval: Duration,
}

enum Command {
    Apply(Persist),
    Flush(oneshot::Sender<()>),
}

#[derive(Debug, Default)]
struct Counters {
    pending: AtomicU64,
    written: AtomicU64,
    failed:  AtomicU64,
}

#[derive(Debug)]
pub struct WriteBehind {
    sender:   mpsc::UnboundedSender<Command>,
    worker:   Mutex<Option<JoinHandle<()>>>,
    counters: Arc<Counters>,
}

impl WriteBehind {
    /// Start the worker task. Must be called from within a tokio runtime.
    pub fn spawn(catalog: Arc<dyn CatalogStore>, ledger: Arc<dyn LedgerStore>, options: WriteBehindOptions) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        let counters = Arc::new(Counters::default());
        let worker = Worker {
            catalog,
            ledger,
            max_batch: options.max_batch().max(1),
            flush_interval: options.flush_interval(),
            counters: Arc::clone(&counters),
        };

        Self {
            sender,
            worker: Mutex::new(Some(tokio::spawn(worker.run(receiver)))),
            counters,
        }
    }

    pub fn enqueue(&self, command: Persist) {
        self.counters.pending.fetch_add(1, Ordering::SeqCst);
        if self.sender.send(Command::Apply(command)).is_err() {
            self.counters.pending.fetch_sub(1, Ordering::SeqCst);
            self.counters.failed.fetch_add(1, Ordering::SeqCst);
            error!("write-behind queue is closed, dropping a command");
        }
    }

    pub fn enqueue_all<I: IntoIterator<Item = Persist>>(&self, commands: I) {
        for command in commands {
            self.enqueue(command);
        }
    }

    /// Wait until every command enqueued before this call has been attempted.
    pub async fn flush(&self) -> Result<()> {
        let (tx, rx) = oneshot::channel();
        self.sender.send(Command::Flush(tx)).map_err(|_| LedgerError::WorkerGone)?;
        rx.await.map_err(|_| LedgerError::WorkerGone)
    }

    /// Flush and stop the worker. Later commands are dropped and counted as failed.
    pub async fn close(&self) {
        if let Err(err) = self.flush().await {
            warn!("closing write-behind queue: {err}");
        }
        let worker = self.worker.lock().take();
        if let Some(worker) = worker {
            worker.abort();
            let _ = worker.await;
        }
    }

    /// Commands accepted but not yet attempted.
    pub fn pending(&self) -> u64 {
        self.counters.pending.load(Ordering::SeqCst)
    }

    /// Commands written successfully.
    pub fn written(&self) -> u64 {
        self.counters.written.load(Ordering::SeqCst)
    }

    /// Commands that failed or were dropped.
    pub fn failed(&self) -> u64 {
        self.counters.failed.load(Ordering::SeqCst)
    }
}

impl Drop for WriteBehind {
    fn drop(&mut self) {
        if let Some(worker) = self.worker.get_mut().take() {
            worker.abort();
        }
    }
}

enum LedgerWrite {
    Insert(TransactionRow),
    UpdateKind(TransactionId, TransactionKind),
}

// One round worth of commands.
#[derive(Default)]
struct Round {
    items:   Vec<Item>,
    upserts: u64,
    ledger:  Vec<LedgerWrite>,
    flushes: Vec<oneshot::Sender<()>>,
}

impl Round {
    fn add(&mut self, command: Persist) {
        match command {
            Persist::UpsertItems(items) => {
                self.upserts += 1;
                for item in items {
                    if let Some(existing) = self.items.iter_mut().find(|i| i.id == item.id) {
                        *existing = item;
                    }
                    else {
                        self.items.push(item);
                    }
                }
            }
            Persist::InsertTransaction(tx) => self.ledger.push(LedgerWrite::Insert(TransactionRow::from(&tx))),
            Persist::UpdateTransactionKind { id, kind } => self.ledger.push(LedgerWrite::UpdateKind(id, kind)),
        }
    }

    fn commands(&self) -> usize {
        self.upserts as usize + self.ledger.len()
    }
}

struct Worker {
    catalog:        Arc<dyn CatalogStore>,
    ledger:         Arc<dyn LedgerStore>,
    max_batch:      usize,
    flush_interval: Duration,
    counters:       Arc<Counters>,
}

impl Worker {
    async fn run(self, mut receiver: mpsc::UnboundedReceiver<Command>) {
        debug!("write-behind worker started");
        while let Some(first) = receiver.recv().await {
            let mut round = Round::default();
            let mut flushing = false;

            match first {
                Command::Apply(command) => round.add(command),
                Command::Flush(done) => {
                    round.flushes.push(done);
                    flushing = true;
                }
            }

            if !flushing && !self.flush_interval.is_zero() {
                tokio::time::sleep(self.flush_interval).await;
            }

            // A flush request closes the round: everything queued before it is in this round.
            while !flushing && round.commands() < self.max_batch {
                match receiver.try_recv() {
                    Ok(Command::Apply(command)) => round.add(command),
                    Ok(Command::Flush(done)) => {
                        round.flushes.push(done);
                        flushing = true;
                    }
                    Err(_) => break,
                }
            }

            self.write(&mut round).await;

            for done in round.flushes.drain(..) {
                let _ = done.send(());
            }
        }
        debug!("write-behind worker stopped");
    }

    #[instrument(level = "trace", skip(self, round), fields(upserts = round.upserts, ledger = round.ledger.len()))]
    async fn write(&self, round: &mut Round) {
        if round.upserts > 0 {
            let outcome = self.catalog.upsert(&round.items).await;
            self.settle(round.upserts, outcome, "catalog upsert");
        }

        for command in round.ledger.drain(..) {
            let outcome = match command {
                LedgerWrite::Insert(row) => self.ledger.insert(row).await,
                LedgerWrite::UpdateKind(id, kind) => self.ledger.update_kind(&id, kind).await,
            };
            self.settle(1, outcome, "ledger write");
        }
    }

    fn settle(&self, count: u64, outcome: Result<()>, what: &str) {
        self.counters.pending.fetch_sub(count, Ordering::SeqCst);
        match outcome {
            Ok(()) => {
                self.counters.written.fetch_add(count, Ordering::SeqCst);
            }
            Err(err) => {
                self.counters.failed.fetch_add(count, Ordering::SeqCst);
                error!("{what} failed: {err}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;
    use crate::transaction::Transaction;

    fn writer(store: &Arc<MemoryStore>, max_batch: usize) -> WriteBehind {
        let options = WriteBehindOptions::builder()
            .max_batch(max_batch)
            .build()
            .expect("options build");
        WriteBehind::spawn(store.clone(), store.clone(), options)
    }

    #[tokio::test]
    async fn upserts_coalesce_and_ledger_keeps_order() {
        let store = Arc::new(MemoryStore::new());
        let writer = writer(&store, 100);

        let first = Transaction::record_for(TransactionKind::StockIn, "Joto", "1kg", 10);
        writer.enqueue(Persist::UpsertItems(vec![Item::new("Joto", "1kg", 10)]));
        writer.enqueue(Persist::InsertTransaction(first.clone()));
        writer.enqueue(Persist::UpsertItems(vec![Item::new("Joto", "1kg", 25)]));
        writer.enqueue(Persist::UpdateTransactionKind {
            id:   first.id.clone(),
            kind: TransactionKind::Return,
        });
        writer.flush().await.expect("flush succeeds");

        assert_eq!(writer.pending(), 0);
        assert_eq!(writer.failed(), 0);
        assert_eq!(writer.written(), 4);
        assert_eq!(store.items(), vec![Item::new("Joto", "1kg", 25)]);
        let rows = store.rows();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].kind, "Return");
    }

    #[tokio::test]
    async fn failures_are_counted_not_raised() {
        let store = Arc::new(MemoryStore::new());
        let writer = writer(&store, 1);

        store.set_available(false);
        writer.enqueue(Persist::UpsertItems(vec![Item::new("Joto", "1kg", 10)]));
        writer.enqueue(Persist::InsertTransaction(Transaction::record_for(
            TransactionKind::StockIn,
            "Joto",
            "1kg",
            10,
        )));
        writer.flush().await.expect("flush succeeds");
        assert_eq!(writer.failed(), 2);
        assert_eq!(writer.pending(), 0);

        store.set_available(true);
        writer.enqueue(Persist::UpsertItems(vec![Item::new("Joto", "1kg", 10)]));
        writer.flush().await.expect("flush succeeds");
        assert_eq!(writer.written(), 1);
        assert_eq!(store.items().len(), 1);
        assert!(store.rows().is_empty());
    }

    #[derive(Debug, Default)]
    struct CountingCatalog {
        inner:   MemoryStore,
        upserts: AtomicU64,
    }

    #[async_trait::async_trait]
    impl CatalogStore for CountingCatalog {
        async fn list(&self) -> Result<Vec<Item>> {
            self.inner.list().await
        }

        async fn upsert(&self, items: &[Item]) -> Result<()> {
            self.upserts.fetch_add(1, Ordering::SeqCst);
            self.inner.upsert(items).await
        }

        async fn insert_initial(&self, items: &[Item]) -> Result<()> {
            self.inner.insert_initial(items).await
        }
    }

    async fn upsert_calls(flush_interval: Duration) -> (u64, u64, Vec<Item>) {
        let catalog = Arc::new(CountingCatalog::default());
        let ledger = Arc::new(MemoryStore::new());
        let options = WriteBehindOptions::builder()
            .max_batch(100)
            .flush_interval(flush_interval)
            .build()
            .expect("options build");
        let writer = WriteBehind::spawn(catalog.clone(), ledger, options);

        for quantity in 1..=5 {
            writer.enqueue(Persist::UpsertItems(vec![Item::new("Joto", "1kg", quantity)]));
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        writer.flush().await.expect("flush succeeds");

        (catalog.upserts.load(Ordering::SeqCst), writer.written(), catalog.inner.items())
    }

    #[tokio::test]
    async fn flush_interval_gathers_upserts_into_one_round() {
        let (calls, written, items) = upsert_calls(Duration::from_millis(500)).await;
        assert_eq!(calls, 1);
        assert_eq!(written, 5);
        assert_eq!(items, vec![Item::new("Joto", "1kg", 5)]);

        let (calls, written, items) = upsert_calls(Duration::ZERO).await;
        assert_eq!(calls, 5);
        assert_eq!(written, 5);
        assert_eq!(items, vec![Item::new("Joto", "1kg", 5)]);
    }

    #[tokio::test]
    async fn closed_writer_drops_commands() {
        let store = Arc::new(MemoryStore::new());
        let writer = writer(&store, 10);
        writer.close().await;

        writer.enqueue(Persist::UpsertItems(vec![Item::new("Joto", "1kg", 10)]));
        assert_eq!(writer.failed(), 1);
        assert!(matches!(writer.flush().await, Err(LedgerError::WorkerGone)));
    }
}
