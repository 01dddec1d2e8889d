//! The `stock-ledger` command line application.
use std::fmt::Debug;
use std::path::PathBuf;
use std::sync::Arc;

use clap::error::ErrorKind;
use clap::CommandFactory;
use clap::Parser;
use comfy_table::CellAlignment;
use comfy_table::Table;
use console::style;
use console::Color;
use fieldx::fxstruct;
use fieldx_plus::fx_plus;
use garde::Validate;
use tracing::debug;
use tracing::instrument;
use tracing::warn;

use crate::error::LedgerError;
use crate::error::Result;
use crate::insight::check_question;
use crate::insight::render_emphasis;
use crate::insight::GeminiClient;
use crate::insight::DEFAULT_API_URL;
use crate::insight::DEFAULT_MODEL;
use crate::inventory::Inventory;
use crate::inventory::LedgerOptions;
use crate::invalid;
#[cfg(feature = "pg")]
use crate::store::db::driver::pg::Pg;
#[cfg(feature = "sqlite")]
use crate::store::db::driver::sqlite::Sqlite;
#[cfg(any(feature = "pg", feature = "sqlite"))]
use crate::store::db::DbStore;
use crate::store::memory::MemoryStore;
use crate::traits::CatalogStore;
use crate::traits::LedgerStore;
use crate::transaction::Transaction;
use crate::transaction::TransactionKind;
use crate::types::Item;
use crate::types::ItemId;
use crate::types::ReturnMode;
use crate::types::StockOutEntry;
use crate::types::Summary;

const DASHBOARD_RECENT: usize = 10;
// Quantities below this are highlighted.
const LOW_STOCK: u32 = 20;

const ASK_EXAMPLES: &str = "Examples:
  stock-ledger ask \"Which items are running low and should be reordered?\"
  stock-ledger ask \"What was our highest moving product last week?\"
  stock-ledger ask \"Summarize the stock movements for 'Joto'.\"
  stock-ledger ask \"Are there any unusual patterns in the transaction log?\"";

#[derive(Debug, Clone, clap::Subcommand)]
pub enum Action {
    /// Summary figures, the item table and the latest transactions.
    Dashboard {
        /// Only show items and transactions matching this text.
        #[clap(long, short)]
        search: Option<String>,
    },

    /// List items.
    Items {
        #[clap(long, short)]
        search: Option<String>,
    },

    /// List transactions, newest first.
    History {
        #[clap(long, short)]
        search: Option<String>,

        #[clap(long, short, default_value_t = 50)]
        limit: usize,
    },

    /// Receive goods. Unknown name and size pairs become new items.
    StockIn { name: String, size: String, quantity: u32 },

    /// Ship one or more items at once.
    StockOut {
        #[clap(required = true, value_name = "ITEM=QUANTITY", value_parser = parse_entry)]
        entries: Vec<StockOutEntry>,
    },

    /// Take back goods of a known item.
    Return { item: String, quantity: u32 },

    /// Write off stock. Requires the adjustment passcode.
    Adjust {
        item:     String,
        quantity: u32,

        #[clap(long, short, env = "STOCK_LEDGER_PASSCODE", hide_env_values = true)]
        passcode: Option<String>,
    },

    /// Ask a question about the stock.
    #[clap(after_help = ASK_EXAMPLES)]
    Ask { question: String },
}

impl Action {
    pub fn is_mutating(&self) -> bool {
        matches!(
            self,
            Action::StockIn { .. } | Action::StockOut { .. } | Action::Return { .. } | Action::Adjust { .. }
        )
    }
}

fn parse_entry(s: &str) -> std::result::Result<StockOutEntry, String> {
    s.parse::<StockOutEntry>().map_err(|e| e.to_string())
}

#[derive(Debug, Clone, clap::Parser, Validate)]
#[fxstruct(no_new, get(copy))]
#[clap(about, version, author, name = "stock-ledger")]
pub struct Cli {
    /// Keep everything in memory. Nothing survives the process.
    #[clap(long, env = "STOCK_LEDGER_MEMORY", default_value_t = false, conflicts_with_all = ["sqlite", "pg"])]
    #[garde(skip)]
    memory: bool,

    /// Use SQLite as the database backend. This is the default.
    #[clap(long, env = "STOCK_LEDGER_SQLITE", default_value_t = false, conflicts_with = "pg")]
    #[garde(custom(Self::feature_enabled(cfg!(feature = "sqlite"), "sqlite")))]
    // Only validated: SQLite is picked whenever no other backend is.
    #[fieldx(get(attributes_fn(allow(unused))))]
    sqlite: bool,

    /// Path to the SQLite database file.
    #[clap(long, env = "STOCK_LEDGER_SQLITE_PATH", default_value = "stock-ledger.db")]
    #[fieldx(get(clone, attributes_fn(allow(unused))))]
    #[garde(skip)]
    sqlite_path: PathBuf,

    /// Use PostgreSQL as the database backend.
    #[clap(long, env = "STOCK_LEDGER_PG", default_value_t = false)]
    #[garde(custom(Self::feature_enabled(cfg!(feature = "pg"), "pg")))]
    #[fieldx(get(attributes_fn(allow(unused))))]
    pg: bool,

    #[clap(long, env = "STOCK_LEDGER_PG_HOST", default_value = "localhost")]
    #[fieldx(get(clone, attributes_fn(allow(unused))))]
    #[garde(skip)]
    pg_host: String,

    #[clap(long, env = "STOCK_LEDGER_PG_PORT", default_value_t = 5432)]
    #[fieldx(get(attributes_fn(allow(unused))))]
    #[garde(skip)]
    pg_port: u16,

    #[clap(long, env = "STOCK_LEDGER_PG_USER", default_value = "stock_ledger")]
    #[fieldx(get(clone, attributes_fn(allow(unused))))]
    #[garde(skip)]
    pg_user: String,

    #[clap(long, env = "STOCK_LEDGER_PG_PASSWORD", hide_env_values = true, default_value = "stock_ledger")]
    #[fieldx(get(clone, attributes_fn(allow(unused))))]
    #[garde(skip)]
    pg_password: String,

    #[clap(long, env = "STOCK_LEDGER_PG_DATABASE", default_value = "stock_ledger")]
    #[fieldx(get(clone, attributes_fn(allow(unused))))]
    #[garde(skip)]
    pg_database: String,

    /// How many transactions to load at startup.
    #[clap(long, env = "STOCK_LEDGER_HISTORY_LIMIT", default_value_t = 1000)]
    #[garde(range(min = 1))]
    history_limit: u64,

    /// How returns are written into the log.
    #[clap(long, env = "STOCK_LEDGER_RETURN_MODE", value_enum, default_value_t = ReturnMode::FirstClass)]
    #[garde(skip)]
    return_mode: ReturnMode,

    /// Passcode guarding stock adjustments. Adjustments are refused when it is not set.
    #[clap(long, env = "STOCK_LEDGER_ADJUST_PASSCODE", hide_env_values = true)]
    #[fieldx(get(clone))]
    #[garde(skip)]
    adjust_passcode: Option<String>,

    /// Gemini API key. Falls back to GEMINI_API_KEY.
    #[clap(long, env = "STOCK_LEDGER_GEMINI_API_KEY", hide_env_values = true)]
    #[fieldx(get(clone))]
    #[garde(skip)]
    gemini_api_key: Option<String>,

    #[clap(long, env = "STOCK_LEDGER_GEMINI_MODEL", default_value = DEFAULT_MODEL)]
    #[fieldx(get(clone))]
    #[garde(length(min = 1))]
    gemini_model: String,

    #[clap(long, env = "STOCK_LEDGER_GEMINI_API_URL", default_value = DEFAULT_API_URL, hide = true)]
    #[fieldx(get(clone))]
    #[garde(skip)]
    gemini_api_url: String,

    /// File to send log into
    #[clap(long, env = "STOCK_LEDGER_LOG_FILE")]
    #[fieldx(get(clone))]
    #[garde(skip)]
    log_file: Option<PathBuf>,

    /// Silence the output
    #[clap(long, short, env = "STOCK_LEDGER_QUIET", default_value_t = false)]
    #[garde(skip)]
    quiet: bool,

    #[clap(subcommand)]
    #[fieldx(get(clone))]
    #[garde(skip)]
    action: Action,
}

impl Cli {
    fn feature_enabled(feature_enabled: bool, feature: &'static str) -> impl FnOnce(&bool, &()) -> garde::Result {
        move |value: &bool, _: &()| {
            if !*value || feature_enabled {
                Ok(())
            }
            else {
                Err(garde::Error::new(format!("Build feature '{feature}' must be enabled.")))
            }
        }
    }
}

enum Backend {
    Memory(Arc<MemoryStore>),
    #[cfg(feature = "sqlite")]
    Sqlite(Arc<DbStore<Sqlite>>),
    #[cfg(feature = "pg")]
    Pg(Arc<DbStore<Pg>>),
}

impl Backend {
    fn stores(&self) -> (Arc<dyn CatalogStore>, Arc<dyn LedgerStore>) {
        match self {
            Backend::Memory(store) => (store.clone(), store.clone()),
            #[cfg(feature = "sqlite")]
            Backend::Sqlite(store) => (store.clone(), store.clone()),
            #[cfg(feature = "pg")]
            Backend::Pg(store) => (store.clone(), store.clone()),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Backend::Memory(_) => "memory",
            #[cfg(feature = "sqlite")]
            Backend::Sqlite(_) => "SQLite",
            #[cfg(feature = "pg")]
            Backend::Pg(_) => "PostgreSQL",
        }
    }

    async fn checkpoint(&self) -> Result<()> {
        match self {
            Backend::Memory(_) => Ok(()),
            #[cfg(feature = "sqlite")]
            Backend::Sqlite(store) => store.checkpoint().await,
            #[cfg(feature = "pg")]
            Backend::Pg(store) => store.checkpoint().await,
        }
    }
}

#[fx_plus(
    app,
    rc,
    new(private),
    sync,
    get,
    fallible(off, error(LedgerError)),
    builder(vis(pub))
)]
pub struct LedgerApp {
    #[fieldx(inner_mut, clearer, builder("_cli_args"))]
    cli_args: Vec<String>,

    #[fieldx(lazy, private, fallible(error(clap::Error)), get(clone))]
    cli: Cli,
}

impl LedgerApp {
    fn build_cli(&self) -> Result<Cli, clap::Error> {
        Ok(if let Some(custom_args) = self.clear_cli_args() {
            Cli::try_parse_from(custom_args.into_iter())?
        }
        else {
            Cli::try_parse()?
        })
    }

    fn validate(&self) -> Result<()> {
        if let Err(err) = self.cli()?.validate() {
            let mut cmd = Cli::command();
            return Err(cmd.error(ErrorKind::InvalidValue, err).into());
        }

        Ok(())
    }

    fn setup_tracing(&self) -> Result<()> {
        use tracing_subscriber::layer::SubscriberExt;
        use tracing_subscriber::util::SubscriberInitExt;

        let cli = self.cli()?;

        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));

        let dest_writer = std::sync::Mutex::new(if let Some(log_file) = cli.log_file() {
            let file = std::fs::OpenOptions::new().create(true).append(true).open(log_file)?;
            Box::new(file) as Box<dyn std::io::Write + Send>
        }
        else {
            Box::new(std::io::stderr()) as Box<dyn std::io::Write + Send>
        });

        let registry = tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(dest_writer).with_ansi(false));

        // A subscriber installed earlier in the same process keeps working.
        if let Err(err) = registry.try_init() {
            debug!("tracing is already initialized: {err}");
        }

        Ok(())
    }

    fn ledger_options(&self) -> Result<LedgerOptions> {
        let cli = self.cli()?;
        Ok(LedgerOptions::builder()
            .history_limit(cli.history_limit())
            .return_mode(cli.return_mode())
            .build()?)
    }

    #[instrument(level = "debug", skip(self))]
    async fn backend(&self) -> Result<Backend> {
        let cli = self.cli()?;

        if cli.memory() {
            return Ok(Backend::Memory(Arc::new(MemoryStore::new())));
        }

        #[cfg(feature = "pg")]
        if cli.pg() {
            let driver = Pg::builder()
                .host(cli.pg_host())
                .port(cli.pg_port())
                .user(cli.pg_user())
                .password(cli.pg_password())
                .database(cli.pg_database())
                .build()?;
            driver.connect().await?;
            let store = Arc::new(DbStore::new(driver));
            store.prepare().await?;
            return Ok(Backend::Pg(store));
        }

        self.default_backend(&cli).await
    }

    #[cfg(feature = "sqlite")]
    async fn default_backend(&self, cli: &Cli) -> Result<Backend> {
        let driver = Arc::new(Sqlite::connect(&cli.sqlite_path()).await?);
        let store = Arc::new(DbStore::new(driver));
        store.prepare().await?;
        Ok(Backend::Sqlite(store))
    }

    #[cfg(not(feature = "sqlite"))]
    async fn default_backend(&self, _cli: &Cli) -> Result<Backend> {
        Err(LedgerError::Config(
            "No database backend available in this build. Use --memory or enable the 'sqlite' or 'pg' feature."
                .to_string(),
        ))
    }

    /// Run the command and return what it has to say.
    pub async fn report(&self) -> Result<String> {
        let cli = self.cli()?;
        self.validate()?;

        let backend = self.backend().await?;
        let (catalog, history) = backend.stores();
        let inventory = Inventory::open(catalog, history, self.ledger_options()?).await?;

        let action = cli.action();
        let outcome = self.perform(&inventory, &action).await;

        inventory.close().await;
        if let Err(err) = backend.checkpoint().await {
            warn!("{} checkpoint failed: {err}", backend.name());
        }

        let mut text = outcome?;

        if action.is_mutating() {
            let failed = inventory.failed_writes();
            if failed > 0 {
                text.push_str(&format!(
                    "\n{} {failed} write(s) to the {} backend failed, see the log.\n",
                    style("warning:").yellow().bold(),
                    backend.name()
                ));
            }
        }
        else if let Action::Dashboard { .. } = action {
            text.push_str(&format!("\nBackend: {}\n", backend.name()));
        }

        Ok(text)
    }

    async fn perform(&self, inventory: &Inventory, action: &Action) -> Result<String> {
        match action {
            Action::Dashboard { search } => Ok(dashboard(inventory, search.as_deref())),
            Action::Items { search } => {
                let items = match search {
                    Some(query) => inventory.search_items(query),
                    None => inventory.items(),
                };
                Ok(format!("{}\n", item_table(&items)))
            }
            Action::History { search, limit } => {
                let log = match search {
                    Some(query) => inventory.search_log(query),
                    None => inventory.log(),
                };
                Ok(format!(
                    "{}\n",
                    transaction_table(&log.into_iter().take(*limit).collect::<Vec<_>>())
                ))
            }
            Action::StockIn { name, size, quantity } => {
                let (name, size) = (name.trim(), size.trim());
                if name.is_empty() || size.is_empty() {
                    return Err(invalid!("Item name and size are required."));
                }
                positive(*quantity)?;
                Ok(recorded(&inventory.stock_in(name, size, *quantity)))
            }
            Action::StockOut { entries } => {
                let entries = check_stock_out(inventory, entries)?;
                Ok(recorded(&inventory.batch_stock_out(&entries)))
            }
            Action::Return { item, quantity } => {
                let item = known_item(inventory, item).map_err(|_| invalid!("Please select a valid item."))?;
                positive(*quantity)?;
                Ok(recorded(&inventory.process_return(&item.name, &item.size, *quantity)))
            }
            Action::Adjust {
                item,
                quantity,
                passcode,
            } => {
                let item = known_item(inventory, item)?;
                if *quantity == 0 {
                    return Err(invalid!("Quantity to remove must be greater than zero."));
                }
                if *quantity > item.quantity {
                    return Err(invalid!("Cannot remove more than available. On hand: {}", item.quantity));
                }
                let Some(expected) = self.cli()?.adjust_passcode()
                else {
                    return Err(LedgerError::Config(
                        "Stock adjustments are disabled: no adjustment passcode is configured.".to_string(),
                    ));
                };
                if passcode.as_deref() != Some(expected.as_str()) {
                    return Err(invalid!("Incorrect password. Please try again."));
                }
                Ok(recorded(&inventory.adjust_stock(&item.id, *quantity)))
            }
            Action::Ask { question } => {
                let question = check_question(question)?;
                let cli = self.cli()?;
                let client = match cli.gemini_api_key() {
                    Some(key) => GeminiClient::new(key)?,
                    None => GeminiClient::from_env()?,
                }
                .with_model(cli.gemini_model())
                .with_api_url(cli.gemini_api_url());
                let answer = inventory.ask(&client, question).await?;
                Ok(format!("{}\n", render_emphasis(answer.trim_end())))
            }
        }
    }

    pub async fn execute(&self) -> Result<()> {
        self.setup_tracing()?;

        let text = self.report().await?;
        if !self.cli()?.quiet() {
            print!("{text}");
        }

        Ok(())
    }

    pub async fn run() -> Result<()> {
        LedgerApp::__fieldx_new().execute().await
    }
}

impl LedgerAppBuilder {
    pub fn cli_args<S: ToString>(self, args: Vec<S>) -> Self {
        self._cli_args(args.into_iter().map(|s| s.to_string()).collect())
    }
}

impl Debug for LedgerApp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "LedgerApp {{ ... }}")
    }
}

fn positive(quantity: u32) -> Result<()> {
    if quantity == 0 {
        Err(invalid!("Quantity must be greater than zero."))
    }
    else {
        Ok(())
    }
}

fn known_item(inventory: &Inventory, id: &str) -> Result<Item> {
    inventory
        .get(&ItemId::from(id.trim()))
        .ok_or_else(|| invalid!("Unknown item '{}'.", id.trim()))
}

// Entries with zero quantity are dropped. Repeated ids are checked against their combined quantity.
fn check_stock_out(inventory: &Inventory, entries: &[StockOutEntry]) -> Result<Vec<StockOutEntry>> {
    let entries = entries.iter().filter(|e| e.quantity > 0).cloned().collect::<Vec<_>>();
    if entries.is_empty() {
        return Err(invalid!("Please enter a quantity for at least one item."));
    }

    for entry in &entries {
        let item = known_item(inventory, entry.item_id.as_str())?;
        let requested = entries
            .iter()
            .filter(|e| e.item_id == entry.item_id)
            .map(|e| u64::from(e.quantity))
            .sum::<u64>();
        if requested > u64::from(item.quantity) {
            return Err(invalid!(
                "Cannot stock out more than available for {} ({}).",
                item.name,
                item.size
            ));
        }
    }

    Ok(entries)
}

fn recorded(transactions: &[Transaction]) -> String {
    let mut out = String::new();
    for tx in transactions {
        out.push_str(&format!(
            "{} {} x {} ({})\n",
            kind_label(tx),
            tx.quantity,
            tx.item_name,
            tx.item_size
        ));
    }
    out
}

fn kind_color(kind: TransactionKind) -> Color {
    match kind {
        TransactionKind::StockIn => Color::Green,
        TransactionKind::StockOut => Color::Red,
        TransactionKind::Return => Color::Blue,
        TransactionKind::Adjustment => Color::Yellow,
    }
}

fn kind_label(tx: &Transaction) -> String {
    style(tx.kind).fg(kind_color(tx.kind)).to_string()
}

#[derive(Debug, PartialEq, Eq)]
enum StockLevel {
    Out,
    Low,
    Fine,
}

impl StockLevel {
    fn of(quantity: u32) -> Self {
        match quantity {
            0 => Self::Out,
            q if q < LOW_STOCK => Self::Low,
            _ => Self::Fine,
        }
    }
}

fn summary_table(summary: &Summary) -> Table {
    let mut table = Table::new();
    table
        .load_preset(comfy_table::presets::ASCII_FULL_CONDENSED)
        .set_header(["Total units", "Products", "Out of stock"])
        .add_row([
            summary.total_units.to_string(),
            summary.product_names.to_string(),
            summary.out_of_stock.to_string(),
        ]);
    table
}

fn item_table(items: &[Item]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(comfy_table::presets::ASCII_FULL_CONDENSED)
        .set_header(["Item", "Size", "Id", "Quantity"]);
    for item in items {
        let quantity = match StockLevel::of(item.quantity) {
            StockLevel::Out => style("out of stock").red().to_string(),
            StockLevel::Low => style(item.quantity).red().to_string(),
            StockLevel::Fine => item.quantity.to_string(),
        };
        table.add_row([item.name.clone(), item.size.clone(), item.id.to_string(), quantity]);
    }
    if let Some(column) = table.column_mut(3) {
        column.set_cell_alignment(CellAlignment::Right);
    }
    table
}

fn transaction_table(log: &[Transaction]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(comfy_table::presets::ASCII_FULL_CONDENSED)
        .set_header(["Date", "Type", "Item", "Size", "Quantity"]);
    for tx in log {
        table.add_row([
            tx.timestamp
                .with_timezone(&chrono::Local)
                .format("%Y-%m-%d %H:%M")
                .to_string(),
            kind_label(tx),
            tx.item_name.clone(),
            tx.item_size.clone(),
            tx.quantity.to_string(),
        ]);
    }
    if let Some(column) = table.column_mut(4) {
        column.set_cell_alignment(CellAlignment::Right);
    }
    table
}

fn dashboard(inventory: &Inventory, search: Option<&str>) -> String {
    let (items, log) = match search {
        Some(query) => (inventory.search_items(query), inventory.search_log(query)),
        None => (inventory.items(), inventory.log()),
    };
    let recent = log.into_iter().take(DASHBOARD_RECENT).collect::<Vec<_>>();

    format!(
        "{}\n\n{}\n\n{}\n{}\n",
        summary_table(&inventory.summary()),
        item_table(&items),
        style("Recent transactions").bold(),
        transaction_table(&recent)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let args = vec![
            "cmd",
            "--memory",
            "--quiet",
            "--history-limit",
            "20",
            "--return-mode",
            "relabel",
            "stock-out",
            "joto-1kg=5",
            "maziwa-2kg=3",
        ];
        let cli = Cli::try_parse_from(args).expect("Failed to parse CLI arguments");
        assert!(cli.memory());
        assert!(cli.quiet());
        assert_eq!(cli.history_limit(), 20);
        assert_eq!(cli.return_mode(), ReturnMode::Relabel);
        let Action::StockOut { entries } = cli.action()
        else {
            panic!("expected stock-out, got {:?}", cli.action());
        };
        assert_eq!(
            entries,
            vec![StockOutEntry::new("joto-1kg", 5), StockOutEntry::new("maziwa-2kg", 3)]
        );
    }

    #[test]
    fn backends_are_exclusive() {
        assert!(Cli::try_parse_from(["cmd", "--memory", "--sqlite", "items"]).is_err());
        assert!(Cli::try_parse_from(["cmd", "stock-out", "joto-1kg"]).is_err());
    }

    #[test]
    fn ask_help_lists_examples() {
        let err = Cli::try_parse_from(["cmd", "ask", "--help"]).expect_err("help is not a parse result");
        assert_eq!(err.kind(), ErrorKind::DisplayHelp);
        assert!(err
            .to_string()
            .contains("Which items are running low and should be reordered?"));
    }

    #[test]
    fn stock_levels() {
        assert_eq!(StockLevel::of(0), StockLevel::Out);
        assert_eq!(StockLevel::of(1), StockLevel::Low);
        assert_eq!(StockLevel::of(19), StockLevel::Low);
        assert_eq!(StockLevel::of(20), StockLevel::Fine);
    }

    #[test]
    fn every_kind_has_its_own_color() {
        use strum::IntoEnumIterator;

        let colors = TransactionKind::iter().map(kind_color).collect::<Vec<_>>();
        assert_eq!(colors, vec![Color::Green, Color::Red, Color::Blue, Color::Yellow]);
    }

    #[tokio::test]
    async fn stock_out_validation() {
        let store = Arc::new(MemoryStore::with_items(vec![
            Item::new("Joto", "1kg", 10),
            Item::new("Magadi", "2kg", 5),
        ]));
        let options = LedgerOptions::builder().build().expect("options build");
        let inventory = Inventory::open(store.clone(), store, options).await.expect("inventory");

        let ok = check_stock_out(
            &inventory,
            &[StockOutEntry::new("joto-1kg", 4), StockOutEntry::new("magadi-2kg", 0)],
        )
        .expect("valid request");
        assert_eq!(ok, vec![StockOutEntry::new("joto-1kg", 4)]);

        assert!(check_stock_out(&inventory, &[StockOutEntry::new("magadi-2kg", 0)]).is_err());
        assert!(check_stock_out(&inventory, &[StockOutEntry::new("nope-1kg", 1)]).is_err());
        assert!(check_stock_out(
            &inventory,
            &[StockOutEntry::new("joto-1kg", 6), StockOutEntry::new("joto-1kg", 5)]
        )
        .is_err());
    }
}
