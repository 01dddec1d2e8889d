use stock_ledger::app::LedgerApp;
use stock_ledger::error::LedgerError;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    match LedgerApp::run().await {
        Err(LedgerError::Cli(err)) => err.exit(),
        outcome => Ok(outcome?),
    }
}
