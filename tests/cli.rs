
use serde_json::json;
use stock_ledger::app::LedgerApp;
use stock_ledger::error::LedgerError;
use stock_ledger::insight::InsightError;
use wiremock::matchers::header;
use wiremock::matchers::method;
use wiremock::matchers::path;
use wiremock::Mock;
use wiremock::MockServer;
use wiremock::ResponseTemplate;

async fn report(args: &[&str]) -> Result<String, LedgerError> {
    console::set_colors_enabled(false);
    let mut cli_args = vec!["stock-ledger_test"];
    cli_args.extend_from_slice(args);
    let app = LedgerApp::builder().cli_args(cli_args).build()?;
    app.report().await
}

#[cfg(feature = "sqlite")]
fn db_arg(dir: &std::path::Path) -> String {
    format!("--sqlite-path={}", dir.join("cli.db").display())
}

#[tokio::test]
async fn memory_dashboard() -> Result<(), Box<dyn std::error::Error>> {
    let out = report(&["--memory", "dashboard"]).await?;
    assert!(out.contains("1050"), "{out}");
    assert!(out.contains("stocklick-20kg"), "{out}");
    assert!(out.contains("Backend: memory"), "{out}");

    let out = report(&["--memory", "items", "--search", "magadi"]).await?;
    assert!(out.contains("magadi-2kg"));
    assert!(!out.contains("joto-1kg"));

    Ok(())
}

#[tokio::test]
async fn validation_messages() {
    let err = report(&["--memory", "stock-in", "Joto", "1kg", "0"])
        .await
        .expect_err("zero quantity");
    assert!(err.to_string().contains("greater than zero"), "{err}");

    let err = report(&["--memory", "stock-out", "joto-1kg=101"])
        .await
        .expect_err("more than on hand");
    assert!(err.to_string().contains("Joto (1kg)"), "{err}");

    let err = report(&["--memory", "return", "nothing-here", "1"])
        .await
        .expect_err("unknown item");
    assert!(err.to_string().contains("valid item"), "{err}");

    let err = report(&["--memory", "adjust", "joto-1kg", "5", "--passcode", "x"])
        .await
        .expect_err("no passcode configured");
    assert!(matches!(err, LedgerError::Config(_)), "{err}");

    let err = report(&[
        "--memory",
        "--adjust-passcode",
        "secret",
        "adjust",
        "joto-1kg",
        "5",
        "--passcode",
        "wrong",
    ])
    .await
    .expect_err("wrong passcode");
    assert!(err.to_string().contains("Incorrect password"), "{err}");

    let err = report(&["--memory", "--history-limit", "0", "items"])
        .await
        .expect_err("zero history limit");
    assert!(matches!(err, LedgerError::Cli(_)), "{err}");
}

#[cfg(feature = "sqlite")]
#[tokio::test]
async fn sqlite_state_survives_runs() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::Builder::new().prefix("stock-ledger-cli").tempdir()?;
    let db = db_arg(dir.path());

    let out = report(&["--sqlite", db.as_str(), "stock-in", "Chumvi", "500g", "40"]).await?;
    assert!(out.contains("Stock In 40 x Chumvi (500g)"), "{out}");

    report(&["--sqlite", db.as_str(), "stock-out", "chumvi-500g=15", "joto-1kg=10"]).await?;
    report(&[db.as_str(), "return", "chumvi-500g", "2"]).await?;
    let out = report(&[
        db.as_str(),
        "--adjust-passcode",
        "secret",
        "adjust",
        "chumvi-500g",
        "7",
        "--passcode",
        "secret",
    ])
    .await?;
    assert!(out.contains("Stock Correction 7 x Chumvi (500g)"), "{out}");

    let out = report(&[db.as_str(), "items", "--search", "chumvi"]).await?;
    assert!(out.contains("20"), "{out}");

    let out = report(&[db.as_str(), "history", "--limit", "2"]).await?;
    assert!(out.contains("Stock Correction"), "{out}");
    assert!(out.contains("Return"), "{out}");
    assert!(!out.contains("Stock Out"), "{out}");

    let out = report(&[db.as_str(), "dashboard"]).await?;
    assert!(out.contains("Backend: SQLite"), "{out}");
    assert!(out.contains(&(1050 + 40 - 15 - 10 + 2 - 7).to_string()), "{out}");

    Ok(())
}

#[tokio::test]
async fn ask_goes_to_the_model() -> Result<(), Box<dyn std::error::Error>> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/gemini-2.5-flash:generateContent"))
        .and(header("x-goog-api-key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": { "parts": [{ "text": "Magadi 2kg is your **best seller**." }] }
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let api_url = format!("--gemini-api-url={}", server.uri());
    let out = report(&[
        "--memory",
        "--gemini-api-key",
        "test-key",
        api_url.as_str(),
        "ask",
        "What sells best?",
    ])
    .await?;
    assert!(out.contains("best seller"), "{out}");
    assert!(!out.contains("**"), "{out}");

    let err = report(&["--memory", "--gemini-api-key", "test-key", api_url.as_str(), "ask", "  "])
        .await
        .expect_err("blank question");
    assert!(matches!(err, LedgerError::Insight(InsightError::EmptyQuestion)), "{err}");

    Ok(())
}

#[tokio::test]
async fn ask_reports_api_errors() -> Result<(), Box<dyn std::error::Error>> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(403).set_body_string("API key not valid"))
        .mount(&server)
        .await;

    let api_url = format!("--gemini-api-url={}", server.uri());
    let err = report(&["--memory", "--gemini-api-key", "bad", api_url.as_str(), "ask", "Anything low?"])
        .await
        .expect_err("forbidden");
    assert!(
        matches!(err, LedgerError::Insight(InsightError::Api { status: 403, ref message }) if message.contains("not valid")),
        "{err}"
    );

    Ok(())
}
