use clap::Parser;
use credcycle::core::{Config, FailurePolicy};
use credcycle::{ChromeSession, FixtureSet, RotationFlow, Runner, SessionDriver};
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "credcycle", about = "Login/password-rotation regression harness")]
struct Cli {
    /// Directory holding usernames.csv, password.txt and new_password.txt
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    /// Optional JSON config file; CLI flags override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Login base URL of the target application
    #[arg(long)]
    base_url: Option<String>,

    /// Run with a visible browser window
    #[arg(long)]
    headed: bool,

    /// What to do with remaining credentials after one fails
    #[arg(long, value_enum)]
    failure_policy: Option<FailurePolicy>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    if let Some(base_url) = cli.base_url {
        config.target.base_url = base_url;
    }
    if cli.headed {
        config.browser.headless = false;
    }
    if let Some(policy) = cli.failure_policy {
        config.suite.failure_policy = policy;
    }

    // Fixtures are fatal before any browser interaction begins.
    let fixtures = FixtureSet::load(&cli.data_dir)?;
    info!(
        credentials = fixtures.credentials.len(),
        data_dir = %cli.data_dir.display(),
        "fixtures loaded"
    );

    let mut driver = ChromeSession::launch(&config.browser).await?;
    info!(session_id = %driver.session_id(), target = %config.target.base_url, "browser session ready");

    let flow = RotationFlow::new(config.target.clone(), config.suite.clone());
    let runner = Runner::new(flow, config.suite.failure_policy);
    let summary = runner
        .run(
            &driver,
            &fixtures.credentials,
            &fixtures.initial_password,
            &fixtures.new_password,
        )
        .await;

    driver.close().await?;

    for outcome in &summary.outcomes {
        match outcome.failure_reason() {
            None => info!(username = %outcome.username, "PASS"),
            Some(reason) => error!(username = %outcome.username, %reason, "FAIL"),
        }
    }
    info!(
        passed = summary.passed_count(),
        failed = summary.failed_count(),
        attempted = summary.outcomes.len(),
        "run complete"
    );

    if !summary.all_passed() {
        std::process::exit(1);
    }
    Ok(())
}
