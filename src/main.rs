#![allow(clippy::uninlined_format_args)]

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use outreach::{
    authenticate, run_batch, scrape_connections, send_message, BrowserKind, Config, Connection,
    LoginOutcome, OutreachError, Session, Throttle,
};

#[derive(Parser)]
#[command(name = "outreach")]
#[command(about = "Sends a templated message to each LinkedIn connection", long_about = None)]
struct Cli {
    /// Browser to use (firefox or chrome)
    #[arg(short, long, default_value = "firefox")]
    browser: String,

    /// Run the browser in visible mode (debug mode implies this)
    #[arg(long = "no-headless")]
    no_headless: bool,

    /// Minimum delay between messages, in seconds
    #[arg(long, default_value_t = Throttle::DEFAULT_MIN.as_secs())]
    min_delay: u64,

    /// Maximum delay between messages, in seconds
    #[arg(long, default_value_t = Throttle::DEFAULT_MAX.as_secs())]
    max_delay: u64,

    /// Where to write the scraped-connections snapshot
    #[arg(long, default_value = "connections.json")]
    snapshot: PathBuf,

    /// Message at most this many connections
    #[arg(long)]
    limit: Option<usize>,

    /// Scrape and write the snapshot, then stop without messaging
    #[arg(long)]
    scrape_only: bool,
}

#[tokio::main]
async fn main() {
    match run().await {
        Ok(()) => std::process::exit(0),
        Err(err) => {
            eprintln!("Error: {}", err);
            std::process::exit(err.exit_code());
        }
    }
}

async fn run() -> Result<(), OutreachError> {
    // Logs go to stderr so the snapshot path on stdout stays clean
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "outreach=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();

    let cli = Cli::parse();

    // All pre-flight validation happens before a browser session is opened
    let config = Config::from_env()?;
    let throttle = Throttle::new(
        Duration::from_secs(cli.min_delay),
        Duration::from_secs(cli.max_delay),
    )
    .map_err(|e| OutreachError::Configuration(e.to_string()))?;
    let browser: BrowserKind = cli
        .browser
        .parse()
        .map_err(|e: anyhow::Error| OutreachError::Configuration(e.to_string()))?;

    info!(
        "Starting outreach run (debug mode: {})",
        if config.debug_mode { "on" } else { "off" }
    );

    let headless = !(config.debug_mode || cli.no_headless);
    let session = Session::launch(browser, headless, config.slow_motion()).await?;

    let outcome = drive(&session, &cli, &config, &throttle).await;

    if let Err(OutreachError::Other(_)) = &outcome {
        // Unexpected failure somewhere mid-run; capture the page we died on
        session.screenshot("fatal-error").await;
    }

    if let Err(e) = session.close().await {
        error!("Failed to close browser session: {:#}", e);
    }

    outcome
}

/// Everything that needs the live session: login, scrape, snapshot, batch
async fn drive(
    session: &Session,
    cli: &Cli,
    config: &Config,
    throttle: &Throttle,
) -> Result<(), OutreachError> {
    match authenticate(session, &config.credentials, config.debug_mode).await? {
        LoginOutcome::Confirmed => {}
        LoginOutcome::ChallengeDetected => return Err(OutreachError::ChallengeDetected),
        LoginOutcome::Failed => {
            return Err(OutreachError::AuthenticationFailed(
                "login form or confirmation indicators not found".to_string(),
            ))
        }
    }

    let mut connections = scrape_connections(session).await?;
    if connections.is_empty() {
        return Err(OutreachError::NoRecords);
    }

    // Snapshot before messaging so the scrape survives a later crash
    write_snapshot(&cli.snapshot, &connections)?;
    println!("{}", cli.snapshot.display());

    for (i, connection) in connections.iter().enumerate() {
        info!("{}. {} - {}", i + 1, connection.name, connection.link);
    }

    if cli.scrape_only {
        info!("Scrape-only mode; skipping messaging");
        return Ok(());
    }

    if let Some(limit) = cli.limit {
        connections.truncate(limit);
    }

    info!("Sending messages to {} connections", connections.len());
    let result = run_batch(&connections, throttle, |connection| async move {
        send_message(session, &connection, &config.template).await
    })
    .await;

    info!("Messaging completed");
    info!("Successful messages: {}", result.success);
    info!("Failed messages: {}", result.failure);
    info!("Success rate: {:.1}%", result.success_rate());

    Ok(())
}

fn write_snapshot(path: &Path, connections: &[Connection]) -> Result<(), OutreachError> {
    let json = serde_json::to_string_pretty(connections)
        .context("Failed to serialize connections")
        .map_err(OutreachError::Other)?;
    std::fs::write(path, json)
        .context(format!("Failed to write snapshot to {}", path.display()))
        .map_err(OutreachError::Other)?;
    info!(
        "Saved {} connections to {}",
        connections.len(),
        path.display()
    );
    Ok(())
}
