//! # outreach
#![allow(clippy::uninlined_format_args)]
//!
//! Automates templated outreach messages to LinkedIn connections via
//! WebDriver.
//!
//! A run logs into the account, scrapes the connections list into
//! `{name, link}` records, writes them to a JSON snapshot, then messages
//! each connection sequentially with a uniform-random delay between sends.
//!
//! The target DOM is not a stable contract, so every element lookup goes
//! through an ordered selector-fallback probe ([`probe::probe`]). Candidate
//! selectors are tried in order, each with its own timeout, and the first
//! match wins. Callers decide what a failed probe means: login treats it as
//! fatal, scraping reports zero results, messaging skips the record.
//!
//! ## Usage
//!
//! ```bash
//! export LINKEDIN_EMAIL="user@example.com"
//! export LINKEDIN_PASSWORD="..."
//!
//! # Requires a running WebDriver (geckodriver --port 4444)
//! outreach
//!
//! # Scrape the connection list without messaging anyone
//! outreach --scrape-only
//!
//! # Message at most 5 connections, pacing 20-60s apart
//! outreach --limit 5 --min-delay 20 --max-delay 60
//! ```
//!
//! Exit codes: 0 on completion (even with per-record failures), 2 missing
//! configuration, 3 authentication failure, 4 verification challenge,
//! 5 zero records scraped.

/// Sequential batch runner with randomized throttling
pub mod batch;

/// Environment configuration and credentials
pub mod config;

/// Error taxonomy with process exit codes
pub mod errors;

/// Login flow and confirmation
pub mod login;

/// Per-record messaging pipeline
pub mod message;

/// Ordered selector-fallback probing
pub mod probe;

/// Scraper for the connections listing
pub mod scrape;

/// WebDriver session wrapper
pub mod session;

/// Record and result types
pub mod types;

pub use batch::{run_batch, Throttle};
pub use config::{Config, Credentials};
pub use errors::OutreachError;
pub use login::{authenticate, LoginOutcome};
pub use message::send_message;
pub use probe::{probe, AllCandidatesFailed};
pub use scrape::scrape_connections;
pub use session::{BrowserKind, Session};
pub use types::{Connection, RunResult};
