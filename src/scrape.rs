//! Scrapes the connections listing into `Connection` records.

use std::time::{Duration, Instant};

use anyhow::Result;
use fantoccini::{elements::Element, Locator};
use tracing::{debug, error, info};
use url::Url;

use crate::probe::probe;
use crate::session::Session;
use crate::types::Connection;

const CONNECTIONS_URL: &str = "https://www.linkedin.com/mynetwork/invite-connect/connections/";

const LIST_CONTAINERS: &[&str] = &[
    "ul.mn-connection-list",
    ".mn-connections",
    "[data-test-connections-list]",
    ".artdeco-list",
];

const CARD_CONTAINERS: &[&str] = &[
    ".mn-connection-card",
    ".connection-card",
    "[data-test-connection-list-item]",
];

const NAME_FIELDS: &[&str] = &[
    ".mn-connection-card__name",
    ".connection-card__name",
    ".actor-name",
    "[data-test-connection-name]",
];

const LINK_FIELDS: &[&str] = &[
    "a[href*='/in/']",
    "a.mn-connection-card__link",
    "a.connection-card__link",
];

const LIST_TIMEOUT: Duration = Duration::from_secs(30);
const CARDS_TIMEOUT: Duration = Duration::from_secs(10);
/// Card sub-fields are immediate DOM queries; the timeout is a formality
const FIELD_TIMEOUT: Duration = Duration::from_secs(2);

/// Incremental-load scroll step in pixels
const SCROLL_STEP: i64 = 100;
/// Pause between scroll steps
const SCROLL_PAUSE: Duration = Duration::from_millis(100);
/// Hard ceiling on the scroll loop
const SCROLL_CEILING: Duration = Duration::from_secs(30);

/// Scrape the connections list. Requires a confirmed login.
///
/// A listing that cannot be found yields an empty vec (with a diagnostic
/// screenshot), not an error; the caller decides what zero records means.
/// Cards missing a name or link are dropped silently. Output order is DOM
/// order at scrape time.
pub async fn scrape_connections(session: &Session) -> Result<Vec<Connection>> {
    info!("Navigating to connections page");
    session.goto(CONNECTIONS_URL).await?;

    let list_found = probe("connections list", LIST_CONTAINERS, LIST_TIMEOUT, |sel| {
        async move { session.wait_for(&sel).await }
    })
    .await
    .is_ok();

    if !list_found {
        error!("Could not find connections list");
        session.screenshot("connections-list-not-found").await;
        return Ok(Vec::new());
    }

    info!("Scrolling to load connections");
    scroll_to_load(session).await?;

    // First card selector that matches anything wins
    let cards = match probe("connection cards", CARD_CONTAINERS, CARDS_TIMEOUT, |sel| {
        async move {
            let elements = session.find_all(&sel).await?;
            if elements.is_empty() {
                anyhow::bail!("no elements matched");
            }
            Ok(elements)
        }
    })
    .await
    {
        Ok(elements) => elements,
        Err(_) => {
            error!("No connection cards found with any selector");
            session.screenshot("no-connections-found").await;
            return Ok(Vec::new());
        }
    };

    let base = session.current_url().await?;
    let mut connections = Vec::new();
    for card in &cards {
        if let Some(connection) = extract_card(card, &base).await {
            connections.push(connection);
        }
    }

    info!(
        "Scraped {} connections from {} cards",
        connections.len(),
        cards.len()
    );
    Ok(connections)
}

/// Scroll the viewport in fixed steps until the cumulative distance covers
/// the document height measured before the loop, or the ceiling elapses.
///
/// The target height is deliberately not re-measured per step: content that
/// loads during scrolling can grow the document past the captured target, so
/// this is best-effort loading, traded for a bounded loop.
async fn scroll_to_load(session: &Session) -> Result<()> {
    let target_height = session.page_height().await?;
    let started = Instant::now();
    let mut scrolled: f64 = 0.0;

    while scrolled < target_height && started.elapsed() < SCROLL_CEILING {
        session.scroll_by(SCROLL_STEP).await?;
        scrolled += SCROLL_STEP as f64;
        tokio::time::sleep(SCROLL_PAUSE).await;
    }

    debug!(
        "Scrolled {}px of {}px target in {:?}",
        scrolled,
        target_height,
        started.elapsed()
    );
    Ok(())
}

/// Pull name and link out of one card; None if either is missing or empty
async fn extract_card(card: &Element, base_url: &str) -> Option<Connection> {
    let name = probe("card name", NAME_FIELDS, FIELD_TIMEOUT, |sel| async move {
        let element = card.find(Locator::Css(&sel)).await?;
        let text = element.text().await?;
        if text.trim().is_empty() {
            anyhow::bail!("empty name");
        }
        Ok(text)
    })
    .await
    .ok()?;

    let href = probe("card link", LINK_FIELDS, FIELD_TIMEOUT, |sel| async move {
        let element = card.find(Locator::Css(&sel)).await?;
        match element.attr("href").await? {
            Some(href) if !href.trim().is_empty() => Ok(href),
            _ => anyhow::bail!("empty link"),
        }
    })
    .await
    .ok()?;

    let link = absolutize(&href, base_url)?;
    Connection::new(&name, &link)
}

/// Resolve a possibly-relative profile href against the listing page URL
fn absolutize(href: &str, base_url: &str) -> Option<String> {
    if let Ok(url) = Url::parse(href) {
        return Some(url.to_string());
    }
    let base = Url::parse(base_url).ok()?;
    base.join(href).ok().map(|u| u.to_string())
}

#[cfg(test)]
#[path = "scrape_test.rs"]
mod scrape_test;
