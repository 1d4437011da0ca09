//! Per-record messaging pipeline: open profile, open composer, fill, send.

use std::time::Duration;

use anyhow::Result;
use tracing::{info, warn};

use crate::probe::probe;
use crate::session::Session;
use crate::types::Connection;

/// Placeholder substituted with the record's name
pub const NAME_PLACEHOLDER: &str = "[Name]";

const COMPOSE_BUTTONS: &[&str] = &[
    "button[aria-label*='Message']",
    "button[aria-label^='Send message']",
    ".pv-s-profile-actions button[aria-label*='Message']",
    "[data-test-message-button]",
];

const MESSAGE_INPUTS: &[&str] = &[
    ".msg-form__contenteditable",
    "[data-test-message-compose]",
    ".msg-form__msg-content-container",
    "div[role='textbox']",
];

const SEND_BUTTONS: &[&str] = &[
    "button.msg-form__send-button",
    "[data-test-send-button]",
    "button[type='submit']",
];

const CLICK_TIMEOUT: Duration = Duration::from_secs(5);
const COMPOSER_TIMEOUT: Duration = Duration::from_secs(10);
/// Let the profile page settle after navigation
const SETTLE_DELAY: Duration = Duration::from_secs(2);
/// Pause between filling and sending, like a human re-reading the draft
const PRE_SEND_DELAY: Duration = Duration::from_secs(1);

/// Render the message body for one record
pub fn render_template(template: &str, name: &str) -> String {
    template.replace(NAME_PLACEHOLDER, name)
}

/// Message one connection. Never propagates an error: any failed step is
/// logged and reported as `false`, and the batch moves on. A half-typed
/// draft on a failed record is abandoned with the page.
pub async fn send_message(session: &Session, connection: &Connection, template: &str) -> bool {
    info!("Attempting to message {}", connection.name);

    match try_send(session, connection, template).await {
        Ok(()) => {
            info!("Message sent to {}", connection.name);
            true
        }
        Err(e) => {
            warn!("Failed to message {}: {:#}", connection.name, e);
            false
        }
    }
}

async fn try_send(session: &Session, connection: &Connection, template: &str) -> Result<()> {
    session.goto(&connection.link).await?;
    tokio::time::sleep(SETTLE_DELAY).await;

    probe("message button", COMPOSE_BUTTONS, CLICK_TIMEOUT, |sel| {
        async move {
            let button = session.wait_for(&sel).await?;
            session.click(&button).await?;
            Ok(())
        }
    })
    .await?;

    let input = probe("message dialog", MESSAGE_INPUTS, COMPOSER_TIMEOUT, |sel| {
        async move { session.wait_for(&sel).await }
    })
    .await?;

    let body = render_template(template, &connection.name);
    session.fill(&input, &body).await?;
    tokio::time::sleep(PRE_SEND_DELAY).await;

    probe("send button", SEND_BUTTONS, CLICK_TIMEOUT, |sel| async move {
        let button = session.wait_for(&sel).await?;
        session.click(&button).await?;
        Ok(())
    })
    .await?;

    Ok(())
}

#[cfg(test)]
#[path = "message_test.rs"]
mod message_test;
