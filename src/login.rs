//! Session authentication against the LinkedIn login form.

use std::time::Duration;

use anyhow::Result;
use tracing::{error, info};

use crate::config::Credentials;
use crate::probe::probe;
use crate::session::Session;

const LOGIN_URL: &str = "https://www.linkedin.com/login";

/// The login form's field selectors vary across rollouts; try each in turn.
const USERNAME_FIELDS: &[&str] = &[
    "input#username",
    "input[name='session_key']",
    "input[type='email']",
];

const PASSWORD_FIELDS: &[&str] = &[
    "input#password",
    "input[name='session_password']",
    "input[type='password']",
];

const SUBMIT_BUTTONS: &[&str] = &[
    "button[type='submit']",
    "button[data-id='sign-in-form__submit-btn']",
    ".login__form_action_container button",
];

/// Elements that only render for an authenticated user
const LOGGED_IN_INDICATORS: &[&str] = &[
    "div.feed-identity-module",
    "nav.global-nav",
    "[data-test-global-nav]",
    ".global-nav__me",
];

/// URL fragments that mark a verification/challenge redirect
const CHALLENGE_MARKERS: &[&str] = &["challenge", "checkpoint"];

const FIELD_TIMEOUT: Duration = Duration::from_secs(5);
/// Indicators can take a while to render after submit
const CONFIRM_TIMEOUT: Duration = Duration::from_secs(30);

/// Terminal authentication states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginOutcome {
    /// A logged-in indicator rendered and no challenge redirect occurred
    Confirmed,
    /// The site demanded verification (captcha/2FA); not automatable
    ChallengeDetected,
    /// Form not found, submit not found, or no indicator rendered
    Failed,
}

/// Drive the login flow: locate the form, fill credentials, submit, confirm.
///
/// Captures a diagnostic screenshot on every failure path. A challenge
/// redirect takes precedence over a confirmed indicator.
pub async fn authenticate(
    session: &Session,
    credentials: &Credentials,
    debug_mode: bool,
) -> Result<LoginOutcome> {
    info!("Attempting to log in");
    session.goto(LOGIN_URL).await?;

    if debug_mode {
        session.screenshot("login-page").await;
    }

    let username_field = match probe("username field", USERNAME_FIELDS, FIELD_TIMEOUT, |sel| {
        async move { session.wait_for(&sel).await }
    })
    .await
    {
        Ok(element) => element,
        Err(_) => {
            error!("Could not find login form username field");
            session.screenshot("login-form-not-found").await;
            return Ok(LoginOutcome::Failed);
        }
    };

    let password_field = match probe("password field", PASSWORD_FIELDS, FIELD_TIMEOUT, |sel| {
        async move { session.wait_for(&sel).await }
    })
    .await
    {
        Ok(element) => element,
        Err(_) => {
            error!("Could not find login form password field");
            session.screenshot("login-form-not-found").await;
            return Ok(LoginOutcome::Failed);
        }
    };

    session.fill(&username_field, &credentials.email).await?;
    session.fill(&password_field, &credentials.password).await?;

    let submitted = probe("submit button", SUBMIT_BUTTONS, FIELD_TIMEOUT, |sel| {
        async move {
            let button = session.wait_for(&sel).await?;
            session.click(&button).await?;
            Ok(())
        }
    })
    .await;

    if submitted.is_err() {
        error!("Could not find login submit button");
        session.screenshot("submit-button-not-found").await;
        return Ok(LoginOutcome::Failed);
    }

    let confirmed = probe(
        "logged-in indicator",
        LOGGED_IN_INDICATORS,
        CONFIRM_TIMEOUT,
        |sel| async move { session.wait_for(&sel).await },
    )
    .await
    .is_ok();

    // A challenge redirect overrides any indicator match
    let landed = session.current_url().await?;
    if CHALLENGE_MARKERS.iter().any(|m| landed.contains(m)) {
        error!("Login redirected to a verification challenge: {}", landed);
        session.screenshot("login-challenge").await;
        return Ok(LoginOutcome::ChallengeDetected);
    }

    if !confirmed {
        error!("Login failed: no logged-in indicator rendered");
        session.screenshot("login-failed").await;
        return Ok(LoginOutcome::Failed);
    }

    info!("Successfully logged in");
    Ok(LoginOutcome::Confirmed)
}
