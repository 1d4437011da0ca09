use std::env;
use std::time::Duration;

use crate::errors::OutreachError;

/// Environment variable holding the account email
pub const EMAIL_VAR: &str = "LINKEDIN_EMAIL";
/// Environment variable holding the account password
pub const PASSWORD_VAR: &str = "LINKEDIN_PASSWORD";
/// Environment variable toggling debug mode
pub const DEBUG_VAR: &str = "DEBUG_MODE";
/// Environment variable overriding the message template
pub const TEMPLATE_VAR: &str = "MESSAGE_TEMPLATE";

/// Default outreach message; `[Name]` is replaced per record.
pub const DEFAULT_TEMPLATE: &str = "Hi [Name], I hope you're doing well! I'm currently exploring \
new opportunities in software engineering and wanted to reach out. If you're aware of any \
openings at your company, or could point me in the right direction, I'd really appreciate it. \
Thanks a lot in advance!";

/// Login credentials read from the environment
#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Runtime configuration assembled from the environment.
///
/// Read once at startup, before any browser session is opened, so a missing
/// credential fails fast with a clear message.
#[derive(Debug, Clone)]
pub struct Config {
    pub credentials: Credentials,
    /// Visible browser, slower pacing, extra diagnostic screenshots
    pub debug_mode: bool,
    /// Message body with a `[Name]` placeholder
    pub template: String,
}

impl Config {
    /// Load configuration from the environment
    pub fn from_env() -> Result<Self, OutreachError> {
        let email = require_var(EMAIL_VAR)?;
        let password = require_var(PASSWORD_VAR)?;

        let debug_mode = env::var(DEBUG_VAR)
            .map(|v| parse_bool(&v))
            .unwrap_or(false);

        let template = env::var(TEMPLATE_VAR)
            .ok()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_TEMPLATE.to_string());

        Ok(Config {
            credentials: Credentials { email, password },
            debug_mode,
            template,
        })
    }

    /// Per-action pacing for the session: 1s in debug mode so an operator
    /// can follow along, zero otherwise
    pub fn slow_motion(&self) -> Duration {
        if self.debug_mode {
            Duration::from_secs(1)
        } else {
            Duration::ZERO
        }
    }
}

fn require_var(name: &str) -> Result<String, OutreachError> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(OutreachError::Configuration(format!(
            "{} must be set and non-empty",
            name
        ))),
    }
}

/// Accepts "true"/"1"/"yes" (case-insensitive) as true
pub fn parse_bool(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "true" | "1" | "yes"
    )
}

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;
