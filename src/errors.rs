use thiserror::Error;

/// Top-level error type carrying process exit codes.
///
/// Per-record messaging failures are not errors at this level: a run that
/// authenticates, scrapes at least one connection, and finishes its batch
/// exits 0 even if some messages failed.
#[derive(Debug, Error)]
pub enum OutreachError {
    /// Required configuration is missing or invalid (exit code 2)
    #[error("configuration error: {0}")]
    Configuration(String),
    /// Login did not reach a confirmed state (exit code 3)
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),
    /// Login was redirected to a verification challenge (exit code 4)
    #[error("login requires additional verification (captcha/2FA); not automatable")]
    ChallengeDetected,
    /// Scraping produced no usable records (exit code 5)
    #[error("no connections scraped; nothing to do")]
    NoRecords,
    /// Generic error (exit code 1)
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl OutreachError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            OutreachError::Configuration(_) => 2,
            OutreachError::AuthenticationFailed(_) => 3,
            OutreachError::ChallengeDetected => 4,
            OutreachError::NoRecords => 5,
            OutreachError::Other(_) => 1,
        }
    }
}

#[cfg(test)]
#[path = "errors_test.rs"]
mod errors_test;
