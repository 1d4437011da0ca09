//! Ordered selector-fallback probing.
//!
//! The target application's DOM is not a stable contract, so every lookup
//! carries a list of candidate selectors. A probe tries them strictly in
//! order, gives each one its own timeout, and stops at the first success.
//! A candidate that fails or times out gets no retry; the next one is tried.

use std::future::Future;
use std::time::Duration;

use anyhow::Result;
use thiserror::Error;
use tracing::{debug, warn};

/// Every candidate in a probe list failed or timed out.
///
/// Not fatal by itself: the caller decides. Login treats it as run-fatal,
/// scraping treats a missing list as zero results, messaging treats it as a
/// single-record failure.
#[derive(Debug, Error)]
#[error("all {attempts} candidate selectors failed for {context}")]
pub struct AllCandidatesFailed {
    /// What was being located, for logs and screenshots
    pub context: &'static str,
    /// Number of candidates attempted (always the full list)
    pub attempts: usize,
}

/// Try `attempt` against each candidate in order, returning the first success.
///
/// Each attempt is bounded by `per_candidate`; a timeout is a final verdict
/// for that candidate only. Returns [`AllCandidatesFailed`] after exactly
/// `candidates.len()` attempts if none succeed.
pub async fn probe<T, F, Fut>(
    context: &'static str,
    candidates: &[&str],
    per_candidate: Duration,
    mut attempt: F,
) -> Result<T, AllCandidatesFailed>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    for candidate in candidates {
        match tokio::time::timeout(per_candidate, attempt(candidate.to_string())).await {
            Ok(Ok(value)) => {
                debug!("{}: matched candidate '{}'", context, candidate);
                return Ok(value);
            }
            Ok(Err(e)) => {
                debug!("{}: candidate '{}' failed: {:#}", context, candidate, e);
            }
            Err(_) => {
                debug!(
                    "{}: candidate '{}' timed out after {:?}",
                    context, candidate, per_candidate
                );
            }
        }
    }

    warn!(
        "{}: no candidate matched ({} tried)",
        context,
        candidates.len()
    );
    Err(AllCandidatesFailed {
        context,
        attempts: candidates.len(),
    })
}

#[cfg(test)]
#[path = "probe_test.rs"]
mod probe_test;
