// Unit tests for the selector-fallback probe

use super::*;
use pretty_assertions::assert_eq;
use std::sync::atomic::{AtomicUsize, Ordering};

const CANDIDATES: &[&str] = &["#first", ".second", "[data-third]"];
const TIMEOUT: Duration = Duration::from_millis(100);

#[tokio::test]
async fn test_first_success_short_circuits() {
    let attempts = AtomicUsize::new(0);
    let mut tried = Vec::new();

    let result = probe("test target", CANDIDATES, TIMEOUT, |sel| {
        attempts.fetch_add(1, Ordering::SeqCst);
        tried.push(sel.clone());
        async move { Ok::<_, anyhow::Error>(sel) }
    })
    .await;

    assert_eq!(result.unwrap(), "#first");
    assert_eq!(attempts.load(Ordering::SeqCst), 1);
    assert_eq!(tried, vec!["#first"]);
}

#[tokio::test]
async fn test_candidates_tried_in_declared_order() {
    let mut tried = Vec::new();

    let result = probe("test target", CANDIDATES, TIMEOUT, |sel| {
        tried.push(sel.clone());
        async move {
            if sel == "[data-third]" {
                Ok(sel)
            } else {
                anyhow::bail!("not found")
            }
        }
    })
    .await;

    assert_eq!(result.unwrap(), "[data-third]");
    assert_eq!(tried, vec!["#first", ".second", "[data-third]"]);
}

#[tokio::test]
async fn test_all_failures_attempts_every_candidate_once() {
    let attempts = AtomicUsize::new(0);

    let result: Result<(), _> = probe("test target", CANDIDATES, TIMEOUT, |_sel| {
        attempts.fetch_add(1, Ordering::SeqCst);
        async { anyhow::bail!("not found") }
    })
    .await;

    let err = result.unwrap_err();
    assert_eq!(err.context, "test target");
    assert_eq!(err.attempts, CANDIDATES.len());
    assert_eq!(attempts.load(Ordering::SeqCst), CANDIDATES.len());
}

#[tokio::test(start_paused = true)]
async fn test_timeout_is_final_for_that_candidate_only() {
    let result = probe("test target", CANDIDATES, TIMEOUT, |sel| async move {
        if sel == "#first" {
            // Never resolves; the per-candidate timeout must cut it off
            tokio::time::sleep(Duration::from_secs(3600)).await;
        }
        Ok(sel)
    })
    .await;

    // Second candidate succeeds after the first times out
    assert_eq!(result.unwrap(), ".second");
}

#[tokio::test]
async fn test_empty_candidate_list_fails_immediately() {
    let attempts = AtomicUsize::new(0);

    let result: Result<(), _> = probe("test target", &[], TIMEOUT, |_sel| {
        attempts.fetch_add(1, Ordering::SeqCst);
        async { anyhow::bail!("not found") }
    })
    .await;

    assert_eq!(result.unwrap_err().attempts, 0);
    assert_eq!(attempts.load(Ordering::SeqCst), 0);
}
