// Unit tests for the batch runner and throttle

use super::*;
use pretty_assertions::assert_eq;

fn records(n: usize) -> Vec<Connection> {
    (0..n)
        .map(|i| {
            Connection::new(
                &format!("Person {}", i),
                &format!("https://example.com/in/person-{}", i),
            )
            .unwrap()
        })
        .collect()
}

fn zero_throttle() -> Throttle {
    Throttle::new(Duration::ZERO, Duration::ZERO).unwrap()
}

#[test]
fn test_throttle_defaults() {
    let throttle = Throttle::default();
    let delay = throttle.draw();
    assert!(delay >= Throttle::DEFAULT_MIN);
    assert!(delay <= Throttle::DEFAULT_MAX);
}

#[test]
fn test_throttle_rejects_inverted_bounds() {
    assert!(Throttle::new(Duration::from_secs(40), Duration::from_secs(10)).is_err());
    assert!(Throttle::new(Duration::from_secs(10), Duration::from_secs(10)).is_ok());
}

#[test]
fn test_throttle_draw_stays_in_bounds() {
    let throttle = Throttle::new(Duration::from_millis(10), Duration::from_millis(40)).unwrap();
    for _ in 0..1000 {
        let delay = throttle.draw();
        assert!(delay >= Duration::from_millis(10), "drew {:?}", delay);
        assert!(delay <= Duration::from_millis(40), "drew {:?}", delay);
    }
}

#[test]
fn test_throttle_degenerate_bounds() {
    let throttle = Throttle::new(Duration::from_millis(25), Duration::from_millis(25)).unwrap();
    assert_eq!(throttle.draw(), Duration::from_millis(25));
}

#[tokio::test]
async fn test_tally_invariant_holds() {
    let records = records(5);
    // Every other record fails
    let mut calls = 0usize;
    let result = run_batch(&records, &zero_throttle(), |_record| {
        calls += 1;
        let ok = calls % 2 == 1;
        async move { ok }
    })
    .await;

    assert_eq!(result.success, 3);
    assert_eq!(result.failure, 2);
    assert_eq!(result.success + result.failure, records.len());
}

#[tokio::test]
async fn test_records_processed_in_scrape_order() {
    let records = records(4);
    let mut seen = Vec::new();
    run_batch(&records, &zero_throttle(), |record| {
        seen.push(record.name.clone());
        async { true }
    })
    .await;

    assert_eq!(seen, vec!["Person 0", "Person 1", "Person 2", "Person 3"]);
}

#[tokio::test]
async fn test_empty_batch_yields_empty_result() {
    let result = run_batch(&[], &zero_throttle(), |_record| async { true }).await;
    assert_eq!(result, RunResult::default());
    assert_eq!(result.total(), 0);
}

#[tokio::test]
async fn test_second_record_send_failure_tallies_one_each() {
    let records = records(2);
    let result = run_batch(&records, &zero_throttle(), |record| {
        let ok = record.name == "Person 0";
        async move { ok }
    })
    .await;

    assert_eq!(
        result,
        RunResult {
            success: 1,
            failure: 1
        }
    );
    assert_eq!(result.total(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_total_delay_within_bounds_and_none_after_last() {
    let min = Duration::from_secs(10);
    let max = Duration::from_secs(40);
    let throttle = Throttle::new(min, max).unwrap();
    let records = records(3);

    // With paused time, sleeps auto-advance the clock exactly, so elapsed
    // time equals the sum of drawn delays.
    let started = tokio::time::Instant::now();
    run_batch(&records, &throttle, |_record| async { true }).await;
    let elapsed = started.elapsed();

    let n = records.len() as u32;
    assert!(elapsed >= min * (n - 1), "elapsed {:?}", elapsed);
    assert!(elapsed <= max * (n - 1), "elapsed {:?}", elapsed);
}

#[tokio::test(start_paused = true)]
async fn test_single_record_incurs_no_delay() {
    let throttle = Throttle::new(Duration::from_secs(10), Duration::from_secs(40)).unwrap();
    let records = records(1);

    let started = tokio::time::Instant::now();
    let result = run_batch(&records, &throttle, |_record| async { true }).await;

    assert_eq!(started.elapsed(), Duration::ZERO);
    assert_eq!(result.success, 1);
}
