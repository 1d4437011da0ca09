//! Sequential batch driver with randomized throttling.
//!
//! Records are processed strictly one at a time; parallel sends would defeat
//! the pacing that keeps the run under the target's behavioral-anomaly
//! radar. The delay policy is fixed: a fresh uniform draw between records,
//! no backoff on failure, no acceleration on success.

use std::future::Future;
use std::time::Duration;

use anyhow::Result;
use rand::Rng;
use tracing::{info, warn};

use crate::types::{Connection, RunResult};

/// Uniform random delay bounds applied between consecutive records
#[derive(Debug, Clone, Copy)]
pub struct Throttle {
    min: Duration,
    max: Duration,
}

impl Throttle {
    /// Default lower bound between messages
    pub const DEFAULT_MIN: Duration = Duration::from_secs(10);
    /// Default upper bound between messages
    pub const DEFAULT_MAX: Duration = Duration::from_secs(40);

    pub fn new(min: Duration, max: Duration) -> Result<Self> {
        if min > max {
            anyhow::bail!(
                "throttle minimum ({:?}) must not exceed maximum ({:?})",
                min,
                max
            );
        }
        Ok(Throttle { min, max })
    }

    /// Draw one delay uniformly from [min, max]
    pub fn draw(&self) -> Duration {
        let millis = rand::thread_rng().gen_range(self.min.as_millis()..=self.max.as_millis());
        Duration::from_millis(millis as u64)
    }
}

impl Default for Throttle {
    fn default() -> Self {
        Throttle {
            min: Self::DEFAULT_MIN,
            max: Self::DEFAULT_MAX,
        }
    }
}

/// Run `send` over every record in order, sleeping a drawn delay between
/// consecutive records (none after the last), and tally the outcomes.
///
/// Individual failures never abort the batch; every record reaches exactly
/// one terminal outcome, so `success + failure` always equals the record
/// count afterwards.
pub async fn run_batch<F, Fut>(
    records: &[Connection],
    throttle: &Throttle,
    mut send: F,
) -> RunResult
where
    F: FnMut(Connection) -> Fut,
    Fut: Future<Output = bool>,
{
    let total = records.len();
    let mut result = RunResult::default();

    for (i, record) in records.iter().enumerate() {
        info!("[{}/{}] Processing {}", i + 1, total, record.name);

        if send(record.clone()).await {
            result.success += 1;
            info!("Successfully messaged {}", record.name);
        } else {
            result.failure += 1;
            warn!("Failed to message {}", record.name);
        }

        if i + 1 < total {
            let delay = throttle.draw();
            info!(
                "Waiting {:.1}s before next message",
                delay.as_secs_f64()
            );
            tokio::time::sleep(delay).await;
        }
    }

    result
}

#[cfg(test)]
#[path = "batch_test.rs"]
mod batch_test;
