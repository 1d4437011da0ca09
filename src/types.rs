use serde::{Deserialize, Serialize};

/// One scraped connection: display name plus profile link.
///
/// Immutable after scraping; the full list is serialized to a JSON snapshot
/// before any messaging starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    /// Display name as shown on the connection card
    pub name: String,
    /// Absolute URL of the connection's profile page
    pub link: String,
}

impl Connection {
    /// Build a connection, rejecting blank fields.
    ///
    /// Cards that yield an empty name or link are dropped by the scraper,
    /// so a `Connection` that exists is always complete.
    pub fn new(name: &str, link: &str) -> Option<Self> {
        let name = name.trim();
        let link = link.trim();
        if name.is_empty() || link.is_empty() {
            return None;
        }
        Some(Connection {
            name: name.to_string(),
            link: link.to_string(),
        })
    }
}

/// Tally of one batch run. Every record lands in exactly one bucket.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RunResult {
    /// Records that were messaged successfully
    pub success: usize,
    /// Records where some step of the messaging pipeline failed
    pub failure: usize,
}

impl RunResult {
    /// Total records processed
    pub fn total(&self) -> usize {
        self.success + self.failure
    }

    /// Success percentage in [0, 100]; 0 for an empty run
    pub fn success_rate(&self) -> f64 {
        if self.total() == 0 {
            return 0.0;
        }
        (self.success as f64 / self.total() as f64) * 100.0
    }
}

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;
