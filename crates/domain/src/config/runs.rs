use std::time::Duration;

use serde::{Deserialize, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Run polling
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Bounds for waiting on an assistant run. Polling stops at whichever of
/// `max_polls` or `timeout_ms` is hit first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunsConfig {
    #[serde(default = "d_500")]
    pub poll_interval_ms: u64,
    #[serde(default = "d_240")]
    pub max_polls: u32,
    #[serde(default = "d_180000")]
    pub timeout_ms: u64,
    /// Page size used when listing messages produced by a run.
    #[serde(default = "d_20")]
    pub relay_page_size: u32,
}

impl Default for RunsConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 500,
            max_polls: 240,
            timeout_ms: 180_000,
            relay_page_size: 20,
        }
    }
}

impl RunsConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

fn d_500() -> u64 {
    500
}
fn d_240() -> u32 {
    240
}
fn d_180000() -> u64 {
    180_000
}
fn d_20() -> u32 {
    20
}
