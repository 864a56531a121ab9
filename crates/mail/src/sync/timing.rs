//! Cadences for the sync loops

use std::time::Duration;

/// Folder refresh interval
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_millis(5000);

/// Quiet period before a search runs
pub const DEFAULT_SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// Interval between thread polls
pub const DEFAULT_THREAD_INTERVAL: Duration = Duration::from_millis(5000);

/// Timing knobs for the three loops
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncTiming {
    pub refresh_interval: Duration,
    pub search_debounce: Duration,
    pub thread_interval: Duration,
}

impl SyncTiming {
    /// Build from millisecond values; zero falls back to the default
    pub fn from_millis(refresh_ms: u64, search_debounce_ms: u64, thread_ms: u64) -> Self {
        Self {
            refresh_interval: non_zero_or(refresh_ms, DEFAULT_REFRESH_INTERVAL),
            search_debounce: non_zero_or(search_debounce_ms, DEFAULT_SEARCH_DEBOUNCE),
            thread_interval: non_zero_or(thread_ms, DEFAULT_THREAD_INTERVAL),
        }
    }
}

impl Default for SyncTiming {
    fn default() -> Self {
        Self {
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            search_debounce: DEFAULT_SEARCH_DEBOUNCE,
            thread_interval: DEFAULT_THREAD_INTERVAL,
        }
    }
}

fn non_zero_or(ms: u64, fallback: Duration) -> Duration {
    if ms == 0 {
        fallback
    } else {
        Duration::from_millis(ms)
    }
}
