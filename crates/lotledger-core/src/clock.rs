//! Wall clock used for commit timestamps.

use std::time::{SystemTime, UNIX_EPOCH};

/// Current time in Unix milliseconds. A clock set before the epoch reads 0.
pub fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| i64::try_from(d.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}
