//! Distribution schedule.
//!
//! Timestamps are Unix milliseconds. A last-run time of zero means the
//! distribution never ran, and the first run is due right away.

use std::time::Duration;

/// Slack subtracted from `now` for a first run so it is already due.
const FIRST_RUN_SLACK_MS: u64 = 60_000;

/// When the next distribution may start.
pub fn next_distribution_time(last_run_ms: u64, period: Duration, now_ms: u64) -> u64 {
    if last_run_ms == 0 {
        return now_ms.saturating_sub(FIRST_RUN_SLACK_MS);
    }
    let period_ms = u64::try_from(period.as_millis()).unwrap_or(u64::MAX);
    last_run_ms.saturating_add(period_ms)
}

/// Whether a distribution may start at `now_ms`.
pub fn is_due(last_run_ms: u64, period: Duration, now_ms: u64) -> bool {
    next_distribution_time(last_run_ms, period, now_ms) <= now_ms
}
