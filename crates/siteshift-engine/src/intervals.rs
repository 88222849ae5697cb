//! Interval lifecycle state machine
//!
//! Pure start/stop semantics over one leaf's interval log. The log moves
//! `NO_INTERVAL → ACTIVE → CLOSED → ACTIVE → …`; each transition touches
//! only the last entry, closed entries are never reopened, and nothing is
//! ever removed or reordered.
//!
//! Both operations are idempotent: starting an already-active log or
//! stopping an already-closed one is a no-op and reports `false`, which
//! lets the caller skip the document write entirely.

use chrono::{DateTime, Utc};
use siteshift_model::{IntervalStatus, TimeInterval};

/// Open a work interval at `now` unless one is already open
///
/// Returns whether the log changed.
pub fn start(intervals: &mut Vec<TimeInterval>, now: DateTime<Utc>) -> bool {
    if intervals.last().is_some_and(TimeInterval::is_open) {
        return false;
    }
    intervals.push(TimeInterval::open_at(now));
    true
}

/// Close the open work interval at `now`, if there is one
///
/// Returns whether the log changed.
pub fn stop(intervals: &mut [TimeInterval], now: DateTime<Utc>) -> bool {
    match intervals.last_mut() {
        Some(last) if last.is_open() => {
            last.end_time = Some(now);
            last.status = Some(IntervalStatus::Closed);
            true
        }
        _ => false,
    }
}

/// Whether any interval in the log is still open
#[must_use]
pub fn has_open(intervals: &[TimeInterval]) -> bool {
    intervals.iter().any(TimeInterval::is_open)
}
