//! Time intervals: the append-only work log carried by task and subtask leaves.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Lifecycle state of a single interval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntervalStatus {
    /// Work is in progress; `end_time` has not been set
    Active,
    /// Work has ended; the interval is immutable from here on
    Closed,
}

/// One logged span of active work on a leaf
///
/// A leaf's `time_intervals` list is a log, not a single state field: each
/// start/stop cycle appends or closes exactly one entry. Within one log at
/// most one interval may be open at any time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeInterval {
    /// When work started (RFC 3339)
    #[serde(default, deserialize_with = "lenient_datetime")]
    pub start_time: Option<DateTime<Utc>>,
    /// When work ended; `None` while the interval is open
    #[serde(default, deserialize_with = "lenient_datetime")]
    pub end_time: Option<DateTime<Utc>>,
    /// Interval lifecycle state
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<IntervalStatus>,
}

impl TimeInterval {
    /// Open a new interval starting at `now`
    #[inline]
    #[must_use]
    pub fn open_at(now: DateTime<Utc>) -> Self {
        Self {
            start_time: Some(now),
            end_time: None,
            status: Some(IntervalStatus::Active),
        }
    }

    /// Whether this interval is still open
    ///
    /// Historical documents are inconsistent about which field is
    /// authoritative, so an interval counts as open when `end_time` is
    /// absent *or* its status says `active`.
    #[inline]
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.end_time.is_none() || self.status == Some(IntervalStatus::Active)
    }
}

/// Deserialize an optional RFC 3339 timestamp, treating `""` as absent.
///
/// Stored documents contain empty strings where older writers cleared a
/// field instead of nulling it.
fn lenient_datetime<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref() {
        None | Some("") => Ok(None),
        Some(text) => DateTime::parse_from_rfc3339(text)
            .map(|parsed| Some(parsed.with_timezone(&Utc)))
            .map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_at_is_open() {
        let interval = TimeInterval::open_at(Utc::now());
        assert!(interval.is_open());
        assert_eq!(interval.status, Some(IntervalStatus::Active));
        assert!(interval.end_time.is_none());
    }

    #[test]
    fn closed_interval_is_not_open() {
        let now = Utc::now();
        let interval = TimeInterval {
            start_time: Some(now),
            end_time: Some(now),
            status: Some(IntervalStatus::Closed),
        };
        assert!(!interval.is_open());
    }

    #[test]
    fn active_status_counts_as_open_even_with_end_time() {
        let now = Utc::now();
        let interval = TimeInterval {
            start_time: Some(now),
            end_time: Some(now),
            status: Some(IntervalStatus::Active),
        };
        assert!(interval.is_open());
    }

    #[test]
    fn empty_string_end_time_decodes_as_absent() {
        let interval: TimeInterval = serde_json::from_str(
            r#"{"start_time": "2024-03-01T08:00:00Z", "end_time": "", "status": "active"}"#,
        )
        .unwrap();
        assert!(interval.end_time.is_none());
        assert!(interval.is_open());
    }

    #[test]
    fn status_round_trips_lowercase() {
        let encoded = serde_json::to_value(TimeInterval::open_at(Utc::now())).unwrap();
        assert_eq!(encoded["status"], "active");
        assert!(encoded["end_time"].is_null());
    }
}
