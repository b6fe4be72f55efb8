//! Calendar instant - the (date, time) pair all scheduling decisions use.

use chrono::{DateTime, NaiveDate, NaiveTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// A point in calendar time, as a (date, time) pair.
///
/// Instants order chronologically and project onto a linear epoch-seconds
/// timestamp for comparison and keying. Minute arithmetic carries over day
/// boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TimeInstant {
    date: NaiveDate,
    time: NaiveTime,
}

impl TimeInstant {
    /// Create an instant from a date and a time of day.
    pub fn new(date: NaiveDate, time: NaiveTime) -> Self {
        Self { date, time }
    }

    /// The current instant (UTC).
    pub fn now() -> Self {
        let now = Utc::now().naive_utc();
        Self {
            date: now.date(),
            time: now.time(),
        }
    }

    /// Calendar date component.
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Time-of-day component.
    pub fn time(&self) -> NaiveTime {
        self.time
    }

    /// Linear projection as epoch seconds.
    pub fn timestamp(&self) -> i64 {
        self.date.and_time(self.time).and_utc().timestamp()
    }

    /// Rebuild an instant from its epoch-seconds projection.
    ///
    /// Returns `None` for timestamps outside the representable date range.
    pub fn from_timestamp(timestamp: i64) -> Option<Self> {
        let dt = DateTime::from_timestamp(timestamp, 0)?.naive_utc();
        Some(Self {
            date: dt.date(),
            time: dt.time(),
        })
    }

    /// The instant `minutes` later, carrying over day boundaries.
    pub fn add_minutes(self, minutes: i64) -> Self {
        let dt = self.date.and_time(self.time) + TimeDelta::minutes(minutes);
        Self {
            date: dt.date(),
            time: dt.time(),
        }
    }
}

impl std::fmt::Display for TimeInstant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.date.format("%Y-%m-%d"), self.time.format("%H:%M:%S"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instant(date: &str, time: &str) -> TimeInstant {
        TimeInstant::new(
            NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            NaiveTime::parse_from_str(time, "%H:%M:%S").unwrap(),
        )
    }

    #[test]
    fn test_add_minutes_same_day() {
        let next = instant("2024-01-01", "09:00:00").add_minutes(5);
        assert_eq!(next, instant("2024-01-01", "09:05:00"));
    }

    #[test]
    fn test_add_minutes_carries_day_boundary() {
        let next = instant("2024-01-31", "23:58:00").add_minutes(5);
        assert_eq!(next, instant("2024-02-01", "00:03:00"));
    }

    #[test]
    fn test_ordering_is_chronological() {
        let earlier = instant("2024-01-01", "23:59:59");
        let later = instant("2024-01-02", "00:00:00");
        assert!(earlier < later);
        assert!(earlier.timestamp() < later.timestamp());
    }

    #[test]
    fn test_timestamp_round_trip() {
        let original = instant("2024-03-01", "08:55:00");
        let rebuilt = TimeInstant::from_timestamp(original.timestamp()).unwrap();
        assert_eq!(original, rebuilt);
    }

    #[test]
    fn test_display_format() {
        assert_eq!(instant("2024-01-05", "07:03:00").to_string(), "2024-01-05 07:03:00");
    }

    #[test]
    fn test_serde_round_trip() {
        let original = instant("2024-06-15", "12:30:00");
        let json = serde_json::to_string(&original).unwrap();
        let back: TimeInstant = serde_json::from_str(&json).unwrap();
        assert_eq!(original, back);
    }
}
