//! Time-range simulation sweep.
//!
//! Exhaustively evaluates every registered job across a stepped sequence of
//! instants, for previewing which jobs a range would fire.

use std::collections::BTreeMap;

use cronmux_core::TimeInstant;
use serde::{Deserialize, Serialize};

use crate::JobRegistry;

/// Sweep granularity in minutes.
pub const SWEEP_STEP_MINUTES: i64 = 5;

/// Result of one simulation sweep. Read-only once built.
///
/// Matches are keyed by the instant's linear timestamp, ascending and
/// unique; each bucket lists the matched job names in registration order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimulationResult {
    matches: BTreeMap<i64, Vec<String>>,
    evaluated: usize,
}

impl SimulationResult {
    /// Iterate matched instants ascending, with their job names.
    pub fn matches(&self) -> impl Iterator<Item = (TimeInstant, &[String])> {
        // Keys are produced by TimeInstant::timestamp, so they convert back.
        self.matches
            .iter()
            .filter_map(|(timestamp, jobs)| {
                TimeInstant::from_timestamp(*timestamp).map(|instant| (instant, jobs.as_slice()))
            })
    }

    /// Number of instants where at least one job matched.
    pub fn matched_instants(&self) -> usize {
        self.matches.len()
    }

    /// Number of instants the sweep evaluated, matched or not.
    pub fn evaluated_instants(&self) -> usize {
        self.evaluated
    }

    /// Whether no instant matched.
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }
}

/// Evaluate every job at every instant of the closed range `[start, end]`
/// stepped by [`SWEEP_STEP_MINUTES`].
///
/// The loop is a do/while over the linear timestamps: the first and last
/// instants are always evaluated, including when `start == end`. An
/// inverted range (`end` before `start`) yields an empty result - no
/// instant satisfies the inclusive bound, and this is not an error.
pub fn simulate(registry: &JobRegistry, start: TimeInstant, end: TimeInstant) -> SimulationResult {
    let mut result = SimulationResult::default();

    if start.timestamp() > end.timestamp() {
        return result;
    }

    let mut current = start;
    loop {
        result.evaluated += 1;
        for job in registry.jobs() {
            if job.is_due(current.date(), current.time()) {
                result
                    .matches
                    .entry(current.timestamp())
                    .or_default()
                    .push(job.name().to_string());
            }
        }

        current = current.add_minutes(SWEEP_STEP_MINUTES);
        if current.timestamp() > end.timestamp() {
            break;
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CronJob;
    use chrono::{NaiveDate, NaiveTime};

    struct Always(&'static str);

    impl CronJob for Always {
        fn name(&self) -> &str {
            self.0
        }

        fn is_due(&self, _date: NaiveDate, _time: NaiveTime) -> bool {
            true
        }
    }

    struct AtTime(&'static str, NaiveTime);

    impl CronJob for AtTime {
        fn name(&self) -> &str {
            self.0
        }

        fn is_due(&self, _date: NaiveDate, time: NaiveTime) -> bool {
            time == self.1
        }
    }

    fn instant(date: &str, time: &str) -> TimeInstant {
        TimeInstant::new(
            NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            NaiveTime::parse_from_str(time, "%H:%M:%S").unwrap(),
        )
    }

    #[test]
    fn test_single_instant_when_range_collapses() {
        let mut registry = JobRegistry::new();
        registry.register(Always("a")).unwrap();

        let at = instant("2024-01-01", "00:00:00");
        let result = simulate(&registry, at, at);

        assert_eq!(result.evaluated_instants(), 1);
        assert_eq!(result.matched_instants(), 1);
    }

    #[test]
    fn test_full_day_evaluates_289_instants() {
        let mut registry = JobRegistry::new();
        registry.register(Always("a")).unwrap();

        let start = instant("2024-01-01", "00:00:00");
        let end = instant("2024-01-02", "00:00:00");
        let result = simulate(&registry, start, end);

        // :00 through the next day's :00 inclusive at 5-minute steps.
        assert_eq!(result.evaluated_instants(), 289);
        assert_eq!(result.matched_instants(), 289);

        let instants: Vec<_> = result.matches().map(|(i, _)| i).collect();
        assert_eq!(instants.first().copied(), Some(start));
        assert_eq!(instants.last().copied(), Some(end));
    }

    #[test]
    fn test_inverted_range_is_empty() {
        let mut registry = JobRegistry::new();
        registry.register(Always("a")).unwrap();

        let start = instant("2024-01-01", "10:00:00");
        let end = instant("2024-01-01", "09:00:00");
        let result = simulate(&registry, start, end);

        assert!(result.is_empty());
        assert_eq!(result.evaluated_instants(), 0);
    }

    #[test]
    fn test_boundary_scenario_with_two_jobs() {
        let mut registry = JobRegistry::new();
        registry.register(Always("a")).unwrap();
        registry
            .register(AtTime("b", NaiveTime::from_hms_opt(9, 0, 0).unwrap()))
            .unwrap();

        let start = instant("2024-03-01", "08:55:00");
        let end = instant("2024-03-01", "09:05:00");
        let result = simulate(&registry, start, end);

        let buckets: Vec<_> = result.matches().collect();
        assert_eq!(buckets.len(), 3);

        assert_eq!(buckets[0].0, instant("2024-03-01", "08:55:00"));
        assert_eq!(buckets[0].1, ["a"]);
        assert_eq!(buckets[1].0, instant("2024-03-01", "09:00:00"));
        assert_eq!(buckets[1].1, ["a", "b"]);
        assert_eq!(buckets[2].0, instant("2024-03-01", "09:05:00"));
        assert_eq!(buckets[2].1, ["a"]);
    }

    #[test]
    fn test_no_bucket_without_matches() {
        let mut registry = JobRegistry::new();
        registry
            .register(AtTime("b", NaiveTime::from_hms_opt(9, 0, 0).unwrap()))
            .unwrap();

        let start = instant("2024-03-01", "08:55:00");
        let end = instant("2024-03-01", "09:05:00");
        let result = simulate(&registry, start, end);

        // Three instants evaluated, only 09:00 matched.
        assert_eq!(result.evaluated_instants(), 3);
        assert_eq!(result.matched_instants(), 1);
    }

    #[test]
    fn test_bucket_names_follow_registration_order() {
        let mut registry = JobRegistry::new();
        registry.register(Always("z.late")).unwrap();
        registry.register(Always("a.early")).unwrap();

        let at = instant("2024-01-01", "00:00:00");
        let result = simulate(&registry, at, at);

        let (_, jobs) = result.matches().next().unwrap();
        assert_eq!(jobs, ["z.late", "a.early"]);
    }
}
