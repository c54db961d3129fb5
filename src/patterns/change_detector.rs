// src/patterns/change_detector.rs — Coarse drift detection between two weeks
//
// Compares per-destination visit counts in the last 7 days against the 7 days
// before that. Cheap enough to run on every navigation.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::clock::MS_PER_DAY;
use crate::usage::UsageEvent;

/// `[drift]` in config.toml.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriftConfig {
    /// Below this many events there is not enough signal to call drift.
    pub min_events: usize,
    pub window_days: u32,
    /// A destination has shifted when its relative change exceeds this.
    pub destination_threshold: f64,
    /// Drift is reported when the shifted share of destinations exceeds this.
    pub population_threshold: f64,
}

impl Default for DriftConfig {
    fn default() -> Self {
        Self {
            min_events: 10,
            window_days: 7,
            destination_threshold: 0.2,
            population_threshold: 0.3,
        }
    }
}

/// Numbers behind a drift decision.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DriftReport {
    pub total_events: usize,
    pub recent_events: usize,
    pub previous_events: usize,
    pub distinct_destinations: usize,
    pub shifted_destinations: usize,
    pub changed: bool,
}

#[derive(Debug, Default, Clone)]
pub struct ChangeDetector {
    config: DriftConfig,
}

impl ChangeDetector {
    pub fn new(config: DriftConfig) -> Self {
        Self { config }
    }

    pub fn has_changed(&self, events: &[UsageEvent], now_ms: i64) -> bool {
        self.report(events, now_ms).changed
    }

    pub fn report(&self, events: &[UsageEvent], now_ms: i64) -> DriftReport {
        let mut report = DriftReport {
            total_events: events.len(),
            ..Default::default()
        };
        if events.len() < self.config.min_events {
            return report;
        }

        let window = i64::from(self.config.window_days) * MS_PER_DAY;
        let recent_start = now_ms - window;
        let previous_start = now_ms - 2 * window;

        // (recent, previous) per destination, first-seen order
        let mut order: Vec<&str> = Vec::new();
        let mut counts: HashMap<&str, (u32, u32)> = HashMap::new();

        for event in events {
            let slot = if event.timestamp >= recent_start {
                0
            } else if event.timestamp >= previous_start {
                1
            } else {
                continue;
            };
            let entry = counts.entry(event.destination.as_str()).or_insert_with(|| {
                order.push(event.destination.as_str());
                (0, 0)
            });
            if slot == 0 {
                entry.0 += 1;
                report.recent_events += 1;
            } else {
                entry.1 += 1;
                report.previous_events += 1;
            }
        }

        if report.recent_events == 0 || report.previous_events == 0 {
            return report;
        }

        report.distinct_destinations = order.len();
        report.shifted_destinations = order
            .iter()
            .filter(|dest| {
                let (recent, previous) = counts[*dest];
                let change = f64::from(recent.abs_diff(previous)) / f64::from(recent + previous);
                change > self.config.destination_threshold
            })
            .count();

        let shifted_share =
            report.shifted_destinations as f64 / report.distinct_destinations as f64;
        report.changed = shifted_share > self.config.population_threshold;

        if report.changed {
            tracing::debug!(
                "Usage drift: {}/{} destinations shifted",
                report.shifted_destinations,
                report.distinct_destinations
            );
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_760_000_000_000;

    fn visits(dest: &str, count: usize, days_ago: i64) -> Vec<UsageEvent> {
        (0..count)
            .map(|i| UsageEvent::with_slot(dest, NOW - days_ago * MS_PER_DAY - i as i64, 1, 9))
            .collect()
    }

    fn detector() -> ChangeDetector {
        ChangeDetector::default()
    }

    #[test]
    fn test_too_few_events() {
        let mut events = visits("/a", 5, 1);
        events.extend(visits("/b", 4, 10));
        assert!(!detector().has_changed(&events, NOW));
    }

    #[test]
    fn test_empty_previous_window() {
        let events = visits("/a", 20, 1);
        let report = detector().report(&events, NOW);
        assert!(!report.changed);
        assert_eq!(report.recent_events, 20);
        assert_eq!(report.previous_events, 0);
    }

    #[test]
    fn test_events_older_than_two_windows_ignored() {
        let mut events = visits("/a", 10, 1);
        events.extend(visits("/b", 10, 20));
        assert!(!detector().has_changed(&events, NOW));
    }

    #[test]
    fn test_stable_usage_not_changed() {
        let mut events = Vec::new();
        for dest in ["/a", "/b", "/c"] {
            events.extend(visits(dest, 4, 2));
            events.extend(visits(dest, 4, 9));
        }
        let report = detector().report(&events, NOW);
        assert_eq!(report.shifted_destinations, 0);
        assert!(!report.changed);
    }

    #[test]
    fn test_one_of_three_shifted_exceeds_threshold() {
        // /a: 5 vs 1 → change 0.667; /b, /c unchanged. 1/3 > 0.3
        let mut events = Vec::new();
        events.extend(visits("/a", 5, 1));
        events.extend(visits("/a", 1, 8));
        for dest in ["/b", "/c"] {
            events.extend(visits(dest, 2, 1));
            events.extend(visits(dest, 2, 8));
        }
        let report = detector().report(&events, NOW);
        assert_eq!(report.distinct_destinations, 3);
        assert_eq!(report.shifted_destinations, 1);
        assert!(report.changed);
    }

    #[test]
    fn test_one_of_four_shifted_below_threshold() {
        // 1/4 = 0.25 is not above 0.3
        let mut events = Vec::new();
        events.extend(visits("/a", 5, 1));
        events.extend(visits("/a", 1, 8));
        for dest in ["/b", "/c", "/d"] {
            events.extend(visits(dest, 2, 1));
            events.extend(visits(dest, 2, 8));
        }
        let report = detector().report(&events, NOW);
        assert_eq!(report.distinct_destinations, 4);
        assert_eq!(report.shifted_destinations, 1);
        assert!(!report.changed);
    }

    #[test]
    fn test_change_exactly_at_destination_threshold_not_shifted() {
        // 3 vs 2 → |1| / 5 = 0.2, which is not > 0.2
        let mut events = Vec::new();
        events.extend(visits("/a", 3, 1));
        events.extend(visits("/a", 2, 8));
        events.extend(visits("/b", 3, 1));
        events.extend(visits("/b", 2, 8));
        let report = detector().report(&events, NOW);
        assert_eq!(report.shifted_destinations, 0);
        assert!(!report.changed);
    }

    #[test]
    fn test_new_destination_counts_as_shift() {
        // /new only appears recently → change 1.0; /a stable. 1/2 > 0.3
        let mut events = Vec::new();
        events.extend(visits("/a", 4, 1));
        events.extend(visits("/a", 4, 8));
        events.extend(visits("/new", 3, 1));
        assert!(detector().has_changed(&events, NOW));
    }
}
