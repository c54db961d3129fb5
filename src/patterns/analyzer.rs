// src/patterns/analyzer.rs — Time-of-day pattern scoring
//
// Pure function of (events, hour, day): filter to the current time slot,
// group by destination in first-seen order, score, stable-sort descending.
// Hour distance is linear: 23 and 0 are 23 hours apart, not 1.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::usage::UsageEvent;

/// Scoring constants (`[analyzer]` in config.toml). Sub-scores are each
/// capped so the total stays in [0, 100] with the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Events further than this many hours from the current hour are ignored.
    pub hour_window: u8,
    pub frequency_weight: f64,
    pub frequency_cap: f64,
    pub recency_cap: f64,
    /// Recency points lost per hour of distance.
    pub recency_decay_per_hour: f64,
    /// Dwell time that earns the full dwell sub-score (5 minutes).
    pub dwell_reference_ms: f64,
    pub dwell_cap: f64,
    pub return_weight: f64,
    pub return_cap: f64,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            hour_window: 2,
            frequency_weight: 4.0,
            frequency_cap: 40.0,
            recency_cap: 20.0,
            recency_decay_per_hour: 5.0,
            dwell_reference_ms: 300_000.0,
            dwell_cap: 20.0,
            return_weight: 3.0,
            return_cap: 20.0,
        }
    }
}

/// Per-destination aggregate for one analysis pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NavigationPattern {
    pub destination: String,
    /// The hour this pattern was computed for.
    pub hour_of_day: u8,
    /// `None` = all days.
    pub day_of_week: Option<u8>,
    pub frequency: u32,
    pub average_dwell_time: f64,
    pub return_frequency: f64,
    pub score: f64,
}

#[derive(Debug, Default)]
struct Accumulator {
    frequency: u32,
    dwell_samples: u32,
    average_dwell_time: f64,
    return_frequency: f64,
}

impl Accumulator {
    fn add(&mut self, event: &UsageEvent) {
        self.frequency += 1;
        if let Some(dwell) = event.dwell_time {
            self.dwell_samples += 1;
            self.average_dwell_time +=
                (dwell - self.average_dwell_time) / f64::from(self.dwell_samples);
        }
        if let Some(rf) = event.return_frequency {
            self.return_frequency = self.return_frequency.max(rf);
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct PatternAnalyzer {
    config: AnalyzerConfig,
}

impl PatternAnalyzer {
    pub fn new(config: AnalyzerConfig) -> Self {
        Self { config }
    }

    /// Rank destinations for `current_hour` (and `current_day` when given).
    pub fn analyze(
        &self,
        events: &[UsageEvent],
        current_hour: u8,
        current_day: Option<u8>,
    ) -> Vec<NavigationPattern> {
        let mut order: Vec<&str> = Vec::new();
        let mut groups: HashMap<&str, Accumulator> = HashMap::new();

        let in_slot = events.iter().filter(|e| {
            current_day.map_or(true, |day| e.day_of_week == day)
                && e.hour_of_day.abs_diff(current_hour) <= self.config.hour_window
        });

        for event in in_slot {
            let acc = groups.entry(event.destination.as_str()).or_insert_with(|| {
                order.push(event.destination.as_str());
                Accumulator::default()
            });
            acc.add(event);
        }

        let mut patterns: Vec<NavigationPattern> = order
            .into_iter()
            .filter_map(|dest| {
                let acc = groups.remove(dest)?;
                let mut pattern = NavigationPattern {
                    destination: dest.to_string(),
                    hour_of_day: current_hour,
                    day_of_week: current_day,
                    frequency: acc.frequency,
                    average_dwell_time: acc.average_dwell_time,
                    return_frequency: acc.return_frequency,
                    score: 0.0,
                };
                pattern.score = self.score(&pattern, current_hour);
                Some(pattern)
            })
            .collect();

        // Vec::sort_by is stable: equal scores keep first-seen order
        patterns.sort_by(|a, b| b.score.total_cmp(&a.score));
        patterns
    }

    /// Sum of four capped sub-scores.
    pub fn score(&self, pattern: &NavigationPattern, current_hour: u8) -> f64 {
        let c = &self.config;

        let frequency = (f64::from(pattern.frequency) * c.frequency_weight).min(c.frequency_cap);

        let hour_distance = f64::from(pattern.hour_of_day.abs_diff(current_hour));
        let recency = (c.recency_cap - hour_distance * c.recency_decay_per_hour).max(0.0);

        let dwell = (pattern.average_dwell_time.max(0.0) / c.dwell_reference_ms * c.dwell_cap)
            .min(c.dwell_cap);

        let returns = (pattern.return_frequency.max(0.0) * c.return_weight).min(c.return_cap);

        frequency + recency + dwell + returns
    }
}

/// Destination → score lookup for plan building.
pub fn score_map(patterns: &[NavigationPattern]) -> HashMap<String, f64> {
    patterns
        .iter()
        .map(|p| (p.destination.clone(), p.score))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(dest: &str, day: u8, hour: u8) -> UsageEvent {
        UsageEvent::with_slot(dest, 0, day, hour)
    }

    #[test]
    fn test_empty_input() {
        let analyzer = PatternAnalyzer::default();
        assert!(analyzer.analyze(&[], 9, None).is_empty());
    }

    #[test]
    fn test_orders_ranked_above_reports() {
        let mut events: Vec<UsageEvent> = (0..5).map(|_| at("/orders", 1, 9)).collect();
        events.push(at("/reports", 1, 15));

        let patterns = PatternAnalyzer::default().analyze(&events, 9, None);
        assert_eq!(patterns.len(), 1);
        assert_eq!(patterns[0].destination, "/orders");
        assert_eq!(patterns[0].frequency, 5);
        // 5*4 frequency + 20 recency
        assert!((patterns[0].score - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_hour_window_is_linear() {
        let events = vec![at("/late", 1, 23), at("/near", 1, 3), at("/edge", 1, 3)];
        let patterns = PatternAnalyzer::default().analyze(&events, 1, None);
        let names: Vec<_> = patterns.iter().map(|p| p.destination.as_str()).collect();
        // hour 23 is 22 hours from hour 1 on a linear scale
        assert_eq!(names, vec!["/near", "/edge"]);
    }

    #[test]
    fn test_day_filter() {
        let events = vec![at("/mon", 1, 9), at("/tue", 2, 9)];
        let analyzer = PatternAnalyzer::default();

        let monday = analyzer.analyze(&events, 9, Some(1));
        assert_eq!(monday.len(), 1);
        assert_eq!(monday[0].destination, "/mon");
        assert_eq!(monday[0].day_of_week, Some(1));

        assert_eq!(analyzer.analyze(&events, 9, None).len(), 2);
    }

    #[test]
    fn test_dwell_average_and_return_max() {
        let events = vec![
            at("/orders", 1, 9).with_dwell_time(100_000.0).with_return_frequency(2.0),
            at("/orders", 1, 9).with_dwell_time(200_000.0),
            at("/orders", 1, 9).with_return_frequency(5.0),
            at("/orders", 1, 9).with_return_frequency(1.0),
        ];
        let patterns = PatternAnalyzer::default().analyze(&events, 9, None);
        let p = &patterns[0];
        assert_eq!(p.frequency, 4);
        assert!((p.average_dwell_time - 150_000.0).abs() < 1e-9);
        assert!((p.return_frequency - 5.0).abs() < 1e-9);
        // 16 + 20 + 10 + 15
        assert!((p.score - 61.0).abs() < 1e-9);
    }

    #[test]
    fn test_score_bounds() {
        let events: Vec<UsageEvent> = (0..50)
            .map(|_| {
                at("/hot", 1, 9)
                    .with_dwell_time(10_000_000.0)
                    .with_return_frequency(100.0)
            })
            .collect();
        let analyzer = PatternAnalyzer::default();
        let patterns = analyzer.analyze(&events, 9, None);
        assert!((patterns[0].score - 100.0).abs() < 1e-9);

        for hour in 0..24u8 {
            for p in analyzer.analyze(&events, hour, None) {
                assert!((0.0..=100.0).contains(&p.score));
            }
        }
    }

    #[test]
    fn test_recency_sub_score_decays() {
        let analyzer = PatternAnalyzer::default();
        let pattern = NavigationPattern {
            destination: "/x".into(),
            hour_of_day: 7,
            day_of_week: None,
            frequency: 0,
            average_dwell_time: 0.0,
            return_frequency: 0.0,
            score: 0.0,
        };
        assert!((analyzer.score(&pattern, 7) - 20.0).abs() < 1e-9);
        assert!((analyzer.score(&pattern, 9) - 10.0).abs() < 1e-9);
        assert!((analyzer.score(&pattern, 12) - 0.0).abs() < 1e-9);
    }

    #[test]
    fn test_ties_keep_first_seen_order() {
        let events = vec![at("/b", 1, 9), at("/a", 1, 9), at("/c", 1, 9)];
        let patterns = PatternAnalyzer::default().analyze(&events, 9, None);
        let names: Vec<_> = patterns.iter().map(|p| p.destination.as_str()).collect();
        assert_eq!(names, vec!["/b", "/a", "/c"]);
    }

    #[test]
    fn test_score_map() {
        let events = vec![at("/a", 1, 9), at("/a", 1, 9), at("/b", 1, 9)];
        let scores = score_map(&PatternAnalyzer::default().analyze(&events, 9, None));
        assert!(scores["/a"] > scores["/b"]);
        assert!(!scores.contains_key("/c"));
    }
}
