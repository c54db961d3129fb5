// src/usage/event.rs — Usage event record

use serde::{Deserialize, Serialize};

use crate::clock::time_slot;

/// One navigation to a destination. Immutable once recorded; the journal only
/// appends and evicts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageEvent {
    pub destination: String,
    /// Epoch milliseconds.
    pub timestamp: i64,
    /// 0-6, Sunday = 0.
    pub day_of_week: u8,
    /// 0-23.
    pub hour_of_day: u8,
    /// Milliseconds spent at the destination before navigating away.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dwell_time: Option<f64>,
    /// Caller estimate of weekly revisits.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_frequency: Option<f64>,
}

impl UsageEvent {
    /// Build an event, deriving day/hour from the timestamp in local time.
    pub fn new(destination: impl Into<String>, timestamp: i64) -> Self {
        let (day_of_week, hour_of_day) = time_slot(timestamp);
        Self::with_slot(destination, timestamp, day_of_week, hour_of_day)
    }

    /// Build an event with an explicit day/hour slot.
    pub fn with_slot(
        destination: impl Into<String>,
        timestamp: i64,
        day_of_week: u8,
        hour_of_day: u8,
    ) -> Self {
        Self {
            destination: destination.into(),
            timestamp,
            day_of_week,
            hour_of_day,
            dwell_time: None,
            return_frequency: None,
        }
    }

    pub fn with_dwell_time(mut self, dwell_ms: f64) -> Self {
        self.dwell_time = Some(dwell_ms);
        self
    }

    pub fn with_return_frequency(mut self, per_week: f64) -> Self {
        self.return_frequency = Some(per_week);
        self
    }

    pub fn is_valid(&self) -> bool {
        let measure_ok = |v: Option<f64>| v.map_or(true, |x| x.is_finite() && x >= 0.0);
        !self.destination.is_empty()
            && self.day_of_week <= 6
            && self.hour_of_day <= 23
            && measure_ok(self.dwell_time)
            && measure_ok(self.return_frequency)
    }

    /// Identity used when merging journals from several sources.
    pub fn merge_key(&self) -> (String, i64) {
        (self.destination.clone(), self.timestamp)
    }
}

/// Decode a JSON array of events, skipping entries that do not parse or are
/// invalid. Anything other than an array decodes to nothing.
pub fn parse_lenient(value: serde_json::Value) -> Vec<UsageEvent> {
    let serde_json::Value::Array(items) = value else {
        return Vec::new();
    };
    items
        .into_iter()
        .filter_map(|item| serde_json::from_value::<UsageEvent>(item).ok())
        .filter(UsageEvent::is_valid)
        .collect()
}
