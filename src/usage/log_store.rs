// src/usage/log_store.rs — Append-only, bounded usage journal
//
// The journal is a single JSON array under `usage_logs`, newest appended
// last. Writes prune to the age and count bounds; reads apply an extra age
// cutoff. Storage failures are logged and swallowed: recording a visit must
// never break navigation.

use std::sync::Arc;

use crate::clock::{Clock, MS_PER_DAY};
use crate::infra::errors::WayrankError;
use crate::storage::{KeyValueStore, USAGE_LOGS_KEY};

use super::event::{parse_lenient, UsageEvent};

/// Retention bounds for the journal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogLimits {
    pub max_events: usize,
    pub max_age_days: u32,
}

impl Default for LogLimits {
    fn default() -> Self {
        Self {
            max_events: 1000,
            max_age_days: 30,
        }
    }
}

pub struct UsageLogStore {
    kv: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    limits: LogLimits,
}

impl UsageLogStore {
    pub fn new(kv: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            kv,
            clock,
            limits: LogLimits::default(),
        }
    }

    pub fn with_limits(mut self, limits: LogLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn limits(&self) -> LogLimits {
        self.limits
    }

    /// Record one event. Never fails; invalid events are dropped.
    pub fn append(&self, event: UsageEvent) {
        self.append_many(std::iter::once(event));
    }

    /// Record several events with a single read-prune-write cycle.
    pub fn append_many(&self, events: impl IntoIterator<Item = UsageEvent>) {
        let incoming: Vec<UsageEvent> = events
            .into_iter()
            .filter(|e| {
                let ok = e.is_valid();
                if !ok {
                    tracing::debug!("Dropping invalid usage event for '{}'", e.destination);
                }
                ok
            })
            .collect();
        if incoming.is_empty() {
            return;
        }
        if let Err(e) = self.try_append(incoming) {
            tracing::warn!("Failed to record usage event: {e}");
        }
    }

    fn try_append(&self, incoming: Vec<UsageEvent>) -> Result<(), WayrankError> {
        let mut journal = self.load();
        journal.extend(incoming);
        self.prune(&mut journal);
        let json = serde_json::to_string(&journal)?;
        self.kv.set(USAGE_LOGS_KEY, &json)
    }

    /// Events no older than `max_age_days`. Empty on missing or corrupt data.
    pub fn query(&self, max_age_days: u32) -> Vec<UsageEvent> {
        let cutoff = self.clock.now_ms() - i64::from(max_age_days) * MS_PER_DAY;
        let mut events = self.load();
        events.retain(|e| e.timestamp >= cutoff);
        events
    }

    /// Number of events currently journaled (before any read cutoff).
    pub fn len(&self) -> usize {
        self.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop the whole journal.
    pub fn clear(&self) {
        if let Err(e) = self.kv.remove(USAGE_LOGS_KEY) {
            tracing::warn!("Failed to clear usage journal: {e}");
        }
    }

    fn load(&self) -> Vec<UsageEvent> {
        let raw = match self.kv.get(USAGE_LOGS_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::warn!("Usage journal unavailable, treating as empty: {e}");
                return Vec::new();
            }
        };
        match serde_json::from_str::<serde_json::Value>(&raw) {
            Ok(value) => parse_lenient(value),
            Err(e) => {
                tracing::warn!("Usage journal is corrupt, treating as empty: {e}");
                Vec::new()
            }
        }
    }

    fn prune(&self, journal: &mut Vec<UsageEvent>) {
        let cutoff = self.clock.now_ms() - i64::from(self.limits.max_age_days) * MS_PER_DAY;
        journal.retain(|e| e.timestamp >= cutoff);
        if journal.len() > self.limits.max_events {
            let excess = journal.len() - self.limits.max_events;
            journal.drain(..excess);
        }
    }
}
