// src/clock.rs — Injectable time source
//
// Everything that asks "what time is it" goes through a Clock so that
// window pruning, drift detection and cache expiry are reproducible in tests.

use chrono::{DateTime, Datelike, Local, Timelike};
use std::sync::atomic::{AtomicI64, Ordering};

pub const MS_PER_HOUR: i64 = 3_600_000;
pub const MS_PER_DAY: i64 = 86_400_000;

pub trait Clock: Send + Sync {
    /// Current instant as epoch milliseconds.
    fn now_ms(&self) -> i64;
}

/// Wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

/// Manually driven clock for tests and replay.
#[derive(Debug)]
pub struct FixedClock {
    now: AtomicI64,
}

impl FixedClock {
    pub fn new(now_ms: i64) -> Self {
        Self {
            now: AtomicI64::new(now_ms),
        }
    }

    pub fn set(&self, now_ms: i64) {
        self.now.store(now_ms, Ordering::SeqCst);
    }

    pub fn advance_ms(&self, delta_ms: i64) {
        self.now.fetch_add(delta_ms, Ordering::SeqCst);
    }
}

impl Clock for FixedClock {
    fn now_ms(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}

/// Local-time (day_of_week, hour_of_day) for an epoch-ms timestamp.
/// Day of week counts from Sunday = 0.
pub fn time_slot(timestamp_ms: i64) -> (u8, u8) {
    let local = DateTime::from_timestamp_millis(timestamp_ms)
        .unwrap_or_default()
        .with_timezone(&Local);
    (
        local.weekday().num_days_from_sunday() as u8,
        local.hour() as u8,
    )
}
