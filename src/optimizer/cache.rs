// src/optimizer/cache.rs — Time-boxed plan cache
//
// Stores the last OptimizationResult under `optimization_cache` together with
// the time it was written. Entries expire after a fixed TTL (default 1 hour)
// regardless of pattern version; version checks are the engine's job.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use super::types::OptimizationResult;
use crate::clock::Clock;
use crate::infra::errors::WayrankError;
use crate::storage::{KeyValueStore, OPTIMIZATION_CACHE_KEY};

/// Default cache TTL: 1 hour.
pub const CACHE_TTL: Duration = Duration::from_secs(3600);

/// Cached plan with metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedPlan {
    /// When the cache was written (epoch milliseconds).
    pub cached_at: i64,
    pub result: OptimizationResult,
}

pub struct PlanCache {
    kv: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
}

impl PlanCache {
    pub fn new(kv: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        Self::with_ttl(kv, clock, CACHE_TTL)
    }

    pub fn with_ttl(kv: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>, ttl: Duration) -> Self {
        Self { kv, clock, ttl }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Try to load the cached plan. Returns `None` if the cache is missing,
    /// unreadable, corrupt, or expired. An entry stamped in the future (the
    /// clock went backwards) counts as expired.
    pub fn load(&self) -> Option<OptimizationResult> {
        let cached = self.peek()?;
        let age_ms = self.clock.now_ms().saturating_sub(cached.cached_at);
        if age_ms < 0 {
            tracing::debug!("Plan cache written {}ms in the future; ignoring", -age_ms);
            return None;
        }
        if age_ms > self.ttl.as_millis() as i64 {
            tracing::debug!("Plan cache expired (age={}s)", age_ms / 1000);
            return None;
        }
        Some(cached.result)
    }

    /// Read the stored entry without applying the TTL.
    pub fn peek(&self) -> Option<CachedPlan> {
        let raw = match self.kv.get(OPTIMIZATION_CACHE_KEY) {
            Ok(raw) => raw?,
            Err(e) => {
                tracing::warn!("Plan cache unavailable: {e}");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(cached) => Some(cached),
            Err(e) => {
                tracing::debug!("Ignoring corrupt plan cache: {e}");
                None
            }
        }
    }

    pub fn save(&self, result: &OptimizationResult) -> Result<(), WayrankError> {
        let cached = CachedPlan {
            cached_at: self.clock.now_ms(),
            result: result.clone(),
        };
        let json = serde_json::to_string(&cached)?;
        self.kv.set(OPTIMIZATION_CACHE_KEY, &json)?;
        tracing::debug!(
            "Cached plan for {} destinations (pattern v{})",
            result.items.len(),
            result.pattern_version
        );
        Ok(())
    }

    pub fn invalidate(&self) {
        if let Err(e) = self.kv.remove(OPTIMIZATION_CACHE_KEY) {
            tracing::warn!("Failed to invalidate plan cache: {e}");
        }
    }
}
