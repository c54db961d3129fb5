// src/optimizer/engine.rs — Optimization orchestrator
//
// optimize(): settings gate → cached plan (if its version is current) →
// drift check → local + remote logs → analyzer → plan → cache → apply.
// Every failure path returns the caller's catalog untouched.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;

use super::cache::{PlanCache, CACHE_TTL};
use super::plan::{apply_plan, build_plan};
use super::remote::{bound_logs, fetch_with_timeout, merge_logs, HttpUsageSink, RemoteUsageSink};
use super::types::{AdaptiveSettings, NavItem, OptimizationResult, PatternVersion};
use crate::clock::{time_slot, Clock, MS_PER_DAY};
use crate::infra::config::Config;
use crate::infra::errors::WayrankError;
use crate::patterns::{
    score_map, ChangeDetector, DriftReport, NavigationPattern, PatternAnalyzer,
};
use crate::storage::KeyValueStore;
use crate::usage::{LogLimits, UsageEvent, UsageLogStore};

/// Engine tuning. Defaults match the documented behavior.
#[derive(Debug, Clone)]
pub struct EngineOptions {
    pub cache_ttl: Duration,
    pub remote_timeout: Duration,
    pub log_limits: LogLimits,
    pub match_day_of_week: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            cache_ttl: CACHE_TTL,
            remote_timeout: Duration::from_millis(1_500),
            log_limits: LogLimits::default(),
            match_day_of_week: true,
        }
    }
}

impl From<&Config> for EngineOptions {
    fn from(config: &Config) -> Self {
        Self {
            cache_ttl: config.optimizer.cache_ttl(),
            remote_timeout: config.remote.timeout(),
            log_limits: LogLimits {
                max_events: config.optimizer.max_events,
                max_age_days: config.optimizer.log_window_days,
            },
            match_day_of_week: config.optimizer.match_day_of_week,
        }
    }
}

/// What happened to the remote fetch during a pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RemoteStatus {
    NotConfigured,
    Fetched { events: usize },
    TimedOut,
    Unavailable,
}

/// How the returned ordering was produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    /// Optimization off or no categories selected.
    Disabled,
    CacheHit {
        pattern_version: u64,
    },
    /// No usage signal for the current time slot.
    NoSignal {
        drift: bool,
        remote: RemoteStatus,
    },
    Computed {
        pattern_version: u64,
        drift: bool,
        remote: RemoteStatus,
        patterns: usize,
    },
    /// Something failed; the catalog was returned unchanged.
    Failed {
        reason: String,
    },
}

#[derive(Debug, Clone)]
pub struct OptimizationOutcome {
    pub items: Vec<NavItem>,
    pub outcome: Outcome,
}

impl OptimizationOutcome {
    fn unchanged(catalog: &[NavItem], outcome: Outcome) -> Self {
        Self {
            items: catalog.to_vec(),
            outcome,
        }
    }
}

pub struct OptimizationEngine {
    log_store: UsageLogStore,
    cache: PlanCache,
    remote: Option<Arc<dyn RemoteUsageSink>>,
    remote_timeout: Duration,
    version: PatternVersion,
    analyzer: PatternAnalyzer,
    detector: ChangeDetector,
    clock: Arc<dyn Clock>,
    match_day_of_week: bool,
}

impl OptimizationEngine {
    pub fn new(kv: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>, options: EngineOptions) -> Self {
        Self {
            log_store: UsageLogStore::new(kv.clone(), clock.clone())
                .with_limits(options.log_limits),
            cache: PlanCache::with_ttl(kv, clock.clone(), options.cache_ttl),
            remote: None,
            remote_timeout: options.remote_timeout,
            version: PatternVersion::new(),
            analyzer: PatternAnalyzer::default(),
            detector: ChangeDetector::default(),
            clock,
            match_day_of_week: options.match_day_of_week,
        }
    }

    /// Build an engine from config: tuning from `[analyzer]` and `[drift]`,
    /// plus the HTTP sink when a base URL is set. A bad URL is logged and the
    /// engine runs local-only.
    pub fn from_config(config: &Config, kv: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        let engine = Self::new(kv, clock, EngineOptions::from(config))
            .with_analyzer(PatternAnalyzer::new(config.analyzer.clone()))
            .with_detector(ChangeDetector::new(config.drift.clone()));
        match config.remote.base_url.as_deref() {
            Some(base_url) => match HttpUsageSink::new(base_url, config.remote.token.clone()) {
                Ok(sink) => engine.with_remote(Arc::new(sink)),
                Err(e) => {
                    tracing::warn!("Remote sink disabled: {e}");
                    engine
                }
            },
            None => engine,
        }
    }

    pub fn with_remote(mut self, sink: Arc<dyn RemoteUsageSink>) -> Self {
        self.remote = Some(sink);
        self
    }

    /// Use a caller-owned version cell instead of a private one.
    pub fn with_version(mut self, version: PatternVersion) -> Self {
        self.version = version;
        self
    }

    pub fn with_analyzer(mut self, analyzer: PatternAnalyzer) -> Self {
        self.analyzer = analyzer;
        self
    }

    pub fn with_detector(mut self, detector: ChangeDetector) -> Self {
        self.detector = detector;
        self
    }

    pub fn version(&self) -> &PatternVersion {
        &self.version
    }

    pub fn log_store(&self) -> &UsageLogStore {
        &self.log_store
    }

    pub fn cache(&self) -> &PlanCache {
        &self.cache
    }

    pub fn has_remote(&self) -> bool {
        self.remote.is_some()
    }

    // -- Ingestion --

    /// Fire-and-forget: journal locally, forward to the remote sink on a
    /// detached task when a runtime is available. Never fails.
    pub fn record(&self, event: UsageEvent) {
        if !event.is_valid() {
            tracing::debug!("Ignoring invalid usage event for '{}'", event.destination);
            return;
        }
        self.log_store.append(event.clone());

        let Some(sink) = self.remote.clone() else {
            return;
        };
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            tracing::debug!("No async runtime; usage event kept local only");
            return;
        };
        let timeout = self.remote_timeout;
        handle.spawn(async move {
            match tokio::time::timeout(timeout, sink.submit(event)).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => tracing::warn!("Remote usage submit failed: {e}"),
                Err(_) => tracing::warn!(
                    "Remote usage submit timed out after {}ms",
                    timeout.as_millis()
                ),
            }
        });
    }

    /// Journal locally, then forward to the remote sink and wait for it
    /// (bounded by the remote timeout). Valid events are always journaled;
    /// an error after that only describes the forward.
    pub async fn record_and_forward(&self, event: UsageEvent) -> Result<(), WayrankError> {
        if !event.is_valid() {
            return Err(WayrankError::Other(anyhow::anyhow!(
                "invalid usage event for '{}'",
                event.destination
            )));
        }
        self.log_store.append(event.clone());

        let Some(sink) = &self.remote else {
            return Ok(());
        };
        match tokio::time::timeout(self.remote_timeout, sink.submit(event)).await {
            Ok(result) => result,
            Err(_) => Err(WayrankError::RemoteTimeout {
                timeout_ms: self.remote_timeout.as_millis() as u64,
            }),
        }
    }

    // -- Optimization --

    /// Reorder `catalog` for the current time slot. Always a permutation of
    /// the input; identity when optimization is inactive or fails.
    pub async fn optimize(&self, catalog: &[NavItem], settings: &AdaptiveSettings) -> Vec<NavItem> {
        self.optimize_detailed(catalog, settings).await.items
    }

    pub async fn optimize_detailed(
        &self,
        catalog: &[NavItem],
        settings: &AdaptiveSettings,
    ) -> OptimizationOutcome {
        if !settings.is_active() {
            return OptimizationOutcome::unchanged(catalog, Outcome::Disabled);
        }

        match self.try_optimize(catalog, settings).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::warn!("Navigation optimization failed, keeping original order: {e}");
                OptimizationOutcome::unchanged(
                    catalog,
                    Outcome::Failed {
                        reason: e.to_string(),
                    },
                )
            }
        }
    }

    async fn try_optimize(
        &self,
        catalog: &[NavItem],
        settings: &AdaptiveSettings,
    ) -> Result<OptimizationOutcome, WayrankError> {
        let current_version = self.version.get();

        if let Some(cached) = self.cache.load() {
            if cached.pattern_version == current_version
                && cached.selected_categories == settings.selected_categories
            {
                tracing::debug!("Plan cache hit (pattern v{current_version})");
                return Ok(OptimizationOutcome {
                    items: apply_plan(catalog, &cached.items),
                    outcome: Outcome::CacheHit {
                        pattern_version: current_version,
                    },
                });
            }
            tracing::debug!(
                "Cached plan v{} is stale (current v{current_version})",
                cached.pattern_version
            );
        }

        let now = self.clock.now_ms();
        let local = self.log_store.query(self.log_store.limits().max_age_days);

        let drift = self.detector.has_changed(&local, now);
        if drift {
            let version = self.version.bump();
            tracing::info!("Usage patterns shifted; pattern version now {version}");
        }

        let (remote_events, remote) = self.fetch_remote().await;
        let limits = self.log_store.limits();
        let merged = bound_logs(
            merge_logs(local, remote_events),
            now - i64::from(limits.max_age_days) * MS_PER_DAY,
            limits.max_events,
        );

        let patterns = self.patterns_at(&merged, now);
        if patterns.is_empty() {
            tracing::debug!("No usage signal for the current time slot");
            return Ok(OptimizationOutcome::unchanged(
                catalog,
                Outcome::NoSignal { drift, remote },
            ));
        }

        let scores = score_map(&patterns);
        let result = OptimizationResult {
            items: build_plan(catalog, &scores, &settings.selected_categories),
            last_calculated: now,
            pattern_version: self.version.get(),
            selected_categories: settings.selected_categories.clone(),
        };
        if let Err(e) = self.cache.save(&result) {
            tracing::warn!("Failed to cache navigation plan: {e}");
        }

        Ok(OptimizationOutcome {
            items: apply_plan(catalog, &result.items),
            outcome: Outcome::Computed {
                pattern_version: result.pattern_version,
                drift,
                remote,
                patterns: patterns.len(),
            },
        })
    }

    async fn fetch_remote(&self) -> (Vec<UsageEvent>, RemoteStatus) {
        let Some(sink) = &self.remote else {
            return (Vec::new(), RemoteStatus::NotConfigured);
        };
        match fetch_with_timeout(sink.as_ref(), self.remote_timeout).await {
            Ok(events) => {
                let count = events.len();
                tracing::debug!("Fetched {count} remote usage events");
                (events, RemoteStatus::Fetched { events: count })
            }
            Err(WayrankError::RemoteTimeout { timeout_ms }) => {
                tracing::warn!("Remote usage fetch timed out after {timeout_ms}ms; using local logs");
                (Vec::new(), RemoteStatus::TimedOut)
            }
            Err(e) => {
                tracing::warn!("Remote usage fetch failed; using local logs: {e}");
                (Vec::new(), RemoteStatus::Unavailable)
            }
        }
    }

    fn patterns_at(&self, events: &[UsageEvent], now_ms: i64) -> Vec<NavigationPattern> {
        let (day, hour) = time_slot(now_ms);
        let day = self.match_day_of_week.then_some(day);
        self.analyzer.analyze(events, hour, day)
    }

    // -- Inspection --

    /// Analyzer ranking over the local journal for an explicit slot.
    pub fn patterns_for(&self, hour: u8, day: Option<u8>) -> Vec<NavigationPattern> {
        let events = self.log_store.query(self.log_store.limits().max_age_days);
        self.analyzer.analyze(&events, hour, day)
    }

    /// Drift numbers over the local journal, without touching the version.
    pub fn drift_report(&self) -> DriftReport {
        let events = self.log_store.query(self.log_store.limits().max_age_days);
        self.detector.report(&events, self.clock.now_ms())
    }

    /// Drop the cached plan so the next pass recomputes.
    pub fn invalidate(&self) {
        self.cache.invalidate();
    }
}
