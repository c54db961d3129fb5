// src/optimizer/remote.rs — Optional cross-device usage sink
//
// The remote side is never trusted to be fast or present. Every fetch is a
// race against a timer; whichever loses is dropped, so a late response can
// never touch engine state.

use std::cmp::Reverse;
use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use url::Url;

use crate::infra::errors::WayrankError;
use crate::usage::event::{parse_lenient, UsageEvent};

/// Path of the pattern fetch endpoint, relative to the sink base URL.
pub const PATTERNS_PATH: &str = "api/usage-patterns";
/// Path of the event ingestion endpoint, relative to the sink base URL.
pub const EVENTS_PATH: &str = "api/usage-events";

/// Durable usage event sink shared across sessions and devices.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RemoteUsageSink: Send + Sync {
    /// Events recorded by other sessions/devices.
    async fn fetch_logs(&self) -> Result<Vec<UsageEvent>, WayrankError>;

    /// Append one event.
    async fn submit(&self, event: UsageEvent) -> Result<(), WayrankError>;
}

/// HTTP implementation talking to the sync endpoint (see `api`).
pub struct HttpUsageSink {
    client: reqwest::Client,
    patterns_url: Url,
    events_url: Url,
    token: Option<String>,
}

impl HttpUsageSink {
    pub fn new(base_url: &str, token: Option<String>) -> Result<Self, WayrankError> {
        // Url::join replaces the last path segment unless the base ends in '/'
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };
        let base = Url::parse(&normalized)
            .map_err(|e| WayrankError::Config(format!("Invalid remote base_url '{base_url}': {e}")))?;
        let join = |path: &str| {
            base.join(path)
                .map_err(|e| WayrankError::Config(format!("Invalid remote path '{path}': {e}")))
        };
        Ok(Self {
            client: reqwest::Client::new(),
            patterns_url: join(PATTERNS_PATH)?,
            events_url: join(EVENTS_PATH)?,
            token,
        })
    }

    pub fn patterns_url(&self) -> &Url {
        &self.patterns_url
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

fn status_error(status: reqwest::StatusCode) -> WayrankError {
    WayrankError::Remote {
        message: format!("HTTP {status}"),
        retriable: status.is_server_error() || status == reqwest::StatusCode::TOO_MANY_REQUESTS,
    }
}

#[async_trait]
impl RemoteUsageSink for HttpUsageSink {
    async fn fetch_logs(&self) -> Result<Vec<UsageEvent>, WayrankError> {
        let resp = self
            .authorize(self.client.get(self.patterns_url.clone()))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(status_error(status));
        }

        let mut body: serde_json::Value = resp.json().await?;
        let logs = body
            .get_mut("logs")
            .map(serde_json::Value::take)
            .ok_or_else(|| WayrankError::Remote {
                message: "response has no 'logs' field".into(),
                retriable: false,
            })?;
        Ok(parse_lenient(logs))
    }

    async fn submit(&self, event: UsageEvent) -> Result<(), WayrankError> {
        let resp = self
            .authorize(self.client.post(self.events_url.clone()).json(&event))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(status_error(status));
        }
        Ok(())
    }
}

/// Race the fetch against `timeout`. The losing branch is dropped.
pub async fn fetch_with_timeout(
    sink: &dyn RemoteUsageSink,
    timeout: Duration,
) -> Result<Vec<UsageEvent>, WayrankError> {
    tokio::select! {
        result = sink.fetch_logs() => result,
        _ = tokio::time::sleep(timeout) => Err(WayrankError::RemoteTimeout {
            timeout_ms: timeout.as_millis() as u64,
        }),
    }
}

/// Merge by `(destination, timestamp)`. Local order is kept; a remote event
/// with the same key replaces the local one in place, new remote events are
/// appended in the order received.
pub fn merge_logs(local: Vec<UsageEvent>, remote: Vec<UsageEvent>) -> Vec<UsageEvent> {
    let mut merged: Vec<UsageEvent> = Vec::with_capacity(local.len() + remote.len());
    let mut index: HashMap<(String, i64), usize> = HashMap::new();

    for event in local {
        if let std::collections::hash_map::Entry::Vacant(slot) = index.entry(event.merge_key()) {
            slot.insert(merged.len());
            merged.push(event);
        }
    }

    for event in remote {
        match index.get(&event.merge_key()) {
            Some(&position) => merged[position] = event,
            None => {
                index.insert(event.merge_key(), merged.len());
                merged.push(event);
            }
        }
    }

    merged
}

/// Apply the journal bounds to a merged log: drop events older than
/// `cutoff_ms`, then keep only the newest `max_events`. Survivors keep their
/// relative order.
pub fn bound_logs(mut events: Vec<UsageEvent>, cutoff_ms: i64, max_events: usize) -> Vec<UsageEvent> {
    events.retain(|e| e.timestamp >= cutoff_ms);
    if events.len() <= max_events {
        return events;
    }

    let mut by_age: Vec<usize> = (0..events.len()).collect();
    by_age.sort_by_key(|&i| Reverse(events[i].timestamp));
    let mut keep = vec![false; events.len()];
    for &i in &by_age[..max_events] {
        keep[i] = true;
    }

    let mut flags = keep.into_iter();
    events.retain(|_| flags.next().unwrap_or(false));
    events
}
