// src/infra/config.rs — Configuration loading (TOML)

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::infra::errors::WayrankError;
use crate::infra::paths;
use crate::optimizer::types::AdaptiveSettings;
use crate::patterns::{AnalyzerConfig, DriftConfig};

/// Upper bound on how long the remote fetch may hold up an optimization pass.
pub const MAX_REMOTE_TIMEOUT_MS: u64 = 2_000;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub optimizer: OptimizerConfig,

    #[serde(default)]
    pub remote: RemoteConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub analyzer: AnalyzerConfig,

    #[serde(default)]
    pub drift: DriftConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    pub enabled: bool,
    /// Categories the user opted into reordering. Empty = optimizer is a no-op.
    pub selected_categories: Vec<String>,
    pub cache_ttl_secs: u64,
    pub log_window_days: u32,
    pub max_events: usize,
    /// Restrict analysis to events recorded on the current day of week.
    pub match_day_of_week: bool,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            selected_categories: Vec::new(),
            cache_ttl_secs: 3600,
            log_window_days: 30,
            max_events: 1000,
            match_day_of_week: true,
        }
    }
}

impl OptimizerConfig {
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn settings(&self) -> AdaptiveSettings {
        AdaptiveSettings::new(self.enabled, self.selected_categories.iter().cloned())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// Base URL of the sync endpoint. `None` = local-only.
    pub base_url: Option<String>,
    pub timeout_ms: u64,
    pub token: Option<String>,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout_ms: 1_500,
            token: None,
        }
    }
}

impl RemoteConfig {
    /// Fetch timeout, clamped so a misconfigured value cannot stall navigation.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms.min(MAX_REMOTE_TIMEOUT_MS))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,
    /// Bearer token required by the sync endpoint, if set.
    pub token: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 7878,
            token: None,
        }
    }
}

impl Config {
    /// Load config from file, falling back to defaults.
    pub fn load() -> Result<Self, WayrankError> {
        let path = paths::config_file_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, WayrankError> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| WayrankError::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_reasonable() {
        let c = Config::default();
        assert!(c.optimizer.enabled);
        assert!(c.optimizer.selected_categories.is_empty());
        assert_eq!(c.optimizer.cache_ttl_secs, 3600);
        assert_eq!(c.optimizer.log_window_days, 30);
        assert_eq!(c.optimizer.max_events, 1000);
        assert!(c.remote.base_url.is_none());
        assert_eq!(c.remote.timeout_ms, 1_500);
        assert_eq!(c.server.port, 7878);
        assert_eq!(c.analyzer.hour_window, 2);
        assert_eq!(c.drift.min_events, 10);
    }

    #[test]
    fn test_parse_minimal_toml() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.optimizer.max_events, 1000);
        assert!(!config.optimizer.settings().is_active());
    }

    #[test]
    fn test_parse_partial_section() {
        let toml_str = r#"
[optimizer]
selected_categories = ["operations", "reports"]

[remote]
base_url = "http://127.0.0.1:7878"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert!(config.optimizer.enabled);
        assert_eq!(config.optimizer.selected_categories.len(), 2);
        assert_eq!(config.optimizer.cache_ttl_secs, 3600);
        assert_eq!(config.remote.timeout_ms, 1_500);
        assert!(config.optimizer.settings().is_active());
    }

    #[test]
    fn test_parse_full_toml() {
        let toml_str = r#"
[optimizer]
enabled = false
selected_categories = ["operations"]
cache_ttl_secs = 600
log_window_days = 14
max_events = 200
match_day_of_week = false

[remote]
base_url = "https://sync.example.com"
timeout_ms = 1800
token = "secret"

[server]
port = 9000
token = "server-secret"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert!(!config.optimizer.enabled);
        assert_eq!(config.optimizer.cache_ttl(), Duration::from_secs(600));
        assert_eq!(config.optimizer.log_window_days, 14);
        assert_eq!(config.optimizer.max_events, 200);
        assert!(!config.optimizer.match_day_of_week);
        assert_eq!(config.remote.timeout(), Duration::from_millis(1800));
        assert_eq!(config.remote.token.as_deref(), Some("secret"));
        assert_eq!(config.server.port, 9000);
    }

    #[test]
    fn test_parse_tuning_sections() {
        let toml_str = r#"
[analyzer]
hour_window = 3
frequency_weight = 5.0

[drift]
min_events = 20
population_threshold = 0.5
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.analyzer.hour_window, 3);
        assert_eq!(config.analyzer.frequency_weight, 5.0);
        assert_eq!(config.analyzer.frequency_cap, 40.0);
        assert_eq!(config.drift.min_events, 20);
        assert_eq!(config.drift.population_threshold, 0.5);
        assert_eq!(config.drift.window_days, 7);
    }

    #[test]
    fn test_remote_timeout_clamped() {
        let remote = RemoteConfig {
            timeout_ms: 30_000,
            ..Default::default()
        };
        assert_eq!(remote.timeout(), Duration::from_millis(MAX_REMOTE_TIMEOUT_MS));
    }

    #[test]
    fn test_load_from_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[optimizer\nenabled = ").unwrap();
        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, WayrankError::Config(_)));
    }
}
