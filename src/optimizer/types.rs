// src/optimizer/types.rs — Catalog, settings and plan types

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// One navigable destination in the caller's catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavItem {
    /// Stable identifier; matches `UsageEvent::destination`.
    pub path: String,
    pub label: String,
    pub category: String,
}

impl NavItem {
    pub fn new(
        path: impl Into<String>,
        label: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            label: label.into(),
            category: category.into(),
        }
    }
}

/// User-facing switches, owned by the settings store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdaptiveSettings {
    pub enabled: bool,
    #[serde(default)]
    pub selected_categories: BTreeSet<String>,
}

impl AdaptiveSettings {
    pub fn new<S: Into<String>>(enabled: bool, categories: impl IntoIterator<Item = S>) -> Self {
        Self {
            enabled,
            selected_categories: categories.into_iter().map(Into::into).collect(),
        }
    }

    /// The optimizer does anything at all only when this is true.
    pub fn is_active(&self) -> bool {
        self.enabled && !self.selected_categories.is_empty()
    }

    pub fn is_selected(&self, category: &str) -> bool {
        self.selected_categories.contains(category)
    }
}

/// Where one catalog entry moves to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizedItem {
    pub destination: String,
    pub original_index: usize,
    pub optimized_index: usize,
    /// `None` when the analyzer had no signal for this destination.
    pub score: Option<f64>,
}

/// A computed reordering, cached between navigations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationResult {
    /// In optimized order.
    pub items: Vec<OptimizedItem>,
    /// Epoch milliseconds.
    pub last_calculated: i64,
    pub pattern_version: u64,
    /// Categories the plan was built for.
    #[serde(default)]
    pub selected_categories: BTreeSet<String>,
}

/// Drift counter shared by whoever holds a clone. Each engine gets its own
/// unless the caller hands the same cell to several.
#[derive(Debug, Clone, Default)]
pub struct PatternVersion(Arc<AtomicU64>);

impl PatternVersion {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> u64 {
        self.0.load(Ordering::SeqCst)
    }

    /// Advance and return the new version.
    pub fn bump(&self) -> u64 {
        self.0.fetch_add(1, Ordering::SeqCst) + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_active() {
        assert!(!AdaptiveSettings::default().is_active());
        assert!(!AdaptiveSettings::new(true, Vec::<String>::new()).is_active());
        assert!(!AdaptiveSettings::new(false, ["operations"]).is_active());
        let s = AdaptiveSettings::new(true, ["operations"]);
        assert!(s.is_active());
        assert!(s.is_selected("operations"));
        assert!(!s.is_selected("reports"));
    }

    #[test]
    fn test_settings_wire_format() {
        let s: AdaptiveSettings =
            serde_json::from_str(r#"{"enabled": true, "selectedCategories": ["a", "b"]}"#)
                .unwrap();
        assert_eq!(s, AdaptiveSettings::new(true, ["a", "b"]));
    }

    #[test]
    fn test_pattern_version_shared_by_clones() {
        let version = PatternVersion::new();
        let other = version.clone();
        assert_eq!(version.bump(), 1);
        assert_eq!(other.get(), 1);
        assert_eq!(PatternVersion::new().get(), 0);
    }
}
