// src/cli/optimize.rs — `wayrank optimize`

use std::path::Path;

use crate::infra::config::Config;
use crate::optimizer::{AdaptiveSettings, NavItem, OptimizationEngine};

/// Read a catalog file: a JSON array of `{path, label, category}`.
pub fn read_catalog(path: &Path) -> anyhow::Result<Vec<NavItem>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Cannot read catalog {}: {e}", path.display()))?;
    let catalog: Vec<NavItem> = serde_json::from_str(&content)
        .map_err(|e| anyhow::anyhow!("Catalog {} is not valid JSON: {e}", path.display()))?;
    Ok(catalog)
}

/// Settings for this run: explicit categories override the configured ones.
pub fn resolve_settings(config: &Config, categories: &[String]) -> AdaptiveSettings {
    if categories.is_empty() {
        config.optimizer.settings()
    } else {
        AdaptiveSettings::new(config.optimizer.enabled, categories.iter().cloned())
    }
}

pub async fn run_optimize(
    engine: &OptimizationEngine,
    config: &Config,
    catalog_path: &Path,
    categories: &[String],
    explain: bool,
) -> anyhow::Result<()> {
    let catalog = read_catalog(catalog_path)?;
    let settings = resolve_settings(config, categories);

    let result = engine.optimize_detailed(&catalog, &settings).await;
    if explain {
        eprintln!("{}", serde_json::to_string(&result.outcome)?);
    }
    println!("{}", serde_json::to_string_pretty(&result.items)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        std::fs::write(
            &path,
            r#"[{"path": "/orders", "label": "Orders", "category": "operations"}]"#,
        )
        .unwrap();
        let catalog = read_catalog(&path).unwrap();
        assert_eq!(catalog, vec![NavItem::new("/orders", "Orders", "operations")]);
    }

    #[test]
    fn test_read_catalog_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        std::fs::write(&path, "{").unwrap();
        assert!(read_catalog(&path).is_err());
        assert!(read_catalog(&dir.path().join("missing.json")).is_err());
    }

    #[test]
    fn test_resolve_settings_override() {
        let mut config = Config::default();
        config.optimizer.selected_categories = vec!["admin".into()];

        let from_config = resolve_settings(&config, &[]);
        assert!(from_config.is_selected("admin"));

        let overridden = resolve_settings(&config, &["operations".to_string()]);
        assert!(overridden.is_selected("operations"));
        assert!(!overridden.is_selected("admin"));
    }
}
